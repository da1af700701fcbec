//! Cross-page search sessions.
//!
//! A session searches the whole document through the text extraction API,
//! which works for pages that are not mounted, and records one hit per
//! occurrence. Navigating to a hit shows its page, waits for the page's text
//! layer to mount, and highlights every occurrence on it with the selected one
//! emphasized.
//!
//! Sessions are single-threaded. State lives in cells so overlapping
//! navigations can be detected: a navigation requested while another is in
//! flight is ignored, not queued. A navigation that outlives its search
//! (the session was cleared or searched again while the page mounted) is
//! dropped without touching state or overlays.

use super::clauses::candidate_clauses;
use super::locator::{find_canonical, MatchLocator};
use super::resolver::{fragment_runs, measure_runs, paint_matches, within_fragment_budget};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::layer::{OverlaySurface, TextLayer};
use crate::text::{canonicalize, CanonicalIndex};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Per-page plain text of a document.
///
/// Pages are 1-based.
#[allow(async_fn_in_trait)]
pub trait TextSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Plain text of one page.
    async fn page_text(&self, page: u32) -> Result<String>;
}

/// The page viewer a session drives.
///
/// The viewer also owns the timer the session waits on, so the session runs
/// on whatever executor the viewer's platform provides.
#[allow(async_fn_in_trait)]
pub trait Viewer {
    /// Mounted text layer type
    type Layer: TextLayer;
    /// Overlay surface type
    type Surface: OverlaySurface;

    /// Page currently shown.
    fn current_page(&self) -> u32;

    /// Ask the viewer to show `page`; its layer mounts some time later.
    fn set_current_page(&self, page: u32);

    /// The text layer of `page` if it is mounted right now.
    fn text_layer(&self, page: u32) -> Option<Self::Layer>;

    /// Surface search overlays are drawn on.
    fn surface(&self) -> &Self::Surface;

    /// Suspend for about `duration` between text layer checks.
    async fn wait(&self, duration: Duration);
}

/// Search session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchState {
    /// No term submitted
    #[default]
    Idle,
    /// Coarse cross-page search running
    Searching,
    /// Hits available; `cursor` is the selected hit
    MatchesFound {
        /// Selected hit
        cursor: usize,
    },
    /// Moving to hit `cursor`
    Navigating {
        /// Target hit
        cursor: usize,
    },
    /// The last search found nothing
    NoMatches,
}

/// One occurrence of a clause found by the coarse search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHit {
    /// Page number (1-based)
    pub page: u32,
    /// Clause index within the submitted term
    pub clause: usize,
    /// Occurrence of that clause on the page, counting from 0
    pub occurrence: usize,
}

/// How a navigation request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Overlays were drawn; `rects` counts the rectangles of all matches
    Highlighted {
        /// Rectangles drawn
        rects: usize,
    },
    /// Another navigation was in flight
    Ignored,
    /// The page's text layer did not mount in time
    TimedOut,
    /// The hit index does not exist
    NoSuchMatch,
    /// The page mounted but none of the clauses could be located on it
    NotFoundOnPage,
    /// The search was cleared or replaced while the page was mounting
    Superseded,
}

/// Resets the in-flight flag when a navigation ends, however it ends.
struct NavigationGuard<'a>(&'a Cell<bool>);

impl<'a> NavigationGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for NavigationGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Page visiting order: `target` first when valid, then ascending.
pub fn page_order(page_count: u32, target: Option<u32>) -> Vec<u32> {
    let target = target.filter(|p| (1..=page_count).contains(p));
    target
        .into_iter()
        .chain((1..=page_count).filter(|&p| Some(p) != target))
        .collect()
}

/// Number of waits that fit into `timeout` at `interval`, at least one.
pub fn poll_budget(timeout: Duration, interval: Duration) -> u32 {
    let interval = interval.as_micros().max(1);
    (timeout.as_micros() / interval).clamp(1, u128::from(u32::MAX)) as u32
}

/// A search over one document.
pub struct SearchSession<S: TextSource, V: Viewer> {
    source: S,
    viewer: V,
    config: SearchConfig,
    locator: MatchLocator,
    state: Cell<SearchState>,
    clauses: RefCell<Vec<String>>,
    hits: RefCell<Vec<PageHit>>,
    page_cache: RefCell<HashMap<u32, Rc<[char]>>>,
    navigating: Cell<bool>,
    generation: Cell<u64>,
}

impl<S: TextSource, V: Viewer> SearchSession<S, V> {
    /// Create a session with default configuration.
    pub fn new(source: S, viewer: V) -> Self {
        Self::with_config(source, viewer, SearchConfig::default())
    }

    /// Create a session with explicit configuration.
    pub fn with_config(source: S, viewer: V, config: SearchConfig) -> Self {
        Self {
            source,
            viewer,
            locator: MatchLocator::from_config(&config),
            config,
            state: Cell::new(SearchState::Idle),
            clauses: RefCell::new(Vec::new()),
            hits: RefCell::new(Vec::new()),
            page_cache: RefCell::new(HashMap::new()),
            navigating: Cell::new(false),
            generation: Cell::new(0),
        }
    }

    /// Current state.
    pub fn state(&self) -> SearchState {
        self.state.get()
    }

    /// The viewer being driven.
    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// The text source searched.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Session configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Hits of the last search in navigation order.
    pub fn hits(&self) -> Vec<PageHit> {
        self.hits.borrow().clone()
    }

    /// Page of every hit, repeated once per occurrence.
    pub fn matched_pages(&self) -> Vec<u32> {
        self.hits.borrow().iter().map(|h| h.page).collect()
    }

    /// Number of hits ("M" in "N of M").
    pub fn match_count(&self) -> usize {
        self.hits.borrow().len()
    }

    /// Selected hit, if any.
    pub fn current_match(&self) -> Option<usize> {
        match self.state.get() {
            SearchState::MatchesFound { cursor } | SearchState::Navigating { cursor } => {
                Some(cursor)
            },
            _ => None,
        }
    }

    /// Search every page for `term`.
    ///
    /// `target_page` is searched first when given, which decides which
    /// occurrence comes first. Returns the page of each hit.
    pub async fn search(&self, term: &str, target_page: Option<u32>) -> Vec<u32> {
        self.bump_generation();
        self.viewer.surface().clear(&self.config.overlay_class);
        self.hits.borrow_mut().clear();
        self.state.set(SearchState::Searching);

        let clauses = candidate_clauses(term, self.config.min_term_chars);
        *self.clauses.borrow_mut() = clauses.clone();
        if clauses.is_empty() {
            log::debug!("No searchable clause in {:?}", term);
            self.state.set(SearchState::NoMatches);
            return Vec::new();
        }

        let canonical_clauses: Vec<Vec<char>> = clauses
            .iter()
            .map(|clause| canonicalize(clause).chars().collect())
            .collect();

        let mut hits = Vec::new();
        for page in page_order(self.source.page_count(), target_page) {
            let Some(text) = self.canonical_page(page).await else {
                continue;
            };
            for (clause, term) in canonical_clauses.iter().enumerate() {
                let found = find_canonical(&text, term).len();
                hits.extend((0..found).map(|occurrence| PageHit {
                    page,
                    clause,
                    occurrence,
                }));
            }
        }

        log::debug!("Search for {:?} found {} hits", term, hits.len());
        let pages = hits.iter().map(|h| h.page).collect();
        self.state.set(if hits.is_empty() {
            SearchState::NoMatches
        } else {
            SearchState::MatchesFound { cursor: 0 }
        });
        *self.hits.borrow_mut() = hits;
        pages
    }

    /// Canonical text of a page, extracted once per document.
    async fn canonical_page(&self, page: u32) -> Option<Rc<[char]>> {
        if let Some(text) = self.page_cache.borrow().get(&page) {
            return Some(Rc::clone(text));
        }

        match self.source.page_text(page).await {
            Ok(text) => {
                let chars: Rc<[char]> = canonicalize(&text).chars().collect();
                self.page_cache.borrow_mut().insert(page, Rc::clone(&chars));
                Some(chars)
            },
            Err(e) => {
                log::warn!("Treating page {} as a non-match: {}", page, e);
                None
            },
        }
    }

    /// Show hit `index` and highlight its page.
    pub async fn go_to_match(&self, index: usize) -> NavigationOutcome {
        let Some(_guard) = NavigationGuard::acquire(&self.navigating) else {
            log::debug!("Navigation in flight, ignoring request for hit {}", index);
            return NavigationOutcome::Ignored;
        };

        let Some(hit) = self.hits.borrow().get(index).copied() else {
            return NavigationOutcome::NoSuchMatch;
        };

        let generation = self.generation.get();
        let previous = self.state.get();
        self.state.set(SearchState::Navigating { cursor: index });

        if self.viewer.current_page() != hit.page {
            self.viewer.set_current_page(hit.page);
        }

        let layer = self.wait_for_layer(hit.page, generation).await;
        if self.generation.get() != generation {
            log::debug!("Search changed while navigating to hit {}, dropping it", index);
            return NavigationOutcome::Superseded;
        }
        let Some(layer) = layer else {
            log::warn!("Text layer of page {} did not mount in time", hit.page);
            self.state.set(previous);
            return NavigationOutcome::TimedOut;
        };

        let outcome = self.highlight_page(&layer, hit);
        self.state.set(SearchState::MatchesFound { cursor: index });
        outcome
    }

    /// Move to the next hit, wrapping around.
    pub async fn next_match(&self) -> NavigationOutcome {
        let count = self.match_count();
        if count == 0 {
            return NavigationOutcome::NoSuchMatch;
        }
        let next = self.current_match().map_or(0, |c| (c + 1) % count);
        self.go_to_match(next).await
    }

    /// Move to the previous hit, wrapping around.
    pub async fn previous_match(&self) -> NavigationOutcome {
        let count = self.match_count();
        if count == 0 {
            return NavigationOutcome::NoSuchMatch;
        }
        let previous = self.current_match().map_or(0, |c| (c + count - 1) % count);
        self.go_to_match(previous).await
    }

    /// Poll until `page` has a plausible text layer or the timeout passes.
    ///
    /// Gives up early once the search that started the wait is gone.
    async fn wait_for_layer(&self, page: u32, generation: u64) -> Option<V::Layer> {
        let budget = poll_budget(self.config.navigation_timeout, self.config.poll_interval);
        for attempt in 0..=budget {
            if self.generation.get() != generation {
                return None;
            }
            if let Some(layer) = self.viewer.text_layer(page) {
                if layer.fragment_count() >= self.config.min_rendered_fragments {
                    return Some(layer);
                }
            }
            if attempt < budget {
                self.viewer.wait(self.config.poll_interval).await;
            }
        }
        None
    }

    /// Locate every clause on the mounted page and draw the overlays.
    fn highlight_page(&self, layer: &V::Layer, hit: PageHit) -> NavigationOutcome {
        let index = CanonicalIndex::build(&layer.fragments());
        let clauses = self.clauses.borrow();

        let mut matches = Vec::new();
        let mut active = None;
        for (clause_idx, clause) in clauses.iter().enumerate() {
            let mut located = Vec::new();
            for range in self.locator.locate(&index, clause) {
                let runs = fragment_runs(&index, range);
                if within_fragment_budget(&runs, &self.config) {
                    located.push(measure_runs(&runs, layer));
                }
            }
            if clause_idx == hit.clause && !located.is_empty() {
                // The extracted text and the rendered layer can disagree on counts.
                active = Some(matches.len() + hit.occurrence.min(located.len() - 1));
            }
            matches.extend(located);
        }

        if matches.is_empty() {
            log::warn!("No clause of the current search located on page {}", hit.page);
            self.viewer.surface().clear(&self.config.overlay_class);
            return NavigationOutcome::NotFoundOnPage;
        }

        let surface = self.viewer.surface();
        let target = paint_matches(
            surface,
            hit.page,
            layer.page_origin(),
            &matches,
            active,
            &self.config,
        );
        if let Some(rect) = target {
            surface.scroll_into_view(hit.page, rect);
        }

        NavigationOutcome::Highlighted {
            rects: matches.iter().map(|m| m.iter().filter(|r| !r.is_empty()).count()).sum(),
        }
    }

    /// Drop the search: remove overlays and return to idle.
    pub fn clear(&self) {
        self.bump_generation();
        self.viewer.surface().clear(&self.config.overlay_class);
        self.hits.borrow_mut().clear();
        self.clauses.borrow_mut().clear();
        self.state.set(SearchState::Idle);
    }

    fn bump_generation(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    /// Forget cached page text, e.g. after the document changed.
    pub fn reset_document(&self) {
        self.clear();
        self.page_cache.borrow_mut().clear();
    }
}
