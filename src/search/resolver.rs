//! Turning canonical match ranges into rectangles.
//!
//! A match range is walked through the index mapping and folded into runs of
//! source characters per fragment. Each run is measured through the text
//! layer; a run that cannot be measured is logged and skipped so that one
//! stale fragment never blanks out the rest of a highlight.

use super::locator::MatchRange;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::geometry::{scaled_position, Point, Rect, ScaledPosition};
use crate::layer::{OverlaySurface, RectMeasurer};
use crate::text::{CanonicalIndex, CharMapping};

/// Characters `start..end` of one fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentRun {
    /// Fragment id
    pub fragment: usize,
    /// First character offset
    pub start: usize,
    /// One past the last character offset
    pub end: usize,
}

/// Fold the mapping entries of `range` into per-fragment runs.
///
/// Virtual entries are skipped. Consecutive entries of the same fragment
/// extend the current run, so characters dropped during canonicalization
/// (quotes, collapsed spaces) stay covered and repeated offsets from an
/// expanded ligature do not move the boundary.
pub fn fragment_runs(index: &CanonicalIndex, range: MatchRange) -> Vec<FragmentRun> {
    let mapping = index.mapping();
    let end = range.end.min(mapping.len());
    let start = range.start.min(end);

    let mut runs: Vec<FragmentRun> = Vec::new();
    for entry in &mapping[start..end] {
        let CharMapping::Real { fragment, offset } = *entry else {
            continue;
        };
        match runs.last_mut() {
            Some(run) if run.fragment == fragment && offset >= run.start => {
                run.end = run.end.max(offset + 1);
            },
            _ => runs.push(FragmentRun {
                fragment,
                start: offset,
                end: offset + 1,
            }),
        }
    }
    runs
}

/// Number of distinct fragments the runs touch.
pub fn fragment_span(runs: &[FragmentRun]) -> usize {
    let mut fragments: Vec<usize> = runs.iter().map(|r| r.fragment).collect();
    fragments.sort_unstable();
    fragments.dedup();
    fragments.len()
}

/// Whether the runs stay within the configured fragment budget.
pub fn within_fragment_budget(runs: &[FragmentRun], config: &SearchConfig) -> bool {
    match config.max_fragments_per_match {
        Some(max) if fragment_span(runs) > max => {
            log::warn!(
                "Rejecting match spanning {} fragments (limit {})",
                fragment_span(runs),
                max
            );
            false
        },
        _ => true,
    }
}

fn measure_run<M: RectMeasurer + ?Sized>(measurer: &M, run: &FragmentRun) -> Result<Vec<Rect>> {
    let node_len = measurer.node_len(run.fragment)?;
    let end = run.end.min(node_len);
    if run.start >= end {
        return Ok(Vec::new());
    }
    measurer.client_rects(run.fragment, run.start, end)
}

/// Measure runs, dropping empty rectangles and runs that fail to measure.
pub fn measure_runs<M: RectMeasurer + ?Sized>(runs: &[FragmentRun], measurer: &M) -> Vec<Rect> {
    let mut rects = Vec::new();
    for run in runs {
        match measure_run(measurer, run) {
            Ok(measured) => rects.extend(measured.into_iter().filter(|r| !r.is_empty())),
            Err(e) => log::warn!(
                "Skipping run {}..{} of fragment {}: {}",
                run.start,
                run.end,
                run.fragment,
                e
            ),
        }
    }
    rects
}

/// Viewport rectangles of one match.
pub fn resolve_geometry<M: RectMeasurer + ?Sized>(
    index: &CanonicalIndex,
    range: MatchRange,
    measurer: &M,
) -> Vec<Rect> {
    measure_runs(&fragment_runs(index, range), measurer)
}

/// Persisted geometry of one match.
///
/// `page_origin` is the viewport offset of the page container and `scale` the
/// zoom the layer is rendered at. `Ok(None)` when nothing measurable remains.
pub fn resolve_scaled<M: RectMeasurer + ?Sized>(
    index: &CanonicalIndex,
    range: MatchRange,
    measurer: &M,
    page_origin: Point,
    scale: f64,
    page_number: u32,
) -> Result<Option<ScaledPosition>> {
    let rects = resolve_geometry(index, range, measurer);
    scaled_position(&rects, page_origin, scale, page_number)
}

/// Replace all search overlays with the given matches.
///
/// Each match is a list of viewport rectangles; the match at `active` is
/// drawn in the current-match colour. Returns the page-relative rectangle to
/// scroll to.
pub fn paint_matches<S: OverlaySurface + ?Sized>(
    surface: &S,
    page: u32,
    page_origin: Point,
    matches: &[Vec<Rect>],
    active: Option<usize>,
    config: &SearchConfig,
) -> Option<Rect> {
    surface.clear(&config.overlay_class);

    let mut scroll_target = None;
    for (i, rects) in matches.iter().enumerate() {
        let is_active = active == Some(i);
        let color = if is_active {
            &config.current_match_color
        } else {
            &config.other_match_color
        };
        for rect in rects.iter().filter(|r| !r.is_empty()) {
            let local = rect.relative_to(page_origin);
            surface.draw(page, local, &config.overlay_class, color);
            if is_active && scroll_target.is_none() {
                scroll_target = Some(local);
            }
        }
    }
    scroll_target
}
