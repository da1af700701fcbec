//! Configuration for search sessions and highlight resolution.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables shared by the locator, the resolver and the search session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Clauses shorter than this many canonical characters are discarded.
    pub min_term_chars: usize,

    /// Ceiling on the wait for a target page's text layer to mount.
    #[serde(with = "serde_millis")]
    pub navigation_timeout: Duration,

    /// Interval between text layer mount checks.
    #[serde(with = "serde_millis")]
    pub poll_interval: Duration,

    /// Fewer rendered fragments than this means the layer is still mounting.
    pub min_rendered_fragments: usize,

    /// Reject matches whose runs touch more distinct fragments than this.
    pub max_fragments_per_match: Option<usize>,

    /// Overlay colour of the active match.
    pub current_match_color: String,

    /// Overlay colour of every other match.
    pub other_match_color: String,

    /// CSS class shared by all search overlays.
    pub overlay_class: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            min_term_chars: 4,
            navigation_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
            min_rendered_fragments: 1,
            max_fragments_per_match: None,
            current_match_color: "rgba(255, 170, 0, 0.6)".to_string(),
            other_match_color: "rgba(255, 230, 0, 0.3)".to_string(),
            overlay_class: "search-highlight".to_string(),
        }
    }

    /// Set the clause length floor.
    pub fn with_min_term_chars(mut self, chars: usize) -> Self {
        self.min_term_chars = chars;
        self
    }

    /// Set the text layer mount timeout.
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Set the mount polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the minimum fragment count of a mounted text layer.
    pub fn with_min_rendered_fragments(mut self, count: usize) -> Self {
        self.min_rendered_fragments = count;
        self
    }

    /// Limit how many fragments one match may touch.
    pub fn with_max_fragments_per_match(mut self, max: Option<usize>) -> Self {
        self.max_fragments_per_match = max;
        self
    }

    /// Set the active and inactive overlay colours.
    pub fn with_match_colors(
        mut self,
        current: impl Into<String>,
        other: impl Into<String>,
    ) -> Self {
        self.current_match_color = current.into();
        self.other_match_color = other.into();
        self
    }

    /// Set the overlay CSS class.
    pub fn with_overlay_class(mut self, class: impl Into<String>) -> Self {
        self.overlay_class = class.into();
        self
    }
}

/// Serialize `Duration` as milliseconds.
mod serde_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
