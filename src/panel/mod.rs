pub mod provider;

use crate::models::VoteEntry;
use crate::voting::{resolve_estimate, tally};

pub use provider::{FileSnapshotProvider, SnapshotProvider, StaticSnapshotProvider};

/// What the panel shows after a tally: the title line and the state of the
/// estimate action button.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: String,
    pub total_count: usize,
    pub summary: Option<String>,
    pub estimate: Option<f64>,
    pub action_enabled: bool,
}

/// Owns the lifecycle state of one voting panel.
#[derive(Debug)]
pub struct VotePanel {
    title_text: String,
    observer_attached: bool,
    last_view: Option<PanelView>,
}

impl VotePanel {
    pub fn new(title_text: impl Into<String>) -> Self {
        Self {
            title_text: title_text.into(),
            observer_attached: false,
            last_view: None,
        }
    }

    /// Marks the change observer as attached. Returns `true` only the first time.
    pub fn attach(&mut self) -> bool {
        if self.observer_attached {
            return false;
        }
        self.observer_attached = true;
        true
    }

    pub fn is_attached(&self) -> bool {
        self.observer_attached
    }

    pub fn last_view(&self) -> Option<&PanelView> {
        self.last_view.as_ref()
    }

    /// Re-tallies `entries` and replaces the previous view.
    pub fn render(&mut self, entries: &[VoteEntry]) -> PanelView {
        let result = tally(entries);
        // Action button is live only while one numeric estimate leads
        let estimate = resolve_estimate(entries);

        let title = match &result.summary {
            Some(summary) => format!(
                "{} (Votes: {}) - {}",
                self.title_text, result.total_count, summary
            ),
            None => format!("{} (Votes: {})", self.title_text, result.total_count),
        };

        // Keep the latest view; most recent render wins
        let view = PanelView {
            title,
            total_count: result.total_count,
            summary: result.summary,
            estimate,
            action_enabled: estimate.is_some(),
        };
        self.last_view = Some(view.clone());
        view
    }
}
