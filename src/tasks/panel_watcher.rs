use crate::error::{AppError, Result};
use crate::models::VoteEntry;
use crate::panel::{PanelView, SnapshotProvider, VotePanel};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::time::interval;

/// Outcome of a single watcher tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// Still looking for the panel; `attempts` discovery attempts used so far.
    Discovering { attempts: u32 },
    /// Panel was never found within the retry budget.
    GaveUp,
    /// Snapshot differed from the previous one and the panel was re-rendered.
    Rendered(PanelView),
    Unchanged,
    /// Snapshot could not be taken after the panel was attached.
    Skipped,
}

pub struct PanelWatcher {
    provider: Arc<dyn SnapshotProvider>,
    panel: VotePanel,
    discovery_retries: u32,
    discovery_attempts: u32,
    last_snapshot: Option<Vec<VoteEntry>>,
}

impl PanelWatcher {
    pub fn new(provider: Arc<dyn SnapshotProvider>, panel: VotePanel, discovery_retries: u32) -> Self {
        Self {
            provider,
            panel,
            discovery_retries,
            discovery_attempts: 0,
            last_snapshot: None,
        }
    }

    pub fn panel(&self) -> &VotePanel {
        &self.panel
    }

    pub async fn poll_once(&mut self) -> Tick {
        if !self.panel.is_attached() {
            return self.discover().await;
        }

        match self.provider.snapshot().await {
            Ok(entries) => self.apply(entries),
            Err(e) => {
                warn!("Failed to snapshot vote panel: {}", e);
                Tick::Skipped
            }
        }
    }

    async fn discover(&mut self) -> Tick {
        if self.discovery_attempts >= self.discovery_retries {
            return Tick::GaveUp;
        }
        self.discovery_attempts += 1;

        match self.provider.snapshot().await {
            Ok(entries) => {
                self.panel.attach();
                info!(
                    "Vote panel found after {} attempt(s)",
                    self.discovery_attempts
                );
                self.apply(entries)
            }
            Err(AppError::PanelNotFound(source)) => {
                debug!(
                    "Vote panel not found at {} (attempt {}/{})",
                    source, self.discovery_attempts, self.discovery_retries
                );
                if self.discovery_attempts >= self.discovery_retries {
                    warn!("Page may not carry a voting panel; giving up");
                    Tick::GaveUp
                } else {
                    Tick::Discovering {
                        attempts: self.discovery_attempts,
                    }
                }
            }
            Err(e) => {
                warn!(
                    "Failed to read vote panel during discovery (attempt {}/{}): {}",
                    self.discovery_attempts, self.discovery_retries, e
                );
                if self.discovery_attempts >= self.discovery_retries {
                    warn!("Vote panel never became readable; giving up");
                    Tick::GaveUp
                } else {
                    Tick::Discovering {
                        attempts: self.discovery_attempts,
                    }
                }
            }
        }
    }

    fn apply(&mut self, entries: Vec<VoteEntry>) -> Tick {
        if self.last_snapshot.as_ref() == Some(&entries) {
            return Tick::Unchanged;
        }
        let view = self.panel.render(&entries);
        info!("{}", view.title);
        self.last_snapshot = Some(entries);
        Tick::Rendered(view)
    }

    /// Polls the provider every `period` until discovery gives up.
    pub async fn run(mut self, period: StdDuration) -> Result<()> {
        info!("Watching vote panel every {:?}", period);
        let mut interval = interval(period);

        loop {
            interval.tick().await;
            if self.poll_once().await == Tick::GaveUp {
                return Ok(());
            }
        }
    }
}
