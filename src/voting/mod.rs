pub mod estimate;
pub mod plurality;

pub use estimate::resolve_estimate;
pub use plurality::tally;

// Vote count for a single revealed label, in order of first appearance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteCount {
    pub label: String,
    pub count: usize,
}
