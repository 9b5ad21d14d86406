use crate::models::VoteEntry;
use crate::voting::plurality::winners;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Plain decimal labels only: "5", "0.5", "13". Cards like "?" or "☕" never match.
    static ref NUMERIC_LABEL: Regex = Regex::new(r"^\d+(?:\.\d+)?$").unwrap();
}

/// Parses a card label as an estimate, if it is a plain number.
pub fn parse_estimate_label(label: &str) -> Option<f64> {
    if !NUMERIC_LABEL.is_match(label) {
        return None;
    }
    label.parse::<f64>().ok()
}

/// The numeric estimate the votes settle on: only when a single label leads
/// and that label is a number. Ties resolve to nothing.
pub fn resolve_estimate(entries: &[VoteEntry]) -> Option<f64> {
    match winners(entries).as_slice() {
        [single] => parse_estimate_label(&single.label),
        _ => None,
    }
}
