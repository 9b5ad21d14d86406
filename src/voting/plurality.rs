use crate::models::{TallyResult, VoteEntry};
use crate::voting::VoteCount;
use std::collections::HashMap;

pub fn tally(entries: &[VoteEntry]) -> TallyResult {
    let total_count = entries.len();
    let winners = winners(entries);

    // Nothing revealed yet
    let Some(max_count) = winners.first().map(|vc| vc.count) else {
        return TallyResult {
            total_count,
            summary: None,
        };
    };

    // Strictly more than half; exactly 50% is a plurality
    let header_word = if max_count * 2 > total_count { "Majority" } else { "Plurality" };
    let shown_percent = rounded_percent(max_count, total_count);

    let summary = if winners.len() == 1 {
        format!(
            "{}: {} ({} votes, {}%)",
            header_word, winners[0].label, max_count, shown_percent
        )
    } else {
        let labels: Vec<&str> = winners.iter().map(|vc| vc.label.as_str()).collect();
        format!(
            "{}: {} ({} votes each, {}%)",
            header_word,
            labels.join(", "),
            max_count,
            shown_percent
        )
    };

    TallyResult {
        total_count,
        summary: Some(summary),
    }
}

/// `count / total * 100` rounded half away from zero, in integer arithmetic
/// so exact halves like 57.5% never drift below .5.
fn rounded_percent(count: usize, total: usize) -> usize {
    (count * 200 + total) / (2 * total)
}

/// Labels sharing the highest count, in order of first appearance.
/// Empty when no entry is revealed.
pub fn winners(entries: &[VoteEntry]) -> Vec<VoteCount> {
    let counts = count_labels(entries);
    let max_count = counts.iter().map(|vc| vc.count).max().unwrap_or(0);
    counts
        .into_iter()
        .filter(|vc| vc.count == max_count)
        .collect()
}

/// Counts revealed labels by exact string match, keeping first-appearance order.
pub fn count_labels(entries: &[VoteEntry]) -> Vec<VoteCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<VoteCount> = Vec::new();

    // Unrevealed cards only count toward the total
    for label in entries.iter().filter_map(|e| e.estimate_label.as_deref()) {
        match positions.get(label) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                positions.insert(label, counts.len());
                counts.push(VoteCount {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts
}
