use serde::{Deserialize, Deserializer, Serialize};

/// One displayed vote card. `estimate_label` is `None` until the card is revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VoteEntry {
    // Snapshots carry the card's raw display text
    #[serde(rename = "estimate", default, deserialize_with = "display_text")]
    pub estimate_label: Option<String>,
}

impl VoteEntry {
    pub fn revealed(label: impl Into<String>) -> Self {
        Self {
            estimate_label: Some(label.into()),
        }
    }

    pub fn unrevealed() -> Self {
        Self { estimate_label: None }
    }

    /// Builds an entry from the text of a card's estimate element.
    /// A missing element or blank text means the card is unrevealed.
    pub fn from_display_text(text: Option<&str>) -> Self {
        let estimate_label = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Self { estimate_label }
    }
}

fn display_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text: Option<String> = Option::deserialize(deserializer)?;
    Ok(VoteEntry::from_display_text(text.as_deref()).estimate_label)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyResult {
    pub total_count: usize,
    pub summary: Option<String>,
}

/// On-disk form of a vote panel snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PanelSnapshot {
    #[serde(default)]
    pub entries: Vec<VoteEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_policy() {
        assert_eq!(VoteEntry::from_display_text(None), VoteEntry::unrevealed());
        assert_eq!(VoteEntry::from_display_text(Some("   ")), VoteEntry::unrevealed());
        assert_eq!(VoteEntry::from_display_text(Some(" 8\n")), VoteEntry::revealed("8"));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let json = r#"{"entries":[{"estimate":"5"},{"estimate":null},{}]}"#;
        let snapshot: PanelSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(
            snapshot.entries,
            vec![
                VoteEntry::revealed("5"),
                VoteEntry::unrevealed(),
                VoteEntry::unrevealed()
            ]
        );
    }

    #[test]
    fn test_snapshot_blank_text_is_unrevealed() {
        let json = r#"{"entries":[{"estimate":""},{"estimate":"  "},{"estimate":" 5 "}]}"#;
        let snapshot: PanelSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(
            snapshot.entries,
            vec![
                VoteEntry::unrevealed(),
                VoteEntry::unrevealed(),
                VoteEntry::revealed("5")
            ]
        );
    }
}
