//! Preview from the sidebar row itself. Read-only; never touches page state.

use std::sync::Arc;

use crate::Result;
use crate::host::{PageHost, run_typed};
use crate::preview::ChatPreview;
use crate::script::{PageScript, RowSnapshot, SidebarSnapshot};

use super::heuristics::is_relative_timestamp;
use super::predicate::UnreadPredicate;
use super::{PreviewExtractor, unread_rows};

#[derive(Clone)]
pub struct SidebarExtractor {
    predicate: Arc<dyn UnreadPredicate>,
}

impl SidebarExtractor {
    pub fn new(predicate: impl UnreadPredicate + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Previews for every unread row of a snapshot, in sidebar order.
    pub fn previews_from(&self, snapshot: &SidebarSnapshot) -> Vec<ChatPreview> {
        unread_rows(snapshot, self.predicate.as_ref())
            .map(|row| ChatPreview::new(row.name.clone(), row_preview(row)))
            .collect()
    }
}

impl PreviewExtractor for SidebarExtractor {
    async fn extract<H: PageHost>(&self, host: &H) -> Result<Vec<ChatPreview>> {
        let snapshot: SidebarSnapshot = run_typed(host, &PageScript::SnapshotSidebar).await?;
        Ok(self.previews_from(&snapshot))
    }
}

/// First non-empty span after the name that is not a relative timestamp.
fn row_preview(row: &RowSnapshot) -> &str {
    row.texts
        .iter()
        .map(String::as_str)
        .find(|text| !text.is_empty() && !is_relative_timestamp(text))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::predicate::FontWeightPredicate;
    use crate::preview::NEW_MESSAGE;

    fn row(index: usize, name: &str, weight: &str, texts: &[&str]) -> RowSnapshot {
        RowSnapshot {
            index,
            name: name.into(),
            font_weight: weight.into(),
            texts: texts.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn only_bold_rows_are_reported() {
        let snapshot = SidebarSnapshot {
            rows: vec![
                row(0, "Alice", "700", &["hello", "1m"]),
                row(1, "Carol", "400", &["old news", "2d"]),
                row(2, "Bob", "bold", &["3h", "see you"]),
            ],
            active: None,
        };
        let previews = SidebarExtractor::new(FontWeightPredicate::new(600)).previews_from(&snapshot);
        assert_eq!(
            previews,
            vec![
                ChatPreview::new("Alice", "hello"),
                ChatPreview::new("Bob", "see you"),
            ]
        );
    }

    #[test]
    fn implausible_names_are_skipped() {
        let long = "x".repeat(51);
        let snapshot = SidebarSnapshot {
            rows: vec![row(0, "", "700", &["hi"]), row(1, &long, "700", &["hi"])],
            active: None,
        };
        let previews = SidebarExtractor::new(FontWeightPredicate::new(600)).previews_from(&snapshot);
        assert!(previews.is_empty());
    }

    #[test]
    fn row_without_text_gets_sentinel() {
        let snapshot = SidebarSnapshot {
            rows: vec![row(0, "Dana", "600", &["", "5w"])],
            active: None,
        };
        let previews = SidebarExtractor::new(FontWeightPredicate::new(600)).previews_from(&snapshot);
        assert_eq!(previews[0].preview, NEW_MESSAGE);
    }

    #[test]
    fn preview_is_truncated() {
        let long = "y".repeat(500);
        let snapshot = SidebarSnapshot {
            rows: vec![row(0, "Eve", "700", &[&long])],
            active: None,
        };
        let previews = SidebarExtractor::new(FontWeightPredicate::new(600)).previews_from(&snapshot);
        assert_eq!(previews[0].preview.chars().count(), 100);
    }
}
