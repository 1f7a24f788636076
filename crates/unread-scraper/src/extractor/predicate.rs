//! Deciding whether a sidebar row is unread.
//!
//! The page exposes no semantic unread flag, so the default predicate reads
//! the name span's computed font weight.

use crate::script::RowSnapshot;

pub trait UnreadPredicate: Send + Sync {
    fn is_unread(&self, row: &RowSnapshot) -> bool;
}

impl<F> UnreadPredicate for F
where
    F: Fn(&RowSnapshot) -> bool + Send + Sync,
{
    fn is_unread(&self, row: &RowSnapshot) -> bool {
        self(row)
    }
}

/// Unread when the name is rendered at or above `min_weight`, or `bold`.
#[derive(Debug, Clone, Copy)]
pub struct FontWeightPredicate {
    pub min_weight: u16,
}

impl FontWeightPredicate {
    pub fn new(min_weight: u16) -> Self {
        Self { min_weight }
    }
}

impl UnreadPredicate for FontWeightPredicate {
    fn is_unread(&self, row: &RowSnapshot) -> bool {
        let weight = row.font_weight.trim();
        if weight.eq_ignore_ascii_case("bold") || weight.eq_ignore_ascii_case("bolder") {
            return true;
        }
        leading_int(weight).is_some_and(|w| w >= u32::from(self.min_weight))
    }
}

/// Parse leading ASCII digits the way `parseInt` does (`"700.5"` -> 700).
fn leading_int(s: &str) -> Option<u32> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(weight: &str) -> RowSnapshot {
        RowSnapshot {
            index: 0,
            name: "Alice".into(),
            font_weight: weight.into(),
            texts: Vec::new(),
        }
    }

    #[test]
    fn numeric_weights() {
        let p = FontWeightPredicate::new(600);
        assert!(p.is_unread(&row("600")));
        assert!(p.is_unread(&row("700")));
        assert!(p.is_unread(&row("700.5")));
        assert!(!p.is_unread(&row("400")));
        assert!(!p.is_unread(&row("599")));
    }

    #[test]
    fn keyword_weights() {
        let p = FontWeightPredicate::new(600);
        assert!(p.is_unread(&row("bold")));
        assert!(p.is_unread(&row("BOLD")));
        assert!(!p.is_unread(&row("normal")));
        assert!(!p.is_unread(&row("")));
    }

    #[test]
    fn threshold_is_configurable() {
        assert!(FontWeightPredicate::new(500).is_unread(&row("500")));
        assert!(!FontWeightPredicate::new(800).is_unread(&row("700")));
    }

    #[test]
    fn closures_are_predicates() {
        let p = |r: &RowSnapshot| r.name.starts_with('A');
        assert!(p.is_unread(&row("400")));
    }
}
