//! Single-user selection state

use serde::Serialize;

/// Which user, if any, is highlighted in the directory view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`, or clear the selection if `id` is already selected
    pub fn toggle(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.to_string());
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_selects_then_clears() {
        let mut selection = Selection::new();

        selection.toggle("3");
        assert_eq!(selection.selected(), Some("3"));
        assert!(selection.is_selected("3"));

        selection.toggle("3");
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn test_toggle_other_user_replaces_selection() {
        let mut selection = Selection::new();

        selection.toggle("1");
        selection.toggle("2");

        assert_eq!(selection.selected(), Some("2"));
        assert!(!selection.is_selected("1"));
    }
}
