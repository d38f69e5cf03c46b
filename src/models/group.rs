use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-named, ordered subset of pinned lines used as a view filter.
///
/// Membership does not remove a line from the flat pinned set, and a line
/// belongs to at most one group at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineGroup {
    pub id: Uuid,
    pub title: String,
    pub line_codes: Vec<String>,
}

impl LineGroup {
    #[must_use]
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            line_codes: Vec::new(),
        }
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.line_codes.iter().any(|c| c == code)
    }
}
