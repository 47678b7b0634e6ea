use serde::Serialize;

/// Result of a point update or delete. `matched == false` is a no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub matched: bool,
}

impl UpdateOutcome {
    pub fn from_rows(rows_affected: u64) -> Self {
        Self {
            matched: rows_affected > 0,
        }
    }

    pub fn unmatched() -> Self {
        Self { matched: false }
    }
}
