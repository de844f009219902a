use std::sync::Arc;

use super::domain::Phone;

/// Results materialised per recomputation unless configured otherwise.
pub const DEFAULT_RESULT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub phone: Arc<Phone>,
    pub price: u32,
    pub score: u8,
}

/// Ordered top slice plus the size of the full match set it was cut from.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    pub total_matches: usize,
    pub top: Vec<ScoredCandidate>,
}

/// Stable sort by descending score, then truncate. Equal scores keep the
/// order they arrived in; there is no secondary key.
pub fn rank(mut scored: Vec<ScoredCandidate>, limit: usize) -> Ranking {
    let total_matches = scored.len();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    Ranking {
        total_matches,
        top: scored,
    }
}
