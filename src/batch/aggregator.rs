use serde::Serialize;

use super::types::ResultSet;

/// Success/failure counts for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub success_count: usize,
    pub fail_count: usize,
}

pub fn summarize(results: &ResultSet) -> Summary {
    let success_count = results.iter().filter(|r| r.is_success()).count();
    Summary {
        total: results.len(),
        success_count,
        fail_count: results.len() - success_count,
    }
}
