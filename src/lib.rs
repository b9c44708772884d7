//! Shared fixtures for the workspace integration tests.

use serde::Deserialize;

/// Contents of `tests/testdata/pi_golden.json`.
#[derive(Debug, Deserialize)]
pub struct GoldenData {
    pub description: String,
    /// `"3."` followed by the first fractional digits of pi.
    pub pi_prefix: String,
    pub cases: Vec<GoldenCase>,
    pub terms: Vec<GoldenTerms>,
}

/// A digit count to compute and compare against `pi_prefix`.
#[derive(Debug, Deserialize)]
pub struct GoldenCase {
    pub digits: u64,
}

/// Expected term count for a digit count.
#[derive(Debug, Deserialize)]
pub struct GoldenTerms {
    pub digits: u64,
    pub terms: u64,
}

impl GoldenData {
    /// Expected digit string for `digits` fractional digits, if the table is long enough.
    #[must_use]
    pub fn expected(&self, digits: u64) -> Option<&str> {
        let len = usize::try_from(digits).ok()?.checked_add(2)?;
        self.pi_prefix.get(..len)
    }
}

/// Load the golden table shipped with the workspace.
///
/// # Panics
///
/// Panics if the file is missing or malformed.
#[must_use]
pub fn load_golden() -> GoldenData {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/testdata/pi_golden.json");
    let data = std::fs::read_to_string(path).expect("failed to read golden file");
    serde_json::from_str(&data).expect("failed to parse golden JSON")
}
