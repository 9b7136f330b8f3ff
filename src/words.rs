//! # Word-List Loading
//!
//! The reference gender word lists travel as small JSON documents: pair
//! lists for definitional pairs, set lists for equality sets, and flat
//! word arrays for specific-word seeds:
//!
//! ```json
//! [["he", "she"], ["man", "woman"]]
//! ```
//!
//! These helpers parse those shapes from strings or files. They own no
//! data themselves — bundling word lists with an application is the
//! caller's concern.

use std::fs;
use std::path::Path;

use smallvec::SmallVec;

use crate::model::EqualitySet;
use crate::Result;

/// Parse definitional pairs from a JSON array of two-element arrays.
pub fn definitional_pairs_from_json(json: &str) -> Result<Vec<(String, String)>> {
    Ok(serde_json::from_str(json)?)
}

/// Read definitional pairs from a JSON file.
pub fn definitional_pairs_from_file(path: impl AsRef<Path>) -> Result<Vec<(String, String)>> {
    definitional_pairs_from_json(&fs::read_to_string(path)?)
}

/// Parse equality sets from a JSON array of word arrays. Sets may hold
/// more than two members.
pub fn equality_sets_from_json(json: &str) -> Result<Vec<EqualitySet>> {
    let sets: Vec<Vec<String>> = serde_json::from_str(json)?;
    Ok(sets.into_iter().map(SmallVec::from_vec).collect())
}

/// Read equality sets from a JSON file.
pub fn equality_sets_from_file(path: impl AsRef<Path>) -> Result<Vec<EqualitySet>> {
    equality_sets_from_json(&fs::read_to_string(path)?)
}

/// Parse a flat word list (e.g. specific-word seeds) from a JSON array.
pub fn word_list_from_json(json: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(json)?)
}

/// Read a flat word list from a JSON file.
pub fn word_list_from_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    word_list_from_json(&fs::read_to_string(path)?)
}

// ============================================================================
// Tests
// ============================================================================
