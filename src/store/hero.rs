// Hero record type

use serde::{Deserialize, Serialize};

/// A single hero entry, keyed by `name` in the store.
///
/// Missing fields decode to their zero value, unknown fields are ignored.
/// `rating` is meant to be 0-5 but the range is not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hero {
    pub name: String,
    pub description: String,
    pub quality: String,
    pub rating: i8,
}

#[cfg(test)]
impl Hero {
    pub fn new(name: &str, description: &str, quality: &str, rating: i8) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            quality: quality.to_string(),
            rating,
        }
    }
}
