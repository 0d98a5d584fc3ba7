// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content-derived container ids.
//!
//! An id has the form `id-<ctime>-<hash>`, where `ctime` is the creation
//! time of the file holding the diagram and `hash` is the hex SHA-256 of the
//! JSON object `{"diagram": <name>, "lineStart": <n>, "lineEnd": <n>}`. The
//! same block in the same file therefore keeps its id across re-renders,
//! while moving it, switching its descriptor or replacing the file changes
//! the id.

use core::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Stable identity of one wrapped diagram.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(String);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdSource<'a> {
    diagram: &'a str,
    line_start: usize,
    line_end: usize,
}

impl ContainerId {
    /// Derives the id of a diagram block.
    #[must_use]
    pub fn generate(ctime: u64, diagram: &str, line_start: usize, line_end: usize) -> Self {
        let source = IdSource {
            diagram,
            line_start,
            line_end,
        };
        // Serializing a struct of strings and integers cannot fail.
        let json = serde_json::to_vec(&source).unwrap_or_default();
        let digest = Sha256::digest(&json);
        Self(format!("id-{ctime}-{}", hex::encode(digest)))
    }

    /// Wraps an id read back from the document.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the id text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the file creation time encoded in the id.
    #[must_use]
    pub fn ctime(&self) -> Option<u64> {
        let rest = self.0.strip_prefix("id-")?;
        let (ctime, _) = rest.split_once('-')?;
        ctime.parse().ok()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_prefix_ctime_and_sha256_hex() {
        let id = ContainerId::generate(1_700_000_000_000, "Mermaid", 3, 9);
        let (head, hash) = id.as_str().rsplit_once('-').unwrap();
        assert_eq!(head, "id-1700000000000");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(id.ctime(), Some(1_700_000_000_000));
    }

    #[test]
    fn identical_inputs_give_identical_ids() {
        assert_eq!(
            ContainerId::generate(7, "Mermaid", 1, 4),
            ContainerId::generate(7, "Mermaid", 1, 4)
        );
    }

    #[test]
    fn every_input_participates() {
        let base = ContainerId::generate(7, "Mermaid", 1, 4);
        assert_ne!(base, ContainerId::generate(8, "Mermaid", 1, 4));
        assert_ne!(base, ContainerId::generate(7, "PlantUML", 1, 4));
        assert_ne!(base, ContainerId::generate(7, "Mermaid", 2, 4));
        assert_ne!(base, ContainerId::generate(7, "Mermaid", 1, 5));
    }

    #[test]
    fn hash_is_over_the_json_object() {
        let id = ContainerId::generate(1, "Default", 0, 2);
        let expected = hex::encode(Sha256::digest(
            br#"{"diagram":"Default","lineStart":0,"lineEnd":2}"#,
        ));
        assert_eq!(id.as_str(), format!("id-1-{expected}"));
    }

    #[test]
    fn foreign_ids_have_no_ctime() {
        assert_eq!(ContainerId::from_raw("diagram-1").ctime(), None);
        assert_eq!(ContainerId::from_raw("id-x-abc").ctime(), None);
    }
}
