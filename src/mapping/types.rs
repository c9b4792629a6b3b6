use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::rename::PathMapping;

pub const MAPPING_VERSION: u32 = 1;

/// On-disk form of a list of completed renames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingFile {
    /// Schema version for compatibility
    pub version: u32,

    /// Completed renames, in the order they happened
    pub mappings: Vec<MappingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Path of the file after the rename
    #[serde(alias = "newPath")]
    pub new_path: String,

    /// Path of the file before the rename
    #[serde(alias = "oldPath")]
    pub old_path: String,
}

impl MappingFile {
    pub fn from_mappings(mappings: &[PathMapping]) -> Self {
        Self {
            version: MAPPING_VERSION,
            mappings: mappings.iter().map(MappingEntry::from).collect(),
        }
    }

    pub fn into_mappings(self) -> Vec<PathMapping> {
        self.mappings.into_iter().map(PathMapping::from).collect()
    }
}

impl From<&PathMapping> for MappingEntry {
    fn from(mapping: &PathMapping) -> Self {
        Self {
            new_path: mapping.new_path.to_string_lossy().to_string(),
            old_path: mapping.old_path.to_string_lossy().to_string(),
        }
    }
}

impl From<MappingEntry> for PathMapping {
    fn from(entry: MappingEntry) -> Self {
        PathMapping::new(PathBuf::from(entry.new_path), PathBuf::from(entry.old_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let file = MappingFile::from_mappings(&[PathMapping::new("/p/R_00001.txt", "/p/a.txt")]);

        let value = serde_json::to_value(&file).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "version": 1,
                "mappings": [
                    { "new_path": "/p/R_00001.txt", "old_path": "/p/a.txt" }
                ]
            })
        );
    }

    #[test]
    fn test_accepts_camel_case_keys() {
        let file: MappingFile = serde_json::from_str(
            r#"{ "version": 1, "mappings": [ { "newPath": "/p/n", "oldPath": "/p/o" } ] }"#,
        )
        .unwrap();

        assert_eq!(
            file.into_mappings(),
            vec![PathMapping::new("/p/n", "/p/o")]
        );
    }
}
