use serde::{Deserialize, Serialize};

/// A line and byte range in a file. Zeroed fields mean "unset"; a request
/// sets either the line pair or the byte pair, not both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRange {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub start_line: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub end_line: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub start_byte: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub end_byte: i64,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

/// Options for fetching one entry of a repository's file tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetFileOptions {
    /// Range to fetch. Ignored when `entire_file` is set.
    #[serde(flatten)]
    pub file_range: FileRange,

    /// Return the whole file regardless of the range fields.
    #[serde(default)]
    pub entire_file: bool,

    /// How many full lines of surrounding context to add on each side of
    /// the requested range.
    #[serde(default)]
    pub expand_context_lines: i32,

    /// Extend a range that covers partial lines to the nearest line
    /// boundaries. Only meaningful with a byte range.
    #[serde(default)]
    pub full_lines: bool,

    /// For directories: return the full tree beneath, recursing into every
    /// sub-directory.
    #[serde(default)]
    pub recursive: bool,

    /// For directories: recurse only while a directory has exactly one
    /// child directory, collapsing trivial chains.
    #[serde(default)]
    pub recurse_single_subfolder: bool,
}

/// Kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeEntryType {
    File,
    Dir,
    Symlink,
}

/// One node of a repository file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: TreeEntryType,
    pub size: i64,
    /// Modification time, seconds since the Unix epoch.
    pub mod_time: i64,
    /// File contents. Absent for directories and symlinks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<u8>>,
    /// Child nodes. Populated for directories only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<TreeEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_range_omits_unset_fields() {
        let range = FileRange {
            start_line: 10,
            end_line: 20,
            ..Default::default()
        };
        let json = serde_json::to_string(&range).unwrap();

        assert!(json.contains(r#""start_line":10"#));
        assert!(json.contains(r#""end_line":20"#));
        assert!(!json.contains("start_byte"));
        assert!(!json.contains("end_byte"));
    }

    #[test]
    fn test_get_file_options_flattens_range() {
        let opts = GetFileOptions {
            file_range: FileRange {
                start_byte: 100,
                end_byte: 200,
                ..Default::default()
            },
            full_lines: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&opts).unwrap();

        // The range fields sit at the top level, not nested.
        assert!(json.contains(r#""start_byte":100"#));
        assert!(json.contains(r#""full_lines":true"#));
        assert!(!json.contains("file_range"));
    }

    #[test]
    fn test_get_file_options_defaults_from_empty_object() {
        let opts: GetFileOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, GetFileOptions::default());
        assert!(!opts.recursive);
        assert_eq!(opts.expand_context_lines, 0);
    }

    #[test]
    fn test_tree_entry_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TreeEntryType::Symlink).unwrap(),
            r#""symlink""#
        );
        let parsed: TreeEntryType = serde_json::from_str(r#""dir""#).unwrap();
        assert_eq!(parsed, TreeEntryType::Dir);
    }

    #[test]
    fn test_tree_entry_roundtrip() {
        let tree = TreeEntry {
            name: "src".to_string(),
            entry_type: TreeEntryType::Dir,
            size: 0,
            mod_time: 1700000000,
            contents: None,
            entries: vec![TreeEntry {
                name: "main.rs".to_string(),
                entry_type: TreeEntryType::File,
                size: 5,
                mod_time: 1700000000,
                contents: Some(b"hello".to_vec()),
                entries: vec![],
            }],
        };

        let json = serde_json::to_string(&tree).unwrap();
        let back: TreeEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.entries[0].contents.as_deref(), Some(b"hello".as_slice()));
    }

    #[test]
    fn test_file_tree_entry_omits_children() {
        let file = TreeEntry {
            name: "README".to_string(),
            entry_type: TreeEntryType::File,
            size: 2,
            mod_time: 0,
            contents: Some(b"hi".to_vec()),
            entries: vec![],
        };
        let json = serde_json::to_string(&file).unwrap();

        assert!(json.contains(r#""type":"file""#));
        assert!(!json.contains(r#""entries""#));
    }
}
