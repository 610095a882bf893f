//! Store entries as returned by a recursive read.

use serde::{Deserialize, Serialize};

fn root_key() -> String {
    "/".to_string()
}

/// One entry of the store: a directory with children, or a leaf with a value.
///
/// Field names follow the etcd v2 wire format. The store root is sent without
/// a `key` and decodes as `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNode {
    #[serde(rename = "key", default = "root_key")]
    pub path: String,

    #[serde(rename = "dir", default)]
    pub is_directory: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "nodes", default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RemoteNode>,
}

impl RemoteNode {
    pub fn leaf(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    pub fn directory(path: impl Into<String>, children: Vec<RemoteNode>) -> Self {
        Self {
            path: path.into(),
            is_directory: true,
            value: None,
            children,
        }
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        if self.is_directory {
            self.children.iter().map(RemoteNode::leaf_count).sum()
        } else {
            1
        }
    }
}
