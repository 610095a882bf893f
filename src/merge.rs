//! Tree Merger
//!
//! Folds flat store entries into a nested [`Document`]. Each entry's absolute
//! key is split on `/`; every segment but the last names a scope to enter (or
//! create), and the last segment receives the entry's value. Directories do
//! not materialize their own key: their children carry absolute keys and are
//! merged from the document root.
//!
//! Conflicts between a scope and a scalar at the same key are resolved by the
//! latest write, which replaces the earlier value entirely.

use crate::document::Document;
use crate::store::RemoteNode;
use tracing::trace;

/// Key segments of an absolute store path.
///
/// Returns `None` for relative paths. Segments stop at the first empty one, so
/// `/a/` and `/a//b` both reduce to `["a"]` and `/` reduces to nothing.
pub fn key_segments(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix('/')?;
    Some(rest.split('/').take_while(|s| !s.is_empty()).collect())
}

/// Merge the subtree rooted at `node` into `doc`.
pub fn merge(doc: &mut Document, node: &RemoteNode) {
    let Some(segments) = key_segments(&node.path) else {
        trace!(path = %node.path, "Ignoring relative store path");
        return;
    };

    let (parents, leaf) = match segments.split_last() {
        Some((leaf, parents)) => (parents, Some(*leaf)),
        None => (&[][..], None),
    };

    if node.is_directory {
        doc.descend(parents.iter().copied());
        for child in &node.children {
            merge(doc, child);
        }
    } else if let Some(leaf) = leaf {
        doc.descend(parents.iter().copied())
            .set_scalar(leaf, node.value.clone().unwrap_or_default());
    }
}

/// Merge several roots into one fresh document, in order.
pub fn merge_all<'a, I>(nodes: I) -> Document
where
    I: IntoIterator<Item = &'a RemoteNode>,
{
    let mut doc = Document::new();
    for node in nodes {
        merge(&mut doc, node);
    }
    doc
}
