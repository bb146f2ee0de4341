//! Tree Builder: a single forward pass over depth-sorted records that attaches
//! each comment under its parent, or sets it aside as an orphan.
//!
//! The tree is an explicit arena keyed by comment id. A node is only created
//! once its parent exists, so cycles cannot form and no detection is needed.
//! Orphans are never retried: their descendants become orphans too, which is
//! what the reported orphan count reflects.

use crate::error::ThreadError;
use crate::record::CommentRecord;
use ahash::AHashMap;

/// How `depth` is compared when ordering records before the build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepthOrder {
    /// Integer order: 2 before 10.
    #[default]
    Numeric,
    /// Text order of the depth as written: "10" before "2", "03" before "3".
    /// Matches tables that were sorted on the raw depth column.
    Lexical,
}

/// Stable sort by depth; equal depths keep their input order.
pub fn sort_by_depth(records: &mut [CommentRecord], order: DepthOrder) {
    match order {
        DepthOrder::Numeric => records.sort_by_key(|r| r.depth),
        DepthOrder::Lexical => records.sort_by(|a, b| a.depth_text.cmp(&b.depth_text)),
    }
}

#[derive(Clone, Debug, Default)]
struct Node {
    parent: Option<String>,
    children: Vec<String>, // insertion order
}

#[derive(Clone, Debug)]
pub struct CommentTree {
    root: String,
    nodes: AHashMap<String, Node>,
}

impl CommentTree {
    pub fn with_root(root: impl Into<String>) -> Self {
        let root = root.into();
        let mut nodes = AHashMap::new();
        nodes.insert(root.clone(), Node::default());
        Self { root, nodes }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Comment nodes, the synthetic root excluded.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Children of `id` in insertion order; empty for leaves and unknown ids.
    pub fn children(&self, id: &str) -> &[String] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.parent.as_deref())
    }

    /// Attach `id` under `parent`. Returns `Ok(false)` when the parent is absent
    /// and nothing was inserted.
    pub fn attach(&mut self, id: &str, parent: &str) -> Result<bool, ThreadError> {
        if self.nodes.contains_key(id) {
            return Err(ThreadError::DuplicateId { id: id.to_string() });
        }
        match self.nodes.get_mut(parent) {
            Some(p) => p.children.push(id.to_string()),
            None => return Ok(false),
        }
        self.nodes.insert(
            id.to_string(),
            Node { parent: Some(parent.to_string()), children: Vec::new() },
        );
        Ok(true)
    }
}

#[derive(Clone, Debug)]
pub struct TreeBuild {
    pub tree: CommentTree,
    /// Records whose parent was absent when processed, in processing order.
    pub orphans: Vec<CommentRecord>,
}

/// Build the tree from records already sorted by ascending depth.
/// The root is the first record's parent: the submission, which is never a record itself.
pub fn build_tree(records: &[CommentRecord]) -> Result<TreeBuild, ThreadError> {
    let first = records.first().ok_or(ThreadError::EmptyInput)?;
    let mut tree = CommentTree::with_root(first.parent_id.clone());
    let mut orphans = Vec::new();

    for rec in records {
        if !tree.attach(&rec.id, &rec.parent_id)? {
            tracing::debug!(id = %rec.id, parent = %rec.parent_id, "orphaned comment");
            orphans.push(rec.clone());
        }
    }

    tracing::debug!(
        root = %tree.root(),
        nodes = tree.node_count(),
        orphans = orphans.len(),
        "built comment tree"
    );
    Ok(TreeBuild { tree, orphans })
}
