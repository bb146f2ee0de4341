//! Path Extractor: root-to-leaf id chains, filtered and trimmed to the part of
//! the conversation below the first reply level.

use crate::tree::CommentTree;

/// Paths need more than three ids (root, top-level reply, and at least two below).
pub const DEFAULT_MIN_PATH_LEN: usize = 4;
/// Root and top-level reply are dropped from every kept path.
pub const DEFAULT_TRIM_PREFIX: usize = 2;

/// A root-to-leaf path with its first `trim` ids removed.
pub type InnerPath = Vec<String>;

/// Every root-to-leaf path, depth-first with children in insertion order.
/// A root with no children is itself a leaf and yields `[root]`.
pub fn paths_to_leaves(tree: &CommentTree) -> Vec<Vec<&str>> {
    let mut out = Vec::new();
    let mut trail: Vec<&str> = Vec::new();
    // (id, distance from root); explicit stack so deep threads stay off the call stack
    let mut stack: Vec<(&str, usize)> = vec![(tree.root(), 0)];

    while let Some((id, level)) = stack.pop() {
        trail.truncate(level);
        trail.push(id);
        let children = tree.children(id);
        if children.is_empty() {
            out.push(trail.clone());
        } else {
            for c in children.iter().rev() {
                stack.push((c.as_str(), level + 1));
            }
        }
    }
    out
}

/// Keep paths of at least `min_len` ids and drop their first `trim` ids.
/// Paths that would be left empty are dropped as well.
pub fn inner_paths(tree: &CommentTree, min_len: usize, trim: usize) -> Vec<InnerPath> {
    paths_to_leaves(tree)
        .into_iter()
        .filter(|p| p.len() >= min_len)
        .filter_map(|p| {
            let rest = p.get(trim..)?;
            if rest.is_empty() {
                return None;
            }
            Some(rest.iter().map(|s| s.to_string()).collect())
        })
        .collect()
}
