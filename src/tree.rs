//! The namespace tree.
//!
//! One node per materialized namespace segment. Each node may carry an exact
//! level (for that namespace only) and a cascading level (for that namespace
//! and every descendant without a closer cascading level). Lookup walks as far
//! down the tree as the namespace matches, prefers the exact level of a full
//! match, and otherwise takes the nearest cascading level on the way back up.
//! The root always has a cascading level, so every lookup resolves.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, trace};

use crate::error::Result;
use crate::level::{DEFAULT_ROOT_LEVEL, Level};
use crate::namespace::{self, Namespace, ParsedNamespace, ROOT_KEY};

#[derive(Debug, Clone)]
pub struct NamespaceNode {
    segment: String,
    children: HashMap<String, NamespaceNode>,
    exact_level: Option<Level>,
    cascading_level: Option<Level>,
}

impl NamespaceNode {
    fn new(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            children: HashMap::new(),
            exact_level: None,
            cascading_level: None,
        }
    }

    fn root(level: Level) -> Self {
        Self {
            cascading_level: Some(level),
            ..Self::new(ROOT_KEY)
        }
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn exact_level(&self) -> Option<Level> {
        self.exact_level
    }

    pub fn cascading_level(&self) -> Option<Level> {
        self.cascading_level
    }

    pub fn child(&self, segment: &str) -> Option<&NamespaceNode> {
        self.children.get(segment)
    }

    pub fn children(&self) -> impl Iterator<Item = &NamespaceNode> {
        self.children.values()
    }

    fn count(&self) -> usize {
        1 + self.children.values().map(NamespaceNode::count).sum::<usize>()
    }
}

/// Result of walking the tree towards a path.
#[derive(Debug)]
pub struct Nearest<'t, 's> {
    /// Nodes passed through, nearest first. Always ends with the root.
    pub visited: Vec<&'t NamespaceNode>,
    /// Path segments with no node yet, starting at the first missing one.
    pub remaining: &'s [String],
}

impl<'t> Nearest<'t, '_> {
    /// The node for the full path, when every segment matched.
    pub fn exact(&self) -> Option<&'t NamespaceNode> {
        if self.remaining.is_empty() {
            self.visited.first().copied()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct NamespaceTree {
    root: NamespaceNode,
    root_level: Level,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_LEVEL)
    }
}

impl NamespaceTree {
    /// A tree holding only a root with `root_level` as its cascading level.
    pub fn new(root_level: Level) -> Self {
        Self {
            root: NamespaceNode::root(root_level),
            root_level,
        }
    }

    pub fn root(&self) -> &NamespaceNode {
        &self.root
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.root.count()
    }

    /// Never true: the root always exists.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Drop every node and start over from a fresh root.
    pub fn reset(&mut self) {
        debug!(root_level = %self.root_level, dropped = self.len(), "reset namespace tree");
        self.root = NamespaceNode::root(self.root_level);
    }

    /// Walk from the root along `segments` for as long as nodes exist.
    pub fn find_nearest<'t, 's>(&'t self, segments: &'s [String]) -> Nearest<'t, 's> {
        let mut node = &self.root;
        let mut visited = vec![node];
        let mut consumed = 0;
        for segment in segments {
            match node.children.get(segment) {
                Some(child) => {
                    node = child;
                    visited.push(child);
                    consumed += 1;
                }
                None => break,
            }
        }
        visited.reverse();
        Nearest {
            visited,
            remaining: &segments[consumed..],
        }
    }

    /// The node materialized for `namespace`, if any.
    pub fn node(&self, namespace: Namespace<'_>) -> Result<Option<&NamespaceNode>> {
        let parsed = namespace::parse(namespace, false)?;
        Ok(self.find_nearest(&parsed.segments).exact())
    }

    /// Threshold in effect for a validated path.
    pub fn resolve(&self, segments: &[String]) -> Level {
        let nearest = self.find_nearest(segments);
        let Some(&closest) = nearest.visited.first() else {
            panic!("namespace walk visited no nodes");
        };
        if nearest.remaining.is_empty() {
            if let Some(level) = closest.exact_level {
                return level;
            }
        }
        // An exact node without an exact level falls through to its own
        // cascading level first, same as any other walk.
        match nearest.visited.iter().find_map(|node| node.cascading_level) {
            Some(level) => level,
            None => panic!("no cascading level between namespace and root"),
        }
    }

    pub fn effective_level(&self, namespace: Namespace<'_>) -> Result<Level> {
        let parsed = namespace::parse(namespace, false)?;
        let level = self.resolve(&parsed.segments);
        trace!(%namespace, %level, "resolved namespace level");
        Ok(level)
    }

    /// Whether a call at `check` under `namespace` is emitted.
    pub fn should_log(&self, check: Level, namespace: Namespace<'_>) -> Result<bool> {
        Ok(check.passes(self.effective_level(namespace)?))
    }

    /// Set the exact level of `namespace`, or its cascading level when it
    /// ends in `*`. Missing nodes along the path are created.
    pub fn set_log_level(&mut self, namespace: Namespace<'_>, level: Level) -> Result<()> {
        let parsed = namespace::parse(namespace, true)?;
        self.assign(&parsed, level);
        debug!(%namespace, %level, wildcard = parsed.wildcard, "set namespace level");
        Ok(())
    }

    /// Apply an already validated assignment.
    pub(crate) fn assign(&mut self, parsed: &ParsedNamespace, level: Level) {
        let consumed = parsed.segments.len() - self.find_nearest(&parsed.segments).remaining.len();
        let (existing, missing) = parsed.segments.split_at(consumed);

        let mut node = descend_mut(&mut self.root, existing);
        for segment in missing {
            node = match node.children.entry(segment.clone()) {
                Entry::Occupied(_) => {
                    panic!("namespace node '{segment}' already exists while extending the tree")
                }
                Entry::Vacant(slot) => slot.insert(NamespaceNode::new(segment)),
            };
        }

        if parsed.wildcard {
            node.cascading_level = Some(level);
        } else {
            node.exact_level = Some(level);
        }
    }
}

fn descend_mut<'t>(mut node: &'t mut NamespaceNode, path: &[String]) -> &'t mut NamespaceNode {
    for segment in path {
        node = match node.children.get_mut(segment) {
            Some(child) => child,
            None => panic!("namespace walk found '{segment}' but the node is gone"),
        };
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> Vec<String> {
        s.split(':').map(str::to_owned).collect()
    }

    #[test]
    fn fresh_tree_is_just_the_root() {
        let tree = NamespaceTree::default();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().segment(), "$");
        assert_eq!(tree.root().cascading_level(), Some(DEFAULT_ROOT_LEVEL));
        assert_eq!(tree.root().exact_level(), None);
    }

    #[test]
    fn find_nearest_on_empty_tree_returns_root_and_all_segments() {
        let tree = NamespaceTree::default();
        let segments = path("a:b");
        let nearest = tree.find_nearest(&segments);
        assert_eq!(nearest.visited.len(), 1);
        assert_eq!(nearest.visited[0].segment(), "$");
        assert_eq!(nearest.remaining, &segments[..]);
        assert!(nearest.exact().is_none());
    }

    #[test]
    fn find_nearest_lists_nodes_nearest_first() {
        let mut tree = NamespaceTree::default();
        tree.set_log_level("a:b".into(), Level::Warn).unwrap();

        let segments = path("a:b:c:d");
        let nearest = tree.find_nearest(&segments);
        let visited: Vec<&str> = nearest.visited.iter().map(|n| n.segment()).collect();
        assert_eq!(visited, ["b", "a", "$"]);
        assert_eq!(nearest.remaining, &segments[2..]);

        let exact = path("a:b");
        assert_eq!(tree.find_nearest(&exact).exact().map(|n| n.segment()), Some("b"));
    }

    #[test]
    fn intermediate_nodes_carry_no_levels() {
        let mut tree = NamespaceTree::default();
        tree.set_log_level("a:b:c".into(), Level::Debug).unwrap();
        assert_eq!(tree.len(), 4);

        for ns in ["a", "a:b"] {
            let node = tree.node(ns.into()).unwrap().unwrap();
            assert_eq!(node.exact_level(), None, "{ns}");
            assert_eq!(node.cascading_level(), None, "{ns}");
        }
        let leaf = tree.node("a:b:c".into()).unwrap().unwrap();
        assert_eq!(leaf.exact_level(), Some(Level::Debug));
        assert_eq!(leaf.cascading_level(), None);
    }

    #[test]
    fn wildcard_sets_cascading_slot_on_existing_node() {
        let mut tree = NamespaceTree::default();
        tree.set_log_level("a:b".into(), Level::Warn).unwrap();
        tree.set_log_level("a:*".into(), Level::Debug).unwrap();
        assert_eq!(tree.len(), 3);

        let a = tree.node("a".into()).unwrap().unwrap();
        assert_eq!(a.cascading_level(), Some(Level::Debug));
        assert_eq!(a.exact_level(), None);
    }

    #[test]
    fn exact_node_without_levels_uses_ancestor_cascade() {
        let mut tree = NamespaceTree::default();
        tree.set_log_level("a:*".into(), Level::Error).unwrap();
        tree.set_log_level("a:b:c".into(), Level::Debug).unwrap();

        // "a:b" exists only as an intermediate node
        assert_eq!(tree.effective_level("a:b".into()).unwrap(), Level::Error);
        assert_eq!(tree.effective_level("a:b:c".into()).unwrap(), Level::Debug);
        assert_eq!(tree.effective_level("a:b:c:d".into()).unwrap(), Level::Error);
    }

    #[test]
    fn exact_level_beats_own_cascading_level() {
        let mut tree = NamespaceTree::default();
        tree.set_log_level("a:*".into(), Level::Debug).unwrap();
        tree.set_log_level("a".into(), Level::Error).unwrap();

        assert_eq!(tree.effective_level("a".into()).unwrap(), Level::Error);
        assert_eq!(tree.effective_level("a:x".into()).unwrap(), Level::Debug);
    }

    #[test]
    fn root_levels_can_be_set() {
        let mut tree = NamespaceTree::default();
        tree.set_log_level("*".into(), Level::Warn).unwrap();
        tree.set_log_level(Namespace::Root, Level::Debug).unwrap();

        assert_eq!(tree.effective_level(Namespace::Root).unwrap(), Level::Debug);
        assert_eq!(tree.effective_level("x:y".into()).unwrap(), Level::Warn);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn reset_keeps_configured_root_level() {
        let mut tree = NamespaceTree::new(Level::Error);
        tree.set_log_level("*".into(), Level::Debug).unwrap();
        tree.set_log_level("a:b".into(), Level::Debug).unwrap();
        tree.reset();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().cascading_level(), Some(Level::Error));
        assert!(!tree.should_log(Level::Warn, "a:b".into()).unwrap());
    }

    #[test]
    fn rejected_mutation_leaves_tree_untouched() {
        let mut tree = NamespaceTree::default();
        assert!(tree.set_log_level("a:b:".into(), Level::Debug).is_err());
        assert!(tree.set_log_level("a::b".into(), Level::Debug).is_err());
        assert_eq!(tree.len(), 1);
    }
}
