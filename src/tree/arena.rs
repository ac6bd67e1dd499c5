//! Element tree arena
//!
//! Every visible entity (card, token, space, counter) is a node addressed by
//! an integer handle. Parents index their children by `(kind, child_id)`;
//! a node never holds a reference to anything, only handles, so detaching
//! and attaching are map operations.

use super::presentation::Presentation;
use crate::core::{ArgValue, Args, Attr, ChildId, NodeId, NodeKind};
use crate::{Result, UiError};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

const ROOT_DOM_ID: &str = "postcards";

/// One visible UI entity
#[derive(Debug, Clone)]
pub struct ElementNode {
    id: NodeId,
    kind: NodeKind,
    child_id: ChildId,
    args: Args,
    parent: Option<NodeId>,
    children: FxHashMap<NodeKind, BTreeMap<ChildId, NodeId>>,
}

impl ElementNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn child_id(&self) -> &ChildId {
        &self.child_id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    pub fn arg(&self, attr: Attr) -> Option<&ArgValue> {
        self.args.get(&attr)
    }

    pub fn int_arg(&self, attr: Attr) -> Option<i64> {
        self.arg(attr).and_then(ArgValue::as_int)
    }

    pub fn flag(&self, attr: Attr) -> bool {
        self.arg(attr).and_then(ArgValue::as_bool).unwrap_or(false)
    }

    pub fn is_active(&self) -> bool {
        self.flag(Attr::Active)
    }

    /// Phase that activated this node, if it is active
    pub fn phase_tag(&self) -> Option<&str> {
        self.arg(Attr::Phase).and_then(ArgValue::as_str)
    }

    fn find_child(&self, kind: NodeKind, child_id: &ChildId) -> Option<NodeId> {
        self.children.get(&kind).and_then(|bucket| bucket.get(child_id)).copied()
    }
}

/// Registry of all nodes plus their presentation mirror
#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: FxHashMap<NodeId, ElementNode>,
    next_id: u32,
    root: NodeId,
    presentation: Presentation,
}

impl ElementTree {
    /// Create a tree holding only the root `game` node
    pub fn new() -> Self {
        let root = NodeId::new(0);
        let mut presentation = Presentation::new();
        presentation.build(root, ROOT_DOM_ID.to_string(), NodeKind::Game, None, &Args::new());
        let mut nodes = FxHashMap::default();
        nodes.insert(
            root,
            ElementNode {
                id: root,
                kind: NodeKind::Game,
                child_id: ChildId::from("game"),
                args: Args::new(),
                parent: None,
                children: FxHashMap::default(),
            },
        );
        ElementTree {
            nodes,
            next_id: 1,
            root,
            presentation,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Result<&ElementNode> {
        self.nodes.get(&id).ok_or(UiError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut ElementNode> {
        self.nodes.get_mut(&id).ok_or(UiError::NodeNotFound(id))
    }

    fn dom_id_for(&self, parent: NodeId, kind: NodeKind, child_id: &ChildId) -> Result<String> {
        let parent_dom = self
            .presentation
            .element(parent)
            .map(|e| e.dom_id.as_str())
            .ok_or(UiError::MissingRoot)?;
        Ok(format!("{parent_dom}_{kind}-{child_id}"))
    }

    /// Create a node under `parent` and build its presentation element
    ///
    /// Fails with [`UiError::DuplicateChild`] if `(kind, child_id)` is
    /// already taken under `parent`.
    pub fn create(
        &mut self,
        parent: NodeId,
        child_id: impl Into<ChildId>,
        kind: NodeKind,
        args: Args,
    ) -> Result<NodeId> {
        let child_id = child_id.into();
        if self.get(parent)?.find_child(kind, &child_id).is_some() {
            return Err(UiError::DuplicateChild {
                parent,
                kind,
                child_id,
            });
        }

        let id = NodeId::new(self.next_id);
        self.next_id += 1;

        let dom_id = self.dom_id_for(parent, kind, &child_id)?;
        self.presentation.build(id, dom_id, kind, Some(parent), &args);
        self.node_mut(parent)?
            .children
            .entry(kind)
            .or_default()
            .insert(child_id.clone(), id);
        self.nodes.insert(
            id,
            ElementNode {
                id,
                kind,
                child_id,
                args,
                parent: Some(parent),
                children: FxHashMap::default(),
            },
        );
        Ok(id)
    }

    /// Move `node` under `new_parent`, optionally under a new child id
    ///
    /// The node is detached from its old parent's registry (dropping the
    /// kind bucket if it empties) before being attached to the new one, and
    /// its presentation element is rebound. On a collision nothing moves.
    pub fn add_to_parent(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
        new_child_id: Option<ChildId>,
    ) -> Result<()> {
        if node == self.root {
            return Err(UiError::InvalidArgs("the root node cannot be reparented".into()));
        }
        let (kind, old_child_id, old_parent) = {
            let n = self.get(node)?;
            (n.kind, n.child_id.clone(), n.parent)
        };
        let child_id = new_child_id.unwrap_or_else(|| old_child_id.clone());

        let target = self.get(new_parent)?;
        if let Some(existing) = target.find_child(kind, &child_id) {
            if existing != node {
                return Err(UiError::DuplicateChild {
                    parent: new_parent,
                    kind,
                    child_id,
                });
            }
        }
        if self.is_within(new_parent, node) {
            return Err(UiError::InvalidArgs(format!(
                "cannot move {node} under its own descendant {new_parent}"
            )));
        }

        if let Some(old_parent) = old_parent {
            self.unregister(old_parent, kind, &old_child_id)?;
        }
        self.node_mut(new_parent)?
            .children
            .entry(kind)
            .or_default()
            .insert(child_id.clone(), node);
        {
            let n = self.node_mut(node)?;
            n.parent = Some(new_parent);
            n.child_id = child_id;
        }
        self.rebind_subtree(node)
    }

    fn unregister(&mut self, parent: NodeId, kind: NodeKind, child_id: &ChildId) -> Result<()> {
        let p = self.node_mut(parent)?;
        if let Some(bucket) = p.children.get_mut(&kind) {
            bucket.remove(child_id);
            if bucket.is_empty() {
                p.children.remove(&kind);
            }
        }
        Ok(())
    }

    /// True if `candidate` is `ancestor` or lies below it
    fn is_within(&self, candidate: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(candidate);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn rebind_subtree(&mut self, node: NodeId) -> Result<()> {
        let mut queue = vec![node];
        while let Some(id) = queue.pop() {
            let (parent, kind, child_id, args, children) = {
                let n = self.get(id)?;
                let parent = n.parent.ok_or(UiError::MissingRoot)?;
                let children: Vec<NodeId> =
                    n.children.values().flat_map(|b| b.values().copied()).collect();
                (parent, n.kind, n.child_id.clone(), n.args.clone(), children)
            };
            let dom_id = self.dom_id_for(parent, kind, &child_id)?;
            self.presentation.rebind(id, dom_id, parent, &args)?;
            queue.extend(children);
        }
        Ok(())
    }

    /// Write an attribute to the node and its presentation in one step
    pub fn set_arg(&mut self, node: NodeId, attr: Attr, value: impl Into<ArgValue>) -> Result<()> {
        let value = value.into();
        let n = self.nodes.get_mut(&node).ok_or(UiError::NodeNotFound(node))?;
        self.presentation.set_attribute(node, attr, &value)?;
        n.args.insert(attr, value);
        Ok(())
    }

    pub fn clear_arg(&mut self, node: NodeId, attr: Attr) -> Result<()> {
        let n = self.nodes.get_mut(&node).ok_or(UiError::NodeNotFound(node))?;
        self.presentation.remove_attribute(node, attr)?;
        n.args.remove(&attr);
        Ok(())
    }

    pub fn arg(&self, node: NodeId, attr: Attr) -> Option<&ArgValue> {
        self.nodes.get(&node).and_then(|n| n.arg(attr))
    }

    /// Remove a node and everything below it
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(UiError::InvalidArgs("the root node cannot be removed".into()));
        }
        let (kind, child_id, parent) = {
            let n = self.get(node)?;
            (n.kind, n.child_id.clone(), n.parent)
        };
        if let Some(parent) = parent {
            self.unregister(parent, kind, &child_id)?;
        }

        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(&id) {
                stack.extend(n.children.values().flat_map(|b| b.values().copied()));
            }
            self.presentation.destroy(id);
        }
        Ok(())
    }

    /// Child lookup that fails fast when the child is expected to exist
    pub fn child(&self, parent: NodeId, kind: NodeKind, child_id: impl Into<ChildId>) -> Result<NodeId> {
        let child_id = child_id.into();
        self.get(parent)?
            .find_child(kind, &child_id)
            .ok_or(UiError::ChildNotFound {
                parent,
                kind,
                child_id,
            })
    }

    pub fn find(&self, parent: NodeId, kind: NodeKind, child_id: impl Into<ChildId>) -> Option<NodeId> {
        let child_id = child_id.into();
        self.nodes
            .get(&parent)
            .and_then(|p| p.find_child(kind, &child_id))
    }

    /// Children of one kind, in ascending child id order
    pub fn children(&self, parent: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.nodes
            .get(&parent)
            .and_then(|p| p.children.get(&kind))
            .map(|bucket| bucket.values().copied().collect())
            .unwrap_or_default()
    }

    /// Kinds that currently have at least one child under `parent`
    pub fn child_kinds(&self, parent: NodeId) -> Vec<NodeKind> {
        let mut kinds: Vec<NodeKind> = self
            .nodes
            .get(&parent)
            .map(|p| p.children.keys().copied().collect())
            .unwrap_or_default();
        kinds.sort();
        kinds
    }

    pub fn activate(&mut self, node: NodeId, phase: &str) -> Result<()> {
        self.set_arg(node, Attr::Active, true)?;
        self.set_arg(node, Attr::Phase, phase)
    }

    pub fn deactivate(&mut self, node: NodeId) -> Result<()> {
        self.set_arg(node, Attr::Active, false)?;
        self.clear_arg(node, Attr::Phase)
    }

    pub fn is_active(&self, node: NodeId) -> bool {
        self.nodes.get(&node).map(|n| n.is_active()).unwrap_or(false)
    }

    /// Every active node, in handle order
    pub fn active_nodes(&self) -> Vec<NodeId> {
        let mut active: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.is_active())
            .map(|n| n.id)
            .collect();
        active.sort();
        active
    }

    /// Resolve a `kind:child/kind:child` path from the root
    ///
    /// Example: `player:2317/hand:hand/travel:12`
    pub fn resolve_path(&self, path: &str) -> Result<NodeId> {
        let mut cursor = self.root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let (kind, child) = segment
                .split_once(':')
                .ok_or_else(|| UiError::InvalidArgs(format!("bad path segment '{segment}'")))?;
            let kind = NodeKind::parse(kind)
                .ok_or_else(|| UiError::InvalidArgs(format!("unknown node kind '{kind}'")))?;
            cursor = self.child(cursor, kind, ChildId::parse(child))?;
        }
        Ok(cursor)
    }

    /// Inverse of [`resolve_path`](Self::resolve_path)
    pub fn path_of(&self, node: NodeId) -> Result<String> {
        let mut segments = Vec::new();
        let mut cursor = node;
        while cursor != self.root {
            let n = self.get(cursor)?;
            segments.push(format!("{}:{}", n.kind, n.child_id));
            cursor = n.parent.ok_or(UiError::MissingRoot)?;
        }
        segments.reverse();
        Ok(segments.join("/"))
    }

    /// Check that every node's presentation mirrors its logical state and
    /// that every parent registry entry points back at a matching node
    pub fn verify_consistency(&self) -> Result<()> {
        if self.presentation.len() != self.nodes.len() {
            return Err(UiError::PresentationDiverged {
                node: self.root,
                detail: format!(
                    "{} presentation elements for {} nodes",
                    self.presentation.len(),
                    self.nodes.len()
                ),
            });
        }
        for node in self.nodes.values() {
            self.presentation
                .check(node.id, node.parent, &node.args)
                .map_err(|detail| UiError::PresentationDiverged {
                    node: node.id,
                    detail,
                })?;
            for (kind, bucket) in &node.children {
                for (child_id, child) in bucket {
                    let c = self.get(*child)?;
                    if c.kind != *kind || &c.child_id != child_id || c.parent != Some(node.id) {
                        return Err(UiError::PresentationDiverged {
                            node: *child,
                            detail: format!("registry entry {kind}:{child_id} is stale"),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Indented text dump of the tree, children ordered by kind then id
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let attrs: Vec<String> = node
            .args
            .iter()
            .map(|(attr, value)| format!("{attr}={value}"))
            .collect();
        let _ = write!(out, "{}{}:{}", "  ".repeat(depth), node.kind, node.child_id);
        if !attrs.is_empty() {
            let _ = write!(out, " [{}]", attrs.join(" "));
        }
        out.push('\n');
        for kind in self.child_kinds(id) {
            for child in self.children(id, kind) {
                self.dump_node(child, depth + 1, out);
            }
        }
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_args;

    #[test]
    fn test_duplicate_child_is_rejected() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        tree.create(root, 5, NodeKind::Postcard, Args::new()).unwrap();
        let err = tree.create(root, 5, NodeKind::Postcard, Args::new()).unwrap_err();
        assert!(matches!(err, UiError::DuplicateChild { .. }));

        // Same id under another kind is fine
        tree.create(root, 5, NodeKind::Gift, Args::new()).unwrap();
    }

    #[test]
    fn test_child_id_reusable_after_remove() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let first = tree.create(root, 5, NodeKind::Postcard, Args::new()).unwrap();
        tree.remove(first).unwrap();
        let second = tree.create(root, 5, NodeKind::Postcard, Args::new()).unwrap();
        assert_ne!(first, second);
        assert!(!tree.contains(first));
        tree.verify_consistency().unwrap();
    }

    #[test]
    fn test_reparent_detaches_and_prunes() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let hand = tree.create(root, "hand", NodeKind::Hand, Args::new()).unwrap();
        let used = tree.create(root, "used", NodeKind::Used, Args::new()).unwrap();
        let card = tree
            .create(hand, 12, NodeKind::Travel, node_args![Attr::Used => false])
            .unwrap();

        tree.add_to_parent(card, used, None).unwrap();

        assert!(tree.children(hand, NodeKind::Travel).is_empty());
        assert!(tree.child_kinds(hand).is_empty());
        assert_eq!(tree.children(used, NodeKind::Travel), vec![card]);
        assert_eq!(tree.get(card).unwrap().parent(), Some(used));
        assert_eq!(
            tree.presentation().element(card).unwrap().dom_id,
            "postcards_used-used_travel-12"
        );
        tree.verify_consistency().unwrap();
    }

    #[test]
    fn test_reparent_collision_leaves_node_in_place() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let a = tree.create(root, "a", NodeKind::Hand, Args::new()).unwrap();
        let b = tree.create(root, "b", NodeKind::Hand, Args::new()).unwrap();
        let card = tree.create(a, 1, NodeKind::Travel, Args::new()).unwrap();
        tree.create(b, 1, NodeKind::Travel, Args::new()).unwrap();

        let err = tree.add_to_parent(card, b, None).unwrap_err();
        assert!(matches!(err, UiError::DuplicateChild { .. }));
        assert_eq!(tree.children(a, NodeKind::Travel), vec![card]);

        tree.add_to_parent(card, b, Some(ChildId::Num(2))).unwrap();
        assert_eq!(tree.children(b, NodeKind::Travel).len(), 2);
        tree.verify_consistency().unwrap();
    }

    #[test]
    fn test_reparent_into_own_subtree_fails() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let outer = tree.create(root, 1, NodeKind::Region, Args::new()).unwrap();
        let inner = tree.create(outer, 11, NodeKind::Campsite, Args::new()).unwrap();
        assert!(tree.add_to_parent(outer, inner, None).is_err());
        assert!(tree.add_to_parent(outer, outer, None).is_err());
    }

    #[test]
    fn test_set_arg_updates_presentation() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let card = tree.create(root, 3, NodeKind::Postcard, Args::new()).unwrap();
        tree.set_arg(card, Attr::Supply, 4u32).unwrap();
        tree.activate(card, "postcard").unwrap();

        let element = tree.presentation().element(card).unwrap();
        assert_eq!(element.attribute(Attr::Supply), Some("4"));
        assert_eq!(element.attribute(Attr::Phase), Some("postcard"));
        assert_eq!(tree.active_nodes(), vec![card]);

        tree.deactivate(card).unwrap();
        assert!(tree.active_nodes().is_empty());
        assert_eq!(tree.presentation().element(card).unwrap().attribute(Attr::Phase), None);
        tree.verify_consistency().unwrap();
    }

    #[test]
    fn test_remove_takes_subtree() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let region = tree.create(root, 1, NodeKind::Region, Args::new()).unwrap();
        let site = tree.create(region, 11, NodeKind::Campsite, Args::new()).unwrap();
        tree.remove(region).unwrap();
        assert!(!tree.contains(site));
        assert_eq!(tree.len(), 1);
        tree.verify_consistency().unwrap();
    }

    #[test]
    fn test_resolve_and_path_of() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let player = tree.create(root, 2317, NodeKind::Player, Args::new()).unwrap();
        let hand = tree.create(player, "hand", NodeKind::Hand, Args::new()).unwrap();
        let card = tree.create(hand, 12, NodeKind::Travel, Args::new()).unwrap();

        assert_eq!(tree.resolve_path("player:2317/hand:hand/travel:12").unwrap(), card);
        assert_eq!(tree.path_of(card).unwrap(), "player:2317/hand:hand/travel:12");
        assert!(tree.resolve_path("player:2317/hand:hand/travel:13").is_err());
        assert!(tree.resolve_path("meeple:1").is_err());
    }
}
