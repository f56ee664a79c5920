//! Pre-order, depth-first traversal of a [`Tree`].
//!
//! [`walk`] hands the callback a [`VisitNode`], which can edit node data
//! (attributes, flags, text) but has no way to attach or detach nodes. Passes
//! that remove nodes record them during the walk and unlink them afterwards,
//! so the traversal never runs over a child list that changed under it.

use crate::ast::{Node, NodeId, Tree};

/// Mutable view of the node currently being visited.
pub struct VisitNode<'t> {
    tree: &'t mut Tree,
    id: NodeId,
}

impl VisitNode<'_> {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn node(&self) -> &Node {
        self.tree.node(self.id)
    }

    #[inline]
    pub fn node_mut(&mut self) -> &mut Node {
        self.tree.node_mut(self.id)
    }

    pub fn parent(&self) -> Option<&Node> {
        self.tree.parent(self.id).map(|parent| self.tree.node(parent))
    }

    pub fn children(&self) -> &[NodeId] {
        self.tree.children(self.id)
    }

    /// Mutable access to one of this node's direct children.
    pub fn child_mut(&mut self, child: NodeId) -> Option<&mut Node> {
        if self.tree.parent(child) == Some(self.id) {
            Some(self.tree.node_mut(child))
        } else {
            None
        }
    }

    /// Read-only access to the whole tree.
    pub fn tree(&self) -> &Tree {
        &*self.tree
    }
}

/// Visit `root` and then every descendant, parents before children and
/// siblings in document order.
pub fn walk(tree: &mut Tree, root: NodeId, mut visit: impl FnMut(&mut VisitNode<'_>)) {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let mut cursor = VisitNode { tree: &mut *tree, id };
        visit(&mut cursor);
        stack.extend(tree.children(id).iter().rev().copied());
    }
}

/// Read-only iterator with the same order as [`walk`].
pub struct Descendants<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl<'t> Descendants<'t> {
    /// Iterate `root` and everything below it.
    pub fn new(tree: &'t Tree, root: NodeId) -> Self {
        Self { tree, stack: vec![root] }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

impl Tree {
    /// Nodes reachable from `root`, in pre-order.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants::new(self, root)
    }
}

#[cfg(test)]
mod tests {
    use oxc_span::Span;

    use super::*;
    use crate::ast::{Attribute, Element, NodeKind};

    fn element(tree: &mut Tree, parent: NodeId, name: &str) -> NodeId {
        tree.append(parent, NodeKind::Element(Element::new(name)), Span::default())
    }

    fn names(tree: &Tree, ids: impl IntoIterator<Item = NodeId>) -> Vec<String> {
        ids.into_iter()
            .map(|id| match &tree.node(id).kind {
                NodeKind::Element(el) => el.name.clone(),
                NodeKind::Document => "#document".to_string(),
                other => format!("{other:?}"),
            })
            .collect()
    }

    /// ```text
    /// #document
    ///   html
    ///     head
    ///       title
    ///     body
    ///       p
    ///   footer
    /// ```
    fn sample() -> Tree {
        let mut tree = Tree::new();
        let root = tree.root();
        let html = element(&mut tree, root, "html");
        let head = element(&mut tree, html, "head");
        element(&mut tree, head, "title");
        let body = element(&mut tree, html, "body");
        element(&mut tree, body, "p");
        element(&mut tree, root, "footer");
        tree
    }

    #[test]
    fn test_walk_is_preorder() {
        let mut tree = sample();
        let mut seen = Vec::new();
        let root = tree.root();
        walk(&mut tree, root, |node| seen.push(node.id()));

        assert_eq!(
            names(&tree, seen),
            ["#document", "html", "head", "title", "body", "p", "footer"]
        );
    }

    #[test]
    fn test_descendants_matches_walk() {
        let mut tree = sample();
        let mut walked = Vec::new();
        let root = tree.root();
        walk(&mut tree, root, |node| walked.push(node.id()));

        assert_eq!(tree.descendants(root).collect::<Vec<_>>(), walked);
    }

    #[test]
    fn test_walk_from_subtree() {
        let mut tree = sample();
        let html = tree.first_child(tree.root()).unwrap();
        let body = tree.children(html)[1];
        let mut seen = Vec::new();
        walk(&mut tree, body, |node| seen.push(node.id()));

        assert_eq!(names(&tree, seen), ["body", "p"]);
    }

    #[test]
    fn test_visitor_can_edit_node_and_children() {
        let mut tree = sample();
        let root = tree.root();
        walk(&mut tree, root, |node| {
            let children = node.children().to_vec();
            for child in children {
                if let Some(el) = node.child_mut(child).and_then(Node::as_element_mut) {
                    el.attributes.push(Attribute::empty("data-child"));
                }
            }
        });

        for id in tree.descendants(root).skip(1) {
            let el = tree.element(id).unwrap();
            assert!(el.has_attribute("data-child"), "<{}> was not visited as a child", el.name);
        }
    }

    #[test]
    fn test_child_mut_rejects_non_children() {
        let mut tree = sample();
        let root = tree.root();
        let title = tree.descendants(root).nth(3).unwrap();
        walk(&mut tree, root, |node| {
            if node.id() == root {
                assert!(node.child_mut(title).is_none());
            }
        });
    }
}
