//! `<script hoist>` collection.

use tracing::trace;

use crate::ast::{Document, NodeId};
use crate::walk::VisitNode;

/// Record `node` in `scripts` if it is a `<script>` with a truthy `hoist`.
///
/// Only records; the script stays in the tree until [`detach_scripts`] runs
/// after the walk.
pub(crate) fn collect_script(node: &VisitNode<'_>, scripts: &mut Vec<NodeId>) {
    let Some(element) = node.node().as_element() else {
        return;
    };
    if element.name == "script" && element.has_truthy_attribute("hoist") {
        trace!(node = %node.id(), "hoisting <script>");
        scripts.push(node.id());
    }
}

/// Unlink every collected script from wherever it was authored.
pub(crate) fn detach_scripts(doc: &mut Document) {
    let Document { tree, scripts, .. } = doc;
    for &id in scripts.iter() {
        tree.detach(id)
            .unwrap_or_else(|err| panic!("hoisted <script> {id} must be attached: {err}"));
    }
}

#[cfg(test)]
mod tests {
    use oxc_span::Span;

    use super::*;
    use crate::ast::{Attribute, AttributeKind, Element, NodeKind};
    use crate::walk::walk;

    fn collect(doc: &mut Document) {
        let Document { tree, scripts, .. } = doc;
        let root = tree.root();
        walk(tree, root, |node| collect_script(node, scripts));
    }

    fn script(doc: &mut Document, attr: Option<Attribute>) -> NodeId {
        let root = doc.root();
        let mut el = Element::new("script");
        el.attributes.extend(attr);
        doc.tree.append(root, NodeKind::Element(el), Span::default())
    }

    #[test]
    fn test_hoist_spellings() {
        let cases = [
            (Attribute::empty("hoist"), true),
            (Attribute::expression("hoist", "true"), true),
            (Attribute::expression("hoist", "1"), true),
            (Attribute::quoted("hoist", "true"), true),
            (Attribute::quoted("hoist", ""), true),
            (Attribute::expression("hoist", "false"), false),
            (Attribute::quoted("hoist", "false"), false),
            (Attribute::new("hoist", "true", AttributeKind::TemplateLiteral), false),
            (Attribute::new("hoist", "", AttributeKind::Shorthand), false),
            (Attribute::empty("async"), false),
        ];
        for (attr, hoisted) in cases {
            let mut doc = Document::new();
            let id = script(&mut doc, Some(attr.clone()));
            collect(&mut doc);
            assert_eq!(doc.scripts.contains(&id), hoisted, "<script {attr}>");
        }
    }

    #[test]
    fn test_plain_script_is_not_hoisted() {
        let mut doc = Document::new();
        script(&mut doc, None);
        collect(&mut doc);
        assert!(doc.scripts.is_empty());
    }

    #[test]
    fn test_hoist_on_other_elements_is_ignored() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = Element::new("div").with_attribute(Attribute::empty("hoist"));
        doc.tree.append(root, NodeKind::Element(div), Span::default());
        collect(&mut doc);
        assert!(doc.scripts.is_empty());
    }

    #[test]
    fn test_collect_then_detach_in_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = script(&mut doc, Some(Attribute::empty("hoist")));
        let section = doc.tree.append(root, NodeKind::Element(Element::new("section")), Span::default());
        let nested = Element::new("script").with_attribute(Attribute::empty("hoist"));
        let second = doc.tree.append(section, NodeKind::Element(nested), Span::default());

        collect(&mut doc);
        assert_eq!(doc.scripts, [first, second]);
        assert!(doc.tree.is_attached(first), "collecting must not detach");

        detach_scripts(&mut doc);
        assert_eq!(doc.tree.children(root), &[section]);
        assert!(doc.tree.children(section).is_empty());
    }

    #[test]
    #[should_panic(expected = "must be attached")]
    fn test_detaching_twice_panics() {
        let mut doc = Document::new();
        script(&mut doc, Some(Attribute::empty("hoist")));
        collect(&mut doc);
        detach_scripts(&mut doc);
        detach_scripts(&mut doc);
    }
}
