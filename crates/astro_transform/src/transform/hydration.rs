//! `client:*` hydration directives.
//!
//! A component or custom element carrying `client:<directive>` gets a
//! `client:component-hydration` attribute naming the directive. Unless the
//! directive is `client:only`, it also gets two expression attributes that
//! look the component up in the runtime `$$metadata` object:
//!
//! ```text
//! <Counter client:load />
//!   client:component-hydration="load"
//!   client:component-path={$$metadata.getPath(Counter)}
//!   client:component-export={$$metadata.getExport(Counter)}
//! ```

use cow_utils::CowUtils;
use tracing::trace;

use crate::ast::{Attribute, Element, HydrationDirectives, NodeId};
use crate::diagnostic::Diagnostic;
use crate::walk::VisitNode;

pub const CLIENT_PREFIX: &str = "client:";
pub const CLIENT_ONLY: &str = "client:only";
pub const HYDRATION_ATTR: &str = "client:component-hydration";
pub const PATH_ATTR: &str = "client:component-path";
pub const EXPORT_ATTR: &str = "client:component-export";

/// Side collections filled while annotating.
pub(crate) struct HydrationCollector<'d> {
    pub hydrated_components: &'d mut Vec<NodeId>,
    pub client_only_components: &'d mut Vec<NodeId>,
    pub directives: &'d mut HydrationDirectives,
    pub diagnostics: &'d mut Vec<Diagnostic>,
    pub source_text: &'d str,
}

impl HydrationCollector<'_> {
    pub fn annotate(&mut self, node: &mut VisitNode<'_>) {
        let id = node.id();
        let Some(element) = node.node_mut().as_element_mut() else {
            return;
        };
        if !element.is_component && !element.is_custom_element {
            return;
        }
        let Some(index) = element.attributes.iter().position(|attr| is_client_directive(&attr.key))
        else {
            return;
        };

        self.warn_ignored_directives(element, index);

        let key = element.attributes[index].key.clone();
        let directive = &key[CLIENT_PREFIX.len()..];
        self.directives.insert(directive);
        element.attributes.push(Attribute::quoted(HYDRATION_ATTR, directive));

        if key == CLIENT_ONLY {
            trace!(node = %id, component = %element.name, "client-only component");
            self.client_only_components.push(id);
            return;
        }

        trace!(node = %id, component = %element.name, directive, "hydrated component");
        self.hydrated_components.push(id);
        let lookup_key = metadata_key(element);
        element
            .attributes
            .push(Attribute::expression(PATH_ATTR, format!("$$metadata.getPath({lookup_key})")));
        element
            .attributes
            .push(Attribute::expression(EXPORT_ATTR, format!("$$metadata.getExport({lookup_key})")));
    }

    /// Report every `client:*` after the one at `used`; only the first counts.
    fn warn_ignored_directives(&mut self, element: &Element, used: usize) {
        let used_key = &element.attributes[used].key;
        for ignored in element.attributes[used + 1..].iter().filter(|attr| is_client_directive(&attr.key))
        {
            self.diagnostics.push(
                Diagnostic::warning(format!(
                    "`{}` on <{}> is ignored because `{used_key}` is already set",
                    ignored.key, element.name
                ))
                .with_hint("A component can only use one `client:*` hydration directive.")
                .with_label(Some("ignored directive".to_string()), ignored.span, self.source_text),
            );
        }
    }
}

/// An authored `client:*` directive, not one of the attributes synthesized here.
fn is_client_directive(key: &str) -> bool {
    key.starts_with(CLIENT_PREFIX) && !matches!(key, HYDRATION_ATTR | PATH_ATTR | EXPORT_ATTR)
}

/// How the runtime metadata object keys this component: custom elements by
/// their tag name as a string, imported components by their binding.
fn metadata_key(element: &Element) -> String {
    if element.is_custom_element {
        format!("'{}'", element.name.cow_replace('\'', "\\'"))
    } else {
        element.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use oxc_span::Span;

    use super::*;
    use crate::ast::{AttributeKind, Document, NodeKind};
    use crate::diagnostic::DiagnosticSeverity;
    use crate::walk::walk;

    fn annotate(doc: &mut Document) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let Document {
            tree,
            source_text,
            hydrated_components,
            client_only_components,
            hydration_directives,
            ..
        } = doc;
        let mut collector = HydrationCollector {
            hydrated_components,
            client_only_components,
            directives: hydration_directives,
            diagnostics: &mut diagnostics,
            source_text: source_text.as_str(),
        };
        let root = tree.root();
        walk(tree, root, |node| collector.annotate(node));
        diagnostics
    }

    fn add(doc: &mut Document, element: Element) -> NodeId {
        let root = doc.root();
        doc.tree.append(root, NodeKind::Element(element), Span::default())
    }

    fn attrs(doc: &Document, id: NodeId) -> Vec<String> {
        doc.tree.element(id).unwrap().attributes.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_client_only_component() {
        let mut doc = Document::new();
        let id = add(&mut doc, Element::new("MyComponent").with_attribute(Attribute::empty("client:only")));

        annotate(&mut doc);

        assert_eq!(attrs(&doc, id), ["client:only", r#"client:component-hydration="only""#]);
        assert_eq!(doc.client_only_components, [id]);
        assert!(doc.hydrated_components.is_empty());
        assert_eq!(doc.hydration_directives.iter().collect::<Vec<_>>(), ["only"]);
    }

    #[test]
    fn test_client_only_with_framework_hint() {
        let mut doc = Document::new();
        let id = add(
            &mut doc,
            Element::new("Counter").with_attribute(Attribute::quoted("client:only", "react")),
        );

        annotate(&mut doc);

        assert_eq!(doc.client_only_components, [id]);
        assert!(!doc.tree.element(id).unwrap().has_attribute(PATH_ATTR));
    }

    #[test]
    fn test_hydrated_component() {
        let mut doc = Document::new();
        let id = add(&mut doc, Element::new("Counter").with_attribute(Attribute::empty("client:load")));

        annotate(&mut doc);

        assert_eq!(
            attrs(&doc, id),
            [
                "client:load",
                r#"client:component-hydration="load""#,
                "client:component-path={$$metadata.getPath(Counter)}",
                "client:component-export={$$metadata.getExport(Counter)}",
            ]
        );
        assert_eq!(doc.hydrated_components, [id]);
        let path = doc.tree.element(id).unwrap().attribute(PATH_ATTR).unwrap();
        assert_eq!(path.kind, AttributeKind::Expression);
    }

    #[test]
    fn test_custom_element_uses_string_key() {
        let mut doc = Document::new();
        let id = add(&mut doc, Element::new("my-custom-el").with_attribute(Attribute::empty("client:load")));

        annotate(&mut doc);

        let el = doc.tree.element(id).unwrap();
        assert_eq!(el.attribute(PATH_ATTR).unwrap().value, "$$metadata.getPath('my-custom-el')");
        assert_eq!(el.attribute(EXPORT_ATTR).unwrap().value, "$$metadata.getExport('my-custom-el')");
        assert_eq!(doc.hydrated_components, [id]);
    }

    #[test]
    fn test_plain_elements_are_ignored() {
        let mut doc = Document::new();
        let id = add(&mut doc, Element::new("div").with_attribute(Attribute::empty("client:load")));

        annotate(&mut doc);

        assert_eq!(attrs(&doc, id), ["client:load"]);
        assert!(doc.hydration_directives.is_empty());
    }

    #[test]
    fn test_component_without_directive_is_untouched() {
        let mut doc = Document::new();
        let id = add(&mut doc, Element::new("Card").with_attribute(Attribute::quoted("title", "x")));

        annotate(&mut doc);

        assert_eq!(attrs(&doc, id), [r#"title="x""#]);
        assert!(doc.hydrated_components.is_empty() && doc.client_only_components.is_empty());
    }

    #[test]
    fn test_only_first_directive_is_used() {
        let source = "<A client:visible client:only />";
        let mut doc = Document::new().with_source_text(source);
        let el = Element::new("A")
            .with_attribute(Attribute::empty("client:visible").with_span(Span::new(3, 17)))
            .with_attribute(Attribute::empty("client:only").with_span(Span::new(18, 29)));
        let id = add(&mut doc, el);

        let diagnostics = annotate(&mut doc);

        assert_eq!(doc.hydrated_components, [id]);
        assert!(doc.client_only_components.is_empty());
        assert_eq!(doc.hydration_directives.iter().collect::<Vec<_>>(), ["visible"]);
        let hydration: Vec<_> = doc
            .tree
            .element(id)
            .unwrap()
            .attributes
            .iter()
            .filter(|attr| attr.key == HYDRATION_ATTR)
            .map(|attr| attr.value.as_str())
            .collect();
        assert_eq!(hydration, ["visible"]);

        assert_eq!(diagnostics.len(), 1);
        let warning = &diagnostics[0];
        assert_eq!(warning.severity, DiagnosticSeverity::Warning);
        assert!(warning.text.contains("`client:only`"), "{}", warning.text);
        assert_eq!((warning.labels[0].line, warning.labels[0].column), (1, 18));
    }

    #[test]
    fn test_directives_are_unique() {
        let mut doc = Document::new();
        for _ in 0..10 {
            add(&mut doc, Element::new("Counter").with_attribute(Attribute::empty("client:load")));
        }
        add(&mut doc, Element::new("Chart").with_attribute(Attribute::empty("client:idle")));

        annotate(&mut doc);

        assert_eq!(doc.hydrated_components.len(), 11);
        assert_eq!(doc.hydration_directives.iter().collect::<Vec<_>>(), ["load", "idle"]);
    }

    #[test]
    fn test_unknown_directive_is_recorded() {
        let mut doc = Document::new();
        add(
            &mut doc,
            Element::new("Widget").with_attribute(Attribute::quoted("client:media", "(max-width: 50em)")),
        );

        annotate(&mut doc);

        assert!(doc.hydration_directives.contains("media"));
    }
}
