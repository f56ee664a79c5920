//! Style scoping boundary.
//!
//! The transform decides once per document whether to scope and then hands
//! every visited node to a [`StyleScoper`]. Rewriting the CSS selectors
//! themselves happens later, in the printer; this module only marks markup.

use crate::ast::{Attribute, AttributeKind, Element, Node, NodeId, Tree};
use crate::options::{ScopedStyleStrategy, TransformOptions};

/// Decides whether a document is scoped and marks its elements.
pub trait StyleScoper {
    /// Called once, before the combined traversal, with the extracted styles.
    fn should_scope(&self, tree: &Tree, styles: &[NodeId], options: &TransformOptions) -> bool;

    /// Called once for every node visited while scoping is active.
    fn scope_element(&self, node: &mut Node, options: &TransformOptions);
}

/// Elements that should never receive a scope class in the HTML.
pub const NEVER_SCOPED_ELEMENTS: &[&str] = &[
    "Fragment", "base", "font", "frame", "frameset", "head", "link", "meta", "noframes",
    "noscript", "script", "style", "slot", "title",
];

/// Check if an element should receive a scope class.
pub fn should_scope_element(name: &str) -> bool {
    !NEVER_SCOPED_ELEMENTS.contains(&name)
}

/// Default scoper: adds `astro-XXXX` to `class` (or a `data-astro-cid-XXXX`
/// attribute, depending on [`ScopedStyleStrategy`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeAttributeInjector;

impl StyleScoper for ScopeAttributeInjector {
    fn should_scope(&self, tree: &Tree, styles: &[NodeId], options: &TransformOptions) -> bool {
        if options.resolved_scope().is_none() {
            return false;
        }
        styles
            .iter()
            .filter_map(|&id| tree.element(id))
            .any(|style| !style.has_attribute("is:global"))
    }

    fn scope_element(&self, node: &mut Node, options: &TransformOptions) {
        let Some(scope) = options.resolved_scope() else {
            return;
        };
        let Some(element) = node.as_element_mut() else {
            return;
        };
        if !should_scope_element(&element.name) {
            return;
        }
        match options.scoped_style_strategy {
            ScopedStyleStrategy::Where | ScopedStyleStrategy::Class => {
                inject_scope_class(element, &format!("astro-{scope}"));
            }
            ScopedStyleStrategy::Attribute => {
                let key = format!("data-astro-cid-{scope}");
                if !element.has_attribute(&key) {
                    element.attributes.push(Attribute::empty(key));
                }
            }
        }
    }
}

/// Merge `class_name` into the element's class, whatever form the class takes.
fn inject_scope_class(element: &mut Element, class_name: &str) {
    if let Some(attr) = element.attributes.iter_mut().find(|attr| attr.key == "class:list") {
        attr.value = format!("[({}), \"{class_name}\"]", attr.value);
        attr.kind = AttributeKind::Expression;
        return;
    }

    let Some(index) = element.attributes.iter().position(|attr| attr.key == "class") else {
        element.attributes.push(Attribute::quoted("class", class_name));
        return;
    };
    let attr = &mut element.attributes[index];

    match attr.kind {
        AttributeKind::Empty => {
            attr.value = class_name.to_string();
            attr.kind = AttributeKind::Quoted;
        }
        AttributeKind::Quoted | AttributeKind::TemplateLiteral => {
            if attr.value.split_ascii_whitespace().any(|class| class == class_name) {
                return;
            }
            if attr.value.trim().is_empty() {
                attr.value = class_name.to_string();
            } else {
                attr.value = format!("{} {class_name}", attr.value);
            }
        }
        AttributeKind::Expression => {
            attr.value = format!("(({}) ?? \"\") + \" {class_name}\"", attr.value);
        }
        AttributeKind::Shorthand => {
            attr.value = format!("(({}) ?? \"\") + \" {class_name}\"", attr.key);
            attr.kind = AttributeKind::Expression;
        }
        // A spread never carries the `class` key.
        AttributeKind::Spread => {}
    }
}
