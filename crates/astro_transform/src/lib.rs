//! Astro Transform
//!
//! Rewrites a parsed Astro document (`Document`) into the shape the printer
//! expects:
//!
//! - `<style>` blocks are moved out of the markup into `Document::styles`,
//! - `<script hoist>` elements are moved into `Document::scripts`,
//! - components with `client:*` directives get `client:component-*`
//!   metadata attributes and are listed in `Document::hydrated_components` or
//!   `Document::client_only_components`,
//! - when the component has scoped styles, every element is scoped.
//!
//! ```
//! use astro_transform::{Attribute, Document, Element, NodeKind, TransformOptions, transform};
//! use oxc_span::Span;
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let counter = Element::new("Counter").with_attribute(Attribute::empty("client:idle"));
//! let counter = doc.tree.append(root, NodeKind::Element(counter), Span::default());
//!
//! transform(&mut doc, &TransformOptions::new());
//!
//! assert_eq!(doc.hydrated_components, [counter]);
//! assert!(doc.hydration_directives.contains("idle"));
//! ```

mod ast;
mod diagnostic;
mod options;
mod scope;
mod transform;
mod walk;

pub use ast::{
    Attribute, AttributeKind, Attributes, DisplayTree, Document, Element, HydrationDirectives,
    Node, NodeId, NodeKind, Tree, TreeError, is_component_name, is_custom_element_name,
};
pub use diagnostic::{Diagnostic, DiagnosticLabel, DiagnosticSeverity};
pub use options::{PreprocessStyle, ScopedStyleStrategy, TransformOptions};
pub use scope::{NEVER_SCOPED_ELEMENTS, ScopeAttributeInjector, StyleScoper, should_scope_element};
pub use transform::{
    AstroTransformer, CLIENT_ONLY, EXPORT_ATTR, HYDRATION_ATTR, PATH_ATTR, TransformReturn,
    extract_styles, transform,
};
pub use walk::{Descendants, VisitNode, walk};
