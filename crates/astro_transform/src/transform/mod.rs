//! The transform stage.
//!
//! Order matters here:
//!
//! 1. `<style>` blocks are extracted (and detached) in their own walk, so the
//!    combined walk never sees them and never scopes them.
//! 2. Whether to scope is decided once, from the extracted styles.
//! 3. One combined walk collects hoisted scripts, annotates hydrated
//!    components and, if enabled, scopes every node, in that order per node.
//! 4. Hoisted scripts are detached once the walk is over.
//! 5. A document left with no children gets an empty frontmatter block so the
//!    printer still has something to print.

mod hydration;
mod scripts;
mod styles;

use oxc_span::Span;
use tracing::debug;

pub use hydration::{CLIENT_ONLY, EXPORT_ATTR, HYDRATION_ATTR, PATH_ATTR};
pub use styles::extract_styles;

use crate::ast::{Document, NodeKind};
use crate::diagnostic::Diagnostic;
use crate::options::TransformOptions;
use crate::scope::{ScopeAttributeInjector, StyleScoper};
use crate::walk::walk;
use hydration::HydrationCollector;

/// Output from the transform, next to the mutated [`Document`].
#[derive(Debug, Default)]
pub struct TransformReturn {
    /// Warnings collected while transforming.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether elements were scoped.
    pub scoped: bool,
    /// The scope identifier in effect, if one could be resolved.
    pub scope: Option<String>,
}

/// Transform `doc` in place with the default [`ScopeAttributeInjector`].
pub fn transform(doc: &mut Document, options: &TransformOptions) -> TransformReturn {
    AstroTransformer::new(options).build(doc)
}

/// Runs the transform stage over one document.
pub struct AstroTransformer<'o, S = ScopeAttributeInjector> {
    options: &'o TransformOptions,
    scoper: S,
}

impl<'o> AstroTransformer<'o> {
    pub fn new(options: &'o TransformOptions) -> Self {
        Self { options, scoper: ScopeAttributeInjector }
    }
}

impl<'o, S: StyleScoper> AstroTransformer<'o, S> {
    /// Use a different scoping policy.
    pub fn with_scoper<T: StyleScoper>(self, scoper: T) -> AstroTransformer<'o, T> {
        AstroTransformer { options: self.options, scoper }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(filename = self.options.filename.as_deref()))]
    pub fn build(self, doc: &mut Document) -> TransformReturn {
        let options = self.options;
        doc.clear_collections();

        extract_styles(doc);
        styles::preprocess_styles(doc, options);

        let should_scope =
            !doc.styles.is_empty() && self.scoper.should_scope(&doc.tree, &doc.styles, options);

        let mut diagnostics = Vec::new();
        let Document {
            tree,
            source_text,
            scripts,
            hydrated_components,
            client_only_components,
            hydration_directives,
            ..
        } = doc;
        let mut hydration = HydrationCollector {
            hydrated_components,
            client_only_components,
            directives: hydration_directives,
            diagnostics: &mut diagnostics,
            source_text: source_text.as_str(),
        };
        let root = tree.root();
        walk(tree, root, |node| {
            scripts::collect_script(node, scripts);
            hydration.annotate(node);
            if should_scope {
                self.scoper.scope_element(node.node_mut(), options);
            }
        });

        scripts::detach_scripts(doc);

        let root = doc.root();
        if doc.tree.first_child(root).is_none() {
            debug!("document is empty after hoisting, adding placeholder frontmatter");
            let frontmatter = doc.tree.append(root, NodeKind::Frontmatter, Span::default());
            doc.tree.append(frontmatter, NodeKind::Text(String::new()), Span::default());
        }

        debug!(
            styles = doc.styles.len(),
            scripts = doc.scripts.len(),
            hydrated = doc.hydrated_components.len(),
            client_only = doc.client_only_components.len(),
            scoped = should_scope,
            "transform finished"
        );

        TransformReturn {
            diagnostics,
            scoped: should_scope,
            scope: options.resolved_scope(),
        }
    }
}
