//! `<style>` extraction.

use tracing::trace;

use crate::ast::Document;
use crate::options::TransformOptions;
use crate::walk::walk;

/// Move every top-level `<style>` out of the tree and into `doc.styles`.
///
/// Styles directly inside an `<svg>` stay where they are: they belong to the
/// graphic, not to the component. Detaching happens after the walk has
/// finished, in the order the styles were found.
pub fn extract_styles(doc: &mut Document) {
    let Document { tree, styles, .. } = doc;
    let root = tree.root();

    walk(tree, root, |node| {
        if !node.node().is_element("style") {
            return;
        }
        if node.parent().is_some_and(|parent| parent.is_element("svg")) {
            return;
        }
        trace!(node = %node.id(), "extracting <style>");
        styles.push(node.id());
    });

    for &style in styles.iter() {
        tree.detach(style)
            .unwrap_or_else(|err| panic!("extracted <style> {style} must be attached: {err}"));
    }
}

/// Run the `preprocess_style` hook over every extracted style.
pub(crate) fn preprocess_styles(doc: &mut Document, options: &TransformOptions) {
    let Some(preprocess) = &options.preprocess_style else {
        return;
    };
    for &style in &doc.styles {
        let css = doc.tree.text_content(style);
        let Some(element) = doc.tree.element(style) else {
            continue;
        };
        if let Some(processed) = preprocess(&css, element.attributes.as_slice()) {
            trace!(node = %style, "replacing preprocessed <style> content");
            doc.tree.replace_children_with_text(style, processed);
        }
    }
}
