//! Options for the Astro transform stage.
//!
//! These mirror the `TransformOptions` the compiler driver passes down with
//! every compile unit. Only `scope`, `scoped_style_strategy` and
//! `preprocess_style` change what the transform does; the rest travel with the
//! document so later stages see the same bundle.

use crate::ast::Attribute;

/// Scoped style strategy for CSS scoping.
///
/// Determines how Astro marks elements belonging to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopedStyleStrategy {
    /// `:where(.astro-XXXX)` selectors, `astro-XXXX` class on elements (default).
    #[default]
    Where,
    /// `.astro-XXXX` selectors, `astro-XXXX` class on elements.
    Class,
    /// `[data-astro-cid-XXXX]` selectors and attributes.
    Attribute,
}

/// Hook that rewrites the text of an extracted `<style>` block.
///
/// Receives the CSS and the style's attributes (`lang`, `is:global`, ...).
/// Returning `None` keeps the authored CSS.
pub type PreprocessStyle = Box<dyn Fn(&str, &[Attribute]) -> Option<String> + Send + Sync>;

/// Options for the transform stage.
pub struct TransformOptions {
    /// Scope identifier injected into elements when styles are scoped.
    /// When unset, one is derived from the filename (see [`Self::resolved_scope`]).
    pub scope: Option<String>,

    /// The filename of the Astro component being compiled.
    pub filename: Option<String>,

    /// A normalized version of the filename used for scope hash generation.
    /// If not provided, falls back to `filename`.
    pub normalized_filename: Option<String>,

    /// The URL path the component is served from.
    pub pathname: Option<String>,

    /// The import specifier for Astro runtime functions.
    /// Defaults to `"astro/runtime/server/index.js"`.
    pub internal_url: Option<String>,

    /// The site base URL (`Astro.site`).
    pub site: Option<String>,

    /// The project root directory.
    pub project_root: Option<String>,

    /// Strategy for CSS scoping.
    pub scoped_style_strategy: ScopedStyleStrategy,

    /// Rewrites each extracted `<style>` before scoping.
    pub preprocess_style: Option<PreprocessStyle>,

    /// Whether hydration metadata is emitted statically by the printer.
    ///
    /// Not read by the transform itself; carried for the printer.
    pub static_extraction: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            scope: None,
            filename: None,
            normalized_filename: None,
            pathname: None,
            internal_url: None,
            site: None,
            project_root: None,
            scoped_style_strategy: ScopedStyleStrategy::default(),
            preprocess_style: None,
            static_extraction: false,
        }
    }
}

impl std::fmt::Debug for TransformOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformOptions")
            .field("scope", &self.scope)
            .field("filename", &self.filename)
            .field("normalized_filename", &self.normalized_filename)
            .field("pathname", &self.pathname)
            .field("internal_url", &self.internal_url)
            .field("site", &self.site)
            .field("project_root", &self.project_root)
            .field("scoped_style_strategy", &self.scoped_style_strategy)
            .field("preprocess_style", &self.preprocess_style.as_ref().map(|_| "Some(<fn>)"))
            .field("static_extraction", &self.static_extraction)
            .finish()
    }
}

impl TransformOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scope identifier.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the normalized filename for scope hash generation.
    #[must_use]
    pub fn with_normalized_filename(mut self, filename: impl Into<String>) -> Self {
        self.normalized_filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = Some(pathname.into());
        self
    }

    /// Set the internal URL for Astro runtime imports.
    #[must_use]
    pub fn with_internal_url(mut self, url: impl Into<String>) -> Self {
        self.internal_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<String>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    /// Set the scoped style strategy.
    #[must_use]
    pub fn with_scoped_style_strategy(mut self, strategy: ScopedStyleStrategy) -> Self {
        self.scoped_style_strategy = strategy;
        self
    }

    /// Set the style preprocessing hook.
    #[must_use]
    pub fn with_preprocess_style(
        mut self,
        f: impl Fn(&str, &[Attribute]) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.preprocess_style = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_static_extraction(mut self, enabled: bool) -> Self {
        self.static_extraction = enabled;
        self
    }

    /// Get the internal URL, with default fallback.
    pub fn get_internal_url(&self) -> &str {
        self.internal_url.as_deref().unwrap_or("astro/runtime/server/index.js")
    }

    /// The scope identifier to use for this compile unit.
    ///
    /// An explicit, non-empty `scope` wins. Otherwise the scope is a hash of the
    /// normalized filename (or the filename), so different files get different
    /// scopes. `<stdin>` and missing filenames yield `None`.
    pub fn resolved_scope(&self) -> Option<String> {
        if let Some(scope) = self.scope.as_deref().filter(|s| !s.is_empty()) {
            return Some(scope.to_string());
        }
        self.normalized_filename
            .as_deref()
            .or(self.filename.as_deref())
            .filter(|s| !s.is_empty() && *s != "<stdin>")
            .map(compute_scope_hash)
    }
}

/// Hash `input` into an 8 character lowercase base32-like identifier.
fn compute_scope_hash(input: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz234567";

    let mut hasher = DefaultHasher::new();
    input.hash(&mut hasher);
    let mut h = hasher.finish();

    let mut result = String::with_capacity(8);
    for _ in 0..8 {
        result.push(char::from(ALPHABET[(h & 0x1f) as usize]));
        h >>= 5;
    }
    result
}
