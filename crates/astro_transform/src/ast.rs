//! Astro document tree.
//!
//! The parser hands the transform a [`Document`]: an index arena ([`Tree`]) of
//! [`Node`]s plus the side collections that the transform fills in for the
//! printer. Children are owned, ordered `Vec<NodeId>`s on the parent slot and
//! the parent link is a plain back-reference, so detaching a node can never
//! leave a dangling pointer behind. Detached nodes stay in the arena; they are
//! only unreachable from the root.

use std::fmt;

use oxc_span::{GetSpan, Span};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Index of a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The document root. Every [`Tree`] is created with it.
    pub const ROOT: Self = Self(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an attribute value was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// `hoist`
    Empty,
    /// `hoist="true"` (value holds the unquoted text)
    Quoted,
    /// `hoist={true}` (value holds the source text between the braces)
    Expression,
    /// `{...props}`
    Spread,
    /// `{hoist}`
    Shorthand,
    /// ``hoist=`true` ``
    TemplateLiteral,
}

/// A single element attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
    pub kind: AttributeKind,
    pub span: Span,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>, kind: AttributeKind) -> Self {
        Self { key: key.into(), value: value.into(), kind, span: Span::default() }
    }

    /// `key`
    pub fn empty(key: impl Into<String>) -> Self {
        Self::new(key, String::new(), AttributeKind::Empty)
    }

    /// `key="value"`
    pub fn quoted(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, value, AttributeKind::Quoted)
    }

    /// `key={value}`
    pub fn expression(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, value, AttributeKind::Expression)
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Whether this attribute, read as a boolean flag, is on.
    ///
    /// Accepts the four spellings authors use interchangeably: `key`,
    /// `key={true}` / `key={1}`, and `key="true"` / `key=""`.
    pub fn is_truthy(&self) -> bool {
        match self.kind {
            AttributeKind::Empty => true,
            AttributeKind::Expression => matches!(self.value.as_str(), "true" | "1"),
            AttributeKind::Quoted => matches!(self.value.as_str(), "" | "true"),
            AttributeKind::Spread | AttributeKind::Shorthand | AttributeKind::TemplateLiteral => {
                false
            }
        }
    }
}

impl GetSpan for Attribute {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AttributeKind::Empty => write!(f, "{}", self.key),
            AttributeKind::Quoted => write!(f, "{}=\"{}\"", self.key, self.value),
            AttributeKind::Expression => write!(f, "{}={{{}}}", self.key, self.value),
            AttributeKind::Spread => write!(f, "{{...{}}}", self.value),
            AttributeKind::Shorthand => write!(f, "{{{}}}", self.key),
            AttributeKind::TemplateLiteral => write!(f, "{}=`{}`", self.key, self.value),
        }
    }
}

pub type Attributes = SmallVec<[Attribute; 4]>;

/// An element, component or custom element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name as authored (`div`, `MyComponent`, `my-element`, `Foo.Bar`).
    pub name: String,
    /// A statically imported component reference.
    pub is_component: bool,
    /// A web-platform custom element (hyphenated tag name).
    pub is_custom_element: bool,
    pub attributes: Attributes,
}

impl Element {
    /// Create an element, classifying the tag name the way the parser does.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let is_component = is_component_name(&name);
        let is_custom_element = !is_component && is_custom_element_name(&name);
        Self { name, is_component, is_custom_element, attributes: Attributes::new() }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.key == key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    /// Whether any attribute named `key` is truthy (see [`Attribute::is_truthy`]).
    pub fn has_truthy_attribute(&self, key: &str) -> bool {
        self.attributes.iter().any(|attr| attr.key == key && attr.is_truthy())
    }
}

pub fn is_component_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase()) || name.contains('.')
}

pub fn is_custom_element_name(name: &str) -> bool {
    name.contains('-')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(Element),
    Text(String),
    Comment(String),
    /// The `---` fenced frontmatter block. Its code lives in a single text child.
    Frontmatter,
    /// `{expr}` embedded in markup. Its source lives in the children.
    Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match &mut self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Whether this is an element named `name`.
    pub fn is_element(&self, name: &str) -> bool {
        self.as_element().is_some_and(|el| el.name == name)
    }
}

impl GetSpan for Node {
    fn span(&self) -> Span {
        self.span
    }
}

/// Structural misuse of a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node {0} has no parent")]
    NoParent(NodeId),
    #[error("the document root cannot be moved")]
    RootNode,
    #[error("node {0} is already attached to a parent")]
    AlreadyAttached(NodeId),
}

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena holding every node of one document.
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree containing only the document root.
    pub fn new() -> Self {
        let root = Slot {
            node: Node::new(NodeKind::Document, Span::default()),
            parent: None,
            children: Vec::new(),
        };
        Self { slots: vec![root] }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Total number of nodes ever created, detached ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocate a new, unattached node.
    pub fn create(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = u32::try_from(self.slots.len()).map(NodeId).unwrap_or_else(|_| {
            panic!("document tree exceeds {} nodes", u32::MAX);
        });
        self.slots.push(Slot { node: Node::new(kind, span), parent: None, children: Vec::new() });
        id
    }

    /// Allocate `kind` and append it as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind, span: Span) -> NodeId {
        let id = self.create(kind, span);
        self.slots[parent.index()].children.push(id);
        self.slots[id.index()].parent = Some(parent);
        id
    }

    /// Append an unattached node (and its subtree) as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if child == NodeId::ROOT {
            return Err(TreeError::RootNode);
        }
        if self.slots[child.index()].parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        self.slots[parent.index()].children.push(child);
        self.slots[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Unlink `id` from its parent. The node keeps its own subtree.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == NodeId::ROOT {
            return Err(TreeError::RootNode);
        }
        let parent = self.slots[id.index()].parent.take().ok_or(TreeError::NoParent(id))?;
        let siblings = &mut self.slots[parent.index()].children;
        if let Some(position) = siblings.iter().position(|&child| child == id) {
            siblings.remove(position);
        }
        Ok(())
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.slots[id.index()].node
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.slots[id.index()].node
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.index()].parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.index()].children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).as_element()
    }

    /// Whether `id` can be reached from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current == NodeId::ROOT
    }

    /// Concatenated text of all descendant text nodes, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        for descendant in crate::walk::Descendants::new(self, id) {
            if let NodeKind::Text(data) = &self.node(descendant).kind {
                text.push_str(data);
            }
        }
        text
    }

    /// Drop every child of `id` and give it a single text child.
    pub fn replace_children_with_text(&mut self, id: NodeId, text: impl Into<String>) {
        let children = std::mem::take(&mut self.slots[id.index()].children);
        for child in children {
            self.slots[child.index()].parent = None;
        }
        let span = self.node(id).span;
        self.append(id, NodeKind::Text(text.into()), span);
    }

    /// Render the subtree under `id` as an indented outline.
    pub fn display(&self, id: NodeId) -> DisplayTree<'_> {
        DisplayTree { tree: self, id }
    }
}

/// Outline rendering of a subtree, used in tests and debug logs.
pub struct DisplayTree<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl DisplayTree<'_> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let indent = depth * 2;
        match &self.tree.node(id).kind {
            NodeKind::Document => write!(f, "{:indent$}Document", "")?,
            NodeKind::Element(el) => {
                write!(f, "{:indent$}<{}", "", el.name)?;
                for attr in &el.attributes {
                    write!(f, " {attr}")?;
                }
                f.write_str(">")?;
            }
            NodeKind::Text(text) => write!(f, "{:indent$}Text {text:?}", "")?,
            NodeKind::Comment(text) => write!(f, "{:indent$}Comment {text:?}", "")?,
            NodeKind::Frontmatter => write!(f, "{:indent$}Frontmatter", "")?,
            NodeKind::Expression => write!(f, "{:indent$}Expression", "")?,
        }
        for &child in self.tree.children(id) {
            f.write_str("\n")?;
            self.write_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for DisplayTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.id, 0)
    }
}

/// Insertion-ordered set of hydration directive names (`load`, `idle`, `only`, ...).
#[derive(Debug, Clone, Default)]
pub struct HydrationDirectives {
    order: Vec<String>,
    seen: FxHashSet<String>,
}

impl HydrationDirectives {
    /// Record `directive`. Returns `false` if it was already present.
    pub fn insert(&mut self, directive: &str) -> bool {
        if self.seen.contains(directive) {
            return false;
        }
        self.seen.insert(directive.to_string());
        self.order.push(directive.to_string());
        true
    }

    pub fn contains(&self, directive: &str) -> bool {
        self.seen.contains(directive)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }
}

/// One compile unit: the tree plus what the transform pulled out of it.
///
/// The side collections are reset at the start of every transform and are
/// read-only for the printer afterwards.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub tree: Tree,
    /// Original source, used to compute line/column for diagnostics. May be empty.
    pub source_text: String,
    /// Extracted `<style>` elements, in source order.
    pub styles: Vec<NodeId>,
    /// Hoisted `<script>` elements, in source order.
    pub scripts: Vec<NodeId>,
    /// Components with a `client:*` directive other than `client:only`.
    pub hydrated_components: Vec<NodeId>,
    /// Components with `client:only`.
    pub client_only_components: Vec<NodeId>,
    pub hydration_directives: HydrationDirectives,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source_text(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = source_text.into();
        self
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub(crate) fn clear_collections(&mut self) {
        self.styles.clear();
        self.scripts.clear();
        self.hydrated_components.clear();
        self.client_only_components.clear();
        self.hydration_directives.clear();
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tree.display(self.root()))
    }
}
