//! Index-addressed markup tree.
//!
//! The lenient HTML5 parse is done by `scraper`/`html5ever`; the result is
//! copied into a flat arena where nodes refer to each other by [`NodeId`].
//! Detached nodes stay in the arena until the whole [`Dom`] is dropped, which
//! keeps per-block "clone, mutate, discard" work cheap and free of ownership
//! cycles.

use scraper::{Html, Node as HtmlNode};

use super::collect::BLOCK_TAGS;

/// Index of a node inside a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Tag name and attributes of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Local tag name (HTML names are lowercase)
    pub name: String,

    /// Attributes in source order
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    /// Create an element with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Synthetic root holding top-level nodes
    Root,
    /// An element
    Element(ElementData),
    /// A text node
    Text(String),
    /// A comment
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// An arena-backed markup tree.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    /// Create an empty tree with only the synthetic root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Parse a full HTML document.
    pub fn parse_document(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut dom = Self::new();
        let root = dom.root();
        dom.import_children(parsed.tree.root(), root);
        dom
    }

    /// Parse an HTML fragment; top-level nodes become children of the root.
    pub fn parse_fragment(html: &str) -> Self {
        let parsed = Html::parse_fragment(html);
        let mut dom = Self::new();
        let root = dom.root();

        // html5ever wraps fragments in a synthetic <html> element
        let container = parsed.tree.root().children().find(|c| {
            matches!(c.value(), HtmlNode::Element(el) if el.name() == "html")
        });
        match container {
            Some(html_el) => dom.import_children(html_el, root),
            None => dom.import_children(parsed.tree.root(), root),
        }
        dom
    }

    fn import_children(&mut self, source: ego_tree::NodeRef<'_, HtmlNode>, parent: NodeId) {
        let mut stack: Vec<(ego_tree::NodeRef<'_, HtmlNode>, NodeId)> =
            source.children().rev().map(|c| (c, parent)).collect();

        while let Some((node, parent)) = stack.pop() {
            let data = match node.value() {
                HtmlNode::Element(el) => NodeData::Element(ElementData {
                    name: el.name().to_string(),
                    attrs: el
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                }),
                HtmlNode::Text(text) => NodeData::Text(String::from(&*text.text)),
                HtmlNode::Comment(comment) => {
                    NodeData::Comment(String::from(&*comment.comment))
                }
                _ => continue,
            };
            let is_element = matches!(data, NodeData::Element(_));
            let id = self.append(parent, data);
            if is_element {
                stack.extend(node.children().rev().map(|c| (c, id)));
            }
        }
    }

    /// Get the synthetic root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node's payload.
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    /// Get element data if the node is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Get the tag name if the node is an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.name.as_str())
    }

    /// Check if the node is an element with one of the given tag names.
    pub fn is_tag(&self, id: NodeId, names: &[&str]) -> bool {
        self.tag(id)
            .map(|t| names.iter().any(|n| t.eq_ignore_ascii_case(n)))
            .unwrap_or(false)
    }

    /// Get an attribute value.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    /// Get the class attribute, or an empty string.
    pub fn class(&self, id: NodeId) -> &str {
        self.attr(id, "class").unwrap_or("")
    }

    /// Get the text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Get the children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Element children of a node.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_some())
    }

    /// Ancestors from the parent upward, excluding the synthetic root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |p| self.parent(*p))
            .filter(move |p| *p != self.root())
    }

    /// All descendants in document order, excluding the node itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// The node itself (if it matches) followed by matching descendants.
    pub fn find_all<F>(&self, id: NodeId, mut pred: F) -> Vec<NodeId>
    where
        F: FnMut(&Dom, NodeId) -> bool,
    {
        let mut out = Vec::new();
        if pred(self, id) {
            out.push(id);
        }
        out.extend(
            self.descendants(id)
                .into_iter()
                .filter(|n| pred(self, *n)),
        );
        out
    }

    /// First element with one of the given tag names, searching the node and its descendants.
    pub fn find_tag(&self, id: NodeId, names: &[&str]) -> Option<NodeId> {
        if self.is_tag(id, names) {
            return Some(id);
        }
        self.descendants(id)
            .into_iter()
            .find(|n| self.is_tag(*n, names))
    }

    /// Append a new node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Detach a node (and its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Check if the node is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root() {
                return true;
            }
            match self.parent(current) {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    /// Replace an element with its children.
    pub fn unwrap(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent else {
            return;
        };
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        let siblings = &mut self.nodes[parent.0].children;
        if let Some(pos) = siblings.iter().position(|c| *c == id) {
            siblings.splice(pos..=pos, children);
        }
        self.nodes[id.0].parent = None;
    }

    /// Replace a node with a text node.
    pub fn replace_with_text(&mut self, id: NodeId, text: impl Into<String>) {
        let Some(parent) = self.nodes[id.0].parent else {
            return;
        };
        let new_id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data: NodeData::Text(text.into()),
            parent: Some(parent),
            children: Vec::new(),
        });
        let siblings = &mut self.nodes[parent.0].children;
        if let Some(pos) = siblings.iter().position(|c| *c == id) {
            siblings[pos] = new_id;
        }
        self.nodes[id.0].parent = None;
    }

    /// Overwrite the content of a text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let NodeData::Text(t) = &mut self.nodes[id.0].data {
            *t = text.into();
        }
    }

    /// Keep only attributes accepted by `keep`.
    pub fn retain_attrs<F>(&mut self, id: NodeId, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        if let Some(el) = self.element_mut(id) {
            el.attrs.retain(|(k, _)| keep(k));
        }
    }

    /// Set (or add) an attribute.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            let value = value.into();
            match el.attrs.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value,
                None => el.attrs.push((name.to_string(), value)),
            }
        }
    }

    /// Copy the subtree rooted at `src_id` of another tree under `parent`.
    pub fn import_subtree(&mut self, src: &Dom, src_id: NodeId, parent: NodeId) -> NodeId {
        let top = self.append(parent, src.data(src_id).clone());
        let mut stack: Vec<(NodeId, NodeId)> =
            src.children(src_id).iter().rev().map(|c| (*c, top)).collect();
        while let Some((node, parent)) = stack.pop() {
            let id = self.append(parent, src.data(node).clone());
            stack.extend(src.children(node).iter().rev().map(|c| (*c, id)));
        }
        top
    }

    /// Clone a subtree into a fresh tree; the copy is the root's only child.
    pub fn subtree(&self, id: NodeId) -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let root = dom.root();
        let copy = dom.import_subtree(self, id, root);
        (dom, copy)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(t) = self.text(id) {
            out.push_str(t);
        }
        for node in self.descendants(id) {
            if let Some(t) = self.text(node) {
                out.push_str(t);
            }
        }
        out
    }

    /// Text as rendered: line breaks at `<br>` and around block-level
    /// descendants, so adjacent blocks never run their words together.
    pub fn visible_text(&self, id: NodeId) -> String {
        enum Step {
            Open(NodeId),
            Close,
        }

        let mut out = String::new();
        if let Some(t) = self.text(id) {
            out.push_str(t);
        }
        let mut stack: Vec<Step> = self.children(id).iter().rev().map(|c| Step::Open(*c)).collect();
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(node) => match self.data(node) {
                    NodeData::Text(text) => out.push_str(text),
                    NodeData::Element(el) => {
                        if el.name == "br" {
                            out.push('\n');
                            continue;
                        }
                        if is_line_break_tag(&el.name) {
                            out.push('\n');
                            stack.push(Step::Close);
                        }
                        stack.extend(self.children(node).iter().rev().map(|c| Step::Open(*c)));
                    }
                    NodeData::Root | NodeData::Comment(_) => {}
                },
                Step::Close => out.push('\n'),
            }
        }
        out
    }

    /// Serialize the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.serialize_into(*child, &mut out);
        }
        out
    }

    /// Serialize a node including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_into(id, &mut out);
        out
    }

    fn serialize_into(&self, id: NodeId, out: &mut String) {
        enum Step {
            Open(NodeId),
            Close(NodeId),
        }

        let mut stack = vec![Step::Open(id)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(node) => match self.data(node) {
                    NodeData::Root => {
                        stack.extend(self.children(node).iter().rev().map(|c| Step::Open(*c)));
                    }
                    NodeData::Text(text) => {
                        let raw = self
                            .parent(node)
                            .map(|p| self.is_tag(p, &["script", "style"]))
                            .unwrap_or(false);
                        if raw {
                            out.push_str(text);
                        } else {
                            escape_text_into(text, out);
                        }
                    }
                    NodeData::Comment(comment) => {
                        out.push_str("<!--");
                        out.push_str(comment);
                        out.push_str("-->");
                    }
                    NodeData::Element(el) => {
                        out.push('<');
                        out.push_str(&el.name);
                        for (name, value) in &el.attrs {
                            out.push(' ');
                            out.push_str(name);
                            out.push_str("=\"");
                            escape_attr_into(value, out);
                            out.push('"');
                        }
                        out.push('>');
                        if VOID_ELEMENTS.contains(&el.name.as_str()) {
                            continue;
                        }
                        stack.push(Step::Close(node));
                        stack.extend(self.children(node).iter().rev().map(|c| Step::Open(*c)));
                    }
                },
                Step::Close(node) => {
                    if let Some(name) = self.tag(node) {
                        out.push_str("</");
                        out.push_str(name);
                        out.push('>');
                    }
                }
            }
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape the five markup-special characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn escape_text_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attr_into(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn is_line_break_tag(name: &str) -> bool {
    BLOCK_TAGS.contains(&name) || matches!(name, "td" | "th" | "tr" | "caption")
}
