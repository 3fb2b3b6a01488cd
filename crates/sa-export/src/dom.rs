//! A small mutable SVG/XML tree.
//!
//! `roxmltree` does the parsing; its read-only nodes are copied into owned
//! [`Element`]s the exporters can rewrite. Attribute values and text are
//! stored unescaped and escaped again on output. Everything before the root
//! element (XML declaration, doctype, leading comments) is kept verbatim as
//! one [`Node::Raw`] chunk. Namespace declarations are written back on the
//! element that introduced them.

use crate::error::{ExportError, ExportResult};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    /// Markup written out verbatim.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Everything before the root element.
    pub prolog: Vec<Node>,
    pub root: Element,
}

// ─── Parsing ─────────────────────────────────────────────────────────────

/// Parse an SVG document.
pub fn parse(source: &str) -> ExportResult<Document> {
    let source = source.trim_start_matches('\u{feff}');
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(source, options).map_err(|err| match err {
        roxmltree::Error::NoRootNode => ExportError::NoRootElement,
        err => ExportError::parse(byte_offset(source, err.pos()), err.to_string()),
    })?;

    let root = doc.root_element();
    let prolog = source[..root.range().start].trim();
    Ok(Document {
        prolog: if prolog.is_empty() {
            Vec::new()
        } else {
            vec![Node::Raw(prolog.to_string())]
        },
        root: element(root),
    })
}

fn element(node: roxmltree::Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let mut attrs = declared_namespaces(node);
    attrs.extend(node.attributes().map(|a| {
        (
            qualified_name(node, a.namespace(), a.name()),
            a.value().to_string(),
        )
    }));
    Element {
        name: qualified_name(node, tag.namespace(), tag.name()),
        attrs,
        children: node.children().filter_map(convert).collect(),
    }
}

fn convert(node: roxmltree::Node<'_, '_>) -> Option<Node> {
    match node.node_type() {
        roxmltree::NodeType::Element => Some(Node::Element(element(node))),
        roxmltree::NodeType::Text => node.text().map(|t| Node::Text(t.to_string())),
        roxmltree::NodeType::Comment => node.text().map(|t| Node::Comment(t.to_string())),
        roxmltree::NodeType::PI => node.pi().map(|pi| {
            Node::Raw(match pi.value {
                Some(value) => format!("<?{} {value}?>", pi.target),
                None => format!("<?{}?>", pi.target),
            })
        }),
        roxmltree::NodeType::Root => None,
    }
}

/// `prefix:local`, or just `local` for unprefixed names.
fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

/// `xmlns` attributes for the namespaces this element adds to its scope.
fn declared_namespaces(node: roxmltree::Node<'_, '_>) -> Vec<(String, String)> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();
    node.namespaces()
        .filter(|ns| ns.uri() != XML_NAMESPACE && !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| {
            let key = match ns.name() {
                Some(prefix) => format!("xmlns:{prefix}"),
                None => "xmlns".to_string(),
            };
            (key, ns.uri().to_string())
        })
        .collect()
}

/// Byte offset of a 1-based row/column position.
fn byte_offset(source: &str, pos: roxmltree::TextPos) -> usize {
    let row = pos.row.saturating_sub(1) as usize;
    let line_start: usize = source.split_inclusive('\n').take(row).map(str::len).sum();
    let column: usize = source[line_start.min(source.len())..]
        .chars()
        .take(pos.col.saturating_sub(1) as usize)
        .map(char::len_utf8)
        .sum();
    line_start + column
}

// ─── Escaping ────────────────────────────────────────────────────────────

/// Escape a value for use inside a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape character data.
pub fn escape_text(value: &str) -> String {
    value.replace('&', "&amp;").replace('<', "&lt;")
}

// ─── Tree access ─────────────────────────────────────────────────────────

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute. Existing attributes keep their position.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((key.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(idx).1)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let classes = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr("class", &classes);
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn element_children_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Depth-first search, this element included.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.element_children().find_map(|e| e.find(pred))
    }

    /// Depth-first search, this element included.
    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Node::Element(e) = child {
                if let Some(found) = e.find_mut(pred) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Visit this element and every descendant element, parents first.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        f(self);
        for child in self.element_children_mut() {
            child.walk_mut(f);
        }
    }

    pub fn prepend_child(&mut self, node: Node) {
        self.children.insert(0, node);
    }

    /// Insert `nodes` ahead of the existing children, keeping their order.
    pub fn prepend_children(&mut self, nodes: Vec<Node>) {
        let tail = std::mem::replace(&mut self.children, nodes);
        self.children.extend(tail);
    }

    pub fn push_child(&mut self, node: Node) {
        self.children.push(node);
    }

    // ─── Serialization ───────────────────────────────────────────────────

    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

impl Node {
    pub fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(e) => e.write_to(out),
            Node::Text(t) => out.push_str(&escape_text(t)),
            Node::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            Node::Raw(r) => out.push_str(r),
        }
    }
}

impl Document {
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        for node in &self.prolog {
            node.write_to(&mut out);
        }
        self.root.write_to(&mut out);
        out
    }
}
