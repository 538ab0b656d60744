//! # Document Tree
//!
//! Owned document/element tree for protocol messages.
//!
//! Elements constructed with a namespace URI always carry the matching
//! `xmlns`/`xmlns:prefix` declaration; callers never manage declaration
//! attributes by hand. The tree is mutated only through explicit calls,
//! never shared mutably across threads.

/// Name of the default namespace declaration attribute
pub const XMLNS_ATTRIBUTE: &str = "xmlns";

/// A single element attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as written (`xmlns:nc`, `message-id`, ...)
    pub name: String,
    /// Attribute value
    pub value: String,
}

/// A child node of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Character data; adjacent text is always coalesced
    Text(String),
}

/// An XML element
///
/// Carries its qualified name as written, the resolved namespace URI (when
/// bound), attributes in document order, and child nodes in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: Option<String>,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    /// Create an element with no namespace
    pub fn new(qname: impl Into<String>) -> Self {
        Self {
            name: qname.into(),
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a namespace-qualified element
    ///
    /// The element carries the namespace URI and the matching declaration
    /// attribute: `xmlns:prefix` when the qualified name has a prefix,
    /// plain `xmlns` otherwise.
    pub fn with_namespace(qname: impl Into<String>, namespace_uri: impl Into<String>) -> Self {
        let mut element = Self::new(qname);
        let uri = namespace_uri.into();
        let declaration = match element.prefix() {
            Some(prefix) => format!("{XMLNS_ATTRIBUTE}:{prefix}"),
            None => XMLNS_ATTRIBUTE.to_string(),
        };
        element.set_attribute(declaration, uri.clone());
        element.namespace = Some(uri);
        element
    }

    /// Create an element holding a single text child
    pub fn text_element(
        qname: impl Into<String>,
        namespace_uri: Option<&str>,
        content: impl Into<String>,
    ) -> Self {
        let mut element = match namespace_uri {
            Some(uri) => Self::with_namespace(qname, uri),
            None => Self::new(qname),
        };
        element.append_text(content);
        element
    }

    /// Create a text element whose content is itself a qualified name
    ///
    /// The content is encoded as `prefix:content` and the element declares
    /// `xmlns:prefix` bound to `prefix_namespace`, so the content prefix
    /// resolves for any consumer of the serialized form.
    pub fn text_element_with_namespaced_content(
        qname: impl Into<String>,
        namespace_uri: Option<&str>,
        prefix: &str,
        prefix_namespace: &str,
        content: &str,
    ) -> Self {
        let mut element = Self::text_element(qname, namespace_uri, prefixed_value(prefix, content));
        element.set_attribute(
            prefixed_value(XMLNS_ATTRIBUTE, prefix),
            prefix_namespace.to_string(),
        );
        element
    }

    pub(crate) fn from_parts(
        name: String,
        namespace: Option<String>,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self {
            name,
            namespace,
            attributes,
            children: Vec::new(),
        }
    }

    /// Qualified name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local part of the qualified name
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Namespace prefix, if the qualified name carries one
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Resolved namespace URI
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Set or replace an attribute
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Look up an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Attributes in document order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Append a child element
    pub fn append_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append character data, coalescing with a trailing text node
    pub fn append_text(&mut self, text: impl Into<String>) {
        if let Some(Node::Text(existing)) = self.children.last_mut() {
            existing.push_str(&text.into());
        } else {
            self.children.push(Node::Text(text.into()));
        }
    }

    /// Child nodes in document order
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements in document order
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First child element with the given local name
    pub fn child(&self, local_name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.local_name() == local_name)
    }

    /// Concatenated direct text content
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let Node::Text(text) = node {
                out.push_str(text);
            }
        }
        out
    }
}

/// Encode a `prefix:value` pair
pub fn prefixed_value(prefix: &str, value: &str) -> String {
    format!("{prefix}:{value}")
}

/// An XML document owning its element tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    root: Option<Element>,
}

impl Document {
    /// Create an empty document for programmatic construction
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Create a document rooted at the given element
    pub fn with_root(root: Element) -> Self {
        Self { root: Some(root) }
    }

    /// Root element, if one has been attached
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Mutable root element
    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.root.as_mut()
    }

    /// Attach or replace the root element
    pub fn set_root(&mut self, root: Element) {
        self.root = Some(root);
    }

    /// Produce a fully independent copy of this document
    ///
    /// The copy shares no nodes with the original; mutating one never
    /// affects the other.
    pub fn deep_copy(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_with_namespace_declares_xmlns() {
        let element = Element::with_namespace("rpc", "urn:test:ns");
        assert_eq!(element.namespace(), Some("urn:test:ns"));
        assert_eq!(element.attribute("xmlns"), Some("urn:test:ns"));
    }

    #[test]
    fn test_prefixed_element_declares_prefixed_xmlns() {
        let element = Element::with_namespace("nc:rpc", "urn:test:ns");
        assert_eq!(element.prefix(), Some("nc"));
        assert_eq!(element.local_name(), "rpc");
        assert_eq!(element.attribute("xmlns:nc"), Some("urn:test:ns"));
        assert_eq!(element.attribute("xmlns"), None);
    }

    #[test]
    fn test_text_element_content() {
        let element = Element::text_element("capability", None, "urn:cap:1");
        assert_eq!(element.text(), "urn:cap:1");
        assert!(element.child_elements().next().is_none());
    }

    #[test]
    fn test_namespaced_content_declares_content_prefix() {
        let element = Element::text_element_with_namespaced_content(
            "type",
            Some("urn:outer"),
            "pfx",
            "urn:inner",
            "my-type",
        );
        assert_eq!(element.text(), "pfx:my-type");
        assert_eq!(element.attribute("xmlns"), Some("urn:outer"));
        assert_eq!(element.attribute("xmlns:pfx"), Some("urn:inner"));
    }

    #[test]
    fn test_append_text_coalesces_adjacent_text() {
        let mut element = Element::new("data");
        element.append_text("a");
        element.append_text("b");
        assert_eq!(element.children().len(), 1);
        assert_eq!(element.text(), "ab");
    }

    #[test]
    fn test_set_attribute_replaces_existing() {
        let mut element = Element::new("rpc");
        element.set_attribute("message-id", "1");
        element.set_attribute("message-id", "2");
        assert_eq!(element.attributes().len(), 1);
        assert_eq!(element.attribute("message-id"), Some("2"));
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut root = Element::new("config");
        root.append_child(Element::text_element("item", None, "one"));
        let original = Document::with_root(root);

        let mut copy = original.deep_copy();
        copy.root_mut()
            .unwrap()
            .append_child(Element::text_element("item", None, "two"));

        assert_eq!(original.root().unwrap().child_elements().count(), 1);
        assert_eq!(copy.root().unwrap().child_elements().count(), 2);
    }

    #[test]
    fn test_prefixed_value() {
        assert_eq!(prefixed_value("nc", "get-config"), "nc:get-config");
    }
}
