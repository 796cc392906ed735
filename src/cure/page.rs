//! Mutable document tree
//!
//! Thin boundary over a kuchiki document exposing only what curing needs:
//! find-all-by-tag, attribute read/write, insert-sibling-with-raw-content,
//! remove, and serialize.
//!
//! kuchiki nodes are `Rc`-based, so a `Page` and its `Element` handles never
//! leave the task that parsed them. Every mutation below is synchronous; units
//! of work running concurrently on that task can only interleave at their
//! `.await` points, never inside a mutation.

use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

use super::errors::CureError;

/// Parsed HTML document owned by the orchestrator for one cure
pub struct Page {
    document: NodeRef,
}

/// Handle to one element of a `Page`
pub struct Element {
    node: NodeDataRef<ElementData>,
}

impl Page {
    /// Parse a full HTML document. html5ever recovers from any input, so this
    /// cannot fail.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            document: kuchiki::parse_html().one(html),
        }
    }

    /// All elements with the given tag name, in document order
    ///
    /// Nodes are collected before being handed out because units detach them,
    /// which would invalidate a live iterator.
    #[must_use]
    pub fn find_all(&self, tag: &str) -> Vec<Element> {
        match self.document.select(tag) {
            Ok(matches) => matches.map(|node| Element { node }).collect(),
            Err(()) => {
                log::warn!("Invalid tag selector: {tag}");
                Vec::new()
            }
        }
    }

    /// Serialize the whole tree back to HTML
    ///
    /// # Errors
    ///
    /// Returns `CureError::Serialization` if writing fails or the output is not UTF-8.
    pub fn serialize(&self) -> Result<String, CureError> {
        let mut html_output = Vec::new();
        self.document
            .serialize(&mut html_output)
            .map_err(|e| CureError::Serialization(e.to_string()))?;

        String::from_utf8(html_output).map_err(|e| CureError::Serialization(e.to_string()))
    }
}

impl Element {
    /// Lowercase tag name
    #[must_use]
    pub fn tag(&self) -> String {
        self.node.name.local.to_string()
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        self.node.attributes.borrow().get(name).map(str::to_string)
    }

    pub fn set_attr(&self, name: &str, value: String) {
        self.node.attributes.borrow_mut().insert(name, value);
    }

    /// Insert `<tag>content</tag>` as the next sibling of this element
    ///
    /// `content` becomes a single text child and is not parsed as markup.
    /// Returns `false` if the element could not be built.
    pub fn insert_after_raw(&self, tag: &str, content: &str) -> bool {
        let Some(sibling) = raw_text_element(tag, content) else {
            return false;
        };
        self.node.as_node().insert_after(sibling);
        true
    }

    /// Detach this element (and its subtree) from the document
    pub fn remove(&self) {
        self.node.as_node().detach();
    }
}

/// Build a detached `<tag>` element holding one text node
fn raw_text_element(tag: &str, content: &str) -> Option<NodeRef> {
    let holder = kuchiki::parse_html().one(format!("<{tag}></{tag}>"));
    let element = holder.select_first(tag).ok()?;
    let node = element.as_node().clone();
    node.detach();
    node.append(NodeRef::new_text(content));
    Some(node)
}
