use std::borrow::Cow;
use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::decode::{self, Decode};
use crate::field;
use crate::Result;

/// An ordered set of element nodes that selector queries search within.
///
/// A scope with no nodes is valid and means nothing was found. Scopes only
/// borrow the parsed tree, so narrowing one never touches the document.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    nodes: Vec<ElementRef<'a>>,
    // Only true for a whole-document scope, where the root element itself
    // can match (`html`, `html > body`, ...).
    inclusive: bool,
}

impl<'a> Scope<'a> {
    pub fn new(nodes: Vec<ElementRef<'a>>) -> Self {
        let mut seen = HashSet::new();
        let nodes = nodes.into_iter().filter(|n| seen.insert(n.id())).collect();
        Self {
            nodes,
            inclusive: false,
        }
    }

    pub fn empty() -> Self {
        Self {
            nodes: vec![],
            inclusive: false,
        }
    }

    /// Scope covering a whole parsed document or fragment.
    pub fn document(html: &'a Html) -> Self {
        Self {
            nodes: vec![html.root_element()],
            inclusive: true,
        }
    }

    pub fn nodes(&self) -> &[ElementRef<'a>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<ElementRef<'a>> {
        self.nodes.first().copied()
    }

    /// Descendants of every node in this scope matching `selector`, in
    /// document order per root and without duplicates.
    ///
    /// A selector that does not parse matches nothing.
    pub fn find(&self, selector: &str) -> Scope<'a> {
        if selector.trim().is_empty() {
            return Scope::empty();
        }
        let compiled = match Selector::parse(selector) {
            Ok(compiled) => compiled,
            Err(error) => {
                warn!(selector, ?error, "unparsable selector matches nothing");
                return Scope::empty();
            }
        };

        let mut seen = HashSet::new();
        let mut found = vec![];
        for root in &self.nodes {
            if self.inclusive && compiled.matches(root) && seen.insert(root.id()) {
                found.push(*root);
            }
            for node in root.select(&compiled) {
                if node.id() != root.id() && seen.insert(node.id()) {
                    found.push(node);
                }
            }
        }
        Scope {
            nodes: found,
            inclusive: false,
        }
    }

    /// `find(selector)`, or this scope unchanged when the selector is empty.
    pub fn narrow(&self, selector: &str) -> Cow<'_, Scope<'a>> {
        if selector.is_empty() {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.find(selector))
        }
    }

    /// Trimmed text (or the `attr` attribute) of the first node, empty when
    /// there is no such node or attribute.
    pub fn value(&self, attr: &str) -> String {
        field::extract_value(self, attr)
    }

    pub fn child_text(&self, selector: &str) -> String {
        self.find(selector)
            .nodes
            .iter()
            .map(|node| node_text(*node))
            .collect::<String>()
            .trim()
            .to_string()
    }

    pub fn child_texts(&self, selector: &str) -> Vec<String> {
        self.find(selector)
            .nodes
            .iter()
            .map(|node| node_text(*node).trim().to_string())
            .collect()
    }

    pub fn child_attr(&self, selector: &str, name: &str) -> String {
        self.find(selector)
            .nodes
            .iter()
            .find_map(|node| node_attr(*node, name))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    pub fn child_attrs(&self, selector: &str, name: &str) -> Vec<String> {
        self.find(selector)
            .nodes
            .iter()
            .filter_map(|node| node_attr(*node, name))
            .map(|value| value.trim().to_string())
            .collect()
    }

    /// Decodes into `dest` using this scope's own nodes as the search root.
    pub fn decode_into<T: Decode>(&self, dest: &mut T) -> Result<()> {
        decode::decode(dest, self)
    }

    pub fn decode<T: Decode + Default>(&self) -> Result<T> {
        let mut dest = T::default();
        self.decode_into(&mut dest)?;
        Ok(dest)
    }
}

impl<'a> From<ElementRef<'a>> for Scope<'a> {
    fn from(node: ElementRef<'a>) -> Self {
        Self {
            nodes: vec![node],
            inclusive: false,
        }
    }
}

/// Concatenated text of the node and all of its descendants.
pub fn node_text(node: ElementRef<'_>) -> String {
    node.text().collect()
}

pub fn node_attr<'a>(node: ElementRef<'a>, name: &str) -> Option<&'a str> {
    node.value().attr(name)
}
