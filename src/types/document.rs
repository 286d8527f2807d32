use std::fmt;
use std::str::FromStr;

use super::scalar::Scalar;
use crate::parse::ParseError;

/// Blocks whose inline form would exceed this many characters are written
/// one child per line.
const INLINE_WIDTH: usize = 80;

/// One entry of a configuration document.
///
/// Names are stored without their leading `/`. Values are stored in their
/// rendered, quoted form so a parsed document compares equal to the one it
/// was written from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `/name { children }`
    Block { name: String, children: Vec<Node> },
    /// `/name value`
    Property { name: String, value: String },
    /// A bare value inside a list block, e.g. `"*"` in `/virtualhosts`.
    Value(String),
    /// `$include "pattern"`
    Include(String),
}

impl Node {
    pub fn block(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Block {
            name: name.into(),
            children,
        }
    }

    pub fn property(name: impl Into<String>, value: &Scalar) -> Self {
        Node::Property {
            name: name.into(),
            value: value.render(),
        }
    }

    pub fn value(value: &Scalar) -> Self {
        Node::Value(value.render())
    }

    /// Name of a block or property; `None` for bare values and includes.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Block { name, .. } | Node::Property { name, .. } => Some(name),
            Node::Value(_) | Node::Include(_) => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Block { children, .. } => children,
            _ => &[],
        }
    }

    /// First direct child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.name() == Some(name))
    }

    /// Rendered value of a property, or of a bare value.
    #[must_use]
    pub fn rendered_value(&self) -> Option<&str> {
        match self {
            Node::Property { value, .. } | Node::Value(value) | Node::Include(value) => {
                Some(value)
            }
            Node::Block { .. } => None,
        }
    }

    fn inline(children: &[Node]) -> Option<String> {
        if children.is_empty() {
            return None;
        }
        let mut parts = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Node::Property { name, value } => parts.push(format!("/{name} {value}")),
                _ => return None,
            }
        }
        let line = parts.join(" ");
        (line.len() <= INLINE_WIDTH).then_some(line)
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Node::Block { name, children } => {
                if children.is_empty() {
                    return writeln!(f, "{pad}/{name} {{ }}");
                }
                if let Some(line) = Self::inline(children) {
                    return writeln!(f, "{pad}/{name} {{ {line} }}");
                }
                writeln!(f, "{pad}/{name} {{")?;
                for child in children {
                    child.write(f, depth + 1)?;
                }
                writeln!(f, "{pad}}}")
            }
            Node::Property { name, value } => writeln!(f, "{pad}/{name} {value}"),
            Node::Value(value) => writeln!(f, "{pad}{value}"),
            Node::Include(pattern) => writeln!(f, "{pad}$include {pattern}"),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, 0)
    }
}

/// A complete configuration document: a sequence of top-level nodes.
///
/// `Display` writes the canonical text form: two-space indentation, short
/// property-only blocks on one line, trailing newline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    #[must_use]
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// First top-level node with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name() == Some(name))
    }

    /// Walk a `/`-separated path of block names, e.g. `"aem-site/cache/rules"`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Node> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let mut node = self.get(segments.next()?)?;
        for segment in segments {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Read and parse a configuration file, e.g. a previously written farm.
    ///
    /// # Errors
    ///
    /// Returns [`DispatcherError`](crate::DispatcherError) on I/O or parse failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::DispatcherError> {
        let input = std::fs::read_to_string(path)?;
        Ok(input.parse()?)
    }

    /// BLAKE3 digest of the canonical text.
    #[cfg(feature = "digest")]
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        *blake3::hash(self.to_string().as_bytes()).as_bytes()
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse(s)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            node.write(f, 0)?;
        }
        Ok(())
    }
}
