//! Hierarchy nodes and the leaf-download jobs created from them
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Weak};
use url::Url;

/// Level of a node in the jurisdiction hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of a crawl target (one state in one mode)
    State,

    /// Title, division or similar top-level grouping
    Division,

    /// Chapter, article, part: any grouping below a division
    Chapter,

    /// A single document (section or rule)
    Leaf,
}

impl NodeKind {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// Kind assigned to a non-leaf child of a node of this kind
    ///
    /// The site nests chapters inside chapters to arbitrary depth, so
    /// `Chapter` maps to itself.
    pub fn next_branch(&self) -> Self {
        match self {
            Self::State => Self::Division,
            Self::Division | Self::Chapter => Self::Chapter,
            Self::Leaf => Self::Leaf,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Division => "division",
            Self::Chapter => "chapter",
            Self::Leaf => "leaf",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A child link as reported by a page parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildNode {
    pub url: Url,
    pub name: String,
    pub kind: NodeKind,
}

/// An element of the hierarchy being walked
///
/// Nodes only live while the walker expands their subtree; `parent` is a weak
/// reference so that a finished subtree is freed even if a job still holds one
/// of its leaves.
#[derive(Debug, Clone)]
pub struct Node {
    pub url: Url,
    pub kind: NodeKind,
    /// Link text, used for logs
    pub name: String,
    /// Names from the root down to this node; drives the destination path
    pub path_segments: Vec<String>,
    parent: Option<Weak<Node>>,
}

impl Node {
    /// Creates the root node of a crawl target
    pub fn root(url: Url, name: impl Into<String>, segment: impl Into<String>) -> Self {
        Self {
            url,
            kind: NodeKind::State,
            name: name.into(),
            path_segments: vec![segment.into()],
            parent: None,
        }
    }

    /// Creates a child of `parent` stored under `segment`
    ///
    /// Segments must be unique among siblings; the walker assigns them with
    /// `storage::layout::SiblingSegments`.
    pub fn child_at(parent: &Arc<Node>, child: ChildNode, segment: String) -> Self {
        let mut path_segments = Vec::with_capacity(parent.path_segments.len() + 1);
        path_segments.extend(parent.path_segments.iter().cloned());
        path_segments.push(segment);

        Self {
            url: child.url,
            kind: child.kind,
            name: child.name,
            path_segments,
            parent: Some(Arc::downgrade(parent)),
        }
    }

    /// Returns the parent while its subtree is still being expanded
    pub fn parent(&self) -> Option<Arc<Node>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Distance from the crawl root (the root itself is at depth 0)
    pub fn depth(&self) -> usize {
        self.path_segments.len() - 1
    }

    /// Re-classifies a node whose page turned out to be a document
    pub fn into_leaf(mut self) -> Self {
        self.kind = NodeKind::Leaf;
        self
    }

    /// Re-classifies a leaf whose page turned out to be a listing
    ///
    /// The path segments are kept, so the subtree lands in a directory named
    /// after the segment the leaf file would have used.
    pub fn into_branch(mut self) -> Self {
        self.kind = NodeKind::Chapter;
        self
    }
}

/// One leaf document to fetch and persist
#[derive(Debug)]
pub struct Job {
    pub node: Node,
    pub destination: PathBuf,
    pub attempt_count: u32,
}

impl Job {
    pub fn new(node: Node, destination: PathBuf) -> Self {
        Self {
            node,
            destination,
            attempt_count: 0,
        }
    }

    pub fn url(&self) -> &Url {
        &self.node.url
    }
}
