//! Stable tags for the node variant set.
//!
//! Tags are the on-disk `type` strings of the persistence schema; keeping
//! the mapping here means every save/load exercises it and a new variant
//! fails to compile until it is registered.

use std::fmt;

use crate::node::NodeKind;

/// Stable identifier for a node variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Input,
    Output,
    Part,
    Recipe,
    Balance,
    Composite,
}

impl NodeTag {
    pub const ALL: [NodeTag; 6] = [
        NodeTag::Input,
        NodeTag::Output,
        NodeTag::Part,
        NodeTag::Recipe,
        NodeTag::Balance,
        NodeTag::Composite,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeTag::Input => "input",
            NodeTag::Output => "output",
            NodeTag::Part => "part",
            NodeTag::Recipe => "recipe",
            NodeTag::Balance => "balance",
            NodeTag::Composite => "composite",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == s)
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Input(_) => NodeTag::Input,
            NodeKind::Output(_) => NodeTag::Output,
            NodeKind::Part(_) => NodeTag::Part,
            NodeKind::Recipe(_) => NodeTag::Recipe,
            NodeKind::Balance(_) => NodeTag::Balance,
            NodeKind::Composite(_) => NodeTag::Composite,
        }
    }
}
