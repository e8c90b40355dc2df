//! Graph persistence schema.
//!
//! A document holds two ordered collections, `nodes` and `links`. Node and
//! link records are kept as raw JSON values at the document level so a load
//! can skip a single malformed record instead of failing the whole file;
//! `NodeDoc`/`LinkDoc` are the typed shapes each record is decoded into.

use serde::{Deserialize, Serialize};

/// Whole-graph document. Nested recursively by composite nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GraphDoc {
    #[serde(default)]
    pub nodes: Vec<serde_json::Value>,
    #[serde(default)]
    pub links: Vec<serde_json::Value>,
}

/// One node record: stable id, canvas position, tagged variant fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDoc {
    pub id: u32,
    #[serde(default)]
    pub pos: PosDoc,
    #[serde(flatten)]
    pub kind: NodeKindDoc,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PosDoc {
    pub x: f64,
    pub y: f64,
}

/// Variant-specific persisted fields. The `type` tag strings are the
/// stable registry tags of `pf_graph::NodeTag`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKindDoc {
    Input {
        value: f64,
    },
    Output,
    Part {
        name: String,
        input_count: u32,
        ratios: Vec<f64>,
    },
    Recipe {
        recipe_id: i64,
    },
    Balance {
        values: Vec<f64>,
    },
    Composite {
        name: String,
        graph: GraphDoc,
    },
}

/// One link record: producer output pin -> consumer input pin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkDoc {
    pub left: EndpointDoc,
    pub right: EndpointDoc,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointDoc {
    pub node_id: u32,
    pub pin: String,
}
