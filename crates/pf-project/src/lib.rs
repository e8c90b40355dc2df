//! pf-project: structural graph persistence.
//!
//! One schema, two codecs (JSON and YAML). Saving is strict; loading is
//! best-effort per record, with skips counted in a `LoadReport` so callers
//! can surface partial degradation instead of failing the whole file.

pub mod codec;
pub mod schema;

use std::path::Path;

use pf_catalog::Catalog;
use pf_graph::Graph;

pub use codec::{LoadReport, decode_graph, encode_graph};
pub use schema::{EndpointDoc, GraphDoc, LinkDoc, NodeDoc, NodeKindDoc, PosDoc};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Encode error: {what}")]
    Encode { what: String },
}

pub fn load_json(path: &Path, catalog: &Catalog) -> ProjectResult<(Graph, LoadReport)> {
    let content = std::fs::read_to_string(path)?;
    let doc: GraphDoc = serde_json::from_str(&content)?;
    Ok(decode_graph(&doc, catalog))
}

pub fn save_json(path: &Path, graph: &Graph, catalog: &Catalog) -> ProjectResult<()> {
    let doc = encode_graph(graph, catalog)?;
    let content = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_yaml(path: &Path, catalog: &Catalog) -> ProjectResult<(Graph, LoadReport)> {
    let content = std::fs::read_to_string(path)?;
    let doc: GraphDoc = serde_yaml::from_str(&content)?;
    Ok(decode_graph(&doc, catalog))
}

pub fn save_yaml(path: &Path, graph: &Graph, catalog: &Catalog) -> ProjectResult<()> {
    let doc = encode_graph(graph, catalog)?;
    let content = serde_yaml::to_string(&doc)?;
    std::fs::write(path, content)?;
    Ok(())
}
