//! Structural encode/decode between a live graph and its document.
//!
//! Encoding is strict: a node referencing a catalog entry that no longer
//! exists is a hard error (the graph could never have been built that way).
//! Decoding is best-effort: malformed records, unresolvable catalog
//! references, and dangling link endpoints are logged, counted in the
//! `LoadReport`, and skipped; everything else loads.

use pf_catalog::Catalog;
use pf_core::NodeId;
use pf_graph::{Graph, Node, NodeKind, PinRef, Pos};
use tracing::warn;

use crate::schema::{EndpointDoc, GraphDoc, LinkDoc, NodeDoc, NodeKindDoc, PosDoc};
use crate::{ProjectError, ProjectResult};

/// Counters surfaced to the caller after a best-effort load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub skipped_nodes: usize,
    pub skipped_links: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_nodes == 0 && self.skipped_links == 0
    }

    fn absorb(&mut self, nested: LoadReport) {
        self.skipped_nodes += nested.skipped_nodes;
        self.skipped_links += nested.skipped_links;
    }
}

/// Snapshot a graph into its document form.
pub fn encode_graph(graph: &Graph, catalog: &Catalog) -> ProjectResult<GraphDoc> {
    let mut doc = GraphDoc::default();

    for node in graph.nodes() {
        let kind = match &node.kind {
            NodeKind::Input(input) => NodeKindDoc::Input { value: input.value },
            NodeKind::Output(_) => NodeKindDoc::Output,
            NodeKind::Part(part) => {
                let name = catalog
                    .part(part.part)
                    .map(|p| p.name.clone())
                    .ok_or_else(|| ProjectError::Encode {
                        what: format!("part index {} not in catalog", part.part),
                    })?;
                NodeKindDoc::Part {
                    name,
                    input_count: node.inputs().len() as u32,
                    ratios: part.out_ratios.clone(),
                }
            }
            NodeKind::Recipe(recipe) => {
                let id = catalog
                    .recipe(recipe.recipe)
                    .map(|r| r.id)
                    .ok_or_else(|| ProjectError::Encode {
                        what: format!("recipe index {} not in catalog", recipe.recipe),
                    })?;
                NodeKindDoc::Recipe { recipe_id: id }
            }
            NodeKind::Balance(balance) => NodeKindDoc::Balance {
                values: balance.values.clone(),
            },
            NodeKind::Composite(composite) => NodeKindDoc::Composite {
                name: composite.name.clone(),
                graph: encode_graph(composite.graph(), catalog)?,
            },
        };
        let record = NodeDoc {
            id: node.id.index(),
            pos: PosDoc {
                x: node.pos.x,
                y: node.pos.y,
            },
            kind,
        };
        doc.nodes.push(serde_json::to_value(&record)?);
    }

    for link in graph.links() {
        let record = LinkDoc {
            left: EndpointDoc {
                node_id: link.from.node.index(),
                pin: link.from.pin.clone(),
            },
            right: EndpointDoc {
                node_id: link.to.node.index(),
                pin: link.to.pin.clone(),
            },
        };
        doc.links.push(serde_json::to_value(&record)?);
    }

    Ok(doc)
}

/// Rebuild a graph from its document, skipping what cannot be resolved.
pub fn decode_graph(doc: &GraphDoc, catalog: &Catalog) -> (Graph, LoadReport) {
    let mut graph = Graph::new();
    let mut report = LoadReport::default();

    for raw in &doc.nodes {
        let record: NodeDoc = match serde_json::from_value(raw.clone()) {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "skipping malformed node record");
                report.skipped_nodes += 1;
                continue;
            }
        };

        let id = NodeId::from_index(record.id);
        let pos = Pos::new(record.pos.x, record.pos.y);
        let node = match record.kind {
            NodeKindDoc::Input { value } => Node::input(id, pos, value),
            NodeKindDoc::Output => Node::output(id, pos),
            NodeKindDoc::Part {
                name,
                input_count,
                ratios,
            } => match catalog.find_part(&name) {
                Some(part) => Node::part(id, pos, part, input_count, ratios),
                None => {
                    warn!(node = record.id, part = %name, "part not in catalog, skipping node");
                    report.skipped_nodes += 1;
                    continue;
                }
            },
            NodeKindDoc::Recipe { recipe_id } => match catalog.find_recipe(recipe_id) {
                Some(recipe) => match Node::recipe(id, pos, recipe, catalog) {
                    Ok(node) => node,
                    Err(err) => {
                        warn!(node = record.id, %err, "skipping unbuildable recipe node");
                        report.skipped_nodes += 1;
                        continue;
                    }
                },
                None => {
                    warn!(node = record.id, recipe = recipe_id, "recipe not in catalog, skipping node");
                    report.skipped_nodes += 1;
                    continue;
                }
            },
            NodeKindDoc::Balance { values } => Node::balance(id, pos, values),
            NodeKindDoc::Composite { name, graph: nested } => {
                let (nested_graph, nested_report) = decode_graph(&nested, catalog);
                report.absorb(nested_report);
                Node::composite(id, pos, name, nested_graph)
            }
        };

        if let Err(err) = graph.insert(node) {
            warn!(node = record.id, %err, "skipping duplicate node id");
            report.skipped_nodes += 1;
        }
    }

    for raw in &doc.links {
        let record: LinkDoc = match serde_json::from_value(raw.clone()) {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "skipping malformed link record");
                report.skipped_links += 1;
                continue;
            }
        };

        let from = PinRef::new(NodeId::from_index(record.left.node_id), record.left.pin);
        let to = PinRef::new(NodeId::from_index(record.right.node_id), record.right.pin);
        if let Err(err) = graph.connect(from, to) {
            warn!(%err, "skipping unresolvable link");
            report.skipped_links += 1;
        }
    }

    (graph, report)
}
