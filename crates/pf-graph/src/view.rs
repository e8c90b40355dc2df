//! Display hook for the excluded UI layer.
//!
//! The core never draws. Instead each node can be rendered into a
//! `NodeView`: its title, balance phase, and the ordered list of fields the
//! UI should show (and which of them are editable). The UI maps editable
//! fields back to the typed edit entry points on `Graph`.

use pf_catalog::Catalog;
use pf_core::{NodeId, Real};

use crate::graph::Graph;
use crate::node::NodeKind;
use crate::registry::NodeTag;

/// Balance progress of a node, derived from its accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BalancePhase {
    /// No constraints pending, no completed balance.
    Idle,
    /// Constraints received for some but not all connected output pins;
    /// the displayed value would be stale, show progress instead.
    Pending { received: usize, expected: usize },
    /// Last balance completed with total throughput J.
    Balanced(Real),
}

/// One displayable field of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub label: String,
    pub value: Real,
    pub editable: bool,
}

impl FieldView {
    fn editable(label: impl Into<String>, value: Real) -> Self {
        Self {
            label: label.into(),
            value,
            editable: true,
        }
    }

    fn readonly(label: impl Into<String>, value: Real) -> Self {
        Self {
            label: label.into(),
            value,
            editable: false,
        }
    }
}

/// Render model for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub tag: NodeTag,
    pub title: String,
    pub phase: BalancePhase,
    pub fields: Vec<FieldView>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Build the render model for a node. Returns None if the node is absent.
pub fn node_view(graph: &Graph, catalog: &Catalog, id: NodeId) -> Option<NodeView> {
    let node = graph.node(id)?;

    let phase = if node.has_pending() {
        BalancePhase::Pending {
            received: node.pending_received(),
            expected: graph.connected_outputs(id).len(),
        }
    } else if let Some(j) = node.balanced() {
        BalancePhase::Balanced(j)
    } else {
        BalancePhase::Idle
    };

    let (title, fields) = match &node.kind {
        NodeKind::Input(input) => ("Input".to_string(), vec![FieldView::editable("value", input.value)]),
        NodeKind::Output(_) => ("Output".to_string(), Vec::new()),
        NodeKind::Part(part) => {
            let title = catalog
                .part(part.part)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "Part".to_string());
            let fields = part
                .out_ratios
                .iter()
                .enumerate()
                .map(|(i, r)| FieldView::editable(format!("ratio out{}", i + 1), *r))
                .collect();
            (title, fields)
        }
        NodeKind::Recipe(recipe) => {
            let (title, fields) = match catalog.recipe(recipe.recipe) {
                Some(def) => {
                    let mut fields = Vec::new();
                    for ing in &def.inputs {
                        fields.push(FieldView::readonly(format!("in {}", ing.part), ing.quantity));
                    }
                    for ing in &def.outputs {
                        fields.push(FieldView::readonly(format!("out {}", ing.part), ing.quantity));
                    }
                    (format!("Recipe {}", def.id), fields)
                }
                None => ("Recipe".to_string(), Vec::new()),
            };
            (title, fields)
        }
        NodeKind::Balance(balance) => (
            "Balance".to_string(),
            balance
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| FieldView::editable(format!("port {}", i + 1), *v))
                .collect(),
        ),
        NodeKind::Composite(composite) => (composite.name.clone(), Vec::new()),
    };

    Some(NodeView {
        id,
        tag: node.kind.tag(),
        title,
        phase,
        fields,
        inputs: node.inputs().iter().map(|p| p.name.clone()).collect(),
        outputs: node.outputs().iter().map(|p| p.name.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::Pos;
    use pf_catalog::Catalog;

    #[test]
    fn input_node_exposes_editable_value() {
        let mut graph = Graph::new();
        let id = graph.add_input(Pos::default(), 7.5);
        let view = node_view(&graph, &Catalog::default(), id).unwrap();
        assert_eq!(view.title, "Input");
        assert_eq!(view.phase, BalancePhase::Idle);
        assert_eq!(view.fields.len(), 1);
        assert!(view.fields[0].editable);
        assert_eq!(view.fields[0].value, 7.5);
        assert_eq!(view.outputs, vec!["out".to_string()]);
    }

    #[test]
    fn pending_node_reports_partial_constraints() {
        let mut graph = Graph::new();
        let part = graph.add_part(Pos::default(), pf_core::Id::from_index(0));
        graph.part_add_output(part, 1.0).unwrap();
        let sink1 = graph.add_output(Pos::default());
        let sink2 = graph.add_output(Pos::default());
        graph
            .connect(
                crate::pin::PinRef::new(part, "out1"),
                crate::pin::PinRef::new(sink1, "in"),
            )
            .unwrap();
        graph
            .connect(
                crate::pin::PinRef::new(part, "out2"),
                crate::pin::PinRef::new(sink2, "in"),
            )
            .unwrap();

        graph.node_mut(part).unwrap().accumulate(0, 5.0);
        let view = node_view(&graph, &Catalog::default(), part).unwrap();
        assert_eq!(
            view.phase,
            BalancePhase::Pending {
                received: 1,
                expected: 2
            }
        );
    }
}
