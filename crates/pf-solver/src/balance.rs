//! Backward (push) demand propagation — the balancing pass.
//!
//! A pass starts at a sink (an Output node given an explicit demand, or a
//! Balance node pushing its port values) and walks upstream. Each node
//! accumulates one constraint per connected output pin; when the set is
//! complete the node computes its total throughput J, applies its
//! variant-specific rule, and forwards per-input demands to its suppliers.
//!
//! The pass mutates node state: Input values, Part ratios, and Balance
//! ports are all rewritten to satisfy the demand.

use pf_catalog::Catalog;
use pf_core::{NodeId, Real};
use pf_graph::{Graph, NodeKind};
use tracing::debug;

use crate::error::{SolveError, SolveResult};

/// Inject a demand at an Output node and propagate it upstream.
pub fn demand_output(
    graph: &mut Graph,
    catalog: &Catalog,
    node: NodeId,
    demand: Real,
) -> SolveResult<()> {
    let n = graph
        .node(node)
        .ok_or(SolveError::NodeNotFound { node })?;
    if !matches!(n.kind, NodeKind::Output(_)) {
        return Err(SolveError::NotASink { node });
    }
    let mut pass = Pass::new(catalog);
    pass.stack.push(node);
    let result = match graph.input_source(node, 0) {
        Some((upstream, out_index)) => pass.receive(graph, upstream, out_index, demand),
        None => Ok(()),
    };
    pass.stack.pop();
    result
}

/// Push a Balance node's port values upstream: port k's value is delivered
/// to the producer feeding input port k.
pub fn push_balance_node(graph: &mut Graph, catalog: &Catalog, node: NodeId) -> SolveResult<()> {
    let n = graph
        .node(node)
        .ok_or(SolveError::NodeNotFound { node })?;
    let NodeKind::Balance(balance) = &n.kind else {
        return Err(SolveError::NotSupported {
            what: "push_balance_node on a non-Balance node",
        });
    };
    let demands = balance.values.clone();

    let mut pass = Pass::new(catalog);
    pass.stack.push(node);
    let result = pass.push_upstream(graph, node, &demands);
    pass.stack.pop();
    result
}

/// Trigger a node's own balance with an explicit constraint list, delivered
/// to its connected output pins in pin order.
///
/// Fewer constraints than connected pins leave the node pending (the
/// partial-input state of the error design); an empty constraint set on a
/// node with no connected outputs is a no-op.
pub fn balance_node(
    graph: &mut Graph,
    catalog: &Catalog,
    node: NodeId,
    constraints: &[Real],
) -> SolveResult<()> {
    graph
        .node(node)
        .ok_or(SolveError::NodeNotFound { node })?;
    let connected = graph.connected_outputs(node);
    let mut pass = Pass::new(catalog);
    for (k, &pin) in connected.iter().enumerate().take(constraints.len()) {
        pass.receive(graph, node, pin, constraints[k])?;
    }
    Ok(())
}

/// Total throughput J recorded by the node's last completed balance.
pub fn balanced_value(graph: &Graph, node: NodeId) -> SolveResult<Real> {
    graph
        .node(node)
        .ok_or(SolveError::NodeNotFound { node })?
        .balanced()
        .ok_or(SolveError::Unbalanced { node })
}

/// One backward propagation pass.
struct Pass<'a> {
    catalog: &'a Catalog,
    /// Nodes currently mid-delivery; re-entering one means the demand chain
    /// looped back on itself.
    stack: Vec<NodeId>,
}

impl<'a> Pass<'a> {
    fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            stack: Vec::new(),
        }
    }

    /// Deliver one demand per input pin to the producers feeding `node`.
    fn push_upstream(&mut self, graph: &mut Graph, node: NodeId, demands: &[Real]) -> SolveResult<()> {
        let input_count = graph
            .node(node)
            .ok_or(SolveError::NodeNotFound { node })?
            .inputs()
            .len();
        for i in 0..input_count.min(demands.len()) {
            if let Some((upstream, out_index)) = graph.input_source(node, i) {
                self.receive(graph, upstream, out_index, demands[i])?;
            }
        }
        Ok(())
    }

    /// Deliver a constraint to one output pin of `node` (step 1 of the
    /// protocol). Balances and recurses upstream once the set is complete.
    fn receive(
        &mut self,
        graph: &mut Graph,
        node: NodeId,
        out_index: usize,
        constraint: Real,
    ) -> SolveResult<()> {
        if self.stack.contains(&node) {
            return Err(SolveError::CycleDetected { node });
        }

        let connected = graph.connected_outputs(node);
        let n = graph
            .node_mut(node)
            .ok_or(SolveError::NodeNotFound { node })?;
        n.accumulate(out_index, constraint);
        let Some(constraints) = n.take_constraints(&connected) else {
            // Incomplete set: stay pending until the remaining consumers
            // deliver theirs.
            return Ok(());
        };

        let j: Real = constraints.iter().sum();
        n.set_balanced(j);
        debug!(node = %node, j, "node balanced");

        self.stack.push(node);
        let result = self.apply(graph, node, &connected, &constraints, j);
        self.stack.pop();
        result
    }

    /// Step 2/3: variant-specific balance rule plus upstream propagation.
    fn apply(
        &mut self,
        graph: &mut Graph,
        node: NodeId,
        connected: &[usize],
        constraints: &[Real],
        j: Real,
    ) -> SolveResult<()> {
        let n = graph
            .node_mut(node)
            .ok_or(SolveError::NodeNotFound { node })?;
        let input_count = n.inputs().len();

        // Demands to forward, one slot per input pin.
        let demands: Vec<Option<Real>> = match &mut n.kind {
            // Terminal: J becomes the editable value.
            NodeKind::Input(input) => {
                input.value = j;
                Vec::new()
            }

            // An Output node has no output pins, so it never completes a
            // constraint set; nothing to do.
            NodeKind::Output(_) => Vec::new(),

            // Re-derive each connected output's ratio from its observed
            // share of J, then ask every supplier for the full pooled J.
            // (Pooled inputs cannot express per-input stoichiometry; this
            // is the documented approximation.)
            NodeKind::Part(part) => {
                if j != 0.0 {
                    for (k, &pin) in connected.iter().enumerate() {
                        part.out_ratios[pin] = constraints[k] / j;
                    }
                }
                vec![Some(j); input_count]
            }

            // The effective throughput demand is the max over constrained
            // outputs of (constraint / produced quantity): satisfy the
            // hungriest output. Each input is then asked for its exact
            // stoichiometric share.
            NodeKind::Recipe(recipe) => {
                let def = self
                    .catalog
                    .recipe(recipe.recipe)
                    .ok_or_else(|| SolveError::CatalogRef {
                        what: format!("recipe index {}", recipe.recipe),
                    })?;
                let mut eff_ratio = 0.0_f64;
                for (k, &pin) in connected.iter().enumerate() {
                    let implied = constraints[k] / def.outputs[pin].quantity;
                    eff_ratio = eff_ratio.max(implied);
                }
                def.inputs
                    .iter()
                    .map(|ing| Some(eff_ratio * ing.quantity))
                    .collect()
            }

            // Manual override point: demands land in the editable port
            // values and stop here. The user pushes them further with
            // `push_balance_node`.
            NodeKind::Balance(balance) => {
                for (k, &pin) in connected.iter().enumerate() {
                    balance.values[pin] = constraints[k];
                }
                Vec::new()
            }

            // Delegate to the nested graph: constraints enter at the bound
            // Output nodes, demands exit at the bound Input nodes.
            NodeKind::Composite(composite) => {
                for (k, &pin) in connected.iter().enumerate() {
                    let nested_out = composite.output_bindings()[pin];
                    demand_output(composite.graph_mut(), self.catalog, nested_out, constraints[k])?;
                }
                let bindings = composite.input_bindings().to_vec();
                bindings
                    .iter()
                    .map(|nested_in| {
                        composite
                            .graph()
                            .node(*nested_in)
                            .and_then(|inner| inner.balanced())
                    })
                    .collect()
            }
        };

        for (i, demand) in demands.into_iter().enumerate() {
            let Some(demand) = demand else { continue };
            if let Some((upstream, out_index)) = graph.input_source(node, i) {
                self.receive(graph, upstream, out_index, demand)?;
            }
        }
        Ok(())
    }
}
