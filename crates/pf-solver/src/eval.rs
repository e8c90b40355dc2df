//! Forward (pull) evaluation of output pin values.

use std::collections::{HashMap, HashSet};

use pf_catalog::Catalog;
use pf_core::{NodeId, Real};
use pf_graph::{Graph, NodeKind};

use crate::error::{SolveError, SolveResult};

/// One forward evaluation pass.
///
/// The cache guarantees a pin is computed at most once per pass; fan-in and
/// fan-out therefore cost nothing extra. The in-progress set turns a cyclic
/// document into `CycleDetected` instead of unbounded recursion. A new pass
/// (a new `Evaluator`) always re-reads current graph state, so structural
/// edits between passes need no invalidation hook.
pub struct Evaluator<'a> {
    catalog: &'a Catalog,
    /// Values injected at nested Input nodes when evaluating inside a
    /// composite; empty at the top level.
    overrides: HashMap<NodeId, Real>,
    cache: HashMap<(NodeId, usize), Real>,
    in_progress: HashSet<(NodeId, usize)>,
}

impl<'a> Evaluator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_overrides(catalog, HashMap::new())
    }

    fn with_overrides(catalog: &'a Catalog, overrides: HashMap<NodeId, Real>) -> Self {
        Self {
            catalog,
            overrides,
            cache: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Value flowing out of `node`'s output pin `out_index`.
    pub fn output_value(
        &mut self,
        graph: &Graph,
        node: NodeId,
        out_index: usize,
    ) -> SolveResult<Real> {
        let key = (node, out_index);
        if let Some(v) = self.cache.get(&key) {
            return Ok(*v);
        }
        if !self.in_progress.insert(key) {
            return Err(SolveError::CycleDetected { node });
        }

        let result = self.compute_output(graph, node, out_index);

        self.in_progress.remove(&key);
        if let Ok(v) = result {
            self.cache.insert(key, v);
        }
        result
    }

    fn compute_output(
        &mut self,
        graph: &Graph,
        node: NodeId,
        out_index: usize,
    ) -> SolveResult<Real> {
        let n = graph
            .node(node)
            .ok_or(SolveError::NodeNotFound { node })?;
        if out_index >= n.outputs().len() {
            return Err(SolveError::PinOutOfRange {
                node,
                index: out_index,
            });
        }

        match &n.kind {
            NodeKind::Input(input) => Ok(self
                .overrides
                .get(&node)
                .copied()
                .unwrap_or(input.value)),

            // An Output node has no output pins; the bounds check above
            // already rejected this.
            NodeKind::Output(_) => Err(SolveError::PinOutOfRange {
                node,
                index: out_index,
            }),

            NodeKind::Part(part) => {
                let ratio = part.out_ratios[out_index];
                let mut pooled = 0.0;
                for i in 0..n.inputs().len() {
                    pooled += self.input_value(graph, node, i)?;
                }
                Ok(ratio * pooled)
            }

            NodeKind::Recipe(recipe) => {
                let def =
                    self.catalog
                        .recipe(recipe.recipe)
                        .ok_or_else(|| SolveError::CatalogRef {
                            what: format!("recipe index {}", recipe.recipe),
                        })?;
                let produced = def.outputs[out_index].quantity;
                let mut ratio_min: Option<Real> = None;
                for (i, ing) in def.inputs.iter().enumerate() {
                    let supplied = self.input_value(graph, node, i)?;
                    let r = supplied / ing.quantity;
                    ratio_min = Some(match ratio_min {
                        Some(m) if m <= r => m,
                        _ => r,
                    });
                }
                // Nothing can be produced from a recipe with no inputs.
                Ok(ratio_min.unwrap_or(0.0) * produced)
            }

            NodeKind::Balance(balance) => Ok(balance.values[out_index]),

            NodeKind::Composite(composite) => {
                let mut overrides = HashMap::new();
                for (i, nested_id) in composite.input_bindings().iter().enumerate() {
                    let v = self.input_value(graph, node, i)?;
                    overrides.insert(*nested_id, v);
                }
                let target = composite.output_bindings()[out_index];
                let mut nested = Evaluator::with_overrides(self.catalog, overrides);
                nested.sink_value(composite.graph(), target)
            }
        }
    }

    /// Value arriving at `node`'s input pin `in_index`: the upstream output
    /// pin's value, or 0 when the pin is unconnected.
    pub fn input_value(
        &mut self,
        graph: &Graph,
        node: NodeId,
        in_index: usize,
    ) -> SolveResult<Real> {
        match graph.input_source(node, in_index) {
            Some((upstream, out_index)) => self.output_value(graph, upstream, out_index),
            None => Ok(0.0),
        }
    }

    /// Displayed value of an Output node (its single input pin).
    pub fn sink_value(&mut self, graph: &Graph, node: NodeId) -> SolveResult<Real> {
        let n = graph
            .node(node)
            .ok_or(SolveError::NodeNotFound { node })?;
        match n.kind {
            NodeKind::Output(_) => self.input_value(graph, node, 0),
            _ => Err(SolveError::NotASink { node }),
        }
    }
}
