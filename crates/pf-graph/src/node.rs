//! The closed node variant set and per-node state.

use pf_catalog::Catalog;
use pf_core::{NodeId, PartId, Real, RecipeId};

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use crate::pin::{Pin, Pos};

/// A node in the production graph.
///
/// Every node carries a stable identifier (never reused within its graph),
/// a canvas position, its ordered pin lists, variant-specific state in
/// `kind`, and the balance accumulator fed by the backward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub pos: Pos,
    pub(crate) inputs: Vec<Pin>,
    pub(crate) outputs: Vec<Pin>,
    pub kind: NodeKind,
    /// Constraint accumulator, one slot per output pin (last delivery wins).
    pub(crate) accum: Vec<Option<Real>>,
    /// Total throughput J recorded by the last completed balance.
    pub(crate) balanced: Option<Real>,
}

/// Variant-specific node state.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Input(InputNode),
    Output(OutputNode),
    Part(PartNode),
    Recipe(RecipeNode),
    Balance(BalanceNode),
    Composite(CompositeNode),
}

/// Source node: zero inputs, one output, a user-editable rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputNode {
    pub value: Real,
}

/// Sink node: one input, zero outputs, pure display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputNode;

/// References one catalog Part; pools its inputs and splits the pooled sum
/// across its output pins, each scaled by that pin's ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct PartNode {
    pub part: PartId,
    /// One ratio per output pin, in pin order. Default 1.0.
    pub out_ratios: Vec<Real>,
}

/// References one catalog Recipe; pin arity is fixed at construction from
/// the recipe's ingredient lists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecipeNode {
    pub recipe: RecipeId,
}

/// Manual junction/override point: paired input/output ports, one editable
/// scalar per pair that is both the forwarded value and the injected demand.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceNode {
    pub values: Vec<Real>,
}

/// A node wrapping an entire nested graph.
///
/// The nested graph's Input nodes define this node's input pins and its
/// Output nodes define the output pins, in nested insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeNode {
    pub name: String,
    graph: Graph,
    input_bindings: Vec<NodeId>,
    output_bindings: Vec<NodeId>,
}

impl CompositeNode {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Nested Input node ids, aligned with this node's input pins.
    pub fn input_bindings(&self) -> &[NodeId] {
        &self.input_bindings
    }

    /// Nested Output node ids, aligned with this node's output pins.
    pub fn output_bindings(&self) -> &[NodeId] {
        &self.output_bindings
    }
}

impl Node {
    fn base(id: NodeId, pos: Pos, kind: NodeKind) -> Self {
        Self {
            id,
            pos,
            inputs: Vec::new(),
            outputs: Vec::new(),
            kind,
            accum: Vec::new(),
            balanced: None,
        }
    }

    pub fn input(id: NodeId, pos: Pos, value: Real) -> Self {
        let mut node = Self::base(id, pos, NodeKind::Input(InputNode { value }));
        node.push_output_pin(Pin::quantity("out"));
        node
    }

    pub fn output(id: NodeId, pos: Pos) -> Self {
        let mut node = Self::base(id, pos, NodeKind::Output(OutputNode));
        node.push_input_pin(Pin::quantity("in"));
        node
    }

    /// Build a Part node with `input_count` pooled inputs and one output pin
    /// per ratio. Pins are named `in1..inN` / `out1..outM`.
    pub fn part(id: NodeId, pos: Pos, part: PartId, input_count: u32, ratios: Vec<Real>) -> Self {
        let out_count = ratios.len();
        let mut node = Self::base(
            id,
            pos,
            NodeKind::Part(PartNode {
                part,
                out_ratios: ratios,
            }),
        );
        for i in 0..input_count {
            node.push_input_pin(Pin::quantity(format!("in{}", i + 1)));
        }
        for i in 0..out_count {
            node.push_output_pin(Pin::quantity(format!("out{}", i + 1)));
        }
        node
    }

    /// Build a Recipe node; pins are named after the recipe's part names.
    ///
    /// Fails with `CatalogRef` if the recipe index is not in the catalog and
    /// with `DuplicatePin` if a recipe lists the same part twice on one side.
    pub fn recipe(id: NodeId, pos: Pos, recipe: RecipeId, catalog: &Catalog) -> GraphResult<Self> {
        let def = catalog.recipe(recipe).ok_or_else(|| GraphError::CatalogRef {
            what: format!("recipe index {recipe}"),
        })?;
        let mut node = Self::base(id, pos, NodeKind::Recipe(RecipeNode { recipe }));
        for ing in &def.inputs {
            node.try_push_input_pin(Pin::quantity(ing.part.as_str()))?;
        }
        for ing in &def.outputs {
            node.try_push_output_pin(Pin::quantity(ing.part.as_str()))?;
        }
        Ok(node)
    }

    /// Build a Balance node with one port pair per value.
    pub fn balance(id: NodeId, pos: Pos, values: Vec<Real>) -> Self {
        let ports = values.len();
        let mut node = Self::base(id, pos, NodeKind::Balance(BalanceNode { values }));
        for i in 0..ports {
            node.push_input_pin(Pin::quantity(format!("in{}", i + 1)));
            node.push_output_pin(Pin::quantity(format!("out{}", i + 1)));
        }
        node
    }

    /// Wrap a nested graph: its Input/Output nodes become this node's pins.
    pub fn composite(id: NodeId, pos: Pos, name: impl Into<String>, nested: Graph) -> Self {
        let mut input_bindings = Vec::new();
        let mut output_bindings = Vec::new();
        for inner in nested.nodes() {
            match inner.kind {
                NodeKind::Input(_) => input_bindings.push(inner.id),
                NodeKind::Output(_) => output_bindings.push(inner.id),
                _ => {}
            }
        }
        let mut node = Self::base(
            id,
            pos,
            NodeKind::Composite(CompositeNode {
                name: name.into(),
                graph: nested,
                input_bindings: input_bindings.clone(),
                output_bindings: output_bindings.clone(),
            }),
        );
        for i in 0..input_bindings.len() {
            node.push_input_pin(Pin::quantity(format!("in{}", i + 1)));
        }
        for i in 0..output_bindings.len() {
            node.push_output_pin(Pin::quantity(format!("out{}", i + 1)));
        }
        node
    }

    pub fn inputs(&self) -> &[Pin] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Pin] {
        &self.outputs
    }

    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|p| p.name == name)
    }

    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|p| p.name == name)
    }

    // ---- pin maintenance (accumulator slots track output pins) ----

    pub(crate) fn push_input_pin(&mut self, pin: Pin) {
        self.inputs.push(pin);
    }

    pub(crate) fn push_output_pin(&mut self, pin: Pin) {
        self.outputs.push(pin);
        self.accum.push(None);
    }

    pub(crate) fn try_push_input_pin(&mut self, pin: Pin) -> GraphResult<()> {
        if self.input_index(&pin.name).is_some() {
            return Err(GraphError::DuplicatePin {
                node: self.id,
                pin: pin.name,
            });
        }
        self.push_input_pin(pin);
        Ok(())
    }

    pub(crate) fn try_push_output_pin(&mut self, pin: Pin) -> GraphResult<()> {
        if self.output_index(&pin.name).is_some() {
            return Err(GraphError::DuplicatePin {
                node: self.id,
                pin: pin.name,
            });
        }
        self.push_output_pin(pin);
        Ok(())
    }

    pub(crate) fn remove_input_pin_at(&mut self, index: usize) {
        self.inputs.remove(index);
    }

    pub(crate) fn remove_output_pin_at(&mut self, index: usize) {
        self.outputs.remove(index);
        self.accum.remove(index);
    }

    // ---- balance accumulator ----

    /// Record a constraint for one output pin. Last delivery wins.
    pub fn accumulate(&mut self, out_index: usize, constraint: Real) {
        if let Some(slot) = self.accum.get_mut(out_index) {
            *slot = Some(constraint);
        }
    }

    /// If every listed (connected) output pin holds a constraint, drain the
    /// accumulator and return the constraints in the listed pin order.
    pub fn take_constraints(&mut self, connected: &[usize]) -> Option<Vec<Real>> {
        let mut out = Vec::with_capacity(connected.len());
        for &i in connected {
            out.push((*self.accum.get(i)?)?);
        }
        self.accum.iter_mut().for_each(|slot| *slot = None);
        Some(out)
    }

    /// Number of output pins currently holding a pending constraint.
    pub fn pending_received(&self) -> usize {
        self.accum.iter().filter(|c| c.is_some()).count()
    }

    pub fn has_pending(&self) -> bool {
        self.accum.iter().any(|c| c.is_some())
    }

    /// Total throughput J from the last completed balance, if any.
    pub fn balanced(&self) -> Option<Real> {
        self.balanced
    }

    pub fn set_balanced(&mut self, j: Real) {
        self.balanced = Some(j);
    }

    pub fn clear_balanced(&mut self) {
        self.balanced = None;
        self.accum.iter_mut().for_each(|slot| *slot = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::Id;

    #[test]
    fn part_node_pins_follow_arity() {
        let node = Node::part(
            Id::from_index(0),
            Pos::default(),
            Id::from_index(3),
            2,
            vec![1.0, 0.5, 0.25],
        );
        assert_eq!(node.inputs().len(), 2);
        assert_eq!(node.outputs().len(), 3);
        assert_eq!(node.input_index("in2"), Some(1));
        assert_eq!(node.output_index("out3"), Some(2));
    }

    #[test]
    fn accumulator_completes_only_when_connected_set_is_full() {
        let mut node = Node::part(
            Id::from_index(0),
            Pos::default(),
            Id::from_index(0),
            1,
            vec![1.0, 1.0],
        );
        node.accumulate(0, 4.0);
        assert!(node.take_constraints(&[0, 1]).is_none());
        assert_eq!(node.pending_received(), 1);

        node.accumulate(1, 6.0);
        let constraints = node.take_constraints(&[0, 1]).unwrap();
        assert_eq!(constraints, vec![4.0, 6.0]);
        assert!(!node.has_pending());
    }

    #[test]
    fn accumulate_last_delivery_wins() {
        let mut node = Node::input(Id::from_index(0), Pos::default(), 0.0);
        node.accumulate(0, 1.0);
        node.accumulate(0, 9.0);
        assert_eq!(node.take_constraints(&[0]).unwrap(), vec![9.0]);
    }
}
