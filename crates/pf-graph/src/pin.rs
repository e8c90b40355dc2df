//! Pins, links, and positions: the substrate every node is built on.

use pf_core::NodeId;

/// Scalar value type carried by a pin.
///
/// Only one type exists today (a flow rate in units/min); the enum is the
/// forward-compatibility guard checked by `connect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    #[default]
    Quantity,
}

/// Direction of a pin relative to its owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinDir {
    Input,
    Output,
}

/// A connection point on a node.
///
/// Identity is (owning node, direction, name) and is stable for the pin's
/// lifetime; renaming is not supported, only deletion/recreation, because
/// links address pins by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub name: String,
    pub value_type: ValueType,
}

impl Pin {
    pub fn quantity(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: ValueType::Quantity,
        }
    }
}

/// Address of a pin: owning node plus pin name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PinRef {
    pub node: NodeId,
    pub pin: String,
}

impl PinRef {
    pub fn new(node: NodeId, pin: impl Into<String>) -> Self {
        Self {
            node,
            pin: pin.into(),
        }
    }
}

/// A directed edge from one output pin to one input pin.
///
/// Owned by the graph; destroyed when either endpoint pin is destroyed.
/// An input pin holds at most one link, an output pin may fan out.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Producer side (output pin).
    pub from: PinRef,
    /// Consumer side (input pin).
    pub to: PinRef,
}

/// 2-D canvas position, carried for the excluded UI layer and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pos {
    pub x: f64,
    pub y: f64,
}

impl Pos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
