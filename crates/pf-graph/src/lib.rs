//! pf-graph: pin/link substrate and node model for prodflow.
//!
//! Provides:
//! - Pin & Link model (typed connection points, directed edges)
//! - The closed node variant set (Input, Output, Part, Recipe, Balance, Composite)
//! - Editable graph with connect/disconnect and arity operations
//! - Node type registry (stable tags) and the display view layer
//!
//! # Example
//!
//! ```
//! use pf_graph::{Graph, PinRef, Pos};
//!
//! let mut graph = Graph::new();
//! let input = graph.add_input(Pos::default(), 10.0);
//! let output = graph.add_output(Pos::default());
//! graph
//!     .connect(PinRef::new(input, "out"), PinRef::new(output, "in"))
//!     .unwrap();
//!
//! assert_eq!(graph.nodes().len(), 2);
//! assert_eq!(graph.links().len(), 1);
//! ```

pub mod error;
pub mod graph;
pub mod node;
pub mod pin;
pub mod registry;
pub mod view;

// Re-exports for ergonomics
pub use error::{GraphError, GraphResult};
pub use graph::Graph;
pub use node::{
    BalanceNode, CompositeNode, InputNode, Node, NodeKind, OutputNode, PartNode, RecipeNode,
};
pub use pin::{Link, Pin, PinDir, PinRef, Pos, ValueType};
pub use registry::NodeTag;
pub use view::{BalancePhase, FieldView, NodeView, node_view};
