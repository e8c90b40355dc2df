//! Derived display reports (limiting ratio, surplus).

use pf_catalog::Catalog;
use pf_core::{NodeId, Real};
use pf_graph::{Graph, NodeKind};

use crate::error::{SolveError, SolveResult};
use crate::eval::Evaluator;

/// Per-input line of a recipe report.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeInputReport {
    pub part: String,
    pub supplied: Real,
    pub required: Real,
    /// supplied / required for this input.
    pub ratio: Real,
    /// Excess supplied quantity beyond what the limiting ratio consumes.
    /// Zero for the limiting input; never negative.
    pub surplus: Real,
}

/// Bottleneck analysis of one Recipe node, for display only.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeReport {
    /// min over inputs of (supplied / required); caps achievable output.
    pub limiting_ratio: Real,
    pub inputs: Vec<RecipeInputReport>,
}

/// Evaluate a Recipe node's inputs and derive the limiting-factor report.
pub fn recipe_report(graph: &Graph, catalog: &Catalog, node: NodeId) -> SolveResult<RecipeReport> {
    let n = graph
        .node(node)
        .ok_or(SolveError::NodeNotFound { node })?;
    let NodeKind::Recipe(recipe) = &n.kind else {
        return Err(SolveError::NotSupported {
            what: "recipe_report on a non-Recipe node",
        });
    };
    let def = catalog
        .recipe(recipe.recipe)
        .ok_or_else(|| SolveError::CatalogRef {
            what: format!("recipe index {}", recipe.recipe),
        })?;

    let mut eval = Evaluator::new(catalog);
    let mut supplied = Vec::with_capacity(def.inputs.len());
    for i in 0..def.inputs.len() {
        supplied.push(eval.input_value(graph, node, i)?);
    }

    let mut limiting = Real::INFINITY;
    for (i, ing) in def.inputs.iter().enumerate() {
        limiting = limiting.min(supplied[i] / ing.quantity);
    }
    if def.inputs.is_empty() {
        limiting = 0.0;
    }

    let inputs = def
        .inputs
        .iter()
        .enumerate()
        .map(|(i, ing)| {
            let ratio = supplied[i] / ing.quantity;
            RecipeInputReport {
                part: ing.part.clone(),
                supplied: supplied[i],
                required: ing.quantity,
                ratio,
                surplus: (supplied[i] * (ratio - limiting)).max(0.0),
            }
        })
        .collect();

    Ok(RecipeReport {
        limiting_ratio: limiting,
        inputs,
    })
}
