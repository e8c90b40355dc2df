//! pf-catalog: immutable Part/Recipe reference data.
//!
//! The catalog is loaded once at startup from two JSON documents (parts and
//! recipes) and stays read-only for the rest of the process. Graph nodes
//! reference catalog entries by compact index (`PartId`, `RecipeId`), never
//! by pointer, so the catalog can be shared freely across passes.

pub mod catalog;
pub mod schema;

pub use catalog::{Catalog, Part, Recipe};
pub use schema::{IngredientDoc, PartDoc, PartsDoc, RecipeDoc, RecipesDoc};

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown part: {name}")]
    UnknownPart { name: String },

    #[error("Unknown recipe id: {id}")]
    UnknownRecipe { id: i64 },
}
