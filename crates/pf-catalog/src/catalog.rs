//! In-memory catalog arena and its lookup/index operations.

use std::path::Path;

use pf_core::{PartId, RecipeId};
use tracing::warn;

use crate::schema::{IngredientDoc, PartsDoc, RecipesDoc};
use crate::{CatalogError, CatalogResult};

/// Catalog entity: one part.
///
/// `produced_by` is the back-reference index built at load time by scanning
/// every recipe's outputs; it holds recipe indices in data-file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub img_path: String,
    produced_by: Vec<RecipeId>,
}

impl Part {
    /// Recipes producing this part, in data-file order.
    pub fn produced_by(&self) -> &[RecipeId] {
        &self.produced_by
    }
}

/// Catalog entity: one recipe. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Numeric identifier from the data file (not necessarily dense).
    pub id: i64,
    pub inputs: Vec<IngredientDoc>,
    pub outputs: Vec<IngredientDoc>,
}

/// The immutable, process-lifetime set of Part/Recipe reference data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    parts: Vec<Part>,
    recipes: Vec<Recipe>,
}

impl Catalog {
    /// Build a catalog from parsed documents and derive the
    /// part -> producing-recipes index.
    ///
    /// A recipe output naming a part absent from the parts document is
    /// logged and ignored by the index; the recipe itself is kept.
    pub fn from_docs(parts: PartsDoc, recipes: RecipesDoc) -> Self {
        let mut catalog = Self {
            parts: parts
                .parts
                .into_iter()
                .map(|p| Part {
                    name: p.name,
                    img_path: p.img_path,
                    produced_by: Vec::new(),
                })
                .collect(),
            recipes: recipes
                .recipes
                .into_iter()
                .map(|r| Recipe {
                    id: r.id,
                    inputs: r.inputs,
                    outputs: r.outputs,
                })
                .collect(),
        };

        let mut pairs: Vec<(usize, RecipeId)> = Vec::new();
        for (ri, recipe) in catalog.recipes.iter().enumerate() {
            for out in &recipe.outputs {
                match catalog.parts.iter().position(|p| p.name == out.part) {
                    Some(pi) => pairs.push((pi, RecipeId::from_index(ri as u32))),
                    None => warn!(
                        recipe = recipe.id,
                        part = %out.part,
                        "recipe output names unknown part, skipping index entry"
                    ),
                }
            }
        }
        for (pi, rid) in pairs {
            catalog.parts[pi].produced_by.push(rid);
        }

        catalog
    }

    /// Read and parse both data files, then build the index.
    pub fn load(parts_path: &Path, recipes_path: &Path) -> CatalogResult<Self> {
        let parts: PartsDoc = serde_json::from_str(&std::fs::read_to_string(parts_path)?)?;
        let recipes: RecipesDoc = serde_json::from_str(&std::fs::read_to_string(recipes_path)?)?;
        Ok(Self::from_docs(parts, recipes))
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Get a part by ID (returns None if ID out of bounds).
    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id.index() as usize)
    }

    /// Get a recipe by ID (returns None if ID out of bounds).
    pub fn recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.get(id.index() as usize)
    }

    /// Resolve a part by exact name.
    pub fn find_part(&self, name: &str) -> Option<PartId> {
        self.parts
            .iter()
            .position(|p| p.name == name)
            .map(|i| PartId::from_index(i as u32))
    }

    /// Resolve a recipe by its numeric identifier from the data file.
    pub fn find_recipe(&self, id: i64) -> Option<RecipeId> {
        self.recipes
            .iter()
            .position(|r| r.id == id)
            .map(|i| RecipeId::from_index(i as u32))
    }

    pub fn require_part(&self, name: &str) -> CatalogResult<PartId> {
        self.find_part(name).ok_or_else(|| CatalogError::UnknownPart {
            name: name.to_string(),
        })
    }

    pub fn require_recipe(&self, id: i64) -> CatalogResult<RecipeId> {
        self.find_recipe(id)
            .ok_or(CatalogError::UnknownRecipe { id })
    }

    /// Case-insensitive substring filtering over part names, for the
    /// part-selector surface of the UI layer.
    pub fn search_parts(&self, query: &str) -> Vec<PartId> {
        let query = query.trim().to_ascii_lowercase();
        self.parts
            .iter()
            .enumerate()
            .filter(|(_, p)| query.is_empty() || p.name.to_ascii_lowercase().contains(&query))
            .map(|(i, _)| PartId::from_index(i as u32))
            .collect()
    }

    /// Recipes producing a part, in data-file order.
    pub fn producers_of(&self, id: PartId) -> &[RecipeId] {
        self.part(id).map(|p| p.produced_by()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PartDoc, RecipeDoc};

    fn sample() -> Catalog {
        Catalog::from_docs(
            PartsDoc {
                parts: vec![
                    PartDoc {
                        name: "Iron".into(),
                        img_path: "img/iron.png".into(),
                    },
                    PartDoc {
                        name: "Coal".into(),
                        img_path: String::new(),
                    },
                    PartDoc {
                        name: "Steel".into(),
                        img_path: String::new(),
                    },
                ],
            },
            RecipesDoc {
                recipes: vec![RecipeDoc {
                    id: 42,
                    inputs: vec![
                        IngredientDoc {
                            part: "Iron".into(),
                            quantity: 2.0,
                        },
                        IngredientDoc {
                            part: "Coal".into(),
                            quantity: 1.0,
                        },
                    ],
                    outputs: vec![IngredientDoc {
                        part: "Steel".into(),
                        quantity: 1.0,
                    }],
                }],
            },
        )
    }

    #[test]
    fn back_reference_index_lists_producers() {
        let catalog = sample();
        let steel = catalog.find_part("Steel").unwrap();
        let producers = catalog.producers_of(steel);
        assert_eq!(producers.len(), 1);
        assert_eq!(catalog.recipe(producers[0]).unwrap().id, 42);

        let iron = catalog.find_part("Iron").unwrap();
        assert!(catalog.producers_of(iron).is_empty());
    }

    #[test]
    fn find_recipe_uses_file_identifier() {
        let catalog = sample();
        assert!(catalog.find_recipe(42).is_some());
        assert!(catalog.find_recipe(0).is_none());
    }

    #[test]
    fn unknown_output_part_does_not_poison_index() {
        let catalog = Catalog::from_docs(
            PartsDoc { parts: vec![] },
            RecipesDoc {
                recipes: vec![RecipeDoc {
                    id: 1,
                    inputs: vec![],
                    outputs: vec![IngredientDoc {
                        part: "Ghost".into(),
                        quantity: 1.0,
                    }],
                }],
            },
        );
        assert_eq!(catalog.recipes().len(), 1);
        assert!(catalog.parts().is_empty());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let catalog = sample();
        assert_eq!(catalog.search_parts("iro").len(), 1);
        assert_eq!(catalog.search_parts("").len(), 3);
        assert!(catalog.search_parts("xyz").is_empty());
    }
}
