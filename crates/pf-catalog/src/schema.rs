//! Wire format of the external catalog data files.
//!
//! Field names mirror the data files exactly: the parts document uses
//! lowercase keys, the recipes document capitalized ones. `Quantity` may
//! arrive as an integer or a float; both deserialize to `f64`.

use serde::{Deserialize, Serialize};

/// Top-level parts document: `{"parts": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartsDoc {
    #[serde(default)]
    pub parts: Vec<PartDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartDoc {
    pub name: String,
    #[serde(rename = "img", default)]
    pub img_path: String,
}

/// Top-level recipes document: `{"recipes": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipesDoc {
    #[serde(default)]
    pub recipes: Vec<RecipeDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeDoc {
    #[serde(rename = "RecipeId")]
    pub id: i64,
    #[serde(rename = "Input", default)]
    pub inputs: Vec<IngredientDoc>,
    #[serde(rename = "Output", default)]
    pub outputs: Vec<IngredientDoc>,
}

/// One (part, quantity) pair on either side of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientDoc {
    #[serde(rename = "Part")]
    pub part: String,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_accepts_integers_and_floats() {
        let doc: RecipesDoc = serde_json::from_str(
            r#"{"recipes": [{
                "RecipeId": 7,
                "Input": [{"Part": "Iron", "Quantity": 2}],
                "Output": [{"Part": "Steel", "Quantity": 1.5}]
            }]}"#,
        )
        .unwrap();

        assert_eq!(doc.recipes[0].inputs[0].quantity, 2.0);
        assert_eq!(doc.recipes[0].outputs[0].quantity, 1.5);
    }

    #[test]
    fn missing_img_defaults_to_empty() {
        let doc: PartsDoc = serde_json::from_str(r#"{"parts": [{"name": "Iron"}]}"#).unwrap();
        assert_eq!(doc.parts[0].name, "Iron");
        assert!(doc.parts[0].img_path.is_empty());
    }
}
