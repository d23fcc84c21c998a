//! Core types for normalised recipes and advice quotes.

use serde::{Deserialize, Serialize};

/// A single recipe in the canonical shape every source is mapped into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipe {
    /// Display name of the recipe.
    pub name: String,
    /// How many people the recipe serves.
    pub servings: u32,
}

impl Recipe {
    pub fn new(name: impl Into<String>, servings: u32) -> Self {
        Self {
            name: name.into(),
            servings,
        }
    }
}

/// Concatenated, normalised records from every source, in declared source order.
pub type ResultSet = Vec<Recipe>;

/// A quote from one of the advice services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    pub quote: String,
}

/// One quote from each advice service, fetched together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub kanye: Quote,
    #[serde(rename = "chuckNorris")]
    pub chuck_norris: Quote,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_construction() {
        let recipe = Recipe::new("Tacos", 4);
        assert_eq!(recipe.name, "Tacos");
        assert_eq!(recipe.servings, 4);
    }

    #[test]
    fn recipe_serialises_canonical_field_names() {
        let json = serde_json::to_value(Recipe::new("Bolognese", 2)).expect("serialize");
        assert_eq!(json, serde_json::json!({"name": "Bolognese", "servings": 2}));
    }

    #[test]
    fn advice_uses_camel_case_for_chuck_norris() {
        let advice = Advice {
            kanye: Quote {
                id: "kanye".into(),
                quote: "Keep going".into(),
            },
            chuck_norris: Quote {
                id: "abc".into(),
                quote: "Chuck counted to infinity. Twice.".into(),
            },
        };
        let json = serde_json::to_value(&advice).expect("serialize");
        assert_eq!(json["chuckNorris"]["id"], "abc");
        assert_eq!(json["kanye"]["quote"], "Keep going");
    }
}
