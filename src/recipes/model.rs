/// Recipe data model
///
/// These structs are what the script API sends and receives, and what the
/// store, controller and view pass around.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Number of ingredient lines shown on a dashboard card
const PREVIEW_LINES: usize = 3;

/// Bread category of a recipe
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(from = "String", into = "String")]
pub enum Category {
    PanBlanco,
    PanDulce,
    PanDeMuerto,
    Pizza,
    /// Also used for rows with a missing or unknown category
    #[default]
    Otros,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::PanBlanco,
        Category::PanDulce,
        Category::PanDeMuerto,
        Category::Pizza,
        Category::Otros,
    ];

    /// Name as stored in the sheet and shown on badges
    pub fn label(self) -> &'static str {
        match self {
            Category::PanBlanco => "Pan Blanco",
            Category::PanDulce => "Pan Dulce",
            Category::PanDeMuerto => "Pan de Muerto",
            Category::Pizza => "Pizza",
            Category::Otros => "Otros",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::PanBlanco => "🥖",
            Category::PanDulce => "🥐",
            Category::PanDeMuerto => "💀",
            Category::Pizza => "🍕",
            Category::Otros => "🍞",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::from_label(&label).unwrap_or_else(|| {
            warn!(category = %label, "unknown category, filing under Otros");
            Category::Otros
        })
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category chip selection on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "Todas",
            CategoryFilter::Only(category) => category.label(),
        }
    }
}

/// A recipe as listed by the script API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Assigned by the sheet; may arrive as a number
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Category,
    /// One ingredient per line
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub instructions: String,
}

impl Recipe {
    /// Non-blank ingredient lines, trimmed
    pub fn ingredient_lines(&self) -> Vec<&str> {
        ingredient_lines(&self.ingredients)
    }

    /// Card preview: first three ingredients plus a "+N más" suffix
    pub fn card_preview(&self) -> String {
        card_preview(&self.ingredients)
    }
}

/// The four form fields of a create or update
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub name: String,
    pub category: Category,
    pub ingredients: String,
    pub instructions: String,
}

pub fn ingredient_lines(ingredients: &str) -> Vec<&str> {
    ingredients
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

pub fn card_preview(ingredients: &str) -> String {
    let lines = ingredient_lines(ingredients);
    let preview = lines
        .iter()
        .take(PREVIEW_LINES)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    if lines.len() > PREVIEW_LINES {
        format!("{} (+{} más)", preview, lines.len() - PREVIEW_LINES)
    } else {
        preview
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_preview_truncates_after_three() {
        assert_eq!(card_preview("a\nb\nc\nd"), "a, b, c (+1 más)");
    }

    #[test]
    fn test_card_preview_skips_blank_lines() {
        assert_eq!(card_preview("  harina \n\n agua\n"), "harina, agua");
        assert_eq!(card_preview(""), "");
    }

    #[test]
    fn test_category_round_trips_through_labels() {
        let json = serde_json::to_string(&Category::PanDeMuerto).unwrap();
        assert_eq!(json, "\"Pan de Muerto\"");

        let parsed: Category = serde_json::from_str("\"Pan Dulce\"").unwrap();
        assert_eq!(parsed, Category::PanDulce);
    }

    #[test]
    fn test_unknown_category_becomes_otros() {
        let parsed: Category = serde_json::from_str("\"Galletas\"").unwrap();
        assert_eq!(parsed, Category::Otros);
        assert_eq!(parsed.icon(), "🍞");
    }

    #[test]
    fn test_recipe_accepts_numeric_id_and_missing_fields() {
        let recipe: Recipe =
            serde_json::from_str(r#"{"id": 7, "name": "Bolillo", "category": "Pan Blanco"}"#)
                .unwrap();
        assert_eq!(recipe.id, "7");
        assert_eq!(recipe.category, Category::PanBlanco);
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.ingredient_lines().is_empty());
    }

    #[test]
    fn test_row_without_category_is_filed_under_otros() {
        let recipes: Vec<Recipe> = serde_json::from_str(
            r#"[{"id": "a", "name": "Sin categoría"}, {"id": "b", "name": "Pizza", "category": "Pizza"}]"#,
        )
        .unwrap();
        assert_eq!(recipes[0].category, Category::Otros);
        assert_eq!(recipes[1].category, Category::Pizza);
    }

    #[test]
    fn test_filter_matches() {
        assert!(CategoryFilter::All.matches(Category::Pizza));
        assert!(CategoryFilter::Only(Category::Pizza).matches(Category::Pizza));
        assert!(!CategoryFilter::Only(Category::Pizza).matches(Category::Otros));
    }
}
