/// Recipe application state
///
/// The store holds the last listing from the script API and the filtered
/// view of it. `filtered` is always recomputed in full from
/// `(all, search_term, category)` whenever one of them changes.
use super::model::{CategoryFilter, Recipe};

/// An in-progress edit. The id is present exactly when the session is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    recipe_id: Option<String>,
}

impl EditSession {
    pub fn is_active(&self) -> bool {
        self.recipe_id.is_some()
    }

    pub fn recipe_id(&self) -> Option<&str> {
        self.recipe_id.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct RecipeStore {
    all: Vec<Recipe>,
    filtered: Vec<Recipe>,
    category: CategoryFilter,
    search_term: String,
    edit: EditSession,
}

impl RecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authoritative snapshot from the last successful listing
    pub fn all(&self) -> &[Recipe] {
        &self.all
    }

    pub fn filtered(&self) -> &[Recipe] {
        &self.filtered
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    /// Normalised (trimmed, lower-case) search term
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    pub fn find(&self, id: &str) -> Option<&Recipe> {
        self.all.iter().find(|recipe| recipe.id == id)
    }

    /// Replace the snapshot with a fresh listing
    pub fn set_all(&mut self, recipes: Vec<Recipe>) {
        self.all = recipes;
        self.refilter();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.refilter();
    }

    pub fn set_search_term(&mut self, raw: &str) {
        self.search_term = normalize_term(raw);
        self.refilter();
    }

    pub fn begin_edit(&mut self, recipe_id: impl Into<String>) {
        self.edit.recipe_id = Some(recipe_id.into());
    }

    pub fn end_edit(&mut self) {
        self.edit.recipe_id = None;
    }

    fn refilter(&mut self) {
        self.filtered = filter_recipes(&self.all, &self.search_term, self.category);
    }
}

pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Category predicate AND (empty term OR name/ingredients contain the term),
/// case-insensitive. Order of `all` is preserved.
pub fn filter_recipes(all: &[Recipe], term: &str, category: CategoryFilter) -> Vec<Recipe> {
    let term = normalize_term(term);

    all.iter()
        .filter(|recipe| category.matches(recipe.category))
        .filter(|recipe| {
            term.is_empty()
                || recipe.name.to_lowercase().contains(&term)
                || recipe.ingredients.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::model::Category;
    use proptest::prelude::*;

    fn recipe(id: &str, name: &str, category: Category, ingredients: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: name.to_string(),
            category,
            ingredients: ingredients.to_string(),
            instructions: String::new(),
        }
    }

    fn sample() -> Vec<Recipe> {
        vec![
            recipe("1", "Bolillo", Category::PanBlanco, "Harina\nAgua\nSal"),
            recipe("2", "Concha", Category::PanDulce, "Harina\nAzúcar\nMantequilla"),
            recipe("3", "Margarita", Category::Pizza, "Masa\nTomate\nQueso"),
        ]
    }

    #[test]
    fn test_search_matches_name_or_ingredients_case_insensitive() {
        let mut store = RecipeStore::new();
        store.set_all(sample());

        store.set_search_term("  QUESO ");
        assert_eq!(store.search_term(), "queso");
        let ids: Vec<_> = store.filtered().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["3"]);

        store.set_search_term("concha");
        assert_eq!(store.filtered().len(), 1);
        assert_eq!(store.filtered()[0].id, "2");
    }

    #[test]
    fn test_category_and_term_combine() {
        let mut store = RecipeStore::new();
        store.set_all(sample());

        store.set_search_term("harina");
        assert_eq!(store.filtered().len(), 2);

        store.set_category(CategoryFilter::Only(Category::PanDulce));
        assert_eq!(store.filtered().len(), 1);
        assert_eq!(store.filtered()[0].name, "Concha");

        store.set_search_term("");
        store.set_category(CategoryFilter::All);
        assert_eq!(store.filtered(), store.all());
    }

    #[test]
    fn test_new_listing_keeps_active_filters() {
        let mut store = RecipeStore::new();
        store.set_category(CategoryFilter::Only(Category::Pizza));
        store.set_all(sample());
        assert_eq!(store.filtered().len(), 1);
        assert_eq!(store.filtered()[0].id, "3");
    }

    #[test]
    fn test_edit_session_tracks_id() {
        let mut store = RecipeStore::new();
        assert!(!store.edit_session().is_active());

        store.begin_edit("2");
        assert!(store.edit_session().is_active());
        assert_eq!(store.edit_session().recipe_id(), Some("2"));

        store.end_edit();
        assert!(!store.edit_session().is_active());
        assert_eq!(store.edit_session().recipe_id(), None);
    }

    fn arb_category() -> impl Strategy<Value = Category> {
        prop::sample::select(Category::ALL.to_vec())
    }

    fn arb_recipe() -> impl Strategy<Value = Recipe> {
        ("[0-9]{1,3}", "[a-zA-Z ]{0,12}", arb_category(), "[a-zA-Z\n]{0,20}").prop_map(
            |(id, name, category, ingredients)| Recipe {
                id,
                name,
                category,
                ingredients,
                instructions: String::new(),
            },
        )
    }

    fn arb_filter() -> impl Strategy<Value = CategoryFilter> {
        prop_oneof![
            Just(CategoryFilter::All),
            arb_category().prop_map(CategoryFilter::Only),
        ]
    }

    proptest! {
        #[test]
        fn filtered_is_subset_satisfying_predicates(
            all in prop::collection::vec(arb_recipe(), 0..20),
            term in "[a-zA-Z]{0,3}",
            filter in arb_filter(),
        ) {
            let out = filter_recipes(&all, &term, filter);
            let needle = term.to_lowercase();
            for recipe in &out {
                prop_assert!(all.contains(recipe));
                prop_assert!(filter.matches(recipe.category));
                prop_assert!(
                    needle.is_empty()
                        || recipe.name.to_lowercase().contains(&needle)
                        || recipe.ingredients.to_lowercase().contains(&needle)
                );
            }
        }

        #[test]
        fn filtering_is_idempotent(
            all in prop::collection::vec(arb_recipe(), 0..20),
            term in "[a-zA-Z]{0,3}",
            filter in arb_filter(),
        ) {
            prop_assert_eq!(
                filter_recipes(&all, &term, filter),
                filter_recipes(&all, &term, filter)
            );
        }
    }
}
