mod mealdb;

pub use mealdb::MealDbClient;

use async_trait::async_trait;
use log::info;

use crate::error::FinderError;
use crate::model::{CategoryList, Recipe, RecipeSummary};

/// Read-only access to a recipe catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Category names in the order the catalog lists them
    async fn list_categories(&self) -> Result<Vec<String>, FinderError>;

    /// Full-detail recipes whose name matches `text`.
    ///
    /// Returns [`FinderError::EmptyQuery`] for empty text.
    async fn search_by_name(&self, text: &str) -> Result<Vec<Recipe>, FinderError>;

    /// Partial records of every recipe in `category`
    async fn filter_by_category(&self, category: &str)
        -> Result<Vec<RecipeSummary>, FinderError>;

    /// Full detail of one recipe, `None` if the id is unknown
    async fn lookup_by_id(&self, id: &str) -> Result<Option<Recipe>, FinderError>;
}

/// Fetch the category list shown to the user, "All" first.
pub async fn load_categories(catalog: &dyn Catalog) -> Result<CategoryList, FinderError> {
    let names = catalog.list_categories().await?;
    info!("Loaded {} categories", names.len());
    Ok(CategoryList::new(names))
}
