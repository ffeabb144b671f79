//! Search TheMealDB recipe catalog by name or category.
//!
//! [`MealDbClient`] wraps the catalog's read endpoints behind the [`Catalog`]
//! trait. [`SearchController`] owns the search state, decides which calls a
//! search needs, merges their results and tracks the selected recipe.
//!
//! ```no_run
//! use std::sync::Arc;
//! use recipe_finder::{CatalogConfig, MealDbClient, SearchController};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Arc::new(MealDbClient::new(&CatalogConfig::default())?);
//! let mut controller = SearchController::new(catalog);
//! controller.set_category("Seafood");
//! controller.search().await?;
//! for recipe in controller.results() {
//!     println!("{} ({})", recipe.name, recipe.subtitle());
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod search;

pub use catalog::{load_categories, Catalog, MealDbClient};
pub use config::{load_config, CatalogConfig, FinderConfig};
pub use error::FinderError;
pub use model::{CategoryList, Recipe, RecipeSummary, ALL_CATEGORIES};
pub use search::{
    Completion, PendingSearch, Phase, SearchController, SearchEvent, SearchOutcome, SearchPlan,
    SearchState,
};
