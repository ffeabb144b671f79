use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::error::FinderError;
use crate::model::{Recipe, RecipeSummary};

/// Every endpoint wraps its records in `{"meals": [...]}`; `meals` is `null`
/// or missing when nothing matched.
#[derive(Debug, Deserialize)]
struct MealsEnvelope<T> {
    meals: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    #[serde(rename = "strCategory")]
    name: String,
}

/// HTTP client for TheMealDB
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    /// Create a client from configuration
    pub fn new(config: &CatalogConfig) -> Result<Self, FinderError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(MealDbClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        MealDbClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_meals<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, FinderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, params);

        let body = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let envelope: MealsEnvelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.meals.unwrap_or_default())
    }
}

#[async_trait]
impl Catalog for MealDbClient {
    async fn list_categories(&self) -> Result<Vec<String>, FinderError> {
        let entries: Vec<CategoryEntry> = self.get_meals("list.php", &[("c", "list")]).await?;
        Ok(entries.into_iter().map(|c| c.name).collect())
    }

    async fn search_by_name(&self, text: &str) -> Result<Vec<Recipe>, FinderError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FinderError::EmptyQuery);
        }
        self.get_meals("search.php", &[("s", text)]).await
    }

    async fn filter_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<RecipeSummary>, FinderError> {
        self.get_meals("filter.php", &[("c", category)]).await
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Option<Recipe>, FinderError> {
        let meals: Vec<Recipe> = self.get_meals("lookup.php", &[("i", id)]).await?;
        Ok(meals.into_iter().next())
    }
}
