use serde::{Deserialize, Deserializer, Serialize};

/// Label of the synthetic category that means "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// A full-detail recipe as returned by the name search and id lookup endpoints.
///
/// Field names follow the catalog's wire format so records can be decoded
/// directly from a `meals` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default, deserialize_with = "null_as_empty")]
    pub thumbnail: String,
    #[serde(rename = "strCategory", default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(rename = "strArea", default, deserialize_with = "null_as_empty")]
    pub area: String,
    #[serde(rename = "strInstructions", default, deserialize_with = "null_as_empty")]
    pub instructions: String,
    /// Link to the original article, if the catalog knows one
    #[serde(rename = "strSource", default, deserialize_with = "blank_as_none")]
    pub source: Option<String>,
}

impl Recipe {
    /// Card subtitle, e.g. `Seafood • Japanese`
    pub fn subtitle(&self) -> String {
        format!("{} • {}", self.category, self.area)
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// A partial record as returned by the category filter endpoint: only the
/// identifying fields are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default, deserialize_with = "null_as_empty")]
    pub thumbnail: String,
}

/// Category names offered to the user, with [`ALL_CATEGORIES`] first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryList {
    names: Vec<String>,
}

impl CategoryList {
    /// Build the list from the catalog's category names, prepending the
    /// "All" sentinel.
    pub fn new(names: Vec<String>) -> Self {
        let mut all = Vec::with_capacity(names.len() + 1);
        all.push(ALL_CATEGORIES.to_string());
        all.extend(names.into_iter().filter(|n| n != ALL_CATEGORIES));
        Self { names: all }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Never true: the sentinel is always present.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for CategoryList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}
