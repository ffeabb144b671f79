use crate::model::ALL_CATEGORIES;

/// Which catalog calls a search trigger turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// One name search, results used verbatim
    ByName { query: String },
    /// One name search, narrowed locally to a single category.
    ///
    /// Recipes of the category that the name search does not return are
    /// never seen; the catalog has no combined endpoint.
    ByNameInCategory { query: String, category: String },
    /// Category filter followed by a detail lookup for every partial record
    ByCategory { category: String },
}

impl SearchPlan {
    /// Decide the plan for the given query text and selected category.
    ///
    /// `None` means there is nothing to search for and previous results stay
    /// as they are. Whitespace-only queries count as empty.
    pub fn decide(query: &str, category: &str) -> Option<Self> {
        let query = query.trim();
        let all = category.is_empty() || category == ALL_CATEGORIES;

        let plan = match (query.is_empty(), all) {
            (true, true) => return None,
            (false, true) => SearchPlan::ByName {
                query: query.to_string(),
            },
            (false, false) => SearchPlan::ByNameInCategory {
                query: query.to_string(),
                category: category.to_string(),
            },
            (true, false) => SearchPlan::ByCategory {
                category: category.to_string(),
            },
        };
        Some(plan)
    }
}
