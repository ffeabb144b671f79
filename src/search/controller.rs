use std::sync::Arc;

use log::{debug, info, warn};
use tokio::task::JoinSet;

use crate::catalog::Catalog;
use crate::error::FinderError;
use crate::model::Recipe;
use crate::search::plan::SearchPlan;
use crate::search::state::{SearchEvent, SearchState};

/// What happened to a finished search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Results replaced the previous collection
    Published { count: usize },
    /// Nothing was searched; previous results kept
    Unchanged,
    /// A newer search was issued meanwhile; this result was dropped
    Superseded { generation: u64 },
}

/// A compound search that has been issued but not run yet.
///
/// Owns everything it needs, so several can be in flight at once while the
/// controller keeps accepting input.
pub struct PendingSearch {
    generation: u64,
    plan: SearchPlan,
    catalog: Arc<dyn Catalog>,
}

/// Result of running a [`PendingSearch`], to be handed back to
/// [`SearchController::complete`].
#[derive(Debug)]
pub struct SearchOutcome {
    pub generation: u64,
    pub result: Result<Vec<Recipe>, FinderError>,
}

impl PendingSearch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn plan(&self) -> &SearchPlan {
        &self.plan
    }

    /// Issue the catalog calls for this search and merge their results.
    pub async fn run(self) -> SearchOutcome {
        let result = execute(self.catalog, &self.plan).await;
        SearchOutcome {
            generation: self.generation,
            result,
        }
    }
}

/// Owns the [`SearchState`] and turns search triggers into catalog calls.
pub struct SearchController {
    catalog: Arc<dyn Catalog>,
    state: SearchState,
}

impl SearchController {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            state: SearchState::default(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn results(&self) -> &[Recipe] {
        &self.state.results
    }

    pub fn selected(&self) -> Option<&Recipe> {
        self.state.selected.as_ref()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.dispatch(SearchEvent::QueryChanged(query.into()));
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.dispatch(SearchEvent::CategoryChanged(category.into()));
    }

    /// Issue a search for the current query and category.
    ///
    /// Returns `None` when there is nothing to search for. The returned
    /// search carries a fresh generation; only the latest generation may
    /// publish when completed.
    pub fn begin_search(&mut self) -> Option<PendingSearch> {
        let Some(plan) = SearchPlan::decide(&self.state.query, &self.state.category) else {
            debug!("Empty query with all categories, keeping previous results");
            return None;
        };

        let generation = self.state.latest_generation() + 1;
        self.dispatch(SearchEvent::SearchStarted { generation });
        info!("Starting search #{}: {:?}", generation, plan);

        Some(PendingSearch {
            generation,
            plan,
            catalog: Arc::clone(&self.catalog),
        })
    }

    /// Publish a finished search, unless a newer one was issued meanwhile.
    ///
    /// A failure of the current search is recorded as a notice, leaves the
    /// previous results untouched and is returned to the caller.
    pub fn complete(&mut self, outcome: SearchOutcome) -> Result<Completion, FinderError> {
        let generation = outcome.generation;
        if !self.state.is_current(generation) {
            debug!(
                "Discarding search #{} superseded by #{}",
                generation,
                self.state.latest_generation()
            );
            return Ok(Completion::Superseded { generation });
        }

        match outcome.result {
            Ok(recipes) => {
                let count = recipes.len();
                info!("Search #{} published {} recipes", generation, count);
                self.dispatch(SearchEvent::ResultsPublished {
                    generation,
                    recipes,
                });
                Ok(Completion::Published { count })
            }
            Err(e) => {
                warn!("Search #{} failed: {}", generation, e);
                self.dispatch(SearchEvent::SearchFailed {
                    generation,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Run a search to completion for the current query and category.
    pub async fn search(&mut self) -> Result<Completion, FinderError> {
        match self.begin_search() {
            Some(pending) => {
                let outcome = pending.run().await;
                self.complete(outcome)
            }
            None => Ok(Completion::Unchanged),
        }
    }

    /// Open the detail view for the card at `index`.
    pub fn select(&mut self, index: usize) -> Option<&Recipe> {
        self.dispatch(SearchEvent::RecipeSelected(index));
        self.selected()
    }

    pub fn close_detail(&mut self) {
        self.dispatch(SearchEvent::DetailClosed);
    }

    fn dispatch(&mut self, event: SearchEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event);
    }
}

async fn execute(
    catalog: Arc<dyn Catalog>,
    plan: &SearchPlan,
) -> Result<Vec<Recipe>, FinderError> {
    match plan {
        SearchPlan::ByName { query } => catalog.search_by_name(query).await,
        SearchPlan::ByNameInCategory { query, category } => {
            let recipes = catalog.search_by_name(query).await?;
            Ok(recipes
                .into_iter()
                .filter(|r| &r.category == category)
                .collect())
        }
        SearchPlan::ByCategory { category } => fetch_category(catalog, category).await,
    }
}

/// Filter by category, then look every partial record up concurrently.
///
/// Results keep the filter order and are returned only once every lookup
/// has settled. A lookup that errors or finds nothing fails the batch.
async fn fetch_category(
    catalog: Arc<dyn Catalog>,
    category: &str,
) -> Result<Vec<Recipe>, FinderError> {
    let summaries = catalog.filter_by_category(category).await?;
    let total = summaries.len();
    debug!("Looking up {} recipes in '{}'", total, category);

    let ids: Vec<String> = summaries.into_iter().map(|s| s.id).collect();
    let mut lookups = JoinSet::new();
    for (index, id) in ids.iter().cloned().enumerate() {
        let catalog = Arc::clone(&catalog);
        lookups.spawn(async move { (index, catalog.lookup_by_id(&id).await) });
    }

    let mut slots: Vec<Option<Recipe>> = vec![None; total];
    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((index, Ok(Some(recipe)))) => slots[index] = Some(recipe),
            Ok((index, Ok(None))) => warn!("Recipe {} not found in catalog", ids[index]),
            Ok((index, Err(e))) => warn!("Lookup of recipe {} failed: {}", ids[index], e),
            Err(e) => warn!("Lookup task aborted: {}", e),
        }
    }

    let failed: Vec<String> = slots
        .iter()
        .zip(&ids)
        .filter(|(slot, _)| slot.is_none())
        .map(|(_, id)| id.clone())
        .collect();
    if !failed.is_empty() {
        return Err(FinderError::PartialLookupFailure { failed, total });
    }

    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecipeSummary;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    fn recipe(id: &str, name: &str, category: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: name.to_string(),
            thumbnail: format!("https://example.com/{}.jpg", id),
            category: category.to_string(),
            area: "British".to_string(),
            instructions: format!("Make {}.", name),
            source: None,
        }
    }

    /// In-memory catalog that records every call and can delay or fail some
    #[derive(Default)]
    struct FakeCatalog {
        by_name: HashMap<String, Vec<Recipe>>,
        by_category: HashMap<String, Vec<String>>,
        records: HashMap<String, Recipe>,
        failing_ids: HashSet<String>,
        name_delays: HashMap<String, Duration>,
        lookup_delays: HashMap<String, Duration>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn list_categories(&self) -> Result<Vec<String>, FinderError> {
            self.record("list".to_string());
            Ok(self.by_category.keys().cloned().collect())
        }

        async fn search_by_name(&self, text: &str) -> Result<Vec<Recipe>, FinderError> {
            self.record(format!("search:{}", text));
            if let Some(delay) = self.name_delays.get(text) {
                tokio::time::sleep(*delay).await;
            }
            Ok(self.by_name.get(text).cloned().unwrap_or_default())
        }

        async fn filter_by_category(
            &self,
            category: &str,
        ) -> Result<Vec<RecipeSummary>, FinderError> {
            self.record(format!("filter:{}", category));
            let ids = self.by_category.get(category).cloned().unwrap_or_default();
            Ok(ids
                .into_iter()
                .map(|id| RecipeSummary {
                    name: format!("Recipe {}", id),
                    thumbnail: String::new(),
                    id,
                })
                .collect())
        }

        async fn lookup_by_id(&self, id: &str) -> Result<Option<Recipe>, FinderError> {
            self.record(format!("lookup:{}", id));
            if let Some(delay) = self.lookup_delays.get(id) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing_ids.contains(id) {
                return Err(FinderError::InvalidResponse("boom".to_string()));
            }
            Ok(self.records.get(id).cloned())
        }
    }

    fn seafood_catalog() -> FakeCatalog {
        let mut catalog = FakeCatalog::default();
        let salmon = recipe("52959", "Baked salmon", "Seafood");
        let tacos = recipe("52819", "Fish tacos", "Seafood");
        let pie = recipe("52802", "Fish pie", "Seafood");
        let fish_curry = recipe("53000", "Fish curry", "Curry");

        catalog.by_name.insert(
            "fish".to_string(),
            vec![tacos.clone(), fish_curry, pie.clone()],
        );
        catalog.by_category.insert(
            "Seafood".to_string(),
            vec!["52959".into(), "52819".into(), "52802".into()],
        );
        for r in [salmon, tacos, pie] {
            catalog.records.insert(r.id.clone(), r);
        }
        catalog
    }

    #[tokio::test]
    async fn test_empty_query_all_issues_no_call() {
        let catalog = Arc::new(seafood_catalog());
        let mut controller = SearchController::new(catalog.clone());

        assert!(controller.begin_search().is_none());
        let completion = controller.search().await.unwrap();
        assert_eq!(completion, Completion::Unchanged);
        assert!(catalog.calls().is_empty());
        assert_eq!(controller.state().latest_generation(), 0);
    }

    #[tokio::test]
    async fn test_empty_query_all_keeps_previous_results() {
        let catalog = Arc::new(seafood_catalog());
        let mut controller = SearchController::new(catalog.clone());
        controller.set_query("fish");
        controller.search().await.unwrap();
        let before = controller.results().to_vec();

        controller.set_query("");
        assert_eq!(controller.search().await.unwrap(), Completion::Unchanged);
        assert_eq!(controller.results(), before.as_slice());
        assert_eq!(catalog.calls(), vec!["search:fish"]);
    }

    #[tokio::test]
    async fn test_name_search_results_verbatim() {
        let catalog = Arc::new(seafood_catalog());
        let mut controller = SearchController::new(catalog.clone());
        controller.set_query("fish");

        let completion = controller.search().await.unwrap();
        assert_eq!(completion, Completion::Published { count: 3 });
        assert_eq!(controller.results(), catalog.by_name["fish"].as_slice());
        assert_eq!(catalog.calls(), vec!["search:fish"]);
    }

    #[tokio::test]
    async fn test_name_search_in_category_filters_locally() {
        let catalog = Arc::new(seafood_catalog());
        let mut controller = SearchController::new(catalog.clone());
        controller.set_query("fish");
        controller.set_category("Seafood");

        controller.search().await.unwrap();
        let ids: Vec<&str> = controller.results().iter().map(|r| r.id.as_str()).collect();
        // Curry dropped, order of the name search kept, salmon never seen
        assert_eq!(ids, vec!["52819", "52802"]);
        assert_eq!(catalog.calls(), vec!["search:fish"]);
    }

    #[tokio::test]
    async fn test_category_search_looks_up_every_record() {
        let catalog = Arc::new(seafood_catalog());
        let mut controller = SearchController::new(catalog.clone());
        controller.set_category("Seafood");

        let completion = controller.search().await.unwrap();
        assert_eq!(completion, Completion::Published { count: 3 });

        let ids: Vec<&str> = controller.results().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["52959", "52819", "52802"]);
        assert!(controller
            .results()
            .iter()
            .all(|r| !r.instructions.is_empty() && r.area == "British"));

        let calls = catalog.calls();
        assert_eq!(calls[0], "filter:Seafood");
        assert_eq!(calls.iter().filter(|c| c.starts_with("lookup:")).count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_category_lookups_run_concurrently() {
        let mut fake = seafood_catalog();
        fake.lookup_delays
            .insert("52959".to_string(), Duration::from_millis(300));
        fake.lookup_delays
            .insert("52819".to_string(), Duration::from_millis(100));
        fake.lookup_delays
            .insert("52802".to_string(), Duration::from_millis(100));
        let mut controller = SearchController::new(Arc::new(fake));
        controller.set_category("Seafood");

        let started = tokio::time::Instant::now();
        controller.search().await.unwrap();
        let elapsed = started.elapsed();

        // One after another would take 500ms
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(400), "took {:?}", elapsed);

        // The slowest lookup still lands in filter order
        let ids: Vec<&str> = controller.results().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["52959", "52819", "52802"]);
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_previous_results() {
        let mut fake = seafood_catalog();
        fake.failing_ids.insert("52819".to_string());
        let catalog = Arc::new(fake);
        let mut controller = SearchController::new(catalog.clone());

        controller.set_query("fish");
        controller.search().await.unwrap();
        let before = controller.results().to_vec();

        controller.set_query("");
        controller.set_category("Seafood");
        let err = controller.search().await.unwrap_err();
        match err {
            FinderError::PartialLookupFailure { failed, total } => {
                assert_eq!(failed, vec!["52819"]);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(controller.results(), before.as_slice());
        assert!(controller.state().notice.is_some());
        assert!(!controller.state().is_searching());
    }

    #[tokio::test]
    async fn test_missing_record_counts_as_failed_lookup() {
        let mut fake = seafood_catalog();
        fake.records.remove("52802");
        let mut controller = SearchController::new(Arc::new(fake));
        controller.set_category("Seafood");

        let result = controller.search().await;
        assert!(matches!(
            result,
            Err(FinderError::PartialLookupFailure { ref failed, total: 3 }) if failed == &["52802"]
        ));
        assert!(controller.results().is_empty());
    }

    #[tokio::test]
    async fn test_empty_category_publishes_empty_list() {
        let catalog = Arc::new(seafood_catalog());
        let mut controller = SearchController::new(catalog);
        controller.set_category("Goat");

        let completion = controller.search().await.unwrap();
        assert_eq!(completion, Completion::Published { count: 0 });
        assert!(controller.state().notice.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_search_wins_over_slower_earlier_one() {
        let mut fake = seafood_catalog();
        fake.by_name
            .insert("pie".to_string(), vec![recipe("52802", "Fish pie", "Seafood")]);
        fake.name_delays
            .insert("fish".to_string(), Duration::from_millis(500));
        fake.name_delays
            .insert("pie".to_string(), Duration::from_millis(10));
        let mut controller = SearchController::new(Arc::new(fake));

        controller.set_query("fish");
        let first = controller.begin_search().unwrap();
        controller.set_query("pie");
        let second = controller.begin_search().unwrap();
        assert!(second.generation() > first.generation());

        let mut running = JoinSet::new();
        running.spawn(first.run());
        running.spawn(second.run());

        let mut completions = Vec::new();
        while let Some(outcome) = running.join_next().await {
            completions.push(controller.complete(outcome.unwrap()).unwrap());
        }

        assert_eq!(
            completions,
            vec![
                Completion::Published { count: 1 },
                Completion::Superseded { generation: 1 }
            ]
        );
        let ids: Vec<&str> = controller.results().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["52802"]);
        assert!(!controller.state().is_searching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_search_finishing_first_is_discarded() {
        let mut fake = seafood_catalog();
        fake.by_name
            .insert("pie".to_string(), vec![recipe("52802", "Fish pie", "Seafood")]);
        fake.name_delays
            .insert("fish".to_string(), Duration::from_millis(10));
        fake.name_delays
            .insert("pie".to_string(), Duration::from_millis(500));
        let mut controller = SearchController::new(Arc::new(fake));

        controller.set_query("fish");
        let first = controller.begin_search().unwrap();
        controller.set_query("pie");
        let second = controller.begin_search().unwrap();

        let first_outcome = first.run().await;
        assert_eq!(
            controller.complete(first_outcome).unwrap(),
            Completion::Superseded { generation: 1 }
        );
        assert!(controller.results().is_empty());
        assert!(controller.state().is_searching());

        let second_outcome = second.run().await;
        assert_eq!(
            controller.complete(second_outcome).unwrap(),
            Completion::Published { count: 1 }
        );
    }

    #[tokio::test]
    async fn test_select_then_close_keeps_results() {
        let catalog = Arc::new(seafood_catalog());
        let mut controller = SearchController::new(catalog.clone());
        controller.set_query("fish");
        controller.search().await.unwrap();
        let before = controller.results().to_vec();

        let picked = controller.select(2).cloned().unwrap();
        assert_eq!(picked, before[2]);

        controller.close_detail();
        assert!(controller.selected().is_none());
        assert_eq!(controller.results(), before.as_slice());
        // Selection never hits the network
        assert_eq!(catalog.calls().len(), 1);
    }
}
