use crate::model::{Recipe, ALL_CATEGORIES};

/// Whether a search is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// The latest issued search has not settled yet
    Searching { generation: u64 },
}

/// Everything the presentation layer renders.
///
/// Updated only through [`SearchState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub category: String,
    /// Results of the most recent search that was allowed to publish
    pub results: Vec<Recipe>,
    /// Recipe shown in the detail view, if any
    pub selected: Option<Recipe>,
    pub phase: Phase,
    /// User-visible message about the last failed search
    pub notice: Option<String>,
    latest_generation: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
            results: Vec::new(),
            selected: None,
            phase: Phase::Idle,
            notice: None,
            latest_generation: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    QueryChanged(String),
    CategoryChanged(String),
    /// A compound search was issued under `generation`
    SearchStarted { generation: u64 },
    ResultsPublished { generation: u64, recipes: Vec<Recipe> },
    SearchFailed { generation: u64, message: String },
    /// A card at this position in `results` was picked
    RecipeSelected(usize),
    DetailClosed,
}

impl SearchState {
    /// Generation of the most recently issued search, 0 before the first one
    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    /// Whether a completion tagged with `generation` may still publish
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest_generation
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.phase, Phase::Searching { .. })
    }

    /// Produce the next state.
    ///
    /// Completions whose generation is not the latest issued leave the state
    /// untouched, as do selections outside the result list.
    pub fn apply(mut self, event: SearchEvent) -> Self {
        match event {
            SearchEvent::QueryChanged(query) => self.query = query,
            SearchEvent::CategoryChanged(category) => self.category = category,
            SearchEvent::SearchStarted { generation } => {
                if generation > self.latest_generation {
                    self.latest_generation = generation;
                    self.phase = Phase::Searching { generation };
                }
            }
            SearchEvent::ResultsPublished {
                generation,
                recipes,
            } => {
                if self.is_current(generation) {
                    self.results = recipes;
                    self.phase = Phase::Idle;
                    self.notice = None;
                }
            }
            SearchEvent::SearchFailed {
                generation,
                message,
            } => {
                if self.is_current(generation) {
                    self.phase = Phase::Idle;
                    self.notice = Some(message);
                }
            }
            SearchEvent::RecipeSelected(index) => {
                if let Some(recipe) = self.results.get(index) {
                    self.selected = Some(recipe.clone());
                }
            }
            SearchEvent::DetailClosed => self.selected = None,
        }
        self
    }
}
