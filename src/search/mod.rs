mod controller;
mod plan;
mod state;

pub use controller::{Completion, PendingSearch, SearchController, SearchOutcome};
pub use plan::SearchPlan;
pub use state::{Phase, SearchEvent, SearchState};
