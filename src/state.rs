use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, evaluator::PromptEvaluator, storage::Storage};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Storage>,
    pub evaluator: Arc<PromptEvaluator>,
    pub config: Config,
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
