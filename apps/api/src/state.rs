use std::sync::Arc;

use crate::config::Config;
use crate::matching::service::MatchService;
use crate::storage::ResultStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Collaborators are built once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<MatchService>,
    /// Also used directly by the image-labeling route.
    pub results: Arc<ResultStore>,
    pub config: Config,
}
