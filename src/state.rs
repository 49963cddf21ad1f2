use std::sync::Arc;

use axum::extract::FromRef;
use tokio_util::sync::CancellationToken;

use crate::service::CommentService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CommentService>,
    /// Cancelled on process shutdown. Handlers hand a child token to the service.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(service: CommentService, shutdown: CancellationToken) -> Self {
        Self {
            service: Arc::new(service),
            shutdown,
        }
    }
}

impl FromRef<AppState> for Arc<CommentService> {
    fn from_ref(state: &AppState) -> Self {
        state.service.clone()
    }
}

impl FromRef<AppState> for CancellationToken {
    fn from_ref(state: &AppState) -> Self {
        state.shutdown.clone()
    }
}
