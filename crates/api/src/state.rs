use std::sync::Arc;

use folio_core::store::FormStore;
use folio_core::upload::FileUploader;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Portfolio, question, and submission persistence.
    pub store: Arc<dyn FormStore>,
    /// Attachment storage for `file` answers.
    pub uploader: Arc<dyn FileUploader>,
    pub config: Arc<ServerConfig>,
}
