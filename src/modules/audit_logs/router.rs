use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::list_audit_logs;

/// Mounted behind the admin layer in the root router.
pub fn init_audit_logs_router() -> Router<AppState> {
    Router::new().route("/", get(list_audit_logs))
}
