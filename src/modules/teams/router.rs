use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_team, delete_team, get_team, list_teams, update_team};

/// Mounted behind the super-admin layer in the root router.
pub fn init_teams_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_team).get(list_teams))
        .route("/{id}", get(get_team).put(update_team).delete(delete_team))
}
