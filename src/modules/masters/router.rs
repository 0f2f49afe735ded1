use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_master, delete_master, get_master, list_masters, update_master};

pub fn init_masters_router() -> Router<AppState> {
    Router::new()
        .route("/{kind}", post(create_master).get(list_masters))
        .route(
            "/{kind}/{id}",
            get(get_master).put(update_master).delete(delete_master),
        )
}
