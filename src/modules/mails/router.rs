use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_mail, delete_mail, delete_many_mails, get_mail, list_mails, update_mail,
};

pub fn init_mails_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_mail).get(list_mails))
        .route("/{id}", get(get_mail).put(update_mail).delete(delete_mail))
        .route("/delete-many", post(delete_many_mails))
}
