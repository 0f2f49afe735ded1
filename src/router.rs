use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::gate::route_gate;
use crate::middleware::role::{require_admin, require_super_admin};
use crate::modules::audit_logs::router::init_audit_logs_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::mails::router::init_mails_router;
use crate::modules::masters::router::init_masters_router;
use crate::modules::teams::router::init_teams_router;
use crate::modules::users::router::init_users_router;
use crate::pages::{dashboard_page, login_page};
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    // The root path carries no handler of its own: the gate redirects it
    // before routing ever matters.
    let pages = Router::new()
        .route("/", get(login_page))
        .route("/login", get(login_page))
        .route("/dashboard", get(dashboard_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), route_gate));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(pages)
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/mails", init_mails_router())
                .nest("/masters", init_masters_router())
                .nest(
                    "/teams",
                    init_teams_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_super_admin,
                    )),
                )
                .nest(
                    "/users",
                    init_users_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest(
                    "/audit-logs",
                    init_audit_logs_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                ),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
