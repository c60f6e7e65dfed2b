use axum::{
    handler::HandlerWithoutStateExt,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::require_session;
use crate::error::{
    endpoint_not_found, json_payload_too_large, method_not_allowed, panic_response,
};
use crate::handlers::{
    auth_status, create_list, delete_list, get_list, get_lists, get_shared_list, health_check,
    login, logout, update_list, update_shared_item_checkbox,
};
use crate::state::ServerState;

/// Request body limit for API requests
pub const MAX_API_BODY_SIZE: usize = 1024 * 1024;

/// Build the application router
pub fn build_router(state: ServerState) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/status", get(auth_status))
        .route("/api/share/{list_id}", get(get_shared_list))
        .route(
            "/api/share/{list_id}/item/{item_index}",
            patch(update_shared_item_checkbox),
        );

    let protected_routes = Router::new()
        .route("/api/lists", get(get_lists).post(create_list))
        .route(
            "/api/lists/{list_id}",
            get(get_list).put(update_list).delete(delete_list),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .method_not_allowed_fallback(method_not_allowed);

    // The frontend, when configured, answers everything the API does not
    let app = match &state.config.static_directory {
        Some(dir) => app.fallback_service(
            ServeDir::new(dir).not_found_service(endpoint_not_found.into_service()),
        ),
        None => app.fallback(endpoint_not_found),
    };

    let cors_origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(cors_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    app.layer(RequestBodyLimitLayer::new(MAX_API_BODY_SIZE))
        .layer(middleware::map_response(json_payload_too_large))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
