use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use patentcliff_auth::auth_routes;

use crate::{
    handlers::{
        drugs::{
            drug_patents, drugs_by_disease, expiring_patents, get_drug, list_diseases, list_drugs,
            search_drugs,
        },
        health::{health, root},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api_routes = Router::new()
        .route("/health", get(health))
        // Drug routes
        .route("/drugs", get(list_drugs))
        .route("/drugs/search", get(search_drugs))
        .route("/drugs/expiring", get(expiring_patents))
        .route("/drugs/diseases", get(list_diseases))
        .route("/drugs/disease/{disease}", get(drugs_by_disease))
        .route("/drugs/{app_no}", get(get_drug))
        .route("/drugs/{app_no}/patents", get(drug_patents))
        // Auth routes
        .nest("/auth", auth_routes().with_state(state.auth.clone()));

    let request_timeout = state.request_timeout;

    Router::new()
        .route("/", get(root))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
