//! Syllabus Web Server
//!
//! Axum REST API over the curriculum knowledge graph.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use syllabus_graph::CatalogStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::AppError;
pub use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health))
        // Concepts
        .route(
            "/concepts",
            get(routes::concepts::list_concepts).post(routes::concepts::create_concept),
        )
        .route(
            "/concepts/{id}",
            get(routes::concepts::get_concept)
                .put(routes::concepts::update_concept)
                .delete(routes::concepts::delete_concept),
        )
        .route("/concepts/{id}/children", get(routes::concepts::get_children))
        .route("/concepts/{id}/parent", get(routes::concepts::get_parent))
        .route(
            "/concepts/{id}/prerequisites",
            get(routes::concepts::get_prerequisites).post(routes::concepts::add_prerequisite),
        )
        // Resources
        .route(
            "/resources",
            get(routes::resources::list_resources).post(routes::resources::create_resource),
        )
        .route(
            "/resources/{id}",
            get(routes::resources::get_resource)
                .put(routes::resources::update_resource)
                .delete(routes::resources::delete_resource),
        )
        // Questions
        .route(
            "/questions",
            get(routes::questions::list_questions).post(routes::questions::create_question),
        )
        .route(
            "/questions/{id}",
            get(routes::questions::get_question)
                .put(routes::questions::update_question)
                .delete(routes::questions::delete_question),
        )
        // Learning paths
        .route(
            "/learning-paths",
            axum::routing::post(routes::learning_paths::create_learning_path),
        )
        .route(
            "/learning-paths/{id}",
            get(routes::learning_paths::get_learning_path).put(routes::learning_paths::update_learning_path),
        )
        .route(
            "/users/{id}/learning-paths",
            get(routes::learning_paths::list_user_learning_paths),
        )
        .layer(middleware::from_fn(auth::identify))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(store: Arc<dyn CatalogStore>, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
