use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use log::info;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod doc;
mod dtos;
mod error;
mod routes;
mod utils;

use doc::ApiDoc;
use routes::{assignment, enrollment, health, root, section};
use utils::shutdown::shutdown_signal;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    // The browser UI is served from localhost:3000
    let cors = CorsLayer::new()
        .allow_origin(
            "http://localhost:3000"
                .parse::<HeaderValue>()
                .expect("valid origin"),
        )
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route(
            "/sections/{section_no}/assignments",
            get(assignment::get_section_assignments),
        )
        .route(
            "/assignments",
            get(assignment::get_student_assignments)
                .post(assignment::create_assignment)
                .put(assignment::update_assignment),
        )
        .route(
            "/assignments/{assignment_id}",
            delete(assignment::delete_assignment),
        )
        .route(
            "/assignments/{assignment_id}/grades",
            get(assignment::get_assignment_grades),
        )
        .route("/grades", put(assignment::update_grades))
        .route("/sections", get(section::get_instructor_sections))
        .route(
            "/sections/{section_no}/enrollments",
            get(enrollment::get_enrollments),
        )
        .route("/enrollments", put(enrollment::update_final_grades))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(CompressionLayer::new());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    info!("Running axum on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}
