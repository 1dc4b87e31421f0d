//! API route table.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::state::AppState;

/// Build the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/bookings/check-availability",
            get(handlers::check_availability),
        )
        .route(
            "/api/bookings/unavailable-dates",
            get(handlers::unavailable_dates),
        )
        .route(
            "/api/bookings",
            post(handlers::create_booking).get(handlers::list_bookings),
        )
        .route("/api/bookings/invites/accept", post(handlers::accept_invite))
        .route("/api/bookings/{id}", get(handlers::get_booking))
        .route("/api/bookings/{id}/invite-link", get(handlers::invite_link))
        .route(
            "/api/bookings/{id}/invite-link/regenerate",
            post(handlers::regenerate_invite_link),
        )
        .route(
            "/api/estimates",
            post(handlers::create_estimate).get(handlers::list_estimates),
        )
        .route(
            "/api/packages",
            post(handlers::create_package).get(handlers::list_packages),
        )
        .route("/api/packages/suggest", get(handlers::suggest_package))
        .route(
            "/api/packages/{id}",
            get(handlers::get_package)
                .put(handlers::update_package)
                .delete(handlers::delete_package),
        )
        .route("/api/posts", post(handlers::create_post))
        .route("/api/posts/{id}", get(handlers::get_post))
        .route(
            "/api/posts/{id}/package-settings",
            put(handlers::update_package_settings),
        )
        .route(
            "/api/journey/{postId}",
            get(handlers::get_journey).put(handlers::put_journey),
        )
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
