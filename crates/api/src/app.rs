use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::middleware::AuthMiddleware;
use crate::error::AppError;
use crate::routes;
use crate::state::AppState;

/// Build the router: public pages, then everything behind the bearer check.
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.request_timeout;

    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/callback", post(routes::auth::callback))
        .route("/events", get(routes::events::list_events))
        .route("/events/:id", get(routes::events::get_event))
        .route("/players", get(routes::players::list_players))
        .route("/api/players/:id", get(routes::players::get_player))
        .route("/api/profile", post(routes::players::create_profile));

    let protected = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route("/auth/logout", post(routes::auth::logout))
        .route(
            "/events/:id/registration",
            get(routes::registrations::registration_page)
                .post(routes::registrations::confirm_registration),
        )
        .route(
            "/events/:id/payment-proof",
            post(routes::registrations::upload_payment_proof),
        )
        .route(
            "/profile",
            get(routes::profile::profile_page)
                .post(routes::profile::complete_profile)
                .put(routes::profile::update_profile),
        )
        .route("/profile/photo", post(routes::profile::upload_photo))
        .route(
            "/documents",
            get(routes::documents::list).post(routes::documents::upload),
        )
        .route("/documents/:id/url", get(routes::documents::document_url))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            AuthMiddleware::require_auth,
        ));

    public
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
}

/// Liveness plus a quick DB round trip.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    infra::db::ping(&state.db).await?;
    Ok("ok")
}
