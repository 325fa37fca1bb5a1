use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/activities", get(handlers::list_activities))
        .route(
            "/activities/:date",
            get(handlers::get_activity)
                .put(handlers::put_activity)
                .delete(handlers::delete_activity),
        )
        .route("/grid", get(handlers::get_grid))
        .route("/overview", get(handlers::get_overview));

    Router::new()
        .route("/", get(handlers::index))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
