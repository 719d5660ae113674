use utoipa_axum::{router::OpenApiRouter, routes};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/grievances", grievance_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/officers", officer_routes(config))
        .nest("/photos", photo_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn grievance_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::grievance::list_grievances))
        .routes(routes!(handlers::grievance::get_grievance))
        .routes(routes!(handlers::grievance::claim_grievance))
        .routes(routes!(handlers::grievance::resolve_grievance))
}

fn dashboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::dashboard::dashboard_stats))
}

fn officer_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::profile::update_profile))
        .layer(handlers::profile::profile_body_limit(
            config.storage.max_photo_size,
        ))
}

fn photo_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::profile::serve_photo))
}
