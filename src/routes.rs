use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{protected, public};
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&config.security))
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)),
        );

    if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::info::root))
        .route("/about", get(public::info::about))
        .route("/health", get(public::info::health))
        .route("/users", get(public::users::list).post(public::users::register))
        .route("/users/login", post(public::users::login))
        .route("/users/refresh", post(public::users::refresh))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/users/:id",
            get(protected::users::get)
                .put(protected::users::update)
                .delete(protected::users::delete),
        )
        .route("/posts", get(protected::posts::list).post(protected::posts::create))
        .route("/posts/:id", get(protected::posts::get).put(protected::posts::update))
        .route("/posts/:id/delete", put(protected::posts::delete))
        // route_layer so unknown paths still 404 instead of 401
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// CORS from config. Disabled means no origin is allowed; `*` allows any.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origin = if security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = security
            .cors_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
