pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod validation;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

pub use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

/// Build the full application router over `state`.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()));

    let mut app = Router::new()
        .route("/", get(public::system::root))
        .route(API_PREFIX, get(public::system::root))
        .route(&format!("{}/", API_PREFIX), get(public::system::root))
        .route("/health", get(public::system::health))
        .nest(API_PREFIX, api)
        .fallback(public::system::not_found)
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&state.config.security) {
        app = app.layer(cors);
    }
    if state.config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
    .with_state(state)
}

/// Collection paths answer with and without the trailing slash.
fn collection<S>(router: Router<S>, path: &str, method_router: MethodRouter<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

fn public_routes() -> Router<AppState> {
    let router = Router::new()
        .route("/user/register", post(public::user::register_post))
        .route("/user/login", post(public::user::login_post))
        .route("/organization/:id", get(public::organization::organization_show));
    let router = collection(router, "/organization", get(public::organization::organization_list));
    let router = collection(router, "/requirement", get(public::requirement::requirement_list));
    let router = collection(router, "/type", get(public::lookup::type_list));
    let router = collection(router, "/status", get(public::lookup::status_list));
    collection(router, "/donation", get(public::donation::donation_list))
}

/// Routes behind the bearer-token middleware. `route_layer` keeps unmatched paths a 404
/// instead of a 401.
fn protected_routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/user/me", get(protected::user::me_get))
        .route("/organization/:id", put(protected::organization::organization_update));
    let router = collection(router, "/organization", post(protected::organization::organization_create));
    collection(router, "/requirement", post(protected::requirement::requirement_create))
        .route(
            "/requirement/:id",
            put(protected::requirement::requirement_update)
                .delete(protected::requirement::requirement_delete),
        )
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let origins = if security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = security
            .cors_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("ignoring invalid CORS origin {:?}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
