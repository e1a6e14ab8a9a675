mod handlers;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::ack::{Acknowledger, GeminiAcknowledger, StaticAcknowledger};
use crate::config::ServerConfig;
use crate::storage::{NoopPersistence, PersistenceService};

/// Shared handler state: the acknowledgement generator and the persistence collaborator.
#[derive(Clone)]
pub struct AppState {
    pub acknowledger: Arc<dyn Acknowledger>,
    pub store: Arc<dyn PersistenceService>,
    pub verbose_storage: bool,
}

impl AppState {
    /// State with the given acknowledger and a no-op store.
    pub fn new(acknowledger: impl Acknowledger + 'static) -> Self {
        Self {
            acknowledger: Arc::new(acknowledger),
            store: Arc::new(NoopPersistence),
            verbose_storage: false,
        }
    }

    /// Gemini when a key is configured, canned acknowledgements otherwise.
    pub fn from_config(config: &ServerConfig) -> Self {
        let state = match &config.gemini {
            Some(gemini) => {
                tracing::info!(model = %gemini.model, "Using Gemini acknowledgements");
                Self::new(GeminiAcknowledger::new(gemini.clone()))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set, using static acknowledgements");
                Self::new(StaticAcknowledger)
            }
        };
        state.with_verbose_storage(config.verbose_storage)
    }

    pub fn with_store(mut self, store: impl PersistenceService + 'static) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn with_verbose_storage(mut self, verbose: bool) -> Self {
        self.verbose_storage = verbose;
        self
    }
}

pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/feedback", post(handlers::submit_feedback))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    match &config.cors_origins {
        None => CorsLayer::permissive(),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(v) => Some(v),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", o);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/feedback")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn configured_origin_is_allowed() {
        let config = ServerConfig::local().with_cors_origins(vec!["http://widget.test".into()]);
        let app = create_router(AppState::new(StaticAcknowledger), &config);

        let response = app.oneshot(preflight("http://widget.test")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://widget.test"
        );
    }

    #[tokio::test]
    async fn unknown_origin_gets_no_allow_header() {
        let config = ServerConfig::local().with_cors_origins(vec!["http://widget.test".into()]);
        let app = create_router(AppState::new(StaticAcknowledger), &config);

        let response = app.oneshot(preflight("http://evil.test")).await.unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
