use crate::*;

#[cfg(feature = "traces")]
mod traces;
#[cfg(feature = "traces")]
pub use traces::*;

use axum::extract::State;
use std::net::SocketAddr;
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer};

/// Router with the todo page, health check and the host layers
pub fn app(config: AppConfig) -> Router {
    let limit = config.request_body_limit;
    route("/", get(home))
        .route("/health", get(|| async { StatusCode::OK }))
        .with_state(Arc::new(config))
        .add_tracing()
        .add_utility_layers(limit)
}

async fn home(State(config): State<Arc<AppConfig>>) -> Markup {
    into_page(
        Head::with_title("Todo"),
        TodoInput::new(config.is_public).render(),
    )
}

/// Utility trait to attach host layers to the Router
pub trait HostUtils {
    fn add_tracing(self) -> Self;
    fn add_utility_layers(self, request_body_limit: usize) -> Self;
}

impl HostUtils for Router {
    fn add_tracing(self) -> Self {
        #[cfg(feature = "traces")]
        return self.layer(trace_layer());
        #[cfg(not(feature = "traces"))]
        self
    }
    fn add_utility_layers(self, request_body_limit: usize) -> Self {
        self.layer(RequestBodyLimitLayer::new(request_body_limit))
            .layer(CatchPanicLayer::custom(handle_panic))
    }
}

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    error!("Panic occured: {details}");

    #[cfg(debug_assertions)]
    let body = format!("Panic: {details}");
    #[cfg(not(debug_assertions))]
    let body = "Internal error".to_owned();

    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

/// Binds to `PORT` on all interfaces and serves until ctrl-c
pub async fn serve(router: Router, config: &AppConfig) -> Result {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    #[cfg(debug_assertions)]
    info!("Starting serving {} at {}", config.name, config.localhost());
    #[cfg(not(debug_assertions))]
    info!("Starting serving {} v{} at {addr}", config.name, config.version);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => warn!("Initiating shutdown process"),
        Err(e) => {
            error!("Unable to listen for shutdown signal: {e}");
            std::future::pending::<()>().await
        }
    }
}
