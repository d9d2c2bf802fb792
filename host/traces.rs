use crate::*;

use axum::http::{Method, Request};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::TraceLayer,
};
use tracing::{Level, Span};
pub use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

fn pretty_filter() -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level().into())
        .from_env_lossy();
    ["h2=info", "hyper=info", "hyper_util=info", "reqwest=info", "rustls=info"]
        .into_iter()
        .filter_map(|directive| directive.parse::<tracing_subscriber::filter::Directive>().ok())
        .fold(filter, |filter, directive| filter.add_directive(directive))
}

/// Initializes log collection, later calls are no-ops
pub fn init_tracing_subscriber() {
    let shell_layer = fmt::layer()
        .with_timer(ChronoUtc::new("%k:%M:%S".to_owned()))
        .with_filter(pretty_filter());

    if tracing_subscriber::registry()
        .with(shell_layer)
        .try_init()
        .is_err()
    {
        debug!("Tracing subscriber was already initialized");
    }
}

/// Health checks are polled constantly so they only show up in trace logs
fn is_noise(uri: &http::Uri) -> bool {
    uri.path() == "/health"
}

pub fn trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl Fn(&Request<Body>) -> Span + Clone + Copy,
    (),
    impl Fn(&Response<Body>, std::time::Duration, &Span) + Clone + Copy,
    (),
    (),
> {
    TraceLayer::new_for_http()
        .on_eos(())
        .on_body_chunk(())
        .on_request(())
        .on_response(
            |resp: &Response<Body>, latency: std::time::Duration, span: &Span| {
                let millis = latency.as_secs_f64() * 1000.0;
                let status = resp.status();
                if let Some(metadata) = span.metadata() {
                    match *metadata.level() {
                        Level::DEBUG => debug!("'{status}' in {millis:.1}ms"),
                        Level::TRACE => trace!("'{status}' in {millis:.1}ms"),
                        _ => {}
                    }
                }
            },
        )
        .make_span_with(|request: &Request<Body>| {
            let method = request.method().as_str();
            let uri = request.uri().to_string();

            if is_noise(request.uri()) {
                return tracing::trace_span!("->", method, uri);
            }

            match *request.method() {
                Method::GET => tracing::debug_span!("-> GET   ", uri),
                Method::POST => tracing::debug_span!("-> POST  ", uri),
                _ => tracing::debug_span!("->", method, uri),
            }
        })
}
