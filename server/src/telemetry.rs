//! Console logging setup and per-request tracing.
//!
//! `RUST_LOG` controls verbosity; without it everything at `info` and above is shown.

use std::time::Duration;

use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{MakeSpan, OnResponse, TraceLayer};
use tracing::{Level, Span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Routes polled by probes. Their spans are trace-level and their responses unlogged.
const QUIET_PATHS: &[&str] = &["/health"];

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// One `http_request` span per request, named by the matched route.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or(request.uri().path());

        if QUIET_PATHS.contains(&route) {
            tracing::trace_span!("http_request", path = %route)
        } else {
            tracing::info_span!("http_request", method = %request.method(), path = %route)
        }
    }
}

/// Status and latency for every non-quiet response; 5xx at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseLog;

impl<B> OnResponse<B> for ResponseLog {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        if span.metadata().map(|m| *m.level()) == Some(Level::TRACE) {
            return;
        }

        let status = response.status();
        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                latency_ms = %latency.as_millis(),
                "request failed with server error"
            );
        } else {
            tracing::info!(
                status = status.as_u16(),
                latency_ms = %latency.as_millis(),
                "request completed"
            );
        }
    }
}

pub type HttpTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, (), ResponseLog>;

pub fn trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_request(())
        .on_response(ResponseLog)
}
