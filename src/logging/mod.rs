use crate::metrics::ENDPOINT_METRICS;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use slog::{o, Drain, Logger};
use slog_async::Async;
use slog_term::{FullFormat, PlainDecorator, TermDecorator};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEFAULT_SLOW_REQUEST_MS: u64 = 1_000;

/// Configuration for setting up the access logger
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub async_buffer_size: usize,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            async_buffer_size: 1024,
            use_color: true,
        }
    }
}

/// Sets up a logger with configurable options
pub fn setup_logger(config: LoggerConfig) -> Logger {
    let decorator = {
        let builder = TermDecorator::new();
        let builder = if config.use_color {
            builder.force_color()
        } else {
            builder.force_plain()
        };
        builder.build()
    };

    let drain = FullFormat::new(decorator).build().fuse();

    let drain = Async::new(drain)
        .chan_size(config.async_buffer_size)
        .build()
        .fuse();

    Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}

/// Synchronous plain-text logger writing to `writer`; used by tests.
pub fn plain_logger<W>(writer: W) -> Logger
where
    W: std::io::Write + Send + 'static,
{
    let decorator = PlainDecorator::new(writer);
    let drain = std::sync::Mutex::new(FullFormat::new(decorator).build()).fuse();
    Logger::root(drain, o!())
}

/// Logger that drops every record.
pub fn discard_logger() -> Logger {
    Logger::root(slog::Discard, o!())
}

/// State struct for logging middleware
#[derive(Clone)]
pub struct LoggingState {
    logger: Logger,
    slow_request_threshold: Duration,
}

impl LoggingState {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            slow_request_threshold: Duration::from_millis(DEFAULT_SLOW_REQUEST_MS),
        }
    }

    pub fn with_slow_request_threshold(mut self, threshold: Duration) -> Self {
        self.slow_request_threshold = threshold;
        self
    }
}

/// Access log and endpoint metrics for every request
pub async fn logging_middleware(
    State(state): State<Arc<LoggingState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let request_id = crate::tracing::current_request_id()
        .map(|rid| rid.to_string())
        .unwrap_or_else(|| "-".to_string());

    ENDPOINT_METRICS.in_flight.inc();
    let response = next.run(req).await;
    ENDPOINT_METRICS.in_flight.dec();

    let duration = start_time.elapsed();
    let status = response.status().as_u16();
    ENDPOINT_METRICS.record_request(duration, status);
    crate::tracing::log_slow_request(&method, &path, duration, state.slow_request_threshold);

    let duration_ms: u128 = duration.as_millis();
    slog::info!(
        &state.logger,
        "HTTP request handled";
        "method" => method,
        "path" => path,
        "status" => status,
        "duration_ms" => duration_ms,
        "request_id" => request_id,
    );

    response
}
