use crate::VectorServiceResult;
use opentelemetry::trace::Status;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Tracks one request to the vector service as an `OpenTelemetry` span.
pub struct RequestSpan {
    span: Span,
}

impl RequestSpan {
    pub fn new(
        provider: &'static str,
        operation: &'static str,
        method: &'static str,
        url: &str,
    ) -> Self {
        let span = info_span!("rag_client.request");
        span.set_attribute("rag.operation.name", operation);
        span.set_attribute("rag.provider.name", provider);
        span.set_attribute("http.request.method", method);
        span.set_attribute("url.full", url.to_string());

        Self { span }
    }

    fn span(&self) -> Span {
        self.span.clone()
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span()).await
    }

    pub fn on_status(&self, status: reqwest::StatusCode) {
        self.span
            .set_attribute("http.response.status_code", i64::from(status.as_u16()));
    }

    pub fn on_error(&self, error: &(dyn std::error::Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }
}

/// Drive a request future inside its span and record a failure outcome on it.
pub async fn trace_request<T, F>(span: &RequestSpan, future: F) -> VectorServiceResult<T>
where
    F: std::future::Future<Output = VectorServiceResult<T>>,
{
    let result = span.instrument_future(future).await;

    if let Err(error) = &result {
        span.on_error(error);
    }

    result
}
