use crate::{ChatResult, DispatchMode, MessageExchange};
use opentelemetry::trace::Status;
use std::{error::Error, future::Future};
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Tracks one `send_message` dispatch as an `OpenTelemetry` span, wrapping
/// the gateway request span when the augmented path runs.
pub struct DispatchSpan {
    span: Span,
    context_count: Option<usize>,
}

impl DispatchSpan {
    pub fn new(mode: DispatchMode, conversation_id: &str) -> Self {
        let span = match mode {
            DispatchMode::Augmented => info_span!("rag_chat.send_message.augmented"),
            DispatchMode::Plain => info_span!("rag_chat.send_message.plain"),
        };
        span.set_attribute("rag.operation.name", "send_message");
        span.set_attribute("rag.conversation.id", conversation_id.to_string());
        span.set_attribute("rag.dispatch.mode", mode.as_str());

        Self {
            span,
            context_count: None,
        }
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    /// Record the outcome of a completed dispatch. A degraded exchange (one
    /// that carries a generation error) marks the span as failed even though
    /// the call itself returned.
    pub fn on_exchange(&mut self, exchange: &MessageExchange) {
        self.context_count = Some(exchange.assistant.contexts.len());
        if let Some(error) = &exchange.generation_error {
            self.on_error(error);
        }
    }

    pub fn on_error(&mut self, error: &(dyn Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        if let Some(count) = self.context_count {
            self.span.set_attribute(
                "rag.response.context_count",
                i64::try_from(count).unwrap_or(i64::MAX),
            );
        }
    }
}

impl Drop for DispatchSpan {
    fn drop(&mut self) {
        self.on_end();
    }
}

/// Drive a dispatch future inside its span and record the outcome on it.
pub async fn trace_dispatch<Fut>(
    mode: DispatchMode,
    conversation_id: &str,
    future: Fut,
) -> ChatResult<MessageExchange>
where
    Fut: Future<Output = ChatResult<MessageExchange>> + Send,
{
    let mut span = DispatchSpan::new(mode, conversation_id);
    let result = future.instrument(span.span()).await;

    match &result {
        Ok(exchange) => span.on_exchange(exchange),
        Err(error) => span.on_error(error),
    }

    span.on_end();
    result
}
