use crate::{opentelemetry::RequestSpan, VectorServiceError};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};

/// Create a GET request, parse the response.
/// Throws error on non OK status code.
pub async fn get_json<R: DeserializeOwned>(
    client: &Client,
    url: &str,
    span: &RequestSpan,
) -> Result<R, VectorServiceError> {
    let response = client.get(url).send().await?;
    read_json(response, span).await
}

/// Create a GET request and parse the body whatever the status code is. The
/// health route reports failure with a 500 whose body is still the report.
pub async fn get_json_any_status<R: DeserializeOwned>(
    client: &Client,
    url: &str,
    span: &RequestSpan,
) -> Result<R, VectorServiceError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    span.on_status(status);

    let body = response.text().await?;
    match serde_json::from_str::<R>(&body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(VectorServiceError::StatusCode(status, body)),
        Err(error) => Err(VectorServiceError::Invariant(format!(
            "Failed to parse response body: {error}"
        ))),
    }
}

/// Create a JSON POST request, parse the response.
/// Throws error on non OK status code.
pub async fn post_json<T: Serialize, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    data: &T,
    span: &RequestSpan,
) -> Result<R, VectorServiceError> {
    let response = client.post(url).json(data).send().await?;
    read_json(response, span).await
}

/// Create a JSON PUT request, parse the response.
/// Throws error on non OK status code.
pub async fn put_json<T: Serialize, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    data: &T,
    span: &RequestSpan,
) -> Result<R, VectorServiceError> {
    let response = client.put(url).json(data).send().await?;
    read_json(response, span).await
}

/// Create a DELETE request, parse the response.
/// Throws error on non OK status code.
pub async fn delete_json<R: DeserializeOwned>(
    client: &Client,
    url: &str,
    span: &RequestSpan,
) -> Result<R, VectorServiceError> {
    let response = client.delete(url).send().await?;
    read_json(response, span).await
}

async fn read_json<R: DeserializeOwned>(
    response: Response,
    span: &RequestSpan,
) -> Result<R, VectorServiceError> {
    let status = response.status();
    span.on_status(status);

    if status.is_success() {
        Ok(response.json::<R>().await?)
    } else {
        Err(VectorServiceError::StatusCode(
            status,
            response.text().await.unwrap_or_default(),
        ))
    }
}
