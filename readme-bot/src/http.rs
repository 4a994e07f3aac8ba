//! Shared HTTP plumbing for the GitHub and Gemini clients.

use readme_bot_core::contract::BoxError;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;

pub const USER_AGENT: &str = concat!("readme-bot/", env!("CARGO_PKG_VERSION"));

pub fn build_client() -> Result<reqwest::Client, BoxError> {
    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// Append `segments` to `base`, percent-encoding each one.
pub fn join_segments<I, S>(base: &Url, segments: I) -> Result<Url, BoxError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("Cannot use {} as a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub fn parse_base_url(raw: &str) -> Result<Url, BoxError> {
    Url::parse(raw).map_err(|e| format!("Invalid API base URL '{}': {}", raw, e).into())
}

/// Pull a human-readable message out of an error body.
///
/// GitHub answers `{"message": ...}`, Gemini `{"error": {"message": ...}}`.
/// Anything else is returned as-is.
pub fn error_message_from_body(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = json["message"].as_str() {
            return msg.to_string();
        }
        if let Some(msg) = json["error"]["message"].as_str() {
            return msg.to_string();
        }
    }
    body.trim().to_string()
}

pub fn api_error(service: &str, status: StatusCode, body: &str) -> BoxError {
    format!(
        "{} API error ({}): {}",
        service,
        status,
        error_message_from_body(body)
    )
    .into()
}

/// Check the status and decode a JSON body, or turn the response into an error.
pub async fn read_json<T>(service: &str, response: Response) -> Result<T, BoxError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        tracing::error!(service, status = %status, body = %body, "API request failed");
        return Err(api_error(service, status, &body));
    }
    serde_json::from_str(&body)
        .map_err(|e| format!("{} API returned an unexpected response: {}", service, e).into())
}
