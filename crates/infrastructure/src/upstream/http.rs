use dnstoys_domain::DomainError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, DomainError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| DomainError::ConfigError(format!("failed to build HTTP client: {}", e)))
}

/// GET `url` and decode a JSON body. Non-2xx statuses are upstream errors;
/// the query string is kept out of logs since it may carry credentials.
pub async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    source_name: &str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, DomainError> {
    debug!(source = source_name, url, "Upstream request");

    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| {
            DomainError::upstream(source_name, format!("request failed: {}", e.without_url()))
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DomainError::upstream(source_name, format!("HTTP {}", status)));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| {
            DomainError::upstream(source_name, format!("invalid body: {}", e.without_url()))
        })
}
