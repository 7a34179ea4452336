use crate::error::NetworkError;
use std::sync::Once;
use std::time::Duration;

static CRYPTO_PROVIDER: Once = Once::new();

/// Builds a client with a total request timeout. The rustls `ring` provider
/// is installed process-wide on first use.
pub fn client(timeout: Duration) -> Result<reqwest::Client, NetworkError> {
    CRYPTO_PROVIDER.call_once(|| {
        // Already installed by someone else is fine.
        let _ = rustls::crypto::ring::default_provider().install_default();
    });

    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(5)))
        .user_agent(concat!("skyclock/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(NetworkError::ClientCreation)
}

/// Issues a GET and returns the body of a successful response. Errors name
/// `label` rather than `url`, which may carry credentials.
pub async fn get_bytes(
    client: &reqwest::Client,
    url: &str,
    label: &str,
    timeout: Duration,
) -> Result<Vec<u8>, NetworkError> {
    let secs = timeout.as_secs();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| NetworkError::from_reqwest(e.without_url(), label, secs))?;

    let status = response.status();
    if !status.is_success() {
        return Err(NetworkError::Status {
            url: label.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| NetworkError::from_reqwest(e.without_url(), label, secs))?;
    Ok(body.to_vec())
}
