use std::future::Future;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::ClientError;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// The network boundary of a fetch cycle: one GET per call.
///
/// Implementations should stop work and return [`ClientError::Cancelled`]
/// once `cancel` fires. This is best effort; the binding never relies on
/// it for correctness.
#[allow(async_fn_in_trait)]
pub trait Transport {
    fn get_json<V: DeserializeOwned>(
        &self,
        url: &str,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<V, ClientError>>;
}

/// Transport that issues real requests through reqwest.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    /// Prefix for urls starting with `/`. Absolute urls are used as is.
    pub address: Option<String>,
    pub inner_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            inner_client: reqwest::Client::new(),
        }
    }

    pub fn format_url(&self, url: &str) -> String {
        match &self.address {
            Some(address) if url.starts_with('/') => {
                format!("{}{url}", address.trim_end_matches('/'))
            }
            _ => url.to_string(),
        }
    }

    async fn empty_get(&self, url: &str) -> ReqwestResult {
        let request = self.inner_client.get(self.format_url(url));

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }
}

impl Transport for HttpTransport {
    async fn get_json<V: DeserializeOwned>(
        &self,
        url: &str,
        cancel: CancellationToken,
    ) -> Result<V, ClientError> {
        let request = async {
            let response = self.empty_get(url).await?;
            ok_body(response).await
        };

        // Dropping the in-flight request future abandons the connection
        // (and aborts the underlying fetch in the browser).
        match cancel.run_until_cancelled(request).await {
            Some(result) => result,
            None => Err(ClientError::Cancelled),
        }
    }
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(response.json::<T>().await?)
}
