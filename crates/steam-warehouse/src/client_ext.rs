use crate::error::FetchError;
use reqwest::{Client, Response};
use std::future::Future;
use tracing::{error, trace};

pub trait ClientQueryExt {
    fn get_bounded(
        &self,
        url: &str,
        query: &[(&str, &str)],
        max_len: usize,
    ) -> impl Future<Output = Result<Response, FetchError>> + Send;
}

/// Add-on methods for [`reqwest::Client`].
///
/// [`reqwest::Client`]: https://docs.rs/reqwest/latest/reqwest/struct.Client.html
impl ClientQueryExt for Client {
    /// GET request `url` with `query` encoded by reqwest, refusing to send it if the final URL
    /// is longer than `max_len` bytes. Non-2xx responses are returned as errors.
    async fn get_bounded(
        &self,
        url: &str,
        query: &[(&str, &str)],
        max_len: usize,
    ) -> Result<Response, FetchError> {
        let request = self.get(url).query(query).build()?;

        let len = request.url().as_str().len();
        if len > max_len {
            error!("request to {url} is {len} bytes long, limit is {max_len}");
            return Err(FetchError::UrlTooLong { len, max: max_len });
        }

        trace!("GET {url} ({len} bytes)");
        let response = self.execute(request).await.map_err(|e| {
            error!("failed fetching response from {url}");
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("{url} responded with {status}");
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}
