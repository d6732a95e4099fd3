//! HTTP-backed [`OutageSource`].
//!
//! Issues a single GET against the definition's URL. There is no retry or
//! timeout tuning beyond `reqwest`'s defaults: a failed fetch aborts the
//! run and the next scheduled run simply tries again.

use async_trait::async_trait;

use crate::source_def::SourceDefinition;
use crate::{FetchedSnapshot, OutageSource, SourceError};

/// Fetches snapshots from a fixed HTTP endpoint.
pub struct HttpSource {
    def: SourceDefinition,
    client: reqwest::Client,
}

impl HttpSource {
    /// Builds a source with a client carrying the definition's
    /// `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(def: SourceDefinition) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(def.user_agent.as_str())
            .build()?;
        Ok(Self { def, client })
    }

    /// Returns the endpoint this source reads from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.def.url
    }
}

#[async_trait]
impl OutageSource for HttpSource {
    fn id(&self) -> &str {
        &self.def.id
    }

    fn name(&self) -> &str {
        &self.def.name
    }

    async fn fetch(&self) -> Result<FetchedSnapshot, SourceError> {
        log::info!("{}: fetching {}", self.def.id, self.def.url);

        let response = self
            .client
            .get(&self.def.url)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        log::debug!("{}: received {} bytes", self.def.id, body.len());

        FetchedSnapshot::parse(body)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn definition(url: &str) -> SourceDefinition {
        SourceDefinition {
            id: "test".to_string(),
            name: "Test source".to_string(),
            url: url.to_string(),
            user_agent: "pse-outages-test/1.0".to_string(),
        }
    }

    #[test]
    fn exposes_definition_identity() {
        let source = HttpSource::new(definition("http://127.0.0.1:9/outages")).unwrap();
        assert_eq!(source.id(), "test");
        assert_eq!(source.name(), "Test source");
        assert_eq!(source.url(), "http://127.0.0.1:9/outages");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        // Port 9 (discard) is not expected to be listening locally.
        let source = HttpSource::new(definition("http://127.0.0.1:9/outages")).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Http(_)));
    }

    #[tokio::test]
    async fn error_status_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/outages", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0_u8; 1024];
            let _ = stream.read(&mut request).await;
            stream
                .write_all(
                    b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                )
                .await
                .unwrap();
            let _ = stream.shutdown().await;
        });

        let source = HttpSource::new(definition(&url)).unwrap();
        let err = source.fetch().await.unwrap_err();

        match err {
            SourceError::Http(e) => {
                assert_eq!(e.status(), Some(reqwest::StatusCode::SERVICE_UNAVAILABLE));
            }
            other => panic!("expected an HTTP error, got {other:?}"),
        }
    }
}
