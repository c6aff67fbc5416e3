use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::HttpConfig;
use crate::error::{MovieError, Result};

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client })
    }

    #[instrument(skip(self, url), fields(path = %url.path()))]
    pub async fn get(&self, url: &Url) -> Result<Response> {
        debug!("Making GET request");
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            error!("HTTP request failed with status: {}", response.status());
            return Err(MovieError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }

    /// GET `url` and decode the body as JSON. A non-JSON body is reported as
    /// [`MovieError::Decode`].
    #[instrument(skip(self, url), fields(path = %url.path()))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let response = self.get(url).await?;
        let body = response.text().await?;
        debug!("Received {} byte body", body.len());
        decode_body(&body)
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        error!("Response body is not valid JSON: {}", e);
        MovieError::Decode(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::omdb::SearchEnvelope;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `response` verbatim to a single connection and returns its URL.
    async fn serve_once(response: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        Url::parse(&format!("http://{addr}/?apikey=test&s=batman")).unwrap()
    }

    fn local_client() -> HttpClient {
        HttpClient {
            client: Client::builder().no_proxy().build().unwrap(),
        }
    }

    #[test]
    fn builds_with_and_without_timeout() {
        assert!(HttpClient::new(&HttpConfig::default()).is_ok());
        let config = HttpConfig {
            user_agent: Some("tests".to_string()),
            timeout_seconds: Some(3),
        };
        assert!(HttpClient::new(&config).is_ok());
    }

    #[tokio::test]
    async fn non_success_status_maps_to_status_error() {
        let url = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let client = local_client();

        let result: Result<SearchEnvelope> = client.get_json(&url).await;
        assert!(matches!(result, Err(MovieError::Status { status: 503 })));
    }

    #[tokio::test]
    async fn success_status_with_json_body_decodes() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 47\r\nConnection: close\r\n\r\n{\"Response\":\"False\",\"Error\":\"Movie not found!\"}",
        )
        .await;
        let client = local_client();

        let envelope: SearchEnvelope = client.get_json(&url).await.unwrap();
        assert!(envelope.is_failure());
        assert_eq!(envelope.error.as_deref(), Some("Movie not found!"));
    }

    #[test]
    fn html_body_is_a_decode_error() {
        let result: Result<SearchEnvelope> = decode_body("<html>rate limited</html>");
        assert!(matches!(result, Err(MovieError::Decode(_))));
    }

    #[test]
    fn json_body_decodes() {
        let envelope: SearchEnvelope =
            decode_body(r#"{"Search":[],"totalResults":"0","Response":"True"}"#).unwrap();
        assert!(!envelope.is_failure());
    }
}
