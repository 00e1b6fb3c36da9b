use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Client;
use serde_json::Value;

#[cfg(test)]
use mockall::automock;

pub const ODDS_API_BASE_URL: &str = "https://api.the-odds-api.com/v4";

#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

#[derive(Debug)]
pub enum FetchError {
    /// The request never produced a response.
    Transport(String),
    /// A response arrived but its body was not JSON.
    Decode(String),
}

impl FetchError {
    pub fn message(&self) -> &str {
        match self {
            FetchError::Transport(message) | FetchError::Decode(message) => message,
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait OddsApi: Send + Sync {
    /// Issues one GET and decodes the body as JSON whatever the status.
    async fn get_json(&self, url: &str) -> Result<UpstreamResponse, FetchError>;
}

#[derive(Clone)]
pub struct HttpOddsApi {
    client: Client,
}

impl HttpOddsApi {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().pool_max_idle_per_host(0).build()?;
        Ok(Self { client })
    }
}

// reqwest puts the full URL, query included, into its error messages.
fn describe(err: reqwest::Error) -> String {
    format!("{:#}", anyhow::Error::new(err.without_url()))
}

#[async_trait]
impl OddsApi for HttpOddsApi {
    async fn get_json(&self, url: &str) -> Result<UpstreamResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(describe(e)))?;

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(describe(e)))?;

        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_returns_upstream_response() {
        let mut mock = MockOddsApi::new();

        mock.expect_get_json()
            .with(eq("https://example.test/sports/"))
            .times(1)
            .returning(|_| {
                Ok(UpstreamResponse {
                    status: StatusCode::OK,
                    body: json!([{ "key": "soccer_epl" }]),
                })
            });

        let result = mock.get_json("https://example.test/sports/").await.unwrap();

        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(result.body[0]["key"], "soccer_epl");
    }

    #[tokio::test]
    async fn test_transport_error_hides_url() {
        let api = HttpOddsApi::new().unwrap();

        // Port 9 (discard) on localhost is not expected to be listening.
        let result = api
            .get_json("http://127.0.0.1:9/sports/?apiKey=do-not-print")
            .await;

        match result {
            Err(err) => assert!(!err.message().contains("do-not-print")),
            Ok(_) => panic!("Expected a fetch error"),
        }
    }

    #[test]
    fn test_fetch_error_message() {
        let err = FetchError::Decode("expected value at line 1 column 1".to_string());
        assert_eq!(err.message(), "expected value at line 1 column 1");
    }
}
