//! Request translation between the browser and The Odds API.
//!
//! Everything here is independent of the hosting runtime: the axum route in
//! `routes::proxy` only extracts the method and query and hands them over.

use std::str::FromStr;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ApiKey;
use crate::error::ProxyError;
use crate::upstream::{FetchError, OddsApi};

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";
const REDACTED_KEY: &str = "[HIDDEN]";

#[derive(Debug, Default, Deserialize)]
pub struct ProxyParams {
    pub endpoint: Option<String>,
    pub sport: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Sports,
    Odds,
}

impl FromStr for Endpoint {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sports" => Ok(Endpoint::Sports),
            "odds" => Ok(Endpoint::Odds),
            _ => Err(ProxyError::Validation),
        }
    }
}

/// A validated upstream call, not yet bound to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamTarget {
    Sports,
    Odds { sport: String },
}

impl UpstreamTarget {
    pub fn from_params(params: &ProxyParams) -> Result<Self, ProxyError> {
        let endpoint = params
            .endpoint
            .as_deref()
            .ok_or(ProxyError::Validation)?
            .parse::<Endpoint>()?;

        match endpoint {
            Endpoint::Sports => Ok(UpstreamTarget::Sports),
            Endpoint::Odds => match params.sport.as_deref() {
                Some(sport) if !sport.is_empty() => Ok(UpstreamTarget::Odds {
                    sport: sport.to_string(),
                }),
                _ => Err(ProxyError::Validation),
            },
        }
    }

    pub fn url(&self, base: &str, api_key: &ApiKey) -> String {
        self.render(base, api_key.expose())
    }

    /// The same URL with the key placeholder in place of the key, for logs.
    pub fn log_template(&self, base: &str) -> String {
        self.render(base, REDACTED_KEY)
    }

    fn render(&self, base: &str, key: &str) -> String {
        match self {
            UpstreamTarget::Sports => format!("{base}/sports/?apiKey={key}"),
            UpstreamTarget::Odds { sport } => format!(
                "{base}/sports/{}/odds/?apiKey={key}&regions=au&markets=h2h&oddsFormat=decimal",
                urlencoding::encode(sport)
            ),
        }
    }
}

/// Status and optional JSON body; CORS headers are added on conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ProxyResponse {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn preflight() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
        }
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let mut response = match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        };

        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        response
    }
}

/// Maps one inbound request onto one outbound response.
pub async fn resolve_request(
    api: &dyn OddsApi,
    base: &str,
    method: &Method,
    params: &ProxyParams,
    api_key: Option<&ApiKey>,
) -> ProxyResponse {
    match try_resolve(api, base, method, params, api_key).await {
        Ok(response) => response,
        Err(err) => {
            debug!(status = %err.status(), "Proxy request failed");
            err.into()
        }
    }
}

async fn try_resolve(
    api: &dyn OddsApi,
    base: &str,
    method: &Method,
    params: &ProxyParams,
    api_key: Option<&ApiKey>,
) -> Result<ProxyResponse, ProxyError> {
    if method == Method::OPTIONS {
        return Ok(ProxyResponse::preflight());
    }
    if method != Method::GET {
        return Err(ProxyError::MethodNotAllowed);
    }

    let api_key = match api_key {
        Some(key) => key,
        None => {
            error!("ODDS_API_KEY is not set");
            return Err(ProxyError::Configuration);
        }
    };

    let target = UpstreamTarget::from_params(params)?;
    info!(url = %target.log_template(base), "Fetching data from Odds API");

    let upstream = api
        .get_json(&target.url(base, api_key))
        .await
        .map_err(|err| transport_error(err, api_key))?;

    if !upstream.status.is_success() {
        error!(status = %upstream.status, body = %api_key.redact(&upstream.body.to_string()), "Odds API error");
        return Err(ProxyError::Upstream {
            status: upstream.status,
            body: upstream.body,
        });
    }

    match upstream.body.as_array() {
        Some(records) => info!(records = records.len(), "Successfully fetched data"),
        None => info!("Successfully fetched data"),
    }

    Ok(ProxyResponse::json(StatusCode::OK, upstream.body))
}

fn transport_error(err: FetchError, api_key: &ApiKey) -> ProxyError {
    let message = api_key.redact(err.message());
    error!(error = %message, "Proxy error");
    ProxyError::Transport(message)
}
