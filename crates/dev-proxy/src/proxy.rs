//! Forwarding of requests matching a proxy rule.

use crate::config::{LoadError, ProxyRule};
use axum::{
    body::Body,
    http::{HeaderValue, Request, Response, Uri, Version, header},
    response::IntoResponse,
};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use tracing::warn;

pub type HttpClient = Client<HttpConnector, Body>;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("cannot build upstream URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },
    #[error("cannot reach {target}")]
    Upstream {
        target: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ProxyError::InvalidUri { .. } => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Upstream { .. } => axum::http::StatusCode::BAD_GATEWAY,
        };
        let message = format!("{:#}", anyhow::Error::new(self));
        warn!("{message}");
        (status, message).into_response()
    }
}

/// A proxy rule prepared for forwarding.
#[derive(Clone, Debug)]
pub struct ProxyRoute {
    pub prefix: String,
    target: String,
    scheme: String,
    authority: String,
    base_path: String,
    change_origin: bool,
    host_header: HeaderValue,
    origin_header: HeaderValue,
}

impl ProxyRoute {
    pub fn new(prefix: &str, rule: &ProxyRule) -> Result<Self, LoadError> {
        let invalid = |reason: String| LoadError::InvalidRule {
            prefix: prefix.to_string(),
            reason,
        };
        let host = rule
            .target
            .host_str()
            .ok_or_else(|| invalid("target has no host".to_string()))?;
        let authority = match rule.target.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let origin = rule.target.origin().ascii_serialization();
        let header_value = |value: &str| {
            HeaderValue::from_str(value).map_err(|err| invalid(format!("{value}: {err}")))
        };
        Ok(Self {
            prefix: prefix.to_string(),
            target: origin.clone(),
            scheme: rule.target.scheme().to_string(),
            host_header: header_value(&authority)?,
            origin_header: header_value(&origin)?,
            authority,
            base_path: rule.target.path().trim_end_matches('/').to_string(),
            change_origin: rule.change_origin,
        })
    }

    /// Plain string prefix match: `/todos` also covers `/todos-archive`.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    pub fn upstream_uri(&self, path_and_query: &str) -> Result<Uri, ProxyError> {
        let uri = format!(
            "{}://{}{}{}",
            self.scheme, self.authority, self.base_path, path_and_query
        );
        uri.parse().map_err(|source| ProxyError::InvalidUri { uri, source })
    }

    /// Rewrites the request in place so it can be sent to the target.
    /// Method, path, query, body and other headers are left untouched.
    pub fn prepare(&self, req: &mut Request<Body>) -> Result<(), ProxyError> {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map_or("/", axum::http::uri::PathAndQuery::as_str);
        *req.uri_mut() = self.upstream_uri(path_and_query)?;
        // The upstream client speaks HTTP/1.1 only.
        *req.version_mut() = Version::HTTP_11;
        if self.change_origin {
            let headers = req.headers_mut();
            headers.insert(header::HOST, self.host_header.clone());
            headers.insert(header::ORIGIN, self.origin_header.clone());
        }
        Ok(())
    }
}

pub async fn forward(
    client: &HttpClient,
    route: &ProxyRoute,
    mut req: Request<Body>,
) -> Result<Response<Body>, ProxyError> {
    route.prepare(&mut req)?;
    let response = client
        .request(req)
        .await
        .map_err(|source| ProxyError::Upstream {
            target: route.target.clone(),
            source,
        })?;
    Ok(response.map(Body::new))
}
