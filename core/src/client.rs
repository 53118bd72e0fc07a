//! Base-URL client that dispatches requests and decodes responses.
//!
//! # Design
//! `Client` holds only its transport and an immutable `ClientConfig`, so one
//! instance can serve any number of concurrent callers through `&self`.
//! Every call runs the same pipeline: build the request, set the content
//! headers, resolve it against the base URL, send it, classify the status,
//! then decode or read the body. The body is always read to the end or
//! dropped before the call returns.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::form::FormValues;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ResponseBody};
use crate::path;
use crate::transport::{Transport, UreqTransport};

/// Target type for calls whose response body should be ignored, e.g.
/// `client.delete_json::<Discard>("/users/9000", None)`.
pub type Discard = serde::de::IgnoredAny;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";
const HTML: &str = "text/html";

/// Bytes a URI path cannot carry literally. `%` is absent so existing
/// escapes pass through untouched.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Same as `PATH` but `?` is allowed inside a query.
const QUERY: &AsciiSet = &PATH.remove(b'?');

#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    transport: T,
    config: ClientConfig,
}

impl Client<UreqTransport> {
    /// Client backed by a fresh `ureq` agent.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Return the request as it will be sent.
    ///
    /// Without a base URL this is an unchanged copy. With one, the scheme and
    /// host come from the base URL, the path is the base path joined with the
    /// request path, and the query string is kept. Bytes that cannot appear
    /// in a URI (spaces, non-ASCII) are percent-encoded; existing `%XX`
    /// escapes are left as they are.
    pub fn resolve(&self, request: &HttpRequest) -> Result<HttpRequest, ClientError> {
        let Some(base) = self.config.base_url() else {
            return Ok(request.clone());
        };

        let (req_path, query) = split_target(&request.target)?;
        let req_path = utf8_percent_encode(&req_path, PATH).to_string();
        let joined = path::join(&["/", base.path(), &req_path]);
        let path_and_query = match query {
            Some(q) => format!("{joined}?{}", utf8_percent_encode(&q, QUERY)),
            None => joined,
        };

        let uri = ureq::http::Uri::builder()
            .scheme(base.scheme().clone())
            .authority(base.authority().clone())
            .path_and_query(path_and_query.as_str())
            .build()
            .map_err(|e| ClientError::InvalidTarget {
                target: request.target.clone(),
                reason: e.to_string(),
            })?;

        Ok(HttpRequest {
            target: uri.to_string(),
            ..request.clone()
        })
    }

    /// Send `request`, rewritten against the base URL if one is configured.
    ///
    /// The response is returned whatever its status; transport failures are
    /// passed through unchanged.
    pub fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let request = match self.config.base_url() {
            Some(_) => self.resolve(&request)?,
            None => request,
        };
        let method = request.method;
        let target = request.target.clone();

        let response = self.transport.send(request)?;
        debug!(%method, %target, status = response.status, "dispatched request");
        Ok(response)
    }

    // JSON
    //

    /// Send `request` as JSON and decode a 2xx body into `target`.
    ///
    /// With `target` set to `None` the body is drained without being decoded.
    /// Only the first JSON value in the body is decoded; anything after it
    /// is ignored.
    pub fn dispatch_json<D: DeserializeOwned>(
        &self,
        mut request: HttpRequest,
        target: Option<&mut D>,
    ) -> Result<(), ClientError> {
        request.set_header("Content-Type", JSON);
        request.set_header("Accept", JSON);

        let response = self.dispatch(request)?;
        let status = response.status;
        let body = success_body(response)?;

        let Some(target) = target else {
            body.drain().map_err(|source| ClientError::ReadBody { status, source })?;
            return Ok(());
        };

        let bytes = body
            .read_to_end()
            .map_err(|source| ClientError::ReadBody { status, source })?;
        let mut de = serde_json::Deserializer::from_slice(&bytes);
        *target = D::deserialize(&mut de).map_err(|source| ClientError::Decode { status, source })?;
        Ok(())
    }

    pub fn get_json<D: DeserializeOwned>(&self, path: &str, target: Option<&mut D>) -> Result<(), ClientError> {
        self.dispatch_json(HttpRequest::new(HttpMethod::Get, path), target)
    }

    pub fn put_json<I, D>(&self, path: &str, input: &I, target: Option<&mut D>) -> Result<(), ClientError>
    where
        I: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        let request = json_request(HttpMethod::Put, path, input)?;
        self.dispatch_json(request, target)
    }

    pub fn post_json<I, D>(&self, path: &str, input: &I, target: Option<&mut D>) -> Result<(), ClientError>
    where
        I: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        let request = json_request(HttpMethod::Post, path, input)?;
        self.dispatch_json(request, target)
    }

    pub fn delete_json<D: DeserializeOwned>(&self, path: &str, target: Option<&mut D>) -> Result<(), ClientError> {
        self.dispatch_json(HttpRequest::new(HttpMethod::Delete, path), target)
    }

    // HTML pages / forms
    //

    /// Send `request` as a form submission and return the 2xx body as text.
    ///
    /// A 2xx body that is not valid UTF-8 is converted lossily.
    pub fn dispatch_page(&self, mut request: HttpRequest) -> Result<String, ClientError> {
        request.set_header("Content-Type", FORM);
        request.set_header("Accept", HTML);

        let response = self.dispatch(request)?;
        let status = response.status;
        let bytes = success_body(response)?
            .read_to_end()
            .map_err(|source| ClientError::ReadBody { status, source })?;

        Ok(String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }

    pub fn get_page(&self, path: &str) -> Result<String, ClientError> {
        self.dispatch_page(HttpRequest::new(HttpMethod::Get, path))
    }

    pub fn put_page(&self, path: &str, input: &FormValues) -> Result<String, ClientError> {
        self.dispatch_page(HttpRequest::new(HttpMethod::Put, path).with_body(input.encode()))
    }

    pub fn post_page(&self, path: &str, input: &FormValues) -> Result<String, ClientError> {
        self.dispatch_page(HttpRequest::new(HttpMethod::Post, path).with_body(input.encode()))
    }

    pub fn delete_page(&self, path: &str) -> Result<String, ClientError> {
        self.dispatch_page(HttpRequest::new(HttpMethod::Delete, path))
    }
}

fn json_request<I: Serialize + ?Sized>(method: HttpMethod, path: &str, input: &I) -> Result<HttpRequest, ClientError> {
    let body = serde_json::to_vec(input).map_err(ClientError::Encode)?;
    Ok(HttpRequest::new(method, path).with_body(body))
}

/// Hand back the body of a 2xx response; turn anything else into an error
/// after reading the whole body.
fn success_body(response: HttpResponse) -> Result<ResponseBody, ClientError> {
    if response.is_success() {
        return Ok(response.body);
    }
    let status = response.status;
    let bytes = response
        .body
        .read_to_end()
        .map_err(|source| ClientError::ReadBody { status, source })?;

    Err(match String::from_utf8(bytes) {
        Ok(body) => ClientError::Status { status, body },
        Err(e) => ClientError::BinaryStatus {
            status,
            len: e.as_bytes().len(),
        },
    })
}

/// Split a request target into its path and query. Absolute targets keep
/// only their path and query; fragments are dropped.
fn split_target(target: &str) -> Result<(String, Option<String>), ClientError> {
    if is_absolute(target) {
        let uri: ureq::http::Uri = target.parse().map_err(|e: ureq::http::uri::InvalidUri| {
            ClientError::InvalidTarget {
                target: target.to_string(),
                reason: e.to_string(),
            }
        })?;
        return Ok((uri.path().to_string(), uri.query().map(str::to_string)));
    }

    let without_fragment = target.split('#').next().unwrap_or_default();
    Ok(match without_fragment.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (without_fragment.to_string(), None),
    })
}

/// `scheme://` must come before the first `/`, `?` or `#`.
fn is_absolute(target: &str) -> bool {
    let head = target.split(['/', '?', '#']).next().unwrap_or_default();
    head.len() > 1 && head.ends_with(':') && target[head.len()..].starts_with("//")
}
