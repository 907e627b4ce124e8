//! Fluent single-shot HTTP client.
//!
//! # Design
//! `RestClient` is a sequential state machine: configure through chained
//! mutators, execute exactly one verb call, read the outcome through
//! accessors, then `clear()` to start the next segment. Verb calls never
//! panic and never break the chain — resolution and transport failures are
//! recorded on the client and surface only through [`RestClient::status`],
//! [`RestClient::exception`] and [`RestClient::message`], so chained reads
//! are always safe.

use std::collections::HashMap;
use std::fmt;
use std::io::{ErrorKind, Read};

use crate::error::TransportError;
use crate::http::{BodyReader, HttpRequest, HttpResponse, Method, Transport};
use crate::redirect::RedirectPolicy;
use crate::transport::UreqTransport;
use crate::uri;

/// Status reported whenever a failure is recorded, mirroring the HTTP
/// internal-server-error code.
pub const INTERNAL_ERROR_STATUS: u16 = 500;

/// Largest response body `consume_body` will buffer.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// A recorded failure: human-readable context plus the underlying cause.
#[derive(Debug)]
struct Failure {
    message: String,
    cause: TransportError,
}

/// Fluent builder and executor for HTTP requests.
///
/// Accumulates headers, parameters, an optional raw body and a redirect
/// policy, then executes one verb against a target locator:
///
/// ```no_run
/// use rest_core::RestClient;
///
/// let mut client = RestClient::new();
/// let body = client
///     .add_header("X-Trace", "abc")
///     .add_parameter("q", "rust")
///     .get("http://localhost:3000/search")
///     .consume_body()
///     .to_string();
/// assert_eq!(client.status(), Some(200));
/// client.clear();
/// # let _ = body;
/// ```
///
/// For entity-enclosing verbs (POST, PUT) the parameters become a
/// form-encoded body unless an explicit body was set; for all other verbs
/// they become the query string.
pub struct RestClient<T = UreqTransport> {
    transport: T,
    headers: HashMap<String, String>,
    parameters: HashMap<String, String>,
    body: Option<Vec<u8>>,
    redirects: RedirectPolicy,
    locator: Option<String>,
    response: Option<HttpResponse>,
    failure: Option<Failure>,
    body_text: String,
}

impl RestClient<UreqTransport> {
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::new())
    }
}

impl Default for RestClient<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> RestClient<T> {
    /// Build a client over a custom transport. Tests use this to substitute
    /// a scripted transport for the real one.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            headers: HashMap::new(),
            parameters: HashMap::new(),
            body: None,
            redirects: RedirectPolicy::new(),
            locator: None,
            response: None,
            failure: None,
            body_text: String::new(),
        }
    }

    // --- configuration ----------------------------------------------------

    /// Upsert a single header. An empty name is rejected as a no-op.
    pub fn add_header(&mut self, name: &str, value: impl fmt::Display) -> &mut Self {
        if !name.is_empty() {
            self.headers.insert(name.to_string(), value.to_string());
        }
        self
    }

    /// Add headers from `"name=value"` tokens. Tokens with no `=` or an
    /// empty name are rejected; `"name="` stores an empty value.
    pub fn add_headers<I>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for pair in pairs {
            if let Some((name, value)) = split_pair(pair.as_ref()) {
                self.add_header(name, value);
            }
        }
        self
    }

    /// Add headers from key/value entries (maps, slices of tuples, ...).
    pub fn add_header_map<I, K, V>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
    {
        for (name, value) in entries {
            self.add_header(name.as_ref(), value);
        }
        self
    }

    /// Upsert a single parameter. An empty name is rejected as a no-op.
    /// Whether the parameter ends up in the body or the query string is
    /// decided by the verb at execution time.
    pub fn add_parameter(&mut self, name: &str, value: impl fmt::Display) -> &mut Self {
        if !name.is_empty() {
            self.parameters.insert(name.to_string(), value.to_string());
        }
        self
    }

    /// Add parameters from `"name=value"` tokens. Each token is first split
    /// on `&`, so a whole query string is accepted as one item. Tokens with
    /// no `=` are rejected outright; they never pair up with a neighbor.
    pub fn add_parameters<I>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for item in pairs {
            for pair in item.as_ref().split('&') {
                if let Some((name, value)) = split_pair(pair) {
                    self.add_parameter(name, value);
                }
            }
        }
        self
    }

    /// Add parameters from key/value entries (maps, slices of tuples, ...).
    pub fn add_parameter_map<I, K, V>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
    {
        for (name, value) in entries {
            self.add_parameter(name.as_ref(), value);
        }
        self
    }

    /// Remove headers by name. Unknown names are silently ignored.
    pub fn remove_headers<I>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for name in names {
            self.headers.remove(name.as_ref());
        }
        self
    }

    /// Remove parameters by name. Unknown names are silently ignored.
    pub fn remove_parameters<I>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for name in names {
            self.parameters.remove(name.as_ref());
        }
        self
    }

    /// Set an opaque request body. When present it overrides
    /// parameter-derived body construction for entity-enclosing verbs and is
    /// sent verbatim; it never affects query-string construction.
    pub fn set_body(&mut self, payload: impl Into<Vec<u8>>) -> &mut Self {
        self.body = Some(payload.into());
        self
    }

    /// Never follow redirects with this status code. Cumulative.
    pub fn ignore_redirect(&mut self, status: u16) -> &mut Self {
        self.redirects.ignore_status(status);
        self
    }

    /// Toggle blanket suppression of every redirect.
    pub fn set_ignore_redirects(&mut self, ignore: bool) -> &mut Self {
        self.redirects.set_ignore_all(ignore);
        self
    }

    pub fn ignores_redirects(&self) -> bool {
        self.redirects.ignores_all()
    }

    // --- execution --------------------------------------------------------

    pub fn get(&mut self, locator: &str) -> &mut Self {
        self.execute(Method::Get, locator)
    }

    pub fn post(&mut self, locator: &str) -> &mut Self {
        self.execute(Method::Post, locator)
    }

    pub fn put(&mut self, locator: &str) -> &mut Self {
        self.execute(Method::Put, locator)
    }

    pub fn delete(&mut self, locator: &str) -> &mut Self {
        self.execute(Method::Delete, locator)
    }

    pub fn head(&mut self, locator: &str) -> &mut Self {
        self.execute(Method::Head, locator)
    }

    pub fn trace(&mut self, locator: &str) -> &mut Self {
        self.execute(Method::Trace, locator)
    }

    pub fn options(&mut self, locator: &str) -> &mut Self {
        self.execute(Method::Options, locator)
    }

    /// Resolve the locator, compile the accumulated state into a wire
    /// request and run it through the transport exactly once. Failures are
    /// recorded, never propagated.
    fn execute(&mut self, method: Method, locator: &str) -> &mut Self {
        self.locator = Some(locator.to_string());
        let resolved = uri::resolve(locator);

        let request = match self.compile(method, &resolved) {
            Ok(request) => request,
            Err(cause) => {
                // Resolution failure: record it and skip the transport.
                let message = format!("could not build request URI from [{resolved}]");
                log::error!("{message}: {cause}");
                self.failure = Some(Failure { message, cause });
                return self;
            }
        };

        match self.transport.execute(&request, &self.redirects) {
            Ok(response) => self.response = Some(response),
            Err(cause) => {
                let kind = match cause {
                    TransportError::Io(_) => "I/O",
                    _ => "HTTP",
                };
                let message = format!("{kind} error while requesting [{}]", request.uri);
                log::error!("{message}: {cause}");
                self.failure = Some(Failure { message, cause });
            }
        }
        self
    }

    /// Freeze the accumulated state into a wire request for `method`.
    fn compile(&self, method: Method, resolved: &str) -> Result<HttpRequest, TransportError> {
        let mut target = resolved.to_string();
        let mut body = None;
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        if method.encloses_body() {
            match &self.body {
                Some(payload) => body = Some(payload.clone()),
                None => {
                    body = Some(form_encode(&self.parameters).into_bytes());
                    if !has_header(&headers, "content-type") {
                        headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
                    }
                }
            }
        } else {
            let query = query_string(&self.parameters);
            if !query.is_empty() {
                target.push('?');
                target.push_str(&query);
            }
        }

        if !has_header(&headers, "accept") {
            headers.push(("Accept".to_string(), "application/json".to_string()));
        }

        let uri: http::Uri = target.parse().map_err(TransportError::InvalidUri)?;
        Ok(HttpRequest {
            method,
            uri,
            headers,
            body,
        })
    }

    // --- results ----------------------------------------------------------

    /// Read-only view of the accumulated headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Read-only view of the accumulated parameters.
    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    /// Outcome status: the internal-error sentinel if a failure was
    /// recorded, the raw transport status if a response exists, `None` if
    /// nothing was executed.
    pub fn status(&self) -> Option<u16> {
        if self.failure.is_some() {
            Some(INTERNAL_ERROR_STATUS)
        } else {
            self.response.as_ref().map(HttpResponse::status)
        }
    }

    /// The underlying cause of a recorded failure, if any.
    pub fn exception(&self) -> Option<&TransportError> {
        self.failure.as_ref().map(|f| &f.cause)
    }

    /// The human-readable message of a recorded failure, if any.
    pub fn message(&self) -> Option<&str> {
        self.failure.as_ref().map(|f| f.message.as_str())
    }

    /// The raw response handle, if execution produced one.
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    /// Materialize the response body as text.
    ///
    /// Lazy and idempotent: the first call drains the body stream and
    /// caches the text; later calls return the cache without touching the
    /// transport. Draining failures are logged and degrade to the text read
    /// so far — this never panics and never returns an error. The stream is
    /// closed when the first draining call finishes.
    pub fn consume_body(&mut self) -> &str {
        if self.body_text.is_empty() {
            if let Some(reader) = self.response.as_mut().and_then(|r| r.take_body()) {
                self.body_text = self.drain(reader);
            }
        }
        &self.body_text
    }

    fn drain(&self, mut reader: BodyReader) -> String {
        let locator = self.locator.as_deref().unwrap_or("");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8 * 1024];
        loop {
            match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    buf.extend_from_slice(&chunk[..n]);
                    if buf.len() > MAX_BODY_BYTES {
                        log::error!("response body for [{locator}] is too large to buffer");
                        return String::new();
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    log::error!("problem consuming response body for [{locator}]: {e}");
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Reset every field to its construction-time default, dropping the
    /// response handle (which closes a still-open body stream). Safe to call
    /// repeatedly, including when nothing was ever executed.
    pub fn clear(&mut self) {
        self.headers.clear();
        self.parameters.clear();
        self.body = None;
        self.redirects.reset();
        self.locator = None;
        self.response = None;
        self.failure = None;
        self.body_text.clear();
    }
}

/// Split a `name=value` token. Tokens with no `=` or an empty name are
/// rejected outright.
fn split_pair(token: &str) -> Option<(&str, &str)> {
    let (name, value) = token.split_once('=')?;
    if name.is_empty() {
        return None;
    }
    Some((name, value))
}

/// Join parameters into `key=value&key=value` form with no leading
/// separator. Values are used as stored; an empty value serializes as
/// `key=`.
fn query_string(parameters: &HashMap<String, String>) -> String {
    let mut out = String::new();
    for (name, value) in parameters {
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(name);
        out.push('=');
        out.push_str(value);
    }
    out
}

fn form_encode(parameters: &HashMap<String, String>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(parameters.iter())
        .finish()
}

/// Case-insensitive presence check against already-stamped headers.
fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
}
