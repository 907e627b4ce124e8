//! HTTP wire types and the transport contract.
//!
//! # Design
//! The client compiles its accumulated state into an [`HttpRequest`] and
//! hands it to a [`Transport`] exactly once per lifecycle segment. The
//! transport returns an [`HttpResponse`] whose body is still an unread
//! stream; turning it into text is the client's job, so draining stays lazy
//! and happens at most once.

use std::fmt;
use std::io::Read;

use crate::error::TransportError;
use crate::redirect::RedirectPolicy;

/// HTTP verb selected by one of the client's execution methods.
///
/// A closed set: the request compiler queries [`Method::encloses_body`]
/// instead of inspecting transport-specific request types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Trace,
    Options,
}

impl Method {
    /// Whether requests with this method carry a body. Body-less methods
    /// encode their parameters into the query string instead.
    pub fn encloses_body(self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Trace => "TRACE",
            Method::Options => "OPTIONS",
        }
    }

    pub(crate) fn as_http(self) -> http::Method {
        match self {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
            Method::Head => http::Method::HEAD,
            Method::Trace => http::Method::TRACE,
            Method::Options => http::Method::OPTIONS,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled HTTP request, ready for execution.
///
/// Headers are already stamped (including the default `Accept`) and the
/// body-versus-query-string decision has been made, so transports send this
/// as-is.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub uri: http::Uri,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// Reader over a response body stream. Dropping it closes the stream.
pub type BodyReader = Box<dyn Read>;

/// An executed response: the raw status plus the unread body stream.
///
/// The client owns the handle once execution returns and drains or drops
/// the body exactly once.
pub struct HttpResponse {
    status: u16,
    body: Option<BodyReader>,
}

impl HttpResponse {
    pub fn new(status: u16, body: BodyReader) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Take the body stream out of the response. Returns `None` once taken,
    /// which is what makes materialization drain at most once.
    pub(crate) fn take_body(&mut self) -> Option<BodyReader> {
        self.body.take()
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("body_consumed", &self.body.is_none())
            .finish()
    }
}

/// Blocking single-request transport.
///
/// Implementations follow redirects themselves, consulting `redirects`
/// before every hop; a suppressed redirect must come back as the final
/// response rather than being followed.
pub trait Transport {
    fn execute(
        &mut self,
        request: &HttpRequest,
        redirects: &RedirectPolicy,
    ) -> Result<HttpResponse, TransportError>;
}
