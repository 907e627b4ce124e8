//! Default blocking transport backed by ureq.
//!
//! # Design
//! The agent is configured with `http_status_as_error(false)` so 4xx/5xx
//! responses come back as data for the client to interpret, and with
//! `max_redirects(0)` so every hop goes through the policy check below
//! instead of ureq's built-in following.

use http::header::LOCATION;
use http::Uri;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Method, Transport};
use crate::redirect::RedirectPolicy;

/// Upper bound on policy-driven redirect hops before the last response is
/// returned as-is.
const MAX_REDIRECTS: u32 = 10;

/// Blocking transport over a `ureq::Agent`.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .build()
            .new_agent();
        Self { agent }
    }

    fn send(
        &self,
        method: Method,
        uri: &Uri,
        headers: &[(String, String)],
        body: &[u8],
    ) -> Result<http::Response<ureq::Body>, TransportError> {
        let mut builder = http::Request::builder()
            .method(method.as_http())
            .uri(uri.clone());
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        let request = builder
            .body(body.to_vec())
            .map_err(|e| TransportError::Protocol(e.to_string()))?;

        self.agent.run(request).map_err(|e| match e {
            ureq::Error::Io(io) => TransportError::Io(io),
            other => TransportError::Protocol(other.to_string()),
        })
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(
        &mut self,
        request: &HttpRequest,
        redirects: &RedirectPolicy,
    ) -> Result<HttpResponse, TransportError> {
        let mut method = request.method;
        let mut uri = request.uri.clone();
        let mut body: Option<&[u8]> = request.body.as_deref();
        let mut hops = 0;

        loop {
            let response = self.send(method, &uri, &request.headers, body.unwrap_or_default())?;
            let status = response.status().as_u16();

            if redirects.suppresses(status) || hops >= MAX_REDIRECTS {
                return Ok(into_response(response));
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok());
            match next_hop(status, method, &uri, location) {
                Some((next_method, next_uri)) => {
                    log::debug!("following {status} redirect to [{next_uri}]");
                    if next_method != method {
                        // The downgrade to GET also drops the request body.
                        body = None;
                    }
                    method = next_method;
                    uri = next_uri;
                    hops += 1;
                }
                None => return Ok(into_response(response)),
            }
        }
    }
}

/// Default redirect decision: which statuses redirect, how the method is
/// rewritten, and where to. Anything that cannot be resolved cleanly means
/// "do not redirect" — failing toward not following.
fn next_hop(
    status: u16,
    method: Method,
    base: &Uri,
    location: Option<&str>,
) -> Option<(Method, Uri)> {
    let rewritten = match status {
        301 | 302 | 303 => {
            if method == Method::Head {
                Method::Head
            } else {
                Method::Get
            }
        }
        307 | 308 => method,
        _ => return None,
    };
    Some((rewritten, join(base, location?)?))
}

/// Resolve a `Location` header against the URI that produced it. Absolute
/// URLs pass through; absolute paths reuse the base scheme and authority;
/// relative paths are not followed.
fn join(base: &Uri, location: &str) -> Option<Uri> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.parse().ok();
    }
    if location.starts_with('/') {
        return Uri::builder()
            .scheme(base.scheme()?.clone())
            .authority(base.authority()?.clone())
            .path_and_query(location)
            .build()
            .ok();
    }
    None
}

fn into_response(response: http::Response<ureq::Body>) -> HttpResponse {
    let status = response.status().as_u16();
    let (_, body) = response.into_parts();
    HttpResponse::new(status, Box::new(body.into_reader()))
}
