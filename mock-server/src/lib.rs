use std::collections::HashMap;

use axum::{
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Everything the server saw about a request, echoed back as JSON so client
/// tests can assert on the wire-level outcome of request compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/redirect/chain", get(redirect_chain))
        .route("/redirect/{status}", get(redirect))
        .route("/landing", get(landing))
        .route("/status/{code}", get(bare_status))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    })
}

/// Respond with the requested redirect status, pointing at `/landing`.
async fn redirect(Path(status): Path<u16>) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::FOUND);
    (status, [(header::LOCATION, "/landing")], "redirecting").into_response()
}

/// First hop of a two-hop redirect: 302 into `/redirect/302`.
async fn redirect_chain() -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, "/redirect/302")],
        "hop",
    )
        .into_response()
}

async fn landing() -> &'static str {
    "landed"
}

async fn bare_status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
