//! Fluent single-shot HTTP client core.
//!
//! # Overview
//! [`RestClient`] accumulates headers, parameters, an optional raw body and
//! a redirect policy across chained calls, executes exactly one HTTP verb
//! per lifecycle segment, and exposes the outcome (status, body text,
//! error) through accessors.
//!
//! # Design
//! - Verb calls never break the chain: resolution and transport failures
//!   are recorded on the client and read back through `status()`,
//!   `exception()` and `message()`.
//! - The transport is a trait; [`UreqTransport`] is the shipped blocking
//!   implementation and tests substitute their own.
//! - Redirect following is owned by the client's [`RedirectPolicy`], not by
//!   transport defaults: a blanket switch or a per-status ignore set
//!   suppresses individual hops.
//! - The response body is materialized into text at most once, on demand.

pub mod client;
pub mod error;
pub mod http;
pub mod redirect;
pub mod transport;
pub mod uri;

pub use client::{RestClient, INTERNAL_ERROR_STATUS};
pub use error::TransportError;
pub use http::{BodyReader, HttpRequest, HttpResponse, Method, Transport};
pub use redirect::RedirectPolicy;
pub use transport::UreqTransport;
