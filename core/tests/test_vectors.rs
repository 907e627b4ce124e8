//! Verify pair parsing, locator resolution and request compilation against
//! JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs and the expected stored state or
//! compiled request. Query strings and form bodies are compared as parsed
//! pair sets, not raw strings, because parameter map ordering is not defined.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;
use std::rc::Rc;

use rest_core::{
    HttpRequest, HttpResponse, RedirectPolicy, RestClient, Transport, TransportError,
};

/// Transport that records every compiled request and answers an empty 200.
struct Capture {
    seen: Rc<RefCell<Vec<HttpRequest>>>,
}

impl Transport for Capture {
    fn execute(
        &mut self,
        request: &HttpRequest,
        _redirects: &RedirectPolicy,
    ) -> Result<HttpResponse, TransportError> {
        self.seen.borrow_mut().push(request.clone());
        Ok(HttpResponse::new(200, Box::new(Cursor::new(Vec::new()))))
    }
}

fn client() -> (RestClient<Capture>, Rc<RefCell<Vec<HttpRequest>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let transport = Capture {
        seen: Rc::clone(&seen),
    };
    (RestClient::with_transport(transport), seen)
}

/// Dispatch the verb named by a test vector onto the client.
fn dispatch(client: &mut RestClient<Capture>, method: &str, locator: &str) {
    match method {
        "GET" => client.get(locator),
        "POST" => client.post(locator),
        "PUT" => client.put(locator),
        "DELETE" => client.delete(locator),
        "HEAD" => client.head(locator),
        "TRACE" => client.trace(locator),
        "OPTIONS" => client.options(locator),
        other => panic!("unknown method: {other}"),
    };
}

fn as_map(value: &serde_json::Value) -> HashMap<String, String> {
    value
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
        .collect()
}

/// Parse a `key=value&key=value` string back into a map.
fn pairs_of(joined: &str) -> HashMap<String, String> {
    joined
        .split('&')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let (name, value) = token.split_once('=').unwrap();
            (name.to_string(), value.to_string())
        })
        .collect()
}

fn stamped<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

// ---------------------------------------------------------------------------
// Pair parsing
// ---------------------------------------------------------------------------

#[test]
fn pair_parsing_test_vectors() {
    let raw = include_str!("../../test-vectors/pairs.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let items: Vec<&str> = case["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item.as_str().unwrap())
            .collect();

        let (mut c, _) = client();
        let stored = match case["kind"].as_str().unwrap() {
            "headers" => {
                c.add_headers(&items);
                c.headers()
            }
            "parameters" => {
                c.add_parameters(&items);
                c.parameters()
            }
            other => panic!("{name}: unknown kind: {other}"),
        };

        let expected: HashMap<String, String> =
            serde_json::from_value(case["expected"].clone()).unwrap();
        assert_eq!(stored, &expected, "{name}");
    }
}

// ---------------------------------------------------------------------------
// Locator resolution
// ---------------------------------------------------------------------------

#[test]
fn locator_resolution_test_vectors() {
    let raw = include_str!("../../test-vectors/uri.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let locator = case["locator"].as_str().unwrap();
        let expected = case["resolved"].as_str().unwrap();
        assert_eq!(rest_core::uri::resolve(locator), expected, "{name}");
    }
}

// ---------------------------------------------------------------------------
// Request compilation
// ---------------------------------------------------------------------------

#[test]
fn request_compilation_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let (mut c, seen) = client();

        if let Some(parameters) = case.get("parameters") {
            for (key, value) in parameters.as_object().unwrap() {
                c.add_parameter(key, value.as_str().unwrap());
            }
        }
        if let Some(headers) = case.get("headers") {
            for (key, value) in headers.as_object().unwrap() {
                c.add_header(key, value.as_str().unwrap());
            }
        }
        if let Some(body) = case.get("body") {
            c.set_body(body.as_str().unwrap());
        }

        dispatch(
            &mut c,
            case["method"].as_str().unwrap(),
            case["locator"].as_str().unwrap(),
        );
        assert_eq!(c.status(), Some(200), "{name}: status");

        let seen = seen.borrow();
        let request = &seen[0];
        let expected = &case["expected"];

        assert_eq!(
            request.method.as_str(),
            expected["method"].as_str().unwrap(),
            "{name}: method"
        );

        if let Some(uri) = expected.get("uri") {
            assert_eq!(request.uri.to_string(), uri.as_str().unwrap(), "{name}: uri");
        }
        if let Some(path) = expected.get("path") {
            assert_eq!(request.uri.path(), path.as_str().unwrap(), "{name}: path");
        }
        if let Some(query_pairs) = expected.get("query_pairs") {
            let query = request.uri.query().unwrap_or_default();
            assert!(!query.starts_with('&'), "{name}: leading separator");
            assert_eq!(pairs_of(query), as_map(query_pairs), "{name}: query");
        }
        if expected.get("body_absent").is_some() {
            assert!(request.body.is_none(), "{name}: body should be None");
        }
        if let Some(text) = expected.get("body_text") {
            assert_eq!(
                request.body.as_deref(),
                Some(text.as_str().unwrap().as_bytes()),
                "{name}: body"
            );
        }
        if let Some(form) = expected.get("body_form_pairs") {
            let body = std::str::from_utf8(request.body.as_deref().unwrap()).unwrap();
            assert_eq!(pairs_of(body), as_map(form), "{name}: form body");
        }
        if let Some(headers) = expected.get("headers") {
            for (header, value) in headers.as_object().unwrap() {
                assert_eq!(
                    stamped(request, header),
                    Some(value.as_str().unwrap()),
                    "{name}: header {header}"
                );
            }
        }
        if let Some(absent) = expected.get("absent_headers") {
            for header in absent.as_array().unwrap() {
                let header = header.as_str().unwrap();
                assert!(
                    stamped(request, header).is_none(),
                    "{name}: header {header} should be absent"
                );
            }
        }
    }
}
