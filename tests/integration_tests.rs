//! Integration tests using wiremock to simulate a Frappe deployment.
//!
//! The client is blocking, so each test owns a small tokio runtime that
//! hosts the mock server while the calls under test run on the test thread.

use frappe_client::{Auth, Client, Error, Params, Transport};
use http::{HeaderMap, HeaderValue, Method};
use serde::Deserialize;
use std::time::{Duration, Instant};
use wiremock::matchers::{
    body_string, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Pong {
    message: String,
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn token_client(server: &MockServer) -> Client {
    Client::new(
        format!("{}/", server.uri()),
        Auth::Token {
            api_key: "k".to_string(),
            api_secret: "s".to_string(),
        },
        false,
    )
    .unwrap()
}

#[test]
fn post_params_are_form_encoded_into_the_body() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/method/ping"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("a=1&b=2"))
            .and(query_param_is_missing("a"))
            .and(query_param_is_missing("b"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"ok"}"#))
            .mount(&server),
    );

    let client = token_client(&server);
    let envelope = client
        .call(Method::POST, "ping", &params(&[("a", "1"), ("b", "2")]), None)
        .unwrap();

    assert_eq!(envelope.status.as_u16(), 200);
    assert_eq!(envelope.text(), r#"{"message":"ok"}"#);
}

#[test]
fn put_params_are_form_encoded_into_the_body() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("PUT"))
            .and(path("/api/method/update"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("name=Widget"))
            .and(query_param_is_missing("name"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"ok"}"#))
            .mount(&server),
    );

    let client = token_client(&server);
    let envelope = client
        .call(Method::PUT, "update", &params(&[("name", "Widget")]), None)
        .unwrap();

    assert_eq!(envelope.status.as_u16(), 200);
}

#[test]
fn get_params_are_form_encoded_into_the_query_string() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/method/list"))
            .and(query_param("limit", "10"))
            .and(query_param("page", "1"))
            .and(body_string(""))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"ok"}"#))
            .mount(&server),
    );

    let client = token_client(&server);
    let envelope = client
        .call(
            Method::GET,
            "list",
            &params(&[("limit", "10"), ("page", "1")]),
            None,
        )
        .unwrap();

    assert_eq!(envelope.status.as_u16(), 200);
}

#[test]
fn delete_params_are_form_encoded_into_the_query_string() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("DELETE"))
            .and(path("/api/method/remove"))
            .and(query_param("name", "Widget"))
            .and(body_string(""))
            .respond_with(ResponseTemplate::new(202).set_body_string(r#"{"message":"ok"}"#))
            .mount(&server),
    );

    let client = token_client(&server);
    let envelope = client
        .call(Method::DELETE, "remove", &params(&[("name", "Widget")]), None)
        .unwrap();

    assert_eq!(envelope.status.as_u16(), 202);
}

#[test]
fn caller_supplied_content_type_is_not_overwritten() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/method/ping"))
            .and(header("content-type", "application/json"))
            .and(body_string("a=1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"ok"}"#))
            .mount(&server),
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    let client = token_client(&server);
    let envelope = client
        .call(Method::POST, "ping", &params(&[("a", "1")]), Some(headers))
        .unwrap();

    assert_eq!(envelope.status.as_u16(), 200);
}

#[test]
fn basic_auth_sends_the_exact_base64_header() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    // base64("k:s") == "azpz"
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/method/ping"))
            .and(header("authorization", "Basic azpz"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"ok"}"#))
            .mount(&server),
    );

    let client = Client::new(
        format!("{}/", server.uri()),
        Auth::Basic {
            api_key: "k".to_string(),
            api_secret: "s".to_string(),
        },
        false,
    )
    .unwrap();

    let envelope = client
        .call(Method::GET, "ping", &Params::new(), None)
        .unwrap();
    assert_eq!(envelope.status.as_u16(), 200);
}

#[test]
fn token_auth_sends_the_exact_token_header() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/method/ping"))
            .and(header("authorization", "token k:s"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"ok"}"#))
            .mount(&server),
    );

    let client = token_client(&server);
    let envelope = client
        .call(Method::GET, "ping", &Params::new(), None)
        .unwrap();
    assert_eq!(envelope.status.as_u16(), 200);
}

#[test]
fn login_construction_posts_once_and_carries_the_session_cookie() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    // Params encode in sorted key order: cmd, pwd, usr.
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_string("cmd=login&pwd=secret&usr=administrator"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "sid=abc123; Path=/")
                    .set_body_string(r#"{"message":"Logged In"}"#),
            )
            .expect(1)
            .mount(&server),
    );

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/method/frappe.auth.get_logged_user"))
            .and(header("cookie", "sid=abc123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"message":"administrator"}"#),
            )
            .mount(&server),
    );

    let client = Client::new(
        format!("{}/", server.uri()),
        Auth::Login {
            username: "administrator".to_string(),
            password: "secret".to_string(),
        },
        false,
    )
    .unwrap();

    let user = client
        .call_json::<Pong>(
            Method::GET,
            "frappe.auth.get_logged_user",
            &Params::new(),
            None,
        )
        .unwrap();
    assert_eq!(user.data.message, "administrator");
}

#[test]
fn login_against_unreachable_endpoint_fails_construction() {
    // Nothing listens on the discard port; the login call cannot succeed.
    let result = Client::new(
        "http://127.0.0.1:9/",
        Auth::Login {
            username: "administrator".to_string(),
            password: "secret".to_string(),
        },
        false,
    );

    match result {
        Err(Error::LoginFailed(inner)) => {
            assert!(matches!(*inner, Error::RequestFailed));
        }
        other => panic!("expected LoginFailed, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn call_json_decodes_the_message_field() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/method/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"ok"}"#))
            .mount(&server),
    );

    let client = token_client(&server);
    let pong = client
        .call_json::<Pong>(Method::GET, "ping", &Params::new(), None)
        .unwrap();

    assert_eq!(pong.data.message, "ok");
    assert_eq!(pong.envelope.status.as_u16(), 200);
    assert_eq!(pong.envelope.text(), r#"{"message":"ok"}"#);
}

#[test]
fn call_json_keeps_the_raw_envelope_on_decode_failure() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/method/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server),
    );

    let client = token_client(&server);
    let result = client.call_json::<Pong>(Method::GET, "ping", &Params::new(), None);

    match result {
        Err(Error::ResponseDecodeFailed { envelope }) => {
            assert_eq!(envelope.status.as_u16(), 200);
            assert_eq!(envelope.text(), "<html>oops</html>");
        }
        other => panic!("expected ResponseDecodeFailed, got {:?}", other),
    }
}

#[test]
fn non_2xx_statuses_are_envelopes_not_errors() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/method/restricted"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_string(r#"{"exc_type":"PermissionError"}"#),
            )
            .mount(&server),
    );

    let client = token_client(&server);
    let envelope = client
        .call(Method::GET, "restricted", &Params::new(), None)
        .unwrap();

    assert_eq!(envelope.status.as_u16(), 403);
    assert!(envelope.text().contains("PermissionError"));
}

#[test]
fn a_slow_response_times_out_as_request_failed() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_secs(10)),
            )
            .mount(&server),
    );

    let http = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(250))
        .build()
        .unwrap();
    let transport = Transport::new(http, false);

    let start = Instant::now();
    let result = transport.execute(
        Method::GET,
        &format!("{}/slow", server.uri()),
        &Params::new(),
        None,
    );

    assert!(matches!(result, Err(Error::RequestFailed)));
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn a_malformed_url_fails_before_any_network_io() {
    let transport = Transport::with_defaults(false).unwrap();
    let result = transport.execute(Method::GET, "not a url", &Params::new(), None);
    assert!(matches!(result, Err(Error::RequestPreparationFailed)));
}

#[test]
fn the_client_stays_usable_after_an_error() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/method/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"ok"}"#))
            .mount(&server),
    );

    let client = token_client(&server);

    // A decode failure on one call must not poison the client.
    let bad = client.call_json::<u32>(Method::GET, "ping", &Params::new(), None);
    assert!(matches!(bad, Err(Error::ResponseDecodeFailed { .. })));

    let pong = client
        .call_json::<Pong>(Method::GET, "ping", &Params::new(), None)
        .unwrap();
    assert_eq!(pong.data.message, "ok");
}
