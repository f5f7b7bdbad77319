//! HTTP transport: request building, execution, and response decoding.
//!
//! [`Transport`] turns a verb, URL, parameter set, and header set into a
//! single HTTP request and maps every failure point onto the closed error
//! vocabulary in [`crate::Error`]. Parameter encoding is decided solely by
//! the HTTP verb: POST and PUT carry a form-encoded body, GET and DELETE
//! carry a form-encoded query string.

use crate::{Decoded, Envelope, Error, Result};
use http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderMap, HeaderValue, Method,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use url::{form_urlencoded, Url};

/// Request parameters as a string-to-string mapping.
///
/// A `BTreeMap` keeps the wire encoding deterministic: keys are emitted in
/// sorted order, which also keeps request bodies stable across calls.
pub type Params = BTreeMap<String, String>;

/// Default timeout for a bare transport not owned by a [`crate::Client`].
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Idle pooled connections kept per host by a bare transport.
const MAX_IDLE_PER_HOST: usize = 10;

/// Executes HTTP requests against a Frappe deployment.
///
/// The transport is stateless per call apart from the connection pool and
/// cookie store inside the wrapped `reqwest` client, both of which are safe
/// for concurrent use from multiple threads.
pub struct Transport {
    http: reqwest::blocking::Client,
    debug: bool,
}

impl Transport {
    /// Wraps a caller-supplied blocking HTTP client.
    ///
    /// Use this to control timeouts, TLS, proxies, or cookie behavior.
    /// [`crate::Client`] uses it to install its cookie-aware client.
    pub fn new(http: reqwest::blocking::Client, debug: bool) -> Self {
        Self { http, debug }
    }

    /// Builds a transport with default settings: a 5 second timeout and at
    /// most 10 idle pooled connections per host.
    pub fn with_defaults(debug: bool) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build HTTP client");
                Error::RequestPreparationFailed
            })?;
        Ok(Self::new(http, debug))
    }

    /// Executes a single HTTP request and returns the raw response.
    ///
    /// Encoding rules:
    /// - POST/PUT: `params` are form-encoded into the request body, with
    ///   `Content-Type: application/x-www-form-urlencoded` set unless the
    ///   caller already supplied a `Content-Type`.
    /// - GET/DELETE: `params` are form-encoded into the query string and no
    ///   body is sent.
    /// - `Accept: application/json` is always appended.
    ///
    /// A `Some(headers)` argument replaces the default header set wholesale
    /// rather than merging with it; pass a complete set or `None`.
    ///
    /// Non-2xx statuses are not errors. The caller inspects
    /// [`Envelope::status`].
    pub fn execute(
        &self,
        method: Method,
        url: &str,
        params: &Params,
        headers: Option<HeaderMap>,
    ) -> Result<Envelope> {
        let encoded = encode_params(params);
        let has_body = method == Method::POST || method == Method::PUT;

        let mut target = Url::parse(url).map_err(|e| {
            tracing::error!(error = %e, url, "request preparation failed");
            Error::RequestPreparationFailed
        })?;

        // GET and DELETE carry the params as the query string. This
        // replaces any query already present in the URL.
        if method == Method::GET || method == Method::DELETE {
            if encoded.is_empty() {
                target.set_query(None);
            } else {
                target.set_query(Some(&encoded));
            }
        }

        let mut header_map = headers.unwrap_or_default();
        header_map.append(ACCEPT, HeaderValue::from_static("application/json"));
        if has_body && !header_map.contains_key(CONTENT_TYPE) {
            header_map.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            );
        }
        let debug_headers = self.debug.then(|| header_map.clone());

        let mut builder = self
            .http
            .request(method.clone(), target.clone())
            .headers(header_map);
        if has_body {
            builder = builder.body(encoded);
        }

        let request = builder.build().map_err(|e| {
            tracing::error!(error = %e, url = %target, "request preparation failed");
            Error::RequestPreparationFailed
        })?;

        let response = self.http.execute(request).map_err(|e| {
            tracing::error!(error = %e, url = %target, "request failed");
            Error::RequestFailed
        })?;

        let status = response.status();
        let resp_headers = response.headers().clone();
        let body = response.bytes().map_err(|e| {
            tracing::error!(error = %e, url = %target, "unable to read response");
            Error::ResponseReadFailed
        })?;

        if let Some(req_headers) = debug_headers {
            tracing::debug!(
                method = %method,
                url = %target,
                status = status.as_u16(),
                headers = ?req_headers,
                "call complete"
            );
        }

        Ok(Envelope::new(body, status, resp_headers))
    }

    /// Executes a request and decodes the response body as JSON.
    ///
    /// A decode failure is a distinct error kind from a transport failure:
    /// [`Error::ResponseDecodeFailed`] carries the intact envelope so the
    /// raw bytes remain available even though decoding failed.
    pub fn execute_json<T>(
        &self,
        method: Method,
        url: &str,
        params: &Params,
        headers: Option<HeaderMap>,
    ) -> Result<Decoded<T>>
    where
        T: DeserializeOwned,
    {
        let envelope = self.execute(method, url, params, headers)?;

        match serde_json::from_slice::<T>(&envelope.body) {
            Ok(data) => Ok(Decoded::new(data, envelope)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %envelope.text(),
                    "error parsing JSON response"
                );
                Err(Error::ResponseDecodeFailed { envelope })
            }
        }
    }
}

/// Form-encodes params into `key=value` pairs joined by `&`, keys in
/// sorted order.
pub(crate) fn encode_params(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn encode_params_sorts_keys() {
        let p = params(&[("usr", "admin"), ("cmd", "login"), ("pwd", "secret")]);
        assert_eq!(encode_params(&p), "cmd=login&pwd=secret&usr=admin");
    }

    #[test]
    fn encode_params_escapes_reserved_characters() {
        let p = params(&[("q", "a b&c=d")]);
        assert_eq!(encode_params(&p), "q=a+b%26c%3Dd");
    }

    #[test]
    fn encode_params_empty_is_empty_string() {
        assert_eq!(encode_params(&Params::new()), "");
    }
}
