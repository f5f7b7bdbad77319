//! Response types pairing raw body bytes with transport-level metadata.
//!
//! Every call returns an [`Envelope`]: the raw response body together with
//! the status code and headers of the underlying HTTP response. JSON calls
//! additionally return the decoded value via [`Decoded`], which keeps the
//! envelope alongside it so raw bytes stay available for debugging.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use std::borrow::Cow;

/// The raw outcome of a single HTTP call.
///
/// An envelope is created per call and owned by the caller; it is never
/// cached or reused by the client.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// The raw response body.
    pub body: Bytes,

    /// The HTTP status code of the response.
    ///
    /// Non-2xx statuses are not treated as errors by the transport; the
    /// caller decides what a given status means for its remote method.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,
}

impl Envelope {
    /// Creates a new `Envelope`. Typically called internally by the
    /// transport after reading a response body.
    pub fn new(body: Bytes, status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            body,
            status,
            headers,
        }
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    ///
    /// # Examples
    ///
    /// ```
    /// # use frappe_client::Envelope;
    /// # use bytes::Bytes;
    /// # use http::{HeaderMap, StatusCode};
    /// let envelope = Envelope::new(
    ///     Bytes::from_static(b"{\"message\":\"ok\"}"),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    /// );
    /// assert_eq!(envelope.text(), "{\"message\":\"ok\"}");
    /// ```
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Returns a response header value by name, if present and valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

/// A successfully decoded JSON response.
///
/// Pairs the deserialized value with the [`Envelope`] it was decoded from,
/// so status, headers, and raw bytes remain reachable after decoding.
///
/// # Examples
///
/// ```no_run
/// use frappe_client::{Auth, Client, Params};
/// use http::Method;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Pong { message: String }
///
/// # fn example() -> Result<(), frappe_client::Error> {
/// # let client = Client::new("https://erp.example.com/", Auth::Token {
/// #     api_key: "k".into(), api_secret: "s".into() }, false)?;
/// let pong = client.call_json::<Pong>(Method::GET, "ping", &Params::new(), None)?;
/// println!("{} (status {})", pong.data.message, pong.envelope.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    /// The deserialized response data.
    pub data: T,

    /// The envelope the data was decoded from.
    pub envelope: Envelope,
}

impl<T> Decoded<T> {
    /// Creates a new `Decoded` value.
    pub fn new(data: T, envelope: Envelope) -> Self {
        Self { data, envelope }
    }

    /// Maps the decoded data to a different type, preserving the envelope.
    pub fn map<U, F>(self, f: F) -> Decoded<U>
    where
        F: FnOnce(T) -> U,
    {
        Decoded {
            data: f(self.data),
            envelope: self.envelope,
        }
    }
}

impl<T> AsRef<T> for Decoded<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Decoded<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
