//! Error types for Frappe API calls.
//!
//! The library collapses the many ways an HTTP call can fail into a small,
//! closed set of error kinds. The underlying cause (the `reqwest` or
//! `serde_json` error) is logged at the point of failure via `tracing` and
//! is deliberately not carried in the public error value, so callers match
//! on a stable vocabulary rather than on implementation detail.

use crate::Envelope;

/// The main error type for Frappe API calls.
///
/// Every failure a call can produce maps to exactly one of these kinds.
/// Errors are terminal for the call that produced them; the client remains
/// usable for subsequent calls after any error.
///
/// # Examples
///
/// ```no_run
/// use frappe_client::{Auth, Client, Error, Params};
/// use http::Method;
///
/// # fn example() -> Result<(), Error> {
/// let client = Client::new(
///     "https://erp.example.com/",
///     Auth::Token {
///         api_key: "key".to_string(),
///         api_secret: "secret".to_string(),
///     },
///     false,
/// )?;
///
/// #[derive(serde::Deserialize)]
/// struct Pong { message: String }
///
/// match client.call_json::<Pong>(Method::GET, "ping", &Params::new(), None) {
///     Ok(decoded) => println!("{}", decoded.data.message),
///     Err(Error::ResponseDecodeFailed { envelope }) => {
///         // The endpoint answered with something that was not JSON;
///         // the raw bytes are still available for inspection.
///         eprintln!("not JSON (status {}): {}", envelope.status, envelope.text());
///     }
///     Err(e) => eprintln!("call failed: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be built before any network I/O took place.
    ///
    /// Covers malformed URLs, invalid header values, and HTTP client
    /// construction failures.
    #[error("request preparation failed")]
    RequestPreparationFailed,

    /// The request was sent but failed at the network level.
    ///
    /// Covers refused connections, DNS failures, TLS failures, and
    /// timeouts. A timed-out call surfaces as this kind once the configured
    /// timeout elapses; there is no internal retry.
    #[error("request failed")]
    RequestFailed,

    /// The connection succeeded but the response body could not be fully
    /// read.
    #[error("error reading response")]
    ResponseReadFailed,

    /// The body was read successfully but could not be decoded as JSON
    /// into the requested type.
    ///
    /// The envelope of the offending response is preserved so the caller
    /// can inspect the raw bytes, status, and headers, for example when a
    /// misconfigured endpoint answers with an HTML error page.
    #[error("error parsing response")]
    ResponseDecodeFailed {
        /// The intact response whose body failed to decode.
        envelope: Envelope,
    },

    /// The login call performed while constructing a session-authenticated
    /// client failed.
    ///
    /// Wraps whichever of the other kinds the login call produced. No
    /// client is returned when construction fails this way.
    #[error("login failed")]
    LoginFailed(#[source] Box<Error>),
}

impl Error {
    /// Returns the response envelope if this error carries one.
    ///
    /// Only [`Error::ResponseDecodeFailed`] carries an envelope; for every
    /// other kind this returns `None`.
    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            Error::ResponseDecodeFailed { envelope } => Some(envelope),
            Error::LoginFailed(inner) => inner.envelope(),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Frappe API calls.
pub type Result<T> = std::result::Result<T, Error>;
