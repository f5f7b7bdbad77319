//! # frappe-client - an HTTP API client for the Frappe web framework
//!
//! This crate authenticates against a remote Frappe deployment (such as an
//! ERPNext instance) and proxies GET/POST/PUT/DELETE calls to named remote
//! methods under `api/method/`, returning raw and JSON-decoded responses.
//!
//! ## Quick start
//!
//! ```no_run
//! use frappe_client::{Auth, Client, Params};
//! use http::Method;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct LoggedUser {
//!     message: String,
//! }
//!
//! fn main() -> Result<(), frappe_client::Error> {
//!     // Token auth: no network call happens at construction.
//!     let client = Client::new(
//!         "https://erp.example.com/",
//!         Auth::Token {
//!             api_key: "api-key".to_string(),
//!             api_secret: "api-secret".to_string(),
//!         },
//!         false,
//!     )?;
//!
//!     // Call a whitelisted remote method.
//!     let user = client.call_json::<LoggedUser>(
//!         Method::GET,
//!         "frappe.auth.get_logged_user",
//!         &Params::new(),
//!         None,
//!     )?;
//!     println!("logged in as {}", user.data.message);
//!
//!     // Raw calls keep the full envelope for inspection.
//!     let envelope = client.call(Method::GET, "ping", &Params::new(), None)?;
//!     println!("status {}: {}", envelope.status, envelope.text());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Authentication
//!
//! [`Auth`] is a closed set of strategies, resolved once at construction:
//!
//! - [`Auth::Login`]: a one-time `POST` to the base URI with
//!   `cmd=login&usr=…&pwd=…` seeds a session cookie; the client's cookie
//!   store carries it for the client's lifetime. Construction fails with
//!   [`Error::LoginFailed`] if the login call fails.
//! - [`Auth::Basic`]: a static `Authorization: Basic <base64(key:secret)>`
//!   header on every call.
//! - [`Auth::Token`]: a static `Authorization: token key:secret` header on
//!   every call.
//!
//! There is no re-authentication or logout. A session that expires mid-life
//! surfaces as ordinary responses from the deployment; re-logging-in is the
//! caller's decision.
//!
//! ## Encoding rules
//!
//! Parameter encoding is decided solely by the HTTP verb: POST and PUT
//! requests carry the params as a form-encoded body, GET and DELETE carry
//! them as the query string. `Accept: application/json` is always sent, and
//! POST/PUT default to `Content-Type: application/x-www-form-urlencoded`
//! unless the caller supplies a `Content-Type` of their own. A
//! caller-supplied header set replaces the defaults wholesale.
//!
//! ## Error handling
//!
//! Every failure maps to one of the coarse kinds in [`Error`]; the
//! underlying cause is logged through `tracing` but never exposed. JSON
//! decode failures keep the raw response:
//!
//! ```no_run
//! use frappe_client::{Auth, Client, Error, Params};
//! use http::Method;
//!
//! # fn example() -> Result<(), Error> {
//! # let client = Client::new("https://erp.example.com/", Auth::Token {
//! #     api_key: "k".into(), api_secret: "s".into() }, false)?;
//! match client.call_json::<serde_json::Value>(Method::GET, "ping", &Params::new(), None) {
//!     Ok(pong) => println!("{}", pong.data),
//!     Err(Error::ResponseDecodeFailed { envelope }) => {
//!         eprintln!("endpoint answered non-JSON: {}", envelope.text());
//!     }
//!     Err(e) => eprintln!("call failed: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod response;
mod transport;

pub use client::{Auth, Client};
pub use error::{Error, Result};
pub use response::{Decoded, Envelope};
pub use transport::{Params, Transport};
