//! The Frappe client: endpoint binding, authentication, and method routing.
//!
//! [`Client`] owns a base URI and one authentication strategy, resolved once
//! at construction. Remote method names are joined under the fixed
//! `api/method/` prefix and delegated to the [`Transport`].

use crate::{
    transport::{Params, Transport},
    Decoded, Envelope, Error, Result,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::{header::AUTHORIZATION, HeaderMap, HeaderValue, Method};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Timeout applied to every request issued through a client.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(7);

/// Path prefix all remote method names are joined under.
const METHOD_PATH_PREFIX: &str = "api/method/";

/// How a client proves identity to the Frappe deployment.
///
/// Exactly one strategy is bound per client instance and is immutable
/// thereafter.
///
/// # Examples
///
/// ```
/// use frappe_client::Auth;
///
/// let token = Auth::Token {
///     api_key: "key".to_string(),
///     api_secret: "secret".to_string(),
/// };
/// ```
#[derive(Debug, Clone)]
pub enum Auth {
    /// Session login: a one-time login call at construction sets a session
    /// cookie, which the client's cookie store carries for its lifetime.
    /// No per-request header is produced.
    Login {
        /// The Frappe user name.
        username: String,
        /// The Frappe user password.
        password: String,
    },

    /// Static `Authorization: Basic <base64(key:secret)>` header, computed
    /// once at construction.
    Basic {
        /// The API key issued by the deployment.
        api_key: String,
        /// The API secret paired with the key.
        api_secret: String,
    },

    /// Static `Authorization: token key:secret` header, computed once at
    /// construction.
    Token {
        /// The API key issued by the deployment.
        api_key: String,
        /// The API secret paired with the key.
        api_secret: String,
    },
}

impl Auth {
    /// Resolves the strategy into its static header value, if it has one.
    fn static_header(&self) -> Option<String> {
        match self {
            Auth::Login { .. } => None,
            Auth::Basic {
                api_key,
                api_secret,
            } => {
                let token = STANDARD.encode(format!("{api_key}:{api_secret}"));
                Some(format!("Basic {token}"))
            }
            Auth::Token {
                api_key,
                api_secret,
            } => Some(format!("token {api_key}:{api_secret}")),
        }
    }
}

/// A client bound to one Frappe deployment and one [`Auth`] strategy.
///
/// The client keeps a persistent, cookie-aware HTTP connection pool, so it
/// is meant to be constructed once and reused across calls. Concurrent
/// calls from multiple threads are fine; the pool and cookie store handle
/// their own synchronization.
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
/// let client = Client::new(
///     "https://erp.example.com/",
///     Auth::Login {
///         username: "administrator".to_string(),
///         password: "secret".to_string(),
///     },
///     false,
/// )?;
///
/// let mut params = Params::new();
/// params.insert("value".to_string(), "42".to_string());
/// let pong = client.call_json::<Pong>(Method::POST, "ping", &params, None)?;
/// println!("{}", pong.data.message);
/// # Ok(())
/// # }
/// ```
pub struct Client {
    base_uri: String,
    auth_header: Option<HeaderValue>,
    transport: Transport,
}

impl Client {
    /// Constructs a client for `base_uri` with the given [`Auth`] strategy.
    ///
    /// The base URI must be absolute and should end with a slash so the
    /// `api/method/` prefix can be appended. Construction builds a
    /// persistent cookie-aware HTTP client with a 7 second request timeout.
    ///
    /// For [`Auth::Login`], a login call (`POST {base_uri}` with form
    /// fields `cmd=login`, `usr`, `pwd`) is performed before returning;
    /// if that call fails, construction fails with [`Error::LoginFailed`].
    /// [`Auth::Basic`] and [`Auth::Token`] perform no network call; their
    /// header is computed here and never recomputed.
    ///
    /// When `debug` is set, the transport emits one `tracing` debug record
    /// per call with the verb, resolved URL, status, and request headers.
    pub fn new(base_uri: impl Into<String>, auth: Auth, debug: bool) -> Result<Self> {
        let base_uri = base_uri.into();
        Url::parse(&base_uri).map_err(|e| {
            tracing::error!(error = %e, base_uri = %base_uri, "invalid base URI");
            Error::RequestPreparationFailed
        })?;

        let auth_header = match auth.static_header() {
            Some(value) => Some(HeaderValue::from_str(&value).map_err(|e| {
                tracing::error!(error = %e, "auth header is not a valid header value");
                Error::RequestPreparationFailed
            })?),
            None => None,
        };

        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .cookie_store(true)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build HTTP client");
                Error::RequestPreparationFailed
            })?;

        let client = Self {
            base_uri,
            auth_header,
            transport: Transport::new(http, debug),
        };

        if let Auth::Login { username, password } = &auth {
            client
                .login(username, password)
                .map_err(|e| Error::LoginFailed(Box::new(e)))?;
        }

        Ok(client)
    }

    /// Calls a remote method and returns the raw response.
    ///
    /// The method name is resolved against the base URI under
    /// `api/method/`. If the client holds a static auth header it is
    /// injected into the header set, creating one when `headers` is `None`.
    /// Header semantics otherwise follow [`Transport::execute`].
    pub fn call(
        &self,
        method: Method,
        remote_method: &str,
        params: &Params,
        headers: Option<HeaderMap>,
    ) -> Result<Envelope> {
        self.transport.execute(
            method,
            &self.method_url(remote_method),
            params,
            self.inject_auth(headers),
        )
    }

    /// Calls a remote method and decodes the response body as JSON.
    ///
    /// See [`Transport::execute_json`] for decode-failure semantics.
    pub fn call_json<T>(
        &self,
        method: Method,
        remote_method: &str,
        params: &Params,
        headers: Option<HeaderMap>,
    ) -> Result<Decoded<T>>
    where
        T: DeserializeOwned,
    {
        self.transport.execute_json(
            method,
            &self.method_url(remote_method),
            params,
            self.inject_auth(headers),
        )
    }

    /// Returns the underlying transport.
    ///
    /// Useful for raw calls outside the `api/method/` prefix; such calls
    /// still ride the client's cookie store, but no auth header is
    /// injected.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Performs the session login that seeds the cookie store.
    fn login(&self, username: &str, password: &str) -> Result<Envelope> {
        let mut params = Params::new();
        params.insert("cmd".to_string(), "login".to_string());
        params.insert("usr".to_string(), username.to_string());
        params.insert("pwd".to_string(), password.to_string());

        self.transport
            .execute(Method::POST, &self.base_uri, &params, None)
    }

    fn method_url(&self, remote_method: &str) -> String {
        format!("{}{}{}", self.base_uri, METHOD_PATH_PREFIX, remote_method)
    }

    fn inject_auth(&self, headers: Option<HeaderMap>) -> Option<HeaderMap> {
        match &self.auth_header {
            Some(value) => {
                let mut headers = headers.unwrap_or_default();
                headers.insert(AUTHORIZATION, value.clone());
                Some(headers)
            }
            None => headers,
        }
    }
}
