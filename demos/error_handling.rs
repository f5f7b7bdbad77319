//! Example demonstrating the error kinds a call can produce.
//!
//! This example shows how to:
//! - Match on each error kind
//! - Recover the raw response when JSON decoding fails
//! - Handle a failed session login at construction
//!
//! Run with: `cargo run --example error_handling`

use frappe_client::{Auth, Client, Error, Params};
use http::Method;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Pong {
    message: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("frappe_client=debug,error_handling=info")
        .init();

    println!("=== Login failure at construction ===");
    // Nothing is listening here, so the login call fails and no client is
    // returned.
    let result = Client::new(
        "http://127.0.0.1:9/",
        Auth::Login {
            username: "administrator".to_string(),
            password: "wrong".to_string(),
        },
        false,
    );
    match result {
        Ok(_) => println!("unexpectedly connected"),
        Err(Error::LoginFailed(cause)) => println!("login failed, cause: {cause}"),
        Err(e) => println!("other error: {e}"),
    }

    println!();
    println!("=== Matching call errors ===");
    let client = match Client::new(
        "http://localhost:8000/",
        Auth::Token {
            api_key: "api-key".to_string(),
            api_secret: "api-secret".to_string(),
        },
        false,
    ) {
        Ok(client) => client,
        Err(e) => {
            println!("could not construct client: {e}");
            return;
        }
    };

    match client.call_json::<Pong>(Method::GET, "ping", &Params::new(), None) {
        Ok(pong) => println!("pong: {}", pong.data.message),
        Err(Error::RequestFailed) => {
            println!("network failure (is the deployment running?)");
        }
        Err(Error::ResponseDecodeFailed { envelope }) => {
            // The endpoint answered, just not with JSON. The raw bytes are
            // still here for inspection.
            println!("non-JSON answer, status {}:", envelope.status);
            println!("{}", envelope.text());
        }
        Err(e) => println!("call failed: {e}"),
    }
}
