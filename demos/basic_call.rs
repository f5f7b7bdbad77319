//! Basic example demonstrating token auth and remote method calls.
//!
//! This example shows how to:
//! - Create a client with token authentication
//! - Call a remote method and decode the JSON response
//! - Access the raw response envelope
//!
//! Run with: `cargo run --example basic_call`
//!
//! Point it at a real deployment by setting FRAPPE_URL, FRAPPE_API_KEY,
//! and FRAPPE_API_SECRET.

use frappe_client::{Auth, Client, Error, Params};
use http::Method;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct LoggedUser {
    message: String,
}

fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("frappe_client=debug,basic_call=info")
        .init();

    let base_uri =
        std::env::var("FRAPPE_URL").unwrap_or_else(|_| "http://localhost:8000/".to_string());
    let api_key = std::env::var("FRAPPE_API_KEY").unwrap_or_else(|_| "api-key".to_string());
    let api_secret =
        std::env::var("FRAPPE_API_SECRET").unwrap_or_else(|_| "api-secret".to_string());

    // Token auth: the Authorization header is computed once, here.
    let client = Client::new(
        base_uri,
        Auth::Token {
            api_key,
            api_secret,
        },
        true,
    )?;

    println!("=== JSON call ===");
    let user = client.call_json::<LoggedUser>(
        Method::GET,
        "frappe.auth.get_logged_user",
        &Params::new(),
        None,
    )?;
    println!("Logged in as: {}", user.data.message);
    println!("Status: {}", user.envelope.status);

    println!("=== Raw call ===");
    let mut params = Params::new();
    params.insert("value".to_string(), "42".to_string());
    let envelope = client.call(Method::POST, "ping", &params, None)?;
    println!("Status: {}", envelope.status);
    println!("Body: {}", envelope.text());
    println!("Content-Type: {:?}", envelope.header("content-type"));

    Ok(())
}
