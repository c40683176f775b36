//! MailStub Rust Client
//!
//! An async Rust client for the MailStub local email-testing server.
//!
//! # Example
//! ```no_run
//! use mailstub_client::{Client, SendEmailOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailstub_client::Error> {
//!     let client = Client::new();
//!     let response = client
//!         .send(
//!             "p_550e8400-e29b-41d4-a716-446655440000",
//!             &SendEmailOptions {
//!                 sender: "noreply@myapp.com".to_string(),
//!                 receiver: "user@example.com".to_string(),
//!                 subject: "Welcome!".to_string(),
//!                 body: "<h1>Hello World</h1>".to_string(),
//!             },
//!         )
//!         .await?;
//!     println!("Created message {}", response.message.id);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;

pub use client::{Client, ClientBuilder, default_client};
pub use error::Error;
pub use models::{Message, SendEmailOptions, SendEmailResponse};

/// Result type alias for MailStub operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
