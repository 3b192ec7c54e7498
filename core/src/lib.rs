//! Client for the Takeout email-sending API.
//!
//! # Overview
//! Log in with a token, load an HTML template from disk or from the Takeout
//! template store, send it, and optionally ask the service to verify an
//! address. Every remote operation is one HTTP request/response pair.
//!
//! # Design
//! - `TakeoutClient` owns the state (debug flag, token, hosts) and splits
//!   every remote operation into `build_*` (produces a request) and
//!   `parse_*` (consumes a response). It never touches the network.
//! - `BlockingClient` pairs a `TakeoutClient` with a `Transport` and runs
//!   the round-trips; `UreqTransport` is the default.
//! - Precondition failures are returned from `build_*`, before a request
//!   exists, so they never reach the network.
//!
//! ```no_run
//! use takeout_core::{BlockingClient, EmailTemplate};
//!
//! # fn main() -> Result<(), takeout_core::TakeoutError> {
//! let mut client = BlockingClient::new(false);
//! client.login("YOUR TOKEN")?;
//! let html = client.get_local_template("welcome.html")?;
//! let sent = client.send(&EmailTemplate::new("to@example.com", "Acme", "Welcome").with_html(html))?;
//! println!("{}", client.client().preview_url(&sent.id));
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod template;
pub mod transport;
pub mod types;

pub use blocking::BlockingClient;
pub use client::TakeoutClient;
pub use config::ClientConfig;
pub use error::{ErrorKind, SendPrecondition, TakeoutError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use template::minify_html;
pub use transport::{Transport, UreqTransport};
pub use types::{AuthResult, EmailTemplate, SendResult};
