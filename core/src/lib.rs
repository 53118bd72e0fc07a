//! Blocking HTTP client helper for integration-testing web services.
//!
//! # Overview
//! A `Client` joins request paths onto a configured base URL, sets JSON or
//! form content headers, sends the request through its `Transport`, rejects
//! any status outside 200..=299, and decodes the body into a JSON target or
//! returns it as text.
//!
//! ```no_run
//! use probe_core::{Client, ClientConfig, FormValues};
//! use serde::Deserialize;
//!
//! #[derive(Default, Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! let config = ClientConfig::with_base_url("http://localhost:3000/api")?;
//! let client = Client::new(config);
//!
//! let mut user = User::default();
//! client.get_json("/users/1", Some(&mut user))?;
//!
//! let page = client.post_page("/pages/users", &FormValues::from([("name", "Tom")]))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Design
//! - `Client` owns its transport (`UreqTransport` by default) and an
//!   immutable `ClientConfig`; it keeps no per-request state and is safe to
//!   share between threads.
//! - Errors are a tagged enum (`ClientError`) so callers can branch on the
//!   failure kind and status code.
//! - Nothing is logged at error level or retried; every failure is returned.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod path;
pub mod transport;

pub use client::{Client, Discard};
pub use config::{BaseUrl, ClientConfig};
pub use error::{ClientError, ConfigError, TransportError};
pub use form::FormValues;
pub use http::{HttpMethod, HttpRequest, HttpResponse, ResponseBody};
pub use transport::{Transport, UreqTransport};
