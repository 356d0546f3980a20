//! API client and page rendering core for the userboard directory.
//!
//! # Overview
//! `ApiClient` builds `HttpRequest` values and parses `HttpResponse` values,
//! with a pluggable `Transport` executing the round-trip in between. Page
//! sections fetch through the client and re-render named containers of a
//! host `Document`; the signup flow posts a form and drives page-level side
//! effects through a `PageHost`.
//!
//! # Design
//! - The access token is read once from a `KeyValueStore` and injected into
//!   `ApiClient` at construction. There is no global state.
//! - Every failure is an `ApiError` value. Transport and decoding failures
//!   are converted at the client boundary.
//! - Rendering replaces a container's rows wholesale and never runs on a
//!   failed fetch, so a failure leaves the previous content in place.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod render;
pub mod signup;
pub mod storage;
pub mod transport;
pub mod types;
pub mod view;

pub use client::ApiClient;
pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use render::{render, Container, Document, MemoryContainer, MemoryDocument, Row};
pub use signup::{FormData, PageHost, SignupFlow, SignupState, SubmitOutcome};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{AuthToken, CreatedUser, SignupRequest, SignupResponse, User};
pub use view::{load_birthdays, load_page, load_user, load_users, PageReport};
