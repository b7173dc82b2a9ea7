//! Session and profile client core for the user API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host supplies a
//! `Transport`, a `TokenStore` and a `Renderer`; `Session` wires them into the
//! login / check-session / update-profile / upload-avatar flows.
//!
//! # Design
//! - `Gateway` is the single place where header policy and error decoding live.
//! - `ProfileClient` is stateless: it holds only the gateway. Each operation is
//!   split into `build_*` and `parse_*` so the I/O boundary stays explicit.
//! - `Session` owns the token lifecycle. Anonymous and Authenticated are told
//!   apart solely by whether the store holds a token.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod gateway;
pub mod http;
pub mod render;
pub mod session;
pub mod store;
pub mod types;

pub use client::ProfileClient;
pub use error::ApiError;
pub use gateway::Gateway;
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody, Transport, TransportError};
pub use render::{ProfileView, Renderer, DEFAULT_AVATAR};
pub use session::{Session, SessionState};
pub use store::{MemoryTokenStore, TokenStore, TOKEN_KEY};
pub use types::{AvatarFile, Credentials, LoginResult, UpdateResult, UpdateUser, UploadResult, User};
