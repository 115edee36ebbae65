//! campusfeed client - Dioxus application
//!
//! Session-gated student client for course notifications: login, subject
//! subscription toggles, and a live feed of broker messages pushed over the
//! backend's `/events` channel. Builds for web (WASM) and desktop.

pub mod api_client;
pub mod auth_session;
pub mod controller;
pub mod logging;
pub mod push;
pub mod routes;
pub mod storage;
pub mod views;

pub use api_client::{ApiClient, ApiResponse, ResponseBody};
pub use auth_session::{AuthContext, AuthProvider, StudentSession};
pub use controller::FeedContext;
pub use routes::Route;
