//! Shared types and logic for the campusfeed client.
//!
//! This crate carries everything independent of the UI toolkit and the
//! HTTP/push transports: the wire models of the campus backend, the
//! push-event protocol, the bounded feed with its dispatch rules, and the
//! client-side error types.

pub mod error;
pub mod escape;
pub mod events;
pub mod feed;
pub mod models;

pub use error::*;
pub use escape::*;
pub use events::*;
pub use feed::*;
pub use models::*;
