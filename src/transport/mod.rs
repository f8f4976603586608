//! Request execution.
//!
//! [`Transport`] is the seam the client sends through; [`BasicTransport`] is
//! the default reqwest-backed implementation and [`auth::TokenAuth`] adds the
//! `Authorization` header on top of any transport.

mod basic;
mod client;
pub mod auth;

pub use basic::{BasicTransport, USER_AGENT};
pub use client::Transport;
