pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod transport;
pub mod validate;

pub use client::{ApiClient, Lenient, REQUEST_TIMEOUT};
pub use config::ClientConfiguration;
pub use error::{ConfigError, ErrorKind, RequestError};
