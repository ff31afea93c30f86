mod error;
pub use error::ApiError;

mod envelope;
pub use envelope::{Envelope, cors_headers};

mod handler;
pub use handler::ApiHandler;

mod adapter;
pub use adapter::PracApiAdapter;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpApi;

#[cfg(feature = "http")]
pub use axum;
