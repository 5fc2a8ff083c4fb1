//! Tower middleware layers for the tongs HTTP client.
//!
//! Layers wrap the raw hyper client through [`HyperClientBuilder::layer`]; the
//! last layer added is the first to see a request.
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! Any other Tower layer over [`Request`]/[`Response`] can be plugged the same way.
//!
//! [`HyperClientBuilder::layer`]: crate::HyperClientBuilder::layer
//! [`Request`]: crate::Request
//! [`Response`]: crate::Response

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
