//! Core vocabulary types for the Campus client data layer.
//!
//! This crate holds the types every other Campus crate speaks in:
//! request context dimensions, normalized query parameters, HTTP methods,
//! and the shared error enum. It performs no I/O.

pub mod context;
pub mod error;
pub mod http;
pub mod params;

pub use context::{RequestContext, Role};
pub use error::{ApiError, ApiResult};
pub use http::HttpMethod;
pub use params::{ParamValue, QueryParams};
