//! Per-service HTTP clients with request-time base URL resolution.

mod client;
mod error;
mod interceptor;

pub use client::ServiceClient;
pub use error::ApiError;
pub use interceptor::{BaseUrlInterceptor, BearerInterceptor, Interceptor, PendingRequest};
