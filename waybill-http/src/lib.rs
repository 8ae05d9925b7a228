pub mod error;
pub mod json;
pub mod middleware;

pub use error::{include_stacks, ApiError, ErrorKind};
pub use json::Json;
pub use middleware::trace_requests;
