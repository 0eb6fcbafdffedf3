//! Request and response transformations applied around each step's call.

mod request;
mod response;

pub use request::transform_request;
pub use response::transform_response;
