//! Response envelope, error mapping and extractors shared by every module.

mod api_error;
mod api_response;
mod validated_json;

pub use api_error::ApiError;
pub use api_response::{ApiResponse, EmptyData};
pub use validated_json::ValidatedJson;
