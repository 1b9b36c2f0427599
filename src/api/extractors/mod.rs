//! Custom extractors that report rejections as JSON errors.

mod id_path;
mod json_body;

pub use id_path::IdPath;
pub use json_body::JsonBody;
