// imgpath: request-path directive parser for an image transformation proxy

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod options;
pub mod parser;
pub mod signature;
pub mod source;

pub use error::RequestError;
pub use parser::{ParsedPath, PathParser};
