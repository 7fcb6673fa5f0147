//! Turns an OpenAPI 3.0 or Swagger 2.0 description into a Postman
//! collection, a matching environment, and a flat per-operation summary.

pub mod config;
pub mod error;
pub mod parse;
pub mod postman;
pub mod transform;

pub use parse::spec::SpecDocument;
pub use parse::version::SpecVersion;
pub use transform::{Artifacts, TransformOptions};
