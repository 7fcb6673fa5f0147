pub mod collection;
pub mod environment;

pub use collection::*;
pub use environment::{Environment, EnvironmentVariable};
