pub mod analyzers;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod record;

pub use error::{RaterError, Result};
