pub mod config;
pub mod error;
pub mod error_utils;
pub mod outcome;
pub mod report;
pub mod types;

pub use config::*;
pub use error::*;
pub use error_utils::*;
pub use outcome::*;
pub use report::*;
pub use types::*;
