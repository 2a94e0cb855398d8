pub mod config;
pub mod error;
pub mod question;

pub use config::Config;
pub use error::*;
pub use question::*;
