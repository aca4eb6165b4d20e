pub mod batch;
pub mod certificate;
pub mod config;
pub mod discover;
pub mod error;
pub mod output;
pub mod xmlcon;

pub use batch::{process_certificate, run, BatchReport};
pub use config::Config;
pub use error::XmlconError;
