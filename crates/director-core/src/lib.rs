pub mod certs;
pub mod config;
pub mod plan;

pub use certs::TrustedCerts;
pub use config::DirectorConfig;
pub use plan::*;
