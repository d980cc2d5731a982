pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod upstream;

pub use config::*;
pub use error::*;
pub use model::*;
pub use service::*;
pub use upstream::*;
