mod collection;
mod config;
mod error;
mod records;

pub mod storefront;

pub use collection::*;
pub use config::*;
pub use error::*;
pub use records::*;
