//! SQL for the books table: fixed identifiers, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
