//! Request validation for the book schemas.

mod validation;
pub use validation::*;
