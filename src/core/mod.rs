//! Core abstractions: the validator trait and the error taxonomy.

pub mod error;
pub mod traits;

pub use error::{CheckError, SpecError, render};
pub use traits::{SharedValidator, Validate};
