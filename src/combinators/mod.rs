//! Composite combinators
//!
//! Built purely on the [`Validate`](crate::core::Validate) abstraction, with
//! no special-cased dispatch: each one holds already-resolved sub-validators
//! and threads the binding context through them. The `*_of` / `range` /
//! `one_of` free functions are the specification-level constructors.

pub mod all;
pub mod any;
pub mod none;
pub mod one_of;
pub mod range;
pub mod sampled;

pub use all::{AllOf, all_of};
pub use any::{AnyOf, any_of};
pub use none::{NoneOf, none_of};
pub use one_of::{OneOf, one_of};
pub use range::{InRange, range};
pub use sampled::{
    DEFAULT_CHECK_LIMIT, MapOf, SequenceOf, list_of, map_of, sequence_of, tuple_of,
};
