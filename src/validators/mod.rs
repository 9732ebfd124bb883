//! Leaf validator family
//!
//! The reference validators the default registry wires up, plus a few
//! ordinary leaves (regex, attribute presence) built on the same abstraction.
//! Everything here is constructed through [`ValidatorRegistry::create`]
//! (directly or via a factory) and shared as a [`SharedValidator`].
//!
//! [`ValidatorRegistry::create`]: crate::registry::ValidatorRegistry::create
//! [`SharedValidator`]: crate::core::SharedValidator

pub mod fields;
pub mod generic;
pub mod mapping;
pub mod optional;
pub mod pattern;
pub mod predicate;
pub mod sequence;
pub mod type_match;
pub mod type_var;

pub use fields::HasFields;
pub use generic::GenericContainer;
pub use mapping::FixedMapping;
pub use optional::{Optional, optional};
pub use pattern::RegexMatch;
pub use predicate::{Anything, PredicateFn};
pub use sequence::FixedSequence;
pub use type_match::TypeMatch;
pub use type_var::TypeVarCheck;
