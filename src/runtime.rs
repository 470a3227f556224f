//! Template evaluation.
//!
//! [`render`] is the entry point; [`Variable`] is the value model,
//! [`Scopes`] the binding environment and [`registry`] the property tables.

pub mod eval;
pub mod registry;
pub mod scope;
pub mod value;

pub use eval::{render, Generator};
pub use scope::Scopes;
pub use value::Variable;
