//! Folio turns HTML-like templates with embedded `<$ … >` directives into
//! static pages, rendered against a portfolio of personas, projects and links.
//!
//! The pipeline is: portfolio file → [`portfolio::parser`] → [`Portfolio`];
//! template file → [`syntax::parser`] → [`Template`]; then
//! [`runtime::render`] produces the page text and [`engine`] writes it out.

pub use crate::errors::{ErrorKind, ErrorReporting, FolioError, SourceContext};
pub use crate::portfolio::{Link, Persona, Portfolio, Project};
pub use crate::runtime::render;
pub use crate::syntax::{parser::parse, Stage, StageId, Stages, Template};

pub mod cli;
pub mod engine;
pub mod errors;
pub mod portfolio;
pub mod runtime;
pub mod syntax;
