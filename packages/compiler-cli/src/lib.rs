#![deny(clippy::all)]

/**
 * QWeb Template Compiler CLI
 *
 * Batch driver rewriting a whole corpus of template files in place.
 */
pub use qweb_compiler as compiler;

pub mod compile;
pub mod config;
pub mod perform_upgrade;
pub mod version;
