//! Version
//!
//! Version information for the command line tool.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> String {
    format!("QWeb Template Compiler v{}", VERSION)
}
