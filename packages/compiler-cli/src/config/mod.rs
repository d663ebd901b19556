pub mod rewrite;

pub use rewrite::{RewriteConfig, CONFIG_FILE_NAME};
