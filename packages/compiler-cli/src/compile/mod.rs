pub mod parallel;
pub mod sources;

pub use parallel::{parallel_rewrite, FileOutcome};
pub use sources::{collect_files, SourceFile};
