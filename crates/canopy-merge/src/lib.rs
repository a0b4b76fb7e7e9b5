//! Non-destructive regeneration of Canopy output.
//!
//! Generated files carry user blocks between marker comments. On the next
//! run, this crate:
//! 1. Extracts the user blocks of the file already on disk
//! 2. Decides per file whether to create, skip, merge or overwrite
//! 3. Carries user block content into the freshly generated text
//! 4. Writes the result through an [`OutputSink`]

pub mod blocks;
pub mod markers;
pub mod merge;
pub mod sink;
pub mod strategy;

pub use blocks::{extract_blocks, BlockScan, UserBlock};
pub use markers::{user_block, END_MARKER, START_MARKER};
pub use merge::{merge, merge_with_report, MergeReport};
pub use sink::{apply_updates, FileOutcome, FsSink, MemorySink, OutputSink, WriteReport};
pub use strategy::{decide_update, normalize_generated, plan_update, PlannedUpdate, UpdateAction};
