//! Subcommand implementations.

pub mod blocks;
pub mod generate;

pub use blocks::{list_blocks, BlockInfo};
pub use generate::{run_generate, GenerateArgs, GenerateSummary};
