//! Core business logic module
//!
//! This module contains the pure parts of the migration: command
//! descriptions, the ref snapshot, prompt recognition and text helpers.
//! Nothing here spawns a process.

pub mod command_info;
pub mod meta_info;
pub mod prompt;
pub mod text;

// Re-export commonly used items
pub use command_info::CommandInfo;
pub use meta_info::{
    parse_branch_list, parse_branch_name, strip_svn_prefix, strip_svn_tags_prefix, svn_tags,
    MetaInfo,
};
pub use prompt::{PromptScanner, PromptSignal};
pub use text::{escape_quotes, quote_argument, remove_from_two_ends, split_arguments};
