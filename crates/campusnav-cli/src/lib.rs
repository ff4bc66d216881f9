//! CampusNav CLI library.
//!
//! Terminal styling and output rendering shared by the `campusnav-cli`
//! subcommands.

pub mod output;
pub mod terminal;
