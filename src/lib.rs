//! Group hierarchy trees for catalog front-ends.
//!
//! Builds the forest of group trees (`group_tree`) and the highlighted
//! section containing one group (`group_tree_section`) from a flat hierarchy
//! listing supplied by the host's data layer.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
