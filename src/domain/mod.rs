//! Domain layer: entities and tree assembly
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;

pub use arena::{TreeArena, TreeNode};
pub use builder::{build_branch, TreeBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult};
