//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the collaborator traits (GroupRepository, AdminCheck)
//! but are themselves concrete structs, not traits.

mod group_tree;

pub use group_tree::GroupTreeService;
