//! Infrastructure layer: collaborator implementations and DI container
//!
//! This layer implements the data-layer traits and wires up services.

pub mod catalog;
pub mod di;
pub mod error;
pub mod memory;
pub mod traits;

pub use catalog::Catalog;
pub use error::{InfraError, InfraResult};
pub use memory::InMemoryGroupRepository;
