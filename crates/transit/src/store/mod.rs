//! Storage collaborator abstractions.

pub mod memory;
pub mod traits;

pub use memory::MemoryLineStore;
pub use traits::LineStore;
