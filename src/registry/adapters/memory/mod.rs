//! In-memory registry adapters.

mod directory;
mod registry;

pub use directory::InMemoryNodeDirectory;
pub use registry::InMemoryTaskRegistry;
