//! Storage collaborators.

mod file;
mod memory;

pub use file::FileProfileStore;
pub use memory::MemoryProfileStore;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
