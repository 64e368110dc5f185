//! Cache backends.

mod memory;

pub use memory::MemoryCache;
