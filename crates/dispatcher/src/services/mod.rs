//! Built-in service dispatchers
//!
//! Contains LogDispatcher and MemoryDispatcher.

mod log;
mod memory;

pub use self::log::LogDispatcher;
pub use self::memory::{MemoryDispatcher, ServiceCall};
