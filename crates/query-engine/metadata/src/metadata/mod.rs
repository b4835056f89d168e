//! Metadata information regarding the entities filters are compiled against.

pub mod registry;

// re-export without modules
pub use registry::*;
