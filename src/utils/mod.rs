//! Batching and serialization building blocks.

pub mod batching;
pub mod serialization;

// Re-export commonly used types
pub use batching::{Admission, BoundedBatch, Limit};
pub use serialization::{json, string, SerializationError};
