pub mod autocomplete;
pub mod decorators;
pub mod document;

// Re-export key types for easier usage
pub use autocomplete::*;
pub use decorators::*;
pub use document::*;
