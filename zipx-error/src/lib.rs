pub mod ext;
pub mod macros;
pub mod stack;
pub mod status_code;
pub mod types;

// Publicly re-export all error types and functions from the submodules to
// simplify access from external code.
pub use ext::*;
pub use macros::*;
pub use stack::*;
pub use status_code::*;
pub use types::*;

/// Result for the outer layers (settings, logging, benchmarks).
pub type ZipxResult<T> = Result<T, StackError>;

/// Result for the compression layer and the serializer pipeline.
pub type CodecResult<T> = Result<T, CodecError>;
