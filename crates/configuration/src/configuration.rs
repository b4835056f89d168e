//! Configuration for the filter compiler.

use query_engine_metadata::metadata;

/// The 'Configuration' type collects all the information the compiler needs at runtime.
///
/// 'ParsedConfiguration' is the serialized format as found on disk. Values of this type are
/// produced from a 'ParsedConfiguration' using 'make_runtime_configuration', which checks the
/// parts the serialized format cannot express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub model_registry: metadata::ModelRegistry,
}
