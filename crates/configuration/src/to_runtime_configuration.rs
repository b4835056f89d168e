//! Convert the parsed configuration metadata to internal engine metadata
//! That can be used by the filter compiler.

use crate::configuration::Configuration;
use crate::error::MakeRuntimeConfigurationError;
use crate::version1::{ParsedConfiguration, CURRENT_VERSION};

/// Convert the serialized format to runtime configuration.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    if parsed_config.version != CURRENT_VERSION {
        return Err(MakeRuntimeConfigurationError::UnsupportedVersion(
            parsed_config.version,
        ));
    }

    for (entity, info) in &parsed_config.models.0 {
        if info.storage_table_name.trim().is_empty() {
            return Err(MakeRuntimeConfigurationError::EmptyStorageTableName {
                entity: entity.clone(),
            });
        }
        if let Some((attribute, _)) = info
            .data_shaper_map
            .iter()
            .find(|(_, column)| column.trim().is_empty())
        {
            return Err(MakeRuntimeConfigurationError::EmptyColumnName {
                entity: entity.clone(),
                attribute: attribute.clone(),
            });
        }
    }

    Ok(Configuration {
        model_registry: parsed_config.models,
    })
}
