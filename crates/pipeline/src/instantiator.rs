//! Default data-context instantiation from type descriptors

use modelgen_core::error::{Error, Result};
use modelgen_core::host::Instantiator;
use modelgen_core::{ContextInstance, ProjectConfiguration, ResolvedType};
use tracing::debug;

/// Builds a [`ContextInstance`] from the resolved type's descriptor
///
/// The connection string is looked up by the type's configured connection
/// name, then its full name, then its simple name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInstantiator;

impl Instantiator for DefaultInstantiator {
    fn instantiate(
        &self,
        resolved: &ResolvedType,
        configuration: &ProjectConfiguration,
    ) -> Result<ContextInstance> {
        let descriptor = &resolved.descriptor;
        if descriptor.is_abstract {
            return Err(Error::instantiation(
                &resolved.full_name,
                "cannot create an instance of an abstract type",
            ));
        }
        if !descriptor.has_default_constructor {
            return Err(Error::instantiation(
                &resolved.full_name,
                "no public parameterless constructor",
            ));
        }

        let candidates = descriptor
            .connection_string_name
            .iter()
            .map(String::as_str)
            .chain([resolved.full_name.as_str(), resolved.simple_name()]);
        let connection = candidates
            .into_iter()
            .find_map(|name| configuration.connection_string(name))
            .cloned();

        match &connection {
            Some(entry) => debug!(
                "Using connection string '{}' for '{}'",
                entry.name, resolved.full_name
            ),
            None if descriptor.requires_connection => {
                return Err(Error::instantiation(
                    &resolved.full_name,
                    format!(
                        "no connection string named '{}' in {}",
                        descriptor
                            .connection_string_name
                            .as_deref()
                            .unwrap_or_else(|| resolved.simple_name()),
                        configuration.source_path.display()
                    ),
                ));
            }
            None => debug!("No connection string found for '{}'", resolved.full_name),
        }

        let namespace = resolved
            .full_name
            .rsplit_once('.')
            .map_or("", |(namespace, _)| namespace)
            .to_string();

        Ok(ContextInstance {
            full_name: resolved.full_name.clone(),
            container_name: resolved.simple_name().to_string(),
            namespace,
            connection,
            entity_sets: descriptor.entity_sets.clone(),
        })
    }
}
