//! EDMX model document writer
//!
//! Output depends only on the instance, so serializing the same context twice
//! yields identical bytes.

use modelgen_core::error::{Error, Result};
use modelgen_core::host::SchemaSerializer;
use modelgen_core::{ContextInstance, EntityTypeDescriptor};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::collections::HashSet;
use std::io::Write;

const EDMX_NAMESPACE: &str = "http://schemas.microsoft.com/ado/2009/11/edmx";
const EDM_NAMESPACE: &str = "http://schemas.microsoft.com/ado/2009/11/edm";
const STORE_NAMESPACE: &str = "http://schemas.microsoft.com/ado/2009/11/edm/ssdl";

/// Writes a conceptual model (entity container, sets, types) plus the store
/// provider of the instance's connection
#[derive(Debug, Clone, Copy, Default)]
pub struct EdmxSerializer;

impl SchemaSerializer for EdmxSerializer {
    fn serialize(&self, instance: &ContextInstance, out: &mut dyn Write) -> Result<()> {
        let document = render(instance)?;
        out.write_all(&document)
            .map_err(|e| Error::serialization(format!("Failed to write model: {e}")))?;
        out.flush()
            .map_err(|e| Error::serialization(format!("Failed to write model: {e}")))
    }
}

/// Entity types in first-use order, each once
fn entity_types(instance: &ContextInstance) -> Result<Vec<&EntityTypeDescriptor>> {
    let mut seen = HashSet::new();
    let mut types = Vec::new();
    for set in &instance.entity_sets {
        let entity_type = &set.entity_type;
        if !seen.insert(entity_type.name.as_str()) {
            continue;
        }
        for key in &entity_type.keys {
            if !entity_type.properties.iter().any(|p| &p.name == key) {
                return Err(Error::serialization(format!(
                    "Key '{key}' of entity type '{}' is not one of its properties",
                    entity_type.name
                )));
            }
        }
        types.push(entity_type);
    }
    Ok(types)
}

fn render(instance: &ContextInstance) -> Result<Vec<u8>> {
    if instance.container_name.is_empty() {
        return Err(Error::serialization(format!(
            "Context '{}' has no container name",
            instance.full_name
        )));
    }
    let types = entity_types(instance)?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut edmx = BytesStart::new("edmx:Edmx");
    edmx.push_attribute(("Version", "3.0"));
    edmx.push_attribute(("xmlns:edmx", EDMX_NAMESPACE));
    emit(&mut writer, Event::Start(edmx))?;
    emit(&mut writer, Event::Start(BytesStart::new("edmx:Runtime")))?;

    write_storage_model(&mut writer, instance)?;
    write_conceptual_model(&mut writer, instance, &types)?;

    emit(&mut writer, Event::End(BytesEnd::new("edmx:Runtime")))?;
    emit(&mut writer, Event::End(BytesEnd::new("edmx:Edmx")))?;

    let mut output = writer.into_inner();
    output.push(b'\n');
    Ok(output)
}

fn write_storage_model(writer: &mut Writer<Vec<u8>>, instance: &ContextInstance) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("edmx:StorageModels")))?;

    let store_namespace = format!("{}.Store", schema_namespace(instance));
    let mut schema = BytesStart::new("Schema");
    schema.push_attribute(("Namespace", store_namespace.as_str()));
    schema.push_attribute(("Alias", "Self"));
    if let Some(provider) = instance
        .connection
        .as_ref()
        .and_then(|c| c.provider_name.as_deref())
    {
        schema.push_attribute(("Provider", provider));
    }
    if let Some(connection) = &instance.connection {
        schema.push_attribute(("ConnectionStringName", connection.name.as_str()));
    }
    schema.push_attribute(("xmlns", STORE_NAMESPACE));
    emit(writer, Event::Empty(schema))?;

    emit(writer, Event::End(BytesEnd::new("edmx:StorageModels")))?;
    Ok(())
}

fn write_conceptual_model(
    writer: &mut Writer<Vec<u8>>,
    instance: &ContextInstance,
    types: &[&EntityTypeDescriptor],
) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("edmx:ConceptualModels")))?;

    let namespace = schema_namespace(instance);
    let mut schema = BytesStart::new("Schema");
    schema.push_attribute(("Namespace", namespace.as_str()));
    schema.push_attribute(("Alias", "Self"));
    schema.push_attribute(("xmlns", EDM_NAMESPACE));
    emit(writer, Event::Start(schema))?;

    let mut container = BytesStart::new("EntityContainer");
    container.push_attribute(("Name", instance.container_name.as_str()));
    if instance.entity_sets.is_empty() {
        emit(writer, Event::Empty(container))?;
    } else {
        emit(writer, Event::Start(container))?;
        for set in &instance.entity_sets {
            let entity_type = format!("Self.{}", set.entity_type.name);
            let mut element = BytesStart::new("EntitySet");
            element.push_attribute(("Name", set.name.as_str()));
            element.push_attribute(("EntityType", entity_type.as_str()));
            emit(writer, Event::Empty(element))?;
        }
        emit(writer, Event::End(BytesEnd::new("EntityContainer")))?;
    }

    for entity_type in types {
        write_entity_type(writer, entity_type)?;
    }

    emit(writer, Event::End(BytesEnd::new("Schema")))?;
    emit(writer, Event::End(BytesEnd::new("edmx:ConceptualModels")))?;
    Ok(())
}

fn write_entity_type(
    writer: &mut Writer<Vec<u8>>,
    entity_type: &EntityTypeDescriptor,
) -> Result<()> {
    let mut start = BytesStart::new("EntityType");
    start.push_attribute(("Name", entity_type.name.as_str()));
    emit(writer, Event::Start(start))?;

    if !entity_type.keys.is_empty() {
        emit(writer, Event::Start(BytesStart::new("Key")))?;
        for key in &entity_type.keys {
            let mut property_ref = BytesStart::new("PropertyRef");
            property_ref.push_attribute(("Name", key.as_str()));
            emit(writer, Event::Empty(property_ref))?;
        }
        emit(writer, Event::End(BytesEnd::new("Key")))?;
    }

    for property in &entity_type.properties {
        let max_length = property.max_length.map(|n| n.to_string());
        let mut element = BytesStart::new("Property");
        element.push_attribute(("Name", property.name.as_str()));
        element.push_attribute(("Type", property.type_name.as_str()));
        element.push_attribute(("Nullable", if property.nullable { "true" } else { "false" }));
        if let Some(max_length) = &max_length {
            element.push_attribute(("MaxLength", max_length.as_str()));
        }
        emit(writer, Event::Empty(element))?;
    }

    emit(writer, Event::End(BytesEnd::new("EntityType")))?;
    Ok(())
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::serialization(format!("Write error: {e}")))
}

/// The context's namespace, or its container name for a type without one
fn schema_namespace(instance: &ContextInstance) -> String {
    if instance.namespace.is_empty() {
        instance.container_name.clone()
    } else {
        instance.namespace.clone()
    }
}
