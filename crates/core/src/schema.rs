//! Schema descriptors read from a project's build output and the context
//! instance handed to the schema serializer

use serde::{Deserialize, Serialize};

use crate::model::ConnectionStringEntry;

/// A public type as described by the project's type manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub full_name: String,

    #[serde(default)]
    pub is_abstract: bool,

    #[serde(default = "default_true")]
    pub has_default_constructor: bool,

    /// Connection string name the type asks for, if it names one explicitly
    #[serde(default)]
    pub connection_string_name: Option<String>,

    /// Whether construction fails without a matching connection string
    #[serde(default)]
    pub requires_connection: bool,

    #[serde(default)]
    pub entity_sets: Vec<EntitySetDescriptor>,
}

fn default_true() -> bool {
    true
}

impl TypeDescriptor {
    pub fn is_constructible(&self) -> bool {
        !self.is_abstract && self.has_default_constructor
    }
}

/// An entity set exposed by a data context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySetDescriptor {
    pub name: String,
    pub entity_type: EntityTypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Conceptual type name (`Int32`, `String`, `DateTime`, ...)
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub max_length: Option<u32>,
}

/// An instantiated data context, ready to be serialized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInstance {
    pub full_name: String,
    /// Entity container name, the type's simple name
    pub container_name: String,
    /// Namespace of the conceptual model
    pub namespace: String,
    pub connection: Option<ConnectionStringEntry>,
    pub entity_sets: Vec<EntitySetDescriptor>,
}
