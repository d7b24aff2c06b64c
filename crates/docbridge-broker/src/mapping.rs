//! Field type mapping
//!
//! The table mapping repository field type tags onto the host's type
//! system. Built once at startup and passed explicitly to schema
//! generation and property-copy routines; never ambient state.

use std::collections::HashMap;

use crate::types::ServiceType;
use docbridge_repository::types::FieldType;

/// Immutable mapping from repository field types to host service types.
///
/// Field types absent from the table have no host representation and
/// are skipped during schema generation.
#[derive(Debug, Clone)]
pub struct TypeMap {
    entries: HashMap<FieldType, ServiceType>,
}

impl TypeMap {
    /// The standard mapping table.
    #[must_use]
    pub fn standard() -> Self {
        let entries = HashMap::from([
            (FieldType::Int16, ServiceType::Number),
            (FieldType::Int32, ServiceType::Number),
            (FieldType::Int64, ServiceType::Number),
            (FieldType::String, ServiceType::Text),
            (FieldType::DateTime, ServiceType::DateTime),
            (FieldType::Decimal, ServiceType::Decimal),
            (FieldType::Guid, ServiceType::Guid),
            (FieldType::Uri, ServiceType::HyperLink),
            (FieldType::Xml, ServiceType::Xml),
            (FieldType::Boolean, ServiceType::YesNo),
        ]);
        Self { entries }
    }

    /// Build an empty table (used by tests exercising unmapped paths).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Resolve a field type; `None` means the type has no host mapping.
    #[must_use]
    pub fn resolve(&self, field_type: FieldType) -> Option<ServiceType> {
        self.entries.get(&field_type).copied()
    }

    /// Check whether a field type is mapped.
    #[must_use]
    pub fn is_mapped(&self, field_type: FieldType) -> bool {
        self.entries.contains_key(&field_type)
    }

    /// Number of mapped field types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::standard()
    }
}
