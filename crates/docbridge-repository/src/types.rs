//! Repository entry and template types
//!
//! Types describing entries (documents, folders, shortcuts) and the
//! template catalog of the backing repository.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of an entry in the repository.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl EntryId {
    /// Get the raw id value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        EntryId(id)
    }
}

/// Kind of an addressable node in the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A document entry carrying content and field values.
    Document,
    /// A folder entry containing other entries.
    Folder,
    /// A shortcut redirecting to another entry.
    Shortcut,
}

impl EntryKind {
    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Document => "document",
            EntryKind::Folder => "folder",
            EntryKind::Shortcut => "shortcut",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A generic addressable node in the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryInfo {
    /// The entry id.
    pub id: EntryId,

    /// Entry name.
    pub name: String,

    /// What kind of entry this is.
    pub kind: EntryKind,

    /// For shortcuts, the id of the entry the shortcut redirects to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<EntryId>,
}

impl EntryInfo {
    /// Create a document entry.
    pub fn document(id: impl Into<EntryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: EntryKind::Document,
            target_id: None,
        }
    }

    /// Create a folder entry.
    pub fn folder(id: impl Into<EntryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: EntryKind::Folder,
            target_id: None,
        }
    }

    /// Create a shortcut entry redirecting to `target_id`.
    pub fn shortcut(
        id: impl Into<EntryId>,
        name: impl Into<String>,
        target_id: impl Into<EntryId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: EntryKind::Shortcut,
            target_id: Some(target_id.into()),
        }
    }

    /// Check if this entry is a document.
    #[must_use]
    pub fn is_document(&self) -> bool {
        self.kind == EntryKind::Document
    }
}

/// A resolved document entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// The entry id of the document.
    pub id: EntryId,

    /// Document name.
    pub name: String,

    /// Number of stored pages.
    pub page_count: i64,

    /// Full folder path of the document.
    pub path: String,

    /// Name of the template assigned to the document, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
}

impl DocumentInfo {
    /// Create a new document description.
    pub fn new(id: impl Into<EntryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            page_count: 0,
            path: String::new(),
            template_name: None,
        }
    }

    /// Set the folder path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the page count.
    #[must_use]
    pub fn with_page_count(mut self, pages: i64) -> Self {
        self.page_count = pages;
        self
    }

    /// Set the assigned template.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template_name = Some(template.into());
        self
    }
}

/// Primitive type tag of a template field.
///
/// These are the type tags the repository reports for template fields;
/// the broker maps them onto the host's type system. Tags without a host
/// mapping (`Blob`, `List`) are skipped during schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 16-bit integer.
    Int16,
    /// 32-bit integer.
    Int32,
    /// 64-bit integer.
    Int64,
    /// Text value.
    String,
    /// Date/time value.
    DateTime,
    /// Fixed-point decimal value.
    Decimal,
    /// UUID/GUID value.
    Guid,
    /// URI value.
    Uri,
    /// XML fragment.
    Xml,
    /// Boolean value.
    Boolean,
    /// Raw binary data.
    Blob,
    /// Multi-value list field.
    List,
}

impl FieldType {
    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Int16 => "int16",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::String => "string",
            FieldType::DateTime => "datetime",
            FieldType::Decimal => "decimal",
            FieldType::Guid => "guid",
            FieldType::Uri => "uri",
            FieldType::Xml => "xml",
            FieldType::Boolean => "boolean",
            FieldType::Blob => "blob",
            FieldType::List => "list",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "int16" | "short" => Some(FieldType::Int16),
            "int32" | "int" | "integer" => Some(FieldType::Int32),
            "int64" | "long" => Some(FieldType::Int64),
            "string" | "text" => Some(FieldType::String),
            "datetime" | "date" => Some(FieldType::DateTime),
            "decimal" | "float" | "double" => Some(FieldType::Decimal),
            "guid" | "uuid" => Some(FieldType::Guid),
            "uri" | "url" => Some(FieldType::Uri),
            "xml" => Some(FieldType::Xml),
            "boolean" | "bool" => Some(FieldType::Boolean),
            "blob" | "binary" => Some(FieldType::Blob),
            "list" => Some(FieldType::List),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field declared by a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as declared in the repository.
    pub name: String,

    /// Primitive type tag of the field.
    pub field_type: FieldType,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// A named field schema attachable to document entries.
///
/// Owned by the repository; immutable for the duration of a schema
/// description pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// Template name as declared in the repository.
    pub name: String,

    /// Ordered list of declared fields.
    pub fields: Vec<FieldDescriptor>,
}

impl TemplateDescriptor {
    /// Create a new template with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field using builder pattern.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldDescriptor::new(name, field_type));
        self
    }

    /// Find a field by name.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The first declared field, used as the key for keyed methods.
    #[must_use]
    pub fn first_field(&self) -> Option<&FieldDescriptor> {
        self.fields.first()
    }
}
