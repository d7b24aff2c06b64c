//! Service-object schema types
//!
//! The generated description of objects surfaced to the host platform:
//! properties, methods, and out-of-band method parameters. Built once
//! during schema description and never mutated at runtime.

use serde::{Deserialize, Serialize};

use crate::types::{MethodKind, ServiceType};

/// Replace spaces with underscores; object and property names surfaced
/// to the host must not contain spaces.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// A generated service object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceObject {
    /// Object name (no spaces).
    pub name: String,

    /// Display name for UI presentation.
    pub display_name: String,

    /// Whether the object is active. Inactive objects are ignored by
    /// the host.
    pub active: bool,

    /// Ordered list of generated properties.
    pub properties: Vec<ServiceProperty>,

    /// Ordered list of generated methods.
    pub methods: Vec<ServiceMethod>,
}

impl ServiceObject {
    /// Create a new active object. The name is sanitized; the display
    /// name keeps the original form.
    pub fn new(name: impl Into<String>) -> Self {
        let display_name = name.into();
        Self {
            name: sanitize_name(&display_name),
            display_name,
            active: true,
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Add a property using builder pattern.
    #[must_use]
    pub fn with_property(mut self, property: ServiceProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Add a method using builder pattern.
    #[must_use]
    pub fn with_method(mut self, method: ServiceMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Find a property by name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&ServiceProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Check if a property exists.
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }

    /// Find a method by kind.
    #[must_use]
    pub fn method_of_kind(&self, kind: MethodKind) -> Option<&ServiceMethod> {
        self.methods.iter().find(|m| m.kind == kind)
    }

    /// All property names, in declaration order.
    #[must_use]
    pub fn property_names(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.name.clone()).collect()
    }
}

/// A generated property of a service object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceProperty {
    /// Property name (no spaces, unique within the object).
    pub name: String,

    /// Display name for UI presentation.
    pub display_name: String,

    /// Host type of the property.
    pub service_type: ServiceType,
}

impl ServiceProperty {
    /// Create a property. The name is sanitized; the display name keeps
    /// the original form.
    pub fn new(name: impl Into<String>, service_type: ServiceType) -> Self {
        let display_name = name.into();
        Self {
            name: sanitize_name(&display_name),
            display_name,
            service_type,
        }
    }
}

/// A generated method of a service object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceMethod {
    /// Method name as surfaced to the host.
    pub name: String,

    /// Operation kind the host requests this method with.
    pub kind: MethodKind,

    /// Names of properties accepted as inputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_properties: Vec<String>,

    /// Names of properties the host must supply. For keyed methods this
    /// is the single key property.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_properties: Vec<String>,

    /// Names of properties populated on return (always all properties).
    pub return_properties: Vec<String>,

    /// Out-of-band parameters, not part of the return properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<MethodParameter>,
}

impl ServiceMethod {
    /// Create a method with the given name and kind.
    pub fn new(name: impl Into<String>, kind: MethodKind) -> Self {
        Self {
            name: name.into(),
            kind,
            input_properties: Vec::new(),
            required_properties: Vec::new(),
            return_properties: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// Set the input properties.
    #[must_use]
    pub fn with_inputs(mut self, names: Vec<String>) -> Self {
        self.input_properties = names;
        self
    }

    /// Mark a property as required.
    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required_properties.push(name.into());
        self
    }

    /// Set the return properties.
    #[must_use]
    pub fn with_returns(mut self, names: Vec<String>) -> Self {
        self.return_properties = names;
        self
    }

    /// Add an out-of-band parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: MethodParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// The key property of a keyed (Read/Update) method.
    #[must_use]
    pub fn key_property(&self) -> Option<&str> {
        match self.kind {
            MethodKind::Read | MethodKind::Update => {
                self.required_properties.first().map(String::as_str)
            }
            _ => None,
        }
    }

    /// Find a parameter by name.
    #[must_use]
    pub fn get_parameter(&self, name: &str) -> Option<&MethodParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// An out-of-band method parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodParameter {
    /// Parameter name.
    pub name: String,

    /// Host type of the parameter.
    pub service_type: ServiceType,

    /// Whether the host must supply a value.
    pub required: bool,

    /// Description surfaced to the host tooling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MethodParameter {
    /// Create a required parameter.
    pub fn required(name: impl Into<String>, service_type: ServiceType) -> Self {
        Self {
            name: name.into(),
            service_type,
            required: true,
            description: None,
        }
    }

    /// Create an optional parameter.
    pub fn optional(name: impl Into<String>, service_type: ServiceType) -> Self {
        Self {
            name: name.into(),
            service_type,
            required: false,
            description: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Invoice 2024"), "Invoice_2024");
        assert_eq!(sanitize_name("Invoice"), "Invoice");
        assert_eq!(sanitize_name("a b c"), "a_b_c");
    }

    #[test]
    fn test_object_name_sanitized_display_kept() {
        let obj = ServiceObject::new("Purchase Orders");
        assert_eq!(obj.name, "Purchase_Orders");
        assert_eq!(obj.display_name, "Purchase Orders");
        assert!(obj.active);
    }

    #[test]
    fn test_key_property_only_for_keyed_kinds() {
        let read = ServiceMethod::new("Read", MethodKind::Read).with_required("InvoiceID");
        assert_eq!(read.key_property(), Some("InvoiceID"));

        let insert = ServiceMethod::new("Insert", MethodKind::Create).with_required("InvoiceID");
        assert_eq!(insert.key_property(), None);
    }

    #[test]
    fn test_method_lookup() {
        let obj = ServiceObject::new("Invoice")
            .with_method(ServiceMethod::new("Read", MethodKind::Read))
            .with_method(ServiceMethod::new("Search", MethodKind::List));

        assert!(obj.method_of_kind(MethodKind::Read).is_some());
        assert!(obj.method_of_kind(MethodKind::Create).is_none());
    }
}
