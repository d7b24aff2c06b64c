//! Host method-call shape
//!
//! The fixed call contract with the host platform: input property
//! values, required-property names, return-property slots, out-of-band
//! parameters, the requested method kind, and the target object. The
//! dispatcher populates the return slots and hands records back.

use serde::{Deserialize, Serialize};

use crate::types::MethodKind;
use docbridge_repository::values::{FieldValue, FieldValues};

/// A named property slot, possibly without a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyValue {
    /// Property (or parameter) name.
    pub name: String,

    /// The value, if the host supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
}

impl PropertyValue {
    /// Create a slot with a value.
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Create an empty slot.
    pub fn unset(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Check whether the slot holds a usable value.
    #[must_use]
    pub fn has_value(&self) -> bool {
        matches!(&self.value, Some(v) if !v.is_null())
    }
}

/// An inbound method invocation from the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    /// Name of the target service object.
    pub object: String,

    /// Requested operation kind.
    pub kind: MethodKind,

    /// Input property values. Properties the user left blank arrive
    /// without a value.
    #[serde(default)]
    pub inputs: Vec<PropertyValue>,

    /// Names of the properties the host marked required.
    #[serde(default)]
    pub required: Vec<String>,

    /// Names of the return-property slots to populate.
    #[serde(default)]
    pub returns: Vec<String>,

    /// Out-of-band method parameters.
    #[serde(default)]
    pub parameters: Vec<PropertyValue>,
}

impl MethodCall {
    /// Create a call against an object with the given kind.
    pub fn new(object: impl Into<String>, kind: MethodKind) -> Self {
        Self {
            object: object.into(),
            kind,
            inputs: Vec::new(),
            required: Vec::new(),
            returns: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// Add an input property value.
    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.inputs.push(PropertyValue::new(name, value));
        self
    }

    /// Add an input property the user left blank.
    pub fn with_blank_input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(PropertyValue::unset(name));
        self
    }

    /// Add a return slot.
    pub fn with_return(mut self, name: impl Into<String>) -> Self {
        self.returns.push(name.into());
        self
    }

    /// Add return slots for each name.
    #[must_use]
    pub fn with_returns(mut self, names: Vec<String>) -> Self {
        self.returns.extend(names);
        self
    }

    /// Add an out-of-band parameter value.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.parameters.push(PropertyValue::new(name, value));
        self
    }

    /// Look up a parameter value by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&FieldValue> {
        self.parameters
            .iter()
            .find(|p| p.name == name && p.has_value())
            .and_then(|p| p.value.as_ref())
    }

    /// The first input property, if it holds a value.
    #[must_use]
    pub fn first_input(&self) -> Option<&PropertyValue> {
        self.inputs.first()
    }
}

/// One populated record handed back to the host.
///
/// Slots are created from the call's return-property names; slots no
/// source field matched stay unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    slots: Vec<PropertyValue>,
}

impl Record {
    /// Create an empty record with one unset slot per return property.
    #[must_use]
    pub fn from_returns(returns: &[String]) -> Self {
        Self {
            slots: returns.iter().map(PropertyValue::unset).collect(),
        }
    }

    /// Set a slot by name. Names with no matching slot are ignored.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.name == name) {
            slot.value = Some(value.into());
        }
    }

    /// Copy values out of a field bag by matching slot names against
    /// field names. Unmatched source fields are ignored; unmatched
    /// slots are left unset.
    pub fn fill_from(&mut self, fields: &FieldValues) {
        for slot in &mut self.slots {
            if let Some(value) = fields.get(&slot.name) {
                slot.value = Some(value.clone());
            }
        }
    }

    /// Get a slot value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.value.as_ref())
    }

    /// Iterate over the slots in return order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyValue> {
        self.slots.iter()
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the record has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_lookup_skips_blank() {
        let call = MethodCall::new("Invoice", MethodKind::Read)
            .with_parameter("DocumentID", 100i64);
        assert_eq!(call.parameter("DocumentID").and_then(FieldValue::as_number), Some(100));
        assert!(call.parameter("Missing").is_none());

        let blank = MethodCall::new("Invoice", MethodKind::Read)
            .with_parameter("DocumentID", FieldValue::Null);
        assert!(blank.parameter("DocumentID").is_none());
    }

    #[test]
    fn test_record_fill_matches_by_name() {
        let returns = vec!["InvoiceID".to_string(), "Status".to_string()];
        let mut record = Record::from_returns(&returns);

        let fields = FieldValues::new()
            .with("Status", "Open")
            .with("Unrelated", "ignored");
        record.fill_from(&fields);

        assert_eq!(record.get("Status").and_then(FieldValue::as_text), Some("Open"));
        // unmatched slot stays unset, unmatched field is dropped
        assert!(record.get("InvoiceID").is_none());
        assert!(record.get("Unrelated").is_none());
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_record_set_ignores_unknown_slot() {
        let mut record = Record::from_returns(&["A".to_string()]);
        record.set("B", "x");
        assert!(record.get("B").is_none());
        record.set("A", "y");
        assert_eq!(record.get("A").and_then(FieldValue::as_text), Some("y"));
    }
}
