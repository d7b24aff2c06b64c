//! Broker type definitions
//!
//! The host platform's type system and method kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target type-system type of a generated property, as understood by the
/// host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Free text.
    Text,
    /// Integer number.
    Number,
    /// Fixed-point decimal.
    Decimal,
    /// Date and time.
    DateTime,
    /// GUID value.
    Guid,
    /// Hyperlink.
    HyperLink,
    /// XML fragment.
    Xml,
    /// Yes/no flag.
    YesNo,
}

impl ServiceType {
    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Text => "text",
            ServiceType::Number => "number",
            ServiceType::Decimal => "decimal",
            ServiceType::DateTime => "datetime",
            ServiceType::Guid => "guid",
            ServiceType::HyperLink => "hyperlink",
            ServiceType::Xml => "xml",
            ServiceType::YesNo => "yesno",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ParseServiceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ServiceType::Text),
            "number" => Ok(ServiceType::Number),
            "decimal" => Ok(ServiceType::Decimal),
            "datetime" => Ok(ServiceType::DateTime),
            "guid" => Ok(ServiceType::Guid),
            "hyperlink" => Ok(ServiceType::HyperLink),
            "xml" => Ok(ServiceType::Xml),
            "yesno" => Ok(ServiceType::YesNo),
            _ => Err(ParseServiceTypeError(s.to_string())),
        }
    }
}

/// Error parsing a service type from string.
#[derive(Debug, Clone)]
pub struct ParseServiceTypeError(String);

impl fmt::Display for ParseServiceTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid service type '{}', expected one of: text, number, decimal, datetime, guid, hyperlink, xml, yesno",
            self.0
        )
    }
}

impl std::error::Error for ParseServiceTypeError {}

/// Kind of a service-object method, as requested by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    /// Read a single record by key.
    Read,
    /// Update an existing record.
    Update,
    /// Create a new record.
    Create,
    /// List records matching the inputs.
    List,
    /// Execute an operation with no record semantics.
    Execute,
}

impl MethodKind {
    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::Read => "Read",
            MethodKind::Update => "Update",
            MethodKind::Create => "Create",
            MethodKind::List => "List",
            MethodKind::Execute => "Execute",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MethodKind {
    type Err = ParseMethodKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" => Ok(MethodKind::Read),
            "update" => Ok(MethodKind::Update),
            "create" => Ok(MethodKind::Create),
            "list" => Ok(MethodKind::List),
            "execute" => Ok(MethodKind::Execute),
            _ => Err(ParseMethodKindError(s.to_string())),
        }
    }
}

/// Error parsing a method kind from string.
#[derive(Debug, Clone)]
pub struct ParseMethodKindError(String);

impl fmt::Display for ParseMethodKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid method kind '{}', expected one of: read, update, create, list, execute",
            self.0
        )
    }
}

impl std::error::Error for ParseMethodKindError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_round_trip() {
        for st in [
            ServiceType::Text,
            ServiceType::Number,
            ServiceType::Decimal,
            ServiceType::DateTime,
            ServiceType::Guid,
            ServiceType::HyperLink,
            ServiceType::Xml,
            ServiceType::YesNo,
        ] {
            assert_eq!(st.as_str().parse::<ServiceType>().unwrap(), st);
        }
    }

    #[test]
    fn test_method_kind_display_names_operation() {
        assert_eq!(MethodKind::Create.to_string(), "Create");
        assert_eq!(MethodKind::List.to_string(), "List");
    }

    #[test]
    fn test_parse_errors() {
        assert!("sticker".parse::<ServiceType>().is_err());
        assert!("delete".parse::<MethodKind>().is_err());
    }
}
