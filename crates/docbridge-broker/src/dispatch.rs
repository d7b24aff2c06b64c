//! Runtime dispatch
//!
//! Routes an inbound (object, method kind) invocation to a handler that
//! calls the repository facade and marshals field values into the
//! call's return slots. The route table is a single closed match;
//! uncovered combinations fail with an explicit not-implemented error
//! naming the requested kind.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::debug;

use crate::call::{MethodCall, PropertyValue, Record};
use crate::error::{BrokerError, BrokerResult};
use crate::generator::{
    CONTENT_PARAMETER, DOCUMENTS_OBJECT, DOCUMENT_ID_PARAMETER, DOCUMENT_NAME_PARAMETER,
    FOLDER_PATH_PARAMETER,
};
use crate::schema::sanitize_name;
use crate::types::MethodKind;
use docbridge_repository::facade::RepositoryFacade;
use docbridge_repository::types::EntryId;
use docbridge_repository::values::{FieldValue, FieldValues};

/// Default folder scope when a search names none.
const ROOT_FOLDER: &str = "\\";

/// The object a call targets: the fixed `Documents` object or one of
/// the generated template objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetObject {
    /// The static document object.
    Documents,
    /// A template-generated object, by sanitized name.
    Template(String),
}

impl TargetObject {
    /// Classify a service-object name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name == DOCUMENTS_OBJECT {
            TargetObject::Documents
        } else {
            TargetObject::Template(name.to_string())
        }
    }
}

/// Executes service-object method calls against a repository facade.
///
/// Carries no state between calls; every invocation opens and closes
/// its own repository session through the facade.
pub struct Dispatcher {
    facade: RepositoryFacade,
}

impl Dispatcher {
    /// Create a dispatcher over the given facade.
    #[must_use]
    pub fn new(facade: RepositoryFacade) -> Self {
        Self { facade }
    }

    /// Execute a method call, returning one record per result row.
    pub async fn execute(&self, call: &MethodCall) -> BrokerResult<Vec<Record>> {
        debug!(object = %call.object, kind = %call.kind, "dispatching method call");

        match (TargetObject::from_name(&call.object), call.kind) {
            (TargetObject::Documents, MethodKind::Read) => {
                self.documents_read(call).await.map(|r| vec![r])
            }
            (TargetObject::Template(name), MethodKind::Read) => {
                self.template_read(&name, call).await.map(|r| vec![r])
            }
            (TargetObject::Template(name), MethodKind::Update) => {
                self.template_update(&name, call).await.map(|r| vec![r])
            }
            (TargetObject::Template(name), MethodKind::Create) => {
                self.template_create(&name, call).await.map(|r| vec![r])
            }
            (TargetObject::Template(name), MethodKind::List) => {
                self.template_list(&name, call).await
            }
            _ => Err(BrokerError::not_implemented(&call.object, call.kind)),
        }
    }

    /// Documents.Read: fetch by the id in the first input property and
    /// copy the fixed document fields into the return slots.
    async fn documents_read(&self, call: &MethodCall) -> BrokerResult<Record> {
        let id = first_input_id(call)?;
        let doc = self.facade.document_by_id(id).await?;

        let mut record = Record::from_returns(&call.returns);
        record.set(DOCUMENT_ID_PARAMETER, doc.id.value());
        record.set("DocumentName", doc.name.clone());
        record.set("NumberOfPages", doc.page_count);
        record.set("Path", doc.path.clone());
        record.set(
            "TemplateName",
            doc.template_name.clone().map_or(FieldValue::Null, FieldValue::Text),
        );
        Ok(record)
    }

    /// Template.Read: fetch by the `DocumentID` parameter and copy the
    /// field bag into the return slots by name.
    async fn template_read(&self, _object: &str, call: &MethodCall) -> BrokerResult<Record> {
        let id = parameter_id(call, DOCUMENT_ID_PARAMETER)?;
        let fields = self.facade.document_fields(id).await?;

        let mut record = Record::from_returns(&call.returns);
        record.fill_from(&fields);
        Ok(record)
    }

    /// Template.Write: build a delta from the non-null inputs, merge it
    /// into the stored bag, and return the merged values.
    async fn template_update(&self, _object: &str, call: &MethodCall) -> BrokerResult<Record> {
        let id = parameter_id(call, DOCUMENT_ID_PARAMETER)?;
        let delta = build_delta(&call.inputs)?;
        let (_, merged) = self.facade.update_document_fields(id, &delta).await?;

        let mut record = Record::from_returns(&call.returns);
        record.fill_from(&merged);
        Ok(record)
    }

    /// Template.Insert: create a document under the folder named by the
    /// parameters, with optional content, and set the input fields.
    async fn template_create(&self, object: &str, call: &MethodCall) -> BrokerResult<Record> {
        let folder = text_parameter(call, FOLDER_PATH_PARAMETER)?;
        let name = text_parameter(call, DOCUMENT_NAME_PARAMETER)?;
        let envelope = call.parameter(CONTENT_PARAMETER).map(FieldValue::render);
        let fields = build_delta(&call.inputs)?;

        let template = self.resolve_template(object).await?;
        let (_, bag) = self
            .facade
            .create_document(&folder, &name, &template, envelope.as_deref(), &fields)
            .await?;

        let mut record = Record::from_returns(&call.returns);
        record.fill_from(&bag);
        Ok(record)
    }

    /// Template.Search: one constraint per non-null input, scoped to the
    /// optional `FolderPath` parameter; one record per matching
    /// document.
    async fn template_list(&self, object: &str, call: &MethodCall) -> BrokerResult<Vec<Record>> {
        let folder = call
            .parameter(FOLDER_PATH_PARAMETER)
            .map_or_else(|| ROOT_FOLDER.to_string(), FieldValue::render);
        let constraints = constraints_from(&call.inputs);

        let template = self.resolve_template(object).await?;
        let matches = self
            .facade
            .search_documents(&folder, &template, &constraints)
            .await?;

        let records = matches
            .into_iter()
            .map(|(_, fields)| {
                let mut record = Record::from_returns(&call.returns);
                record.fill_from(&fields);
                record
            })
            .collect();
        Ok(records)
    }

    /// Correlate a generated object name back to a repository template:
    /// the object name is the sanitized template name.
    async fn resolve_template(&self, object: &str) -> BrokerResult<String> {
        let templates = self.facade.list_templates().await?;
        templates
            .into_iter()
            .find(|t| sanitize_name(&t.name) == object)
            .map(|t| t.name)
            .ok_or_else(|| BrokerError::TemplateCorrelation {
                object: object.to_string(),
            })
    }
}

/// Read an entry id from the first input property.
fn first_input_id(call: &MethodCall) -> BrokerResult<EntryId> {
    let slot = call
        .first_input()
        .filter(|p| p.has_value())
        .ok_or_else(|| BrokerError::MissingProperty {
            name: DOCUMENT_ID_PARAMETER.to_string(),
        })?;
    let value = slot.value.as_ref().ok_or_else(|| BrokerError::MissingProperty {
        name: slot.name.clone(),
    })?;
    entry_id_from(&slot.name, value)
}

/// Read an entry id from a required out-of-band parameter.
fn parameter_id(call: &MethodCall, name: &str) -> BrokerResult<EntryId> {
    let value = call
        .parameter(name)
        .ok_or_else(|| BrokerError::missing_parameter(name))?;
    entry_id_from(name, value)
}

fn entry_id_from(context: &str, value: &FieldValue) -> BrokerResult<EntryId> {
    match value {
        FieldValue::Number(n) => Ok(EntryId(*n)),
        FieldValue::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(EntryId)
            .map_err(|_| BrokerError::invalid_value(context, format!("'{s}' is not an entry id"))),
        other => Err(BrokerError::invalid_value(
            context,
            format!("'{}' is not an entry id", other.render()),
        )),
    }
}

/// Read a required text parameter.
fn text_parameter(call: &MethodCall, name: &str) -> BrokerResult<String> {
    call.parameter(name)
        .map(FieldValue::render)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BrokerError::missing_parameter(name))
}

/// Build an update/create delta from the non-null inputs. A property
/// whose name contains "DATE" (case-insensitive) has its value parsed
/// as a date/time before insertion; everything else passes through.
fn build_delta(inputs: &[PropertyValue]) -> BrokerResult<FieldValues> {
    let mut delta = FieldValues::new();
    for input in inputs {
        let Some(value) = input.value.as_ref().filter(|v| !v.is_null()) else {
            continue;
        };
        let value = if input.name.to_uppercase().contains("DATE") {
            coerce_date(&input.name, value)?
        } else {
            value.clone()
        };
        delta.set(input.name.clone(), value);
    }
    Ok(delta)
}

/// Collect non-null inputs as search constraints, without coercion; the
/// expression builder applies its own per-value policy.
fn constraints_from(inputs: &[PropertyValue]) -> FieldValues {
    let mut constraints = FieldValues::new();
    for input in inputs {
        if let Some(value) = input.value.as_ref().filter(|v| !v.is_null()) {
            constraints.set(input.name.clone(), value.clone());
        }
    }
    constraints
}

/// Parse a value into a date/time field value.
fn coerce_date(property: &str, value: &FieldValue) -> BrokerResult<FieldValue> {
    if let FieldValue::Date(_) = value {
        return Ok(value.clone());
    }

    let text = value.render();
    let parsed = DateTime::parse_from_rfc3339(&text)
        .map(|d| d.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        })
        .or_else(|_| {
            NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S").map(|d| d.and_utc())
        })
        .map_err(|_| {
            BrokerError::invalid_value(property, format!("'{text}' is not a date/time value"))
        })?;
    Ok(FieldValue::Date(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_target_object_classification() {
        assert_eq!(TargetObject::from_name("Documents"), TargetObject::Documents);
        assert_eq!(
            TargetObject::from_name("Invoice"),
            TargetObject::Template("Invoice".to_string())
        );
    }

    #[test]
    fn test_delta_coerces_date_named_properties() {
        let inputs = vec![
            PropertyValue::new("InvoiceDATE", "2024-01-05"),
            PropertyValue::new("Amount", "42"),
        ];
        let delta = build_delta(&inputs).unwrap();

        let expected = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(delta.get("InvoiceDATE").and_then(FieldValue::as_date), Some(expected));
        // non-date names pass through untouched
        assert_eq!(delta.get("Amount").and_then(FieldValue::as_text), Some("42"));
    }

    #[test]
    fn test_delta_skips_null_inputs() {
        let inputs = vec![
            PropertyValue::new("Status", "Open"),
            PropertyValue::unset("Notes"),
            PropertyValue::new("Flag", FieldValue::Null),
        ];
        let delta = build_delta(&inputs).unwrap();
        assert_eq!(delta.len(), 1);
        assert!(delta.has("Status"));
    }

    #[test]
    fn test_delta_rejects_unparseable_date() {
        let inputs = vec![PropertyValue::new("ShipDate", "next tuesday")];
        let err = build_delta(&inputs).unwrap_err();
        assert!(matches!(err, BrokerError::InvalidValue { .. }));
    }

    #[test]
    fn test_date_already_typed_passes_through() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let inputs = vec![PropertyValue::new("DueDate", FieldValue::Date(date))];
        let delta = build_delta(&inputs).unwrap();
        assert_eq!(delta.get("DueDate").and_then(FieldValue::as_date), Some(date));
    }

    #[test]
    fn test_entry_id_from_text_and_number() {
        assert_eq!(entry_id_from("x", &FieldValue::Number(7)).unwrap(), EntryId(7));
        assert_eq!(entry_id_from("x", &FieldValue::Text(" 100 ".into())).unwrap(), EntryId(100));
        assert!(entry_id_from("x", &FieldValue::Text("abc".into())).is_err());
        assert!(entry_id_from("x", &FieldValue::Bool(true)).is_err());
    }

    #[test]
    fn test_search_constraints_keep_values_verbatim() {
        let inputs = vec![
            PropertyValue::new("EffectiveDate", "2024-01-01"),
            PropertyValue::unset("Status"),
        ];
        let constraints = constraints_from(&inputs);
        assert_eq!(
            constraints.get("EffectiveDate").and_then(FieldValue::as_text),
            Some("2024-01-01")
        );
        assert!(!constraints.has("Status"));
    }
}
