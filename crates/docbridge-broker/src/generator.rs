//! Schema generation
//!
//! Synthesizes one service object per repository template, plus the
//! fixed `Documents` object. Runs once per registration or refresh.

use tracing::{debug, warn};

use crate::error::BrokerResult;
use crate::mapping::TypeMap;
use crate::schema::{MethodParameter, ServiceMethod, ServiceObject, ServiceProperty};
use crate::types::{MethodKind, ServiceType};
use docbridge_repository::facade::RepositoryFacade;
use docbridge_repository::types::TemplateDescriptor;

/// Name of the fixed document service object.
pub const DOCUMENTS_OBJECT: &str = "Documents";

/// Out-of-band parameter carrying the entry id on Read/Write methods.
pub const DOCUMENT_ID_PARAMETER: &str = "DocumentID";

/// Parameter carrying the target folder path on Insert/Search methods.
pub const FOLDER_PATH_PARAMETER: &str = "FolderPath";

/// Parameter carrying the new document name on Insert methods.
pub const DOCUMENT_NAME_PARAMETER: &str = "DocumentName";

/// Parameter carrying the optional content envelope on Insert methods.
pub const CONTENT_PARAMETER: &str = "Content";

/// Generates service objects from the repository's template catalog.
pub struct SchemaGenerator {
    type_map: TypeMap,
}

impl SchemaGenerator {
    /// Create a generator using the given type-mapping table.
    #[must_use]
    pub fn new(type_map: TypeMap) -> Self {
        Self { type_map }
    }

    /// Describe the full schema: one object per template plus the fixed
    /// `Documents` object.
    pub async fn describe(&self, facade: &RepositoryFacade) -> BrokerResult<Vec<ServiceObject>> {
        let templates = facade.list_templates().await?;
        debug!(templates = templates.len(), "describing schema");

        let mut objects = Vec::with_capacity(templates.len() + 1);
        for template in &templates {
            objects.push(self.template_object(template));
        }
        objects.push(self.documents_object());
        Ok(objects)
    }

    /// Generate the service object for one template: a property per
    /// mapped field and the four standard methods.
    #[must_use]
    pub fn template_object(&self, template: &TemplateDescriptor) -> ServiceObject {
        let mut object = ServiceObject::new(&template.name);

        for field in &template.fields {
            match self.type_map.resolve(field.field_type) {
                Some(service_type) => {
                    object = object.with_property(ServiceProperty::new(&field.name, service_type));
                }
                None => {
                    warn!(
                        template = %template.name,
                        field = %field.name,
                        field_type = %field.field_type,
                        "field type has no host mapping; property skipped"
                    );
                }
            }
        }

        let all = object.property_names();
        let key = all.first().cloned();

        let document_id = || {
            MethodParameter::required(DOCUMENT_ID_PARAMETER, ServiceType::Number)
                .with_description("Entry id of the document")
        };

        let mut read = ServiceMethod::new("Read", MethodKind::Read)
            .with_returns(all.clone())
            .with_parameter(document_id());
        let mut write = ServiceMethod::new("Write", MethodKind::Update)
            .with_inputs(all.clone())
            .with_returns(all.clone())
            .with_parameter(document_id());
        if let Some(key) = &key {
            read = read.with_inputs(vec![key.clone()]).with_required(key.clone());
            write = write.with_required(key.clone());
        }

        let insert = ServiceMethod::new("Insert", MethodKind::Create)
            .with_inputs(all.clone())
            .with_returns(all.clone())
            .with_parameter(
                MethodParameter::required(FOLDER_PATH_PARAMETER, ServiceType::Text)
                    .with_description("Folder to create the document under"),
            )
            .with_parameter(
                MethodParameter::required(DOCUMENT_NAME_PARAMETER, ServiceType::Text)
                    .with_description("Name of the new document"),
            )
            .with_parameter(
                MethodParameter::optional(CONTENT_PARAMETER, ServiceType::Text)
                    .with_description("Content envelope to attach"),
            );

        let search = ServiceMethod::new("Search", MethodKind::List)
            .with_inputs(all.clone())
            .with_returns(all)
            .with_parameter(
                MethodParameter::optional(FOLDER_PATH_PARAMETER, ServiceType::Text)
                    .with_description("Folder scope of the search"),
            );

        object
            .with_method(read)
            .with_method(write)
            .with_method(insert)
            .with_method(search)
    }

    /// Generate the fixed `Documents` object: five static properties
    /// and a single keyed `Get` method.
    #[must_use]
    pub fn documents_object(&self) -> ServiceObject {
        let object = ServiceObject::new(DOCUMENTS_OBJECT)
            .with_property(ServiceProperty::new(DOCUMENT_ID_PARAMETER, ServiceType::Number))
            .with_property(ServiceProperty::new("DocumentName", ServiceType::Text))
            .with_property(ServiceProperty::new("NumberOfPages", ServiceType::Number))
            .with_property(ServiceProperty::new("Path", ServiceType::Text))
            .with_property(ServiceProperty::new("TemplateName", ServiceType::Text));

        let all = object.property_names();
        let get = ServiceMethod::new("Get", MethodKind::Read)
            .with_inputs(vec![DOCUMENT_ID_PARAMETER.to_string()])
            .with_required(DOCUMENT_ID_PARAMETER)
            .with_returns(all);

        object.with_method(get)
    }
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        Self::new(TypeMap::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docbridge_repository::types::FieldType;

    fn generator() -> SchemaGenerator {
        SchemaGenerator::new(TypeMap::standard())
    }

    fn invoice_template() -> TemplateDescriptor {
        TemplateDescriptor::new("Invoice")
            .with_field("InvoiceID", FieldType::Int32)
            .with_field("InvoiceDate", FieldType::DateTime)
            .with_field("Amount", FieldType::Decimal)
    }

    #[test]
    fn test_one_property_per_mapped_field() {
        let object = generator().template_object(&invoice_template());
        assert_eq!(object.name, "Invoice");
        assert_eq!(object.properties.len(), 3);
        assert_eq!(object.properties[0].service_type, ServiceType::Number);
        assert_eq!(object.properties[1].service_type, ServiceType::DateTime);
    }

    #[test]
    fn test_unmapped_field_types_are_skipped() {
        let template = TemplateDescriptor::new("Scans")
            .with_field("ScanID", FieldType::Int32)
            .with_field("Image", FieldType::Blob)
            .with_field("Tags", FieldType::List);

        let object = generator().template_object(&template);
        assert_eq!(object.properties.len(), 1);
        assert!(object.has_property("ScanID"));
        assert!(!object.has_property("Image"));
    }

    #[test]
    fn test_exactly_four_methods() {
        let object = generator().template_object(&invoice_template());
        assert_eq!(object.methods.len(), 4);

        let kinds: Vec<MethodKind> = object.methods.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MethodKind::Read,
                MethodKind::Update,
                MethodKind::Create,
                MethodKind::List
            ]
        );
        let names: Vec<&str> = object.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Read", "Write", "Insert", "Search"]);
    }

    #[test]
    fn test_key_is_first_declared_field() {
        let object = generator().template_object(&invoice_template());
        let read = object.method_of_kind(MethodKind::Read).unwrap();
        let write = object.method_of_kind(MethodKind::Update).unwrap();

        assert_eq!(read.key_property(), Some("InvoiceID"));
        assert_eq!(write.key_property(), Some("InvoiceID"));
        assert_eq!(read.required_properties, vec!["InvoiceID"]);
    }

    #[test]
    fn test_keyed_methods_take_document_id_parameter() {
        let object = generator().template_object(&invoice_template());
        for kind in [MethodKind::Read, MethodKind::Update] {
            let method = object.method_of_kind(kind).unwrap();
            let param = method.get_parameter(DOCUMENT_ID_PARAMETER).unwrap();
            assert!(param.required);
            assert_eq!(param.service_type, ServiceType::Number);
        }
    }

    #[test]
    fn test_methods_return_all_properties() {
        let object = generator().template_object(&invoice_template());
        for method in &object.methods {
            assert_eq!(method.return_properties, object.property_names());
        }
    }

    #[test]
    fn test_names_never_contain_spaces() {
        let template = TemplateDescriptor::new("Purchase Orders 2024")
            .with_field("Order Number", FieldType::Int32)
            .with_field("Ship Date", FieldType::DateTime);

        let object = generator().template_object(&template);
        assert_eq!(object.name, "Purchase_Orders_2024");
        assert!(object.properties.iter().all(|p| !p.name.contains(' ')));
        assert_eq!(object.display_name, "Purchase Orders 2024");
        assert_eq!(object.properties[0].name, "Order_Number");
    }

    #[test]
    fn test_documents_object_shape() {
        let object = generator().documents_object();
        assert_eq!(object.name, DOCUMENTS_OBJECT);
        assert_eq!(
            object.property_names(),
            vec![
                "DocumentID",
                "DocumentName",
                "NumberOfPages",
                "Path",
                "TemplateName"
            ]
        );
        assert_eq!(object.methods.len(), 1);

        let get = &object.methods[0];
        assert_eq!(get.kind, MethodKind::Read);
        assert_eq!(get.key_property(), Some("DocumentID"));
        assert!(get.parameters.is_empty());
    }

    #[test]
    fn test_empty_type_map_yields_no_properties() {
        let generator = SchemaGenerator::new(TypeMap::empty());
        let object = generator.template_object(&invoice_template());
        assert!(object.properties.is_empty());

        // no key without a first property
        let read = object.method_of_kind(MethodKind::Read).unwrap();
        assert_eq!(read.key_property(), None);
    }
}
