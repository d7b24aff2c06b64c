//! Integration tests for the broker
//!
//! Drives schema generation and runtime dispatch end-to-end against the
//! in-memory repository backend.

use std::sync::Arc;

use docbridge_broker::prelude::*;
use docbridge_repository::prelude::*;

fn invoice_repo() -> InMemoryRepository {
    let repo = InMemoryRepository::new("Archive");
    repo.add_template(
        TemplateDescriptor::new("Invoice")
            .with_field("InvoiceID", FieldType::Int32)
            .with_field("InvoiceDate", FieldType::DateTime),
    );
    repo
}

fn facade(repo: &InMemoryRepository) -> RepositoryFacade {
    RepositoryFacade::new(Arc::new(repo.clone()))
}

fn dispatcher(repo: &InMemoryRepository) -> Dispatcher {
    Dispatcher::new(facade(repo))
}

#[tokio::test]
async fn describe_then_read_round_trip() {
    let repo = invoice_repo();
    let doc_id = repo.add_document(
        "\\Invoices",
        "inv-100",
        "Invoice",
        FieldValues::new()
            .with("InvoiceID", 100i64)
            .with("InvoiceDate", "2024-01-05"),
    );
    assert_eq!(doc_id, EntryId(1));

    // schema description yields the template object plus Documents
    let objects = SchemaGenerator::new(TypeMap::standard())
        .describe(&facade(&repo))
        .await
        .unwrap();
    assert_eq!(objects.len(), 2);

    let invoice = objects.iter().find(|o| o.name == "Invoice").unwrap();
    assert!(invoice.active);
    assert_eq!(invoice.property_names(), vec!["InvoiceID", "InvoiceDate"]);
    let method_names: Vec<&str> = invoice.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(method_names, vec!["Read", "Write", "Insert", "Search"]);
    assert!(objects.iter().any(|o| o.name == DOCUMENTS_OBJECT));

    // runtime read returns the stored field values
    let read = invoice.method_of_kind(MethodKind::Read).unwrap();
    let call = MethodCall::new("Invoice", MethodKind::Read)
        .with_parameter(DOCUMENT_ID_PARAMETER, doc_id.value())
        .with_returns(read.return_properties.clone());

    let records = dispatcher(&repo).execute(&call).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("InvoiceID").and_then(FieldValue::as_number),
        Some(100)
    );
    assert_eq!(
        records[0].get("InvoiceDate").and_then(FieldValue::as_text),
        Some("2024-01-05")
    );
}

#[tokio::test]
async fn documents_read_uses_first_input_property() {
    let repo = invoice_repo();
    let doc_id = repo.add_document(
        "\\Invoices",
        "inv-100",
        "Invoice",
        FieldValues::new().with("InvoiceID", 100i64),
    );

    let call = MethodCall::new(DOCUMENTS_OBJECT, MethodKind::Read)
        .with_input(DOCUMENT_ID_PARAMETER, doc_id.value())
        .with_returns(vec![
            "DocumentID".to_string(),
            "DocumentName".to_string(),
            "NumberOfPages".to_string(),
            "Path".to_string(),
            "TemplateName".to_string(),
        ]);

    let records = dispatcher(&repo).execute(&call).await.unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.get("DocumentID").and_then(FieldValue::as_number), Some(1));
    assert_eq!(record.get("DocumentName").and_then(FieldValue::as_text), Some("inv-100"));
    assert_eq!(record.get("Path").and_then(FieldValue::as_text), Some("\\Invoices\\inv-100"));
    assert_eq!(record.get("TemplateName").and_then(FieldValue::as_text), Some("Invoice"));
}

#[tokio::test]
async fn documents_create_is_not_implemented() {
    let repo = invoice_repo();
    let call = MethodCall::new(DOCUMENTS_OBJECT, MethodKind::Create);

    let err = dispatcher(&repo).execute(&call).await.unwrap_err();
    match err {
        BrokerError::NotImplemented { object, kind } => {
            assert_eq!(object, "Documents");
            assert_eq!(kind, MethodKind::Create);
        }
        other => panic!("expected NotImplemented, got {other}"),
    }
    assert!(err_naming_contains(&repo, MethodKind::Create, "Create").await);
}

async fn err_naming_contains(
    repo: &InMemoryRepository,
    kind: MethodKind,
    expected: &str,
) -> bool {
    let call = MethodCall::new(DOCUMENTS_OBJECT, kind);
    let err = dispatcher(repo).execute(&call).await.unwrap_err();
    err.to_string().contains(expected)
}

#[tokio::test]
async fn template_execute_is_not_implemented() {
    let repo = invoice_repo();
    let call = MethodCall::new("Invoice", MethodKind::Execute);
    let err = dispatcher(&repo).execute(&call).await.unwrap_err();
    assert!(err.to_string().contains("Execute"));
}

#[tokio::test]
async fn update_coerces_dates_and_persists() {
    let repo = invoice_repo();
    let doc_id = repo.add_document(
        "\\Invoices",
        "inv-100",
        "Invoice",
        FieldValues::new()
            .with("InvoiceID", 100i64)
            .with("InvoiceDate", "2023-12-01"),
    );

    let call = MethodCall::new("Invoice", MethodKind::Update)
        .with_parameter(DOCUMENT_ID_PARAMETER, doc_id.value())
        .with_input("InvoiceDate", "2024-01-05")
        .with_blank_input("InvoiceID")
        .with_returns(vec!["InvoiceID".to_string(), "InvoiceDate".to_string()]);

    let records = dispatcher(&repo).execute(&call).await.unwrap();
    assert_eq!(records.len(), 1);

    // the DATE-named property was parsed into a date value
    let updated = records[0].get("InvoiceDate").and_then(FieldValue::as_date).unwrap();
    assert_eq!(updated.format("%Y-%m-%d").to_string(), "2024-01-05");
    // the blank input did not clobber the stored key
    assert_eq!(
        records[0].get("InvoiceID").and_then(FieldValue::as_number),
        Some(100)
    );

    // merge was persisted
    let stored = facade(&repo).document_fields(doc_id).await.unwrap();
    assert!(stored.get("InvoiceDate").and_then(FieldValue::as_date).is_some());
}

#[tokio::test]
async fn insert_creates_document_with_content() {
    let repo = invoice_repo();
    let envelope =
        DocumentContent::new(b"%PDF-1.4".to_vec(), "pdf", "application/pdf").to_envelope();

    let call = MethodCall::new("Invoice", MethodKind::Create)
        .with_parameter("FolderPath", "\\Invoices")
        .with_parameter("DocumentName", "inv-new")
        .with_parameter("Content", envelope)
        .with_input("InvoiceID", 7i64)
        .with_returns(vec!["InvoiceID".to_string(), "InvoiceDate".to_string()]);

    let records = dispatcher(&repo).execute(&call).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("InvoiceID").and_then(FieldValue::as_number),
        Some(7)
    );

    // the document landed in the repository with its content attached
    let created = facade(&repo).document_by_id(EntryId(1)).await.unwrap();
    assert_eq!(created.name, "inv-new");
    assert_eq!(created.template_name.as_deref(), Some("Invoice"));
    let content = repo.content_of(created.id).unwrap();
    assert_eq!(content.data, b"%PDF-1.4");
    assert_eq!(content.mime_type, "application/pdf");
}

#[tokio::test]
async fn insert_requires_folder_and_name() {
    let repo = invoice_repo();
    let call = MethodCall::new("Invoice", MethodKind::Create)
        .with_parameter("DocumentName", "inv-new");

    let err = dispatcher(&repo).execute(&call).await.unwrap_err();
    assert!(matches!(err, BrokerError::MissingParameter { ref name } if name == "FolderPath"));
}

#[tokio::test]
async fn search_returns_one_record_per_match() {
    let repo = invoice_repo();
    let a = repo.add_document(
        "\\Invoices",
        "inv-a",
        "Invoice",
        FieldValues::new().with("InvoiceID", 1i64).with("Status", "Open"),
    );
    let b = repo.add_document(
        "\\Invoices",
        "inv-b",
        "Invoice",
        FieldValues::new().with("InvoiceID", 2i64).with("Status", "Closed"),
    );

    // stub the exact expression the dispatcher should build, with a
    // shortcut standing in for the first hit
    let link = repo.add_shortcut("link-to-a", a);
    let constraints = FieldValues::new().with("Status", "Open,Closed");
    let expression = SearchExpression::new("\\Invoices", "Invoice")
        .constraints_from(&constraints)
        .build();
    repo.stub_search(&expression, vec![link, b]);

    let call = MethodCall::new("Invoice", MethodKind::List)
        .with_parameter("FolderPath", "\\Invoices")
        .with_input("Status", "Open,Closed")
        .with_returns(vec!["InvoiceID".to_string()]);

    let records = dispatcher(&repo).execute(&call).await.unwrap();
    let ids: Vec<i64> = records
        .iter()
        .filter_map(|r| r.get("InvoiceID").and_then(FieldValue::as_number))
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn search_correlates_sanitized_object_names() {
    let repo = InMemoryRepository::new("Archive");
    repo.add_template(
        TemplateDescriptor::new("Purchase Orders")
            .with_field("OrderID", FieldType::Int32),
    );
    repo.add_document(
        "\\Orders",
        "po-1",
        "Purchase Orders",
        FieldValues::new().with("OrderID", 11i64),
    );

    // no stub: the in-memory backend falls back to template matching
    let call = MethodCall::new("Purchase_Orders", MethodKind::List)
        .with_returns(vec!["OrderID".to_string()]);

    let records = dispatcher(&repo).execute(&call).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("OrderID").and_then(FieldValue::as_number), Some(11));
}

#[tokio::test]
async fn unknown_template_object_fails_correlation() {
    let repo = invoice_repo();
    let call = MethodCall::new("Receipts", MethodKind::List);
    let err = dispatcher(&repo).execute(&call).await.unwrap_err();
    assert!(matches!(err, BrokerError::TemplateCorrelation { .. }));
}

#[tokio::test]
async fn connection_failure_short_circuits_dispatch() {
    let repo = invoice_repo();
    repo.fail_connections();

    let call = MethodCall::new("Invoice", MethodKind::Read)
        .with_parameter(DOCUMENT_ID_PARAMETER, 1i64)
        .with_return("InvoiceID");

    let err = dispatcher(&repo).execute(&call).await.unwrap_err();
    match err {
        BrokerError::Repository(inner) => assert!(inner.is_transient()),
        other => panic!("expected repository error, got {other}"),
    }
    assert_eq!(repo.open_sessions(), 0);
}

#[tokio::test]
async fn read_without_document_id_parameter_fails() {
    let repo = invoice_repo();
    let call = MethodCall::new("Invoice", MethodKind::Read).with_return("InvoiceID");
    let err = dispatcher(&repo).execute(&call).await.unwrap_err();
    assert!(matches!(err, BrokerError::MissingParameter { ref name } if name == "DocumentID"));
}
