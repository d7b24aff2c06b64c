//! # Schema & Dispatch Engine
//!
//! Describes a document repository to a business-process host as a set
//! of service objects, and executes the host's method calls against the
//! repository facade.
//!
//! At description time, [`SchemaGenerator`] enumerates the repository's
//! templates and synthesizes one object per template (plus the fixed
//! `Documents` object), each with generated properties and the four
//! standard methods. At runtime, [`Dispatcher`] routes each inbound
//! (object, method kind) pair through a closed dispatch table onto the
//! facade, marshaling values between the repository's field bag and the
//! host's return slots.
//!
//! ## Example
//!
//! ```ignore
//! use docbridge_broker::prelude::*;
//! use docbridge_repository::prelude::*;
//! use std::sync::Arc;
//!
//! let facade = RepositoryFacade::new(provider);
//! let objects = SchemaGenerator::new(TypeMap::standard())
//!     .describe(&facade)
//!     .await?;
//!
//! let dispatcher = Dispatcher::new(facade);
//! let call = MethodCall::new("Invoice", MethodKind::Read)
//!     .with_parameter("DocumentID", 100i64)
//!     .with_return("InvoiceID")
//!     .with_return("InvoiceDate");
//! let records = dispatcher.execute(&call).await?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`types`] - Host type system and method kinds
//! - [`mapping`] - Field-type mapping table
//! - [`schema`] - Generated service-object descriptions
//! - [`generator`] - Schema generation
//! - [`call`] - Host call shape and records
//! - [`dispatch`] - Runtime dispatch
//! - [`config`] - Broker settings and service metadata
//! - [`error`] - Error types

pub mod call;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod generator;
pub mod mapping;
pub mod schema;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use docbridge_broker::prelude::*;
/// ```
pub mod prelude {
    pub use crate::call::{MethodCall, PropertyValue, Record};
    pub use crate::config::{BrokerSettings, ConfigField, ServiceInfo};
    pub use crate::dispatch::{Dispatcher, TargetObject};
    pub use crate::error::{BrokerError, BrokerResult};
    pub use crate::generator::{
        SchemaGenerator, CONTENT_PARAMETER, DOCUMENTS_OBJECT, DOCUMENT_ID_PARAMETER,
        DOCUMENT_NAME_PARAMETER, FOLDER_PATH_PARAMETER,
    };
    pub use crate::mapping::TypeMap;
    pub use crate::schema::{
        sanitize_name, MethodParameter, ServiceMethod, ServiceObject, ServiceProperty,
    };
    pub use crate::types::{MethodKind, ServiceType};
}
