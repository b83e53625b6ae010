pub mod gateway;
pub use gateway::{CollectionPath, Document, DocumentGateway};
pub mod pg_gateway;
pub use pg_gateway::PgDocumentGateway;
pub mod memory_gateway;
pub use memory_gateway::MemoryGateway;
