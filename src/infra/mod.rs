// Infrastructure adapters for the application ports

pub mod document_store;
pub mod xml_output_adapter;

pub use document_store::FsDocumentStore;
pub use xml_output_adapter::XmlFileOutputAdapter;
