// Service exports
pub mod credentials;
pub mod firestore;
pub mod hotels;
pub mod memory;
pub mod store;
pub mod values;

pub use credentials::{sign_assertion, ServiceAccountKey, TokenSource};
pub use firestore::FirestoreClient;
pub use hotels::HotelDirectory;
pub use memory::MemoryStore;
pub use store::{to_document, Document, DocumentStore, FieldOp, FieldUpdate, StoreError, Write};
