use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur when talking to the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("JWT signing failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A document and its id within a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    /// Deserialize the document body, exposing the document id as `id`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut data = self.data.clone();
        data.entry("id").or_insert_with(|| Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(data))?)
    }
}

/// Server-side operation on a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    Set(Value),
    Increment(i64),
    /// Append elements not already present
    ArrayUnion(Vec<Value>),
    ServerTimestamp,
}

/// Field operation addressed by a dotted path (`preferences.preferred_locations`)
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub path: String,
    pub op: FieldOp,
}

impl FieldUpdate {
    pub fn set(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { path: path.into(), op: FieldOp::Set(value.into()) }
    }

    pub fn increment(path: impl Into<String>, delta: i64) -> Self {
        Self { path: path.into(), op: FieldOp::Increment(delta) }
    }

    pub fn array_union(path: impl Into<String>, values: Vec<Value>) -> Self {
        Self { path: path.into(), op: FieldOp::ArrayUnion(values) }
    }

    pub fn server_timestamp(path: impl Into<String>) -> Self {
        Self { path: path.into(), op: FieldOp::ServerTimestamp }
    }

    /// True for operations applied as server-side transforms
    pub fn is_transform(&self) -> bool {
        !matches!(self.op, FieldOp::Set(_))
    }
}

/// One write in an atomic commit
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// Replace the whole document, then apply `transforms`
    Set {
        collection: String,
        id: String,
        data: Map<String, Value>,
        transforms: Vec<FieldUpdate>,
    },
    /// Create the document only if it does not exist yet
    Create {
        collection: String,
        id: String,
        data: Map<String, Value>,
    },
    /// Apply field updates to an existing document
    Update {
        collection: String,
        id: String,
        updates: Vec<FieldUpdate>,
    },
}

/// External document store collaborator
///
/// Implementors provide reads and atomic commits; the helpers build on
/// those.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` if it does not exist
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Fetch every document of a collection
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Apply all writes atomically
    async fn commit(&self, writes: Vec<Write>) -> Result<(), StoreError>;

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.commit(vec![Write::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
            transforms: Vec::new(),
        }])
        .await
    }

    /// Create a document; fails with `AlreadyExists` if it is already there
    async fn create(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.commit(vec![Write::Create {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
        }])
        .await
    }

    /// Create a document under a generated id and return the id
    async fn add(
        &self,
        collection: &str,
        data: Map<String, Value>,
        transforms: Vec<FieldUpdate>,
    ) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.commit(vec![Write::Set {
            collection: collection.to_string(),
            id: id.clone(),
            data,
            transforms,
        }])
        .await?;
        Ok(id)
    }

    /// Update fields of an existing document; fails with `NotFound` otherwise
    async fn update(
        &self,
        collection: &str,
        id: &str,
        updates: Vec<FieldUpdate>,
    ) -> Result<(), StoreError> {
        if updates.is_empty() {
            return Ok(());
        }
        self.commit(vec![Write::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            updates,
        }])
        .await
    }
}

/// Serialize a value into a document body
pub fn to_document<T: Serialize>(value: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidResponse(format!(
            "expected an object, got {}",
            other
        ))),
    }
}
