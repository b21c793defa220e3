use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::credentials::{ServiceAccountKey, TokenSource};
use super::store::{Document, DocumentStore, FieldOp, FieldUpdate, StoreError, Write};
use super::values::{decode_fields, encode_fields, encode_value, insert_at_path};
use crate::config::FirestoreSettings;

const DEFAULT_PAGE_SIZE: u32 = 300;

/// Cloud Firestore REST client
///
/// Handles all communication with the document store including:
/// - Reading single documents and whole collections
/// - Committing batched writes with field transforms
///   (increment, array union, server timestamp)
pub struct FirestoreClient {
    base_url: String,
    project_id: String,
    database_id: String,
    page_size: u32,
    client: Client,
    auth: TokenSource,
}

impl FirestoreClient {
    /// Create a new Firestore client
    pub fn new(
        base_url: String,
        project_id: String,
        database_id: String,
        auth: TokenSource,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            project_id,
            database_id,
            page_size: DEFAULT_PAGE_SIZE,
            client,
            auth,
        })
    }

    /// Create a client from settings, choosing the auth mode
    ///
    /// A static access token wins over a credentials file; with neither,
    /// requests go out unauthenticated.
    pub fn from_settings(settings: &FirestoreSettings) -> Result<Self, StoreError> {
        let auth = match (&settings.access_token, &settings.credentials_path) {
            (Some(token), _) => TokenSource::Static(token.clone()),
            (None, Some(path)) => {
                tracing::info!("Using service account credentials from {}", path);
                TokenSource::service_account(ServiceAccountKey::from_file(path)?)?
            }
            (None, None) => {
                tracing::warn!(
                    "No Firestore credentials configured, sending unauthenticated requests"
                );
                TokenSource::Anonymous
            }
        };

        let client = Self::new(
            settings.base_url.clone(),
            settings.project_id.clone(),
            settings.database_id.clone(),
            auth,
        )?;

        Ok(match settings.page_size {
            Some(size) => client.with_page_size(size),
            None => client,
        })
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Resource name of the database's document root
    fn root_name(&self) -> String {
        format!("projects/{}/databases/{}/documents", self.project_id, self.database_id)
    }

    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.root_name(), collection, id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, StoreError> {
        Ok(match self.auth.token().await? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn error_for(response: Response, context: &str) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Firestore {} failed: {} - {}", context, status, body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized(body),
            StatusCode::NOT_FOUND => StoreError::NotFound(body),
            StatusCode::CONFLICT => StoreError::AlreadyExists(body),
            _ => StoreError::ApiError {
                status: status.as_u16(),
                message: body,
            },
        }
    }

    /// Encode one write for the `documents:commit` endpoint
    fn encode_write(&self, write: &Write) -> Value {
        match write {
            Write::Set { collection, id, data, transforms } => {
                let mut body = json!({
                    "update": {
                        "name": self.document_name(collection, id),
                        "fields": encode_fields(data),
                    }
                });
                if !transforms.is_empty() {
                    body["updateTransforms"] =
                        Value::Array(transforms.iter().filter_map(encode_transform).collect());
                }
                body
            }
            Write::Create { collection, id, data } => json!({
                "update": {
                    "name": self.document_name(collection, id),
                    "fields": encode_fields(data),
                },
                "currentDocument": { "exists": false },
            }),
            Write::Update { collection, id, updates } => {
                let mut fields = Map::new();
                let mut mask = Vec::new();
                for update in updates {
                    if let FieldOp::Set(value) = &update.op {
                        insert_at_path(&mut fields, &update.path, value.clone());
                        mask.push(Value::String(update.path.clone()));
                    }
                }

                let mut body = json!({
                    "update": {
                        "name": self.document_name(collection, id),
                        "fields": encode_fields(&fields),
                    },
                    "updateMask": { "fieldPaths": mask },
                    "currentDocument": { "exists": true },
                });
                let transforms: Vec<Value> = updates.iter().filter_map(encode_transform).collect();
                if !transforms.is_empty() {
                    body["updateTransforms"] = Value::Array(transforms);
                }
                body
            }
        }
    }

    /// Turn a REST document into a [`Document`]
    fn decode_document(raw: &Value) -> Result<Document, StoreError> {
        let name = raw
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| StoreError::InvalidResponse("Missing document name".into()))?;
        let id = name.rsplit('/').next().unwrap_or(name).to_string();
        let data = match raw.get("fields") {
            Some(fields) => decode_fields(fields)?,
            None => Map::new(),
        };
        Ok(Document { id, data })
    }
}

fn encode_transform(update: &FieldUpdate) -> Option<Value> {
    let path = &update.path;
    match &update.op {
        FieldOp::Set(_) => None,
        FieldOp::Increment(delta) => Some(json!({
            "fieldPath": path,
            "increment": { "integerValue": delta.to_string() },
        })),
        FieldOp::ArrayUnion(values) => Some(json!({
            "fieldPath": path,
            "appendMissingElements": {
                "values": values.iter().map(encode_value).collect::<Vec<_>>(),
            },
        })),
        FieldOp::ServerTimestamp => Some(json!({
            "fieldPath": path,
            "setToServerValue": "REQUEST_TIME",
        })),
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let url = self.url(&format!(
            "{}/{}/{}",
            self.root_name(),
            collection,
            urlencoding::encode(id)
        ));

        tracing::debug!("Fetching document {}/{}", collection, id);

        let response = self.authorize(self.client.get(&url)).await?.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_for(response, "get").await);
        }

        let json: Value = response.json().await?;
        Self::decode_document(&json).map(Some)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let base = self.url(&format!("{}/{}", self.root_name(), collection));
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!("{}?pageSize={}", base, self.page_size);
            if let Some(token) = &page_token {
                url.push_str("&pageToken=");
                url.push_str(&urlencoding::encode(token));
            }

            let response = self.authorize(self.client.get(&url)).await?.send().await?;
            if !response.status().is_success() {
                return Err(Self::error_for(response, "list").await);
            }

            let json: Value = response.json().await?;
            if let Some(page) = json.get("documents").and_then(|d| d.as_array()) {
                for raw in page {
                    documents.push(Self::decode_document(raw)?);
                }
            }

            page_token = json
                .get("nextPageToken")
                .and_then(|t| t.as_str())
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            if page_token.is_none() {
                break;
            }
        }

        tracing::debug!("Listed {} documents from {}", documents.len(), collection);

        Ok(documents)
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<(), StoreError> {
        if writes.is_empty() {
            return Ok(());
        }

        let url = self.url(&format!("{}:commit", self.root_name()));
        let body = json!({
            "writes": writes.iter().map(|w| self.encode_write(w)).collect::<Vec<_>>(),
        });

        let response = self
            .authorize(self.client.post(&url))
            .await?
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, "commit").await);
        }

        tracing::debug!("Committed {} writes", writes.len());

        Ok(())
    }
}
