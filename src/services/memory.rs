use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::RwLock;

use super::store::{Document, DocumentStore, FieldOp, FieldUpdate, StoreError, Write};

type Collection = BTreeMap<String, Map<String, Value>>;

/// In-process document store with the same write semantics as Firestore
///
/// Used by tests and by the simulator's dry-run mode.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|data| Document { id: id.to_string(), data: data.clone() }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .map(|(id, data)| Document { id: id.clone(), data: data.clone() })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;

        // Validate preconditions up front so a failed commit changes nothing
        let exists =
            |key: (&str, &str)| collections.get(key.0).is_some_and(|c| c.contains_key(key.1));
        let mut written: HashSet<(&str, &str)> = HashSet::new();
        for write in &writes {
            match write {
                Write::Set { collection, id, .. } => {
                    written.insert((collection.as_str(), id.as_str()));
                }
                Write::Create { collection, id, .. } => {
                    let key = (collection.as_str(), id.as_str());
                    if exists(key) || written.contains(&key) {
                        return Err(StoreError::AlreadyExists(format!("{collection}/{id}")));
                    }
                    written.insert(key);
                }
                Write::Update { collection, id, .. } => {
                    let key = (collection.as_str(), id.as_str());
                    if !exists(key) && !written.contains(&key) {
                        return Err(StoreError::NotFound(format!("{collection}/{id}")));
                    }
                }
            }
        }

        for write in writes {
            match write {
                Write::Set { collection, id, data, transforms } => {
                    let mut doc = data;
                    for update in &transforms {
                        apply_update(&mut doc, update);
                    }
                    collections.entry(collection).or_default().insert(id, doc);
                }
                Write::Create { collection, id, data } => {
                    collections.entry(collection).or_default().insert(id, data);
                }
                Write::Update { collection, id, updates } => {
                    let doc = collections.get_mut(&collection).and_then(|c| c.get_mut(&id));
                    if let Some(doc) = doc {
                        for update in &updates {
                            apply_update(doc, update);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn apply_update(doc: &mut Map<String, Value>, update: &FieldUpdate) {
    let slot = field_slot(doc, &update.path);

    match &update.op {
        FieldOp::Set(value) => *slot = value.clone(),
        FieldOp::Increment(delta) => {
            let current = slot.as_i64().unwrap_or(0);
            *slot = Value::from(current + delta);
        }
        FieldOp::ArrayUnion(values) => {
            if !slot.is_array() {
                *slot = Value::Array(Vec::new());
            }
            if let Value::Array(items) = slot {
                for value in values {
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
            }
        }
        FieldOp::ServerTimestamp => {
            *slot = Value::String(chrono::Utc::now().to_rfc3339());
        }
    }
}

/// Walk a dotted path, creating intermediate maps as needed
fn field_slot<'a>(doc: &'a mut Map<String, Value>, path: &str) -> &'a mut Value {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or(path);
    let mut slot = doc.entry(first.to_string()).or_insert(Value::Null);

    for segment in segments {
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        slot = match slot {
            Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
            _ => unreachable!("slot was just replaced by an object"),
        };
    }

    slot
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();
        store.set("hotels", "hotel_1", object(json!({"name": "Reef House"}))).await.unwrap();

        let doc = store.get("hotels", "hotel_1").await.unwrap().unwrap();
        assert_eq!(doc.data.get("name"), Some(&json!("Reef House")));
        assert!(store.get("hotels", "hotel_2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_increment_and_array_union() {
        let store = MemoryStore::new();
        store.set("customers", "c1", object(json!({"tokens": 10}))).await.unwrap();

        store
            .update(
                "customers",
                "c1",
                vec![
                    FieldUpdate::increment("tokens", -3),
                    FieldUpdate::array_union(
                        "preferences.amenities_of_interest",
                        vec![json!("spa"), json!("pool")],
                    ),
                ],
            )
            .await
            .unwrap();
        store
            .update(
                "customers",
                "c1",
                vec![FieldUpdate::array_union(
                    "preferences.amenities_of_interest",
                    vec![json!("spa"), json!("gym")],
                )],
            )
            .await
            .unwrap();

        let doc = store.get("customers", "c1").await.unwrap().unwrap();
        assert_eq!(doc.data["tokens"], json!(7));
        assert_eq!(doc.data["preferences"]["amenities_of_interest"], json!(["spa", "pool", "gym"]));
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        let result = store
            .update("customers", "ghost", vec![FieldUpdate::increment("tokens", 1)])
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.count("customers").await, 0);
    }

    #[tokio::test]
    async fn test_add_applies_server_timestamp() {
        let store = MemoryStore::new();
        let id = store
            .add(
                "tasks",
                object(json!({"role": "Manager"})),
                vec![FieldUpdate::server_timestamp("timestamp")],
            )
            .await
            .unwrap();

        let doc = store.get("tasks", &id).await.unwrap().unwrap();
        assert!(doc.data["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_create_refuses_existing_document() {
        let store = MemoryStore::new();
        store.create("customers", "c1", object(json!({"tokens": 0}))).await.unwrap();
        store
            .update("customers", "c1", vec![FieldUpdate::increment("tokens", 12)])
            .await
            .unwrap();

        let result = store.create("customers", "c1", object(json!({"tokens": 0}))).await;

        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
        let doc = store.get("customers", "c1").await.unwrap().unwrap();
        assert_eq!(doc.data["tokens"], json!(12));
    }

    #[tokio::test]
    async fn test_update_after_create_in_same_commit() {
        let store = MemoryStore::new();
        store
            .commit(vec![
                Write::Create {
                    collection: "customers".to_string(),
                    id: "c2".to_string(),
                    data: object(json!({"tokens": 1})),
                },
                Write::Update {
                    collection: "customers".to_string(),
                    id: "c2".to_string(),
                    updates: vec![FieldUpdate::increment("tokens", 2)],
                },
            ])
            .await
            .unwrap();

        let doc = store.get("customers", "c2").await.unwrap().unwrap();
        assert_eq!(doc.data["tokens"], json!(3));
    }
}
