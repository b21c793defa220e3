use serde_json::{Map, Value};
use std::path::Path;

use super::SeedError;
use crate::services::{DocumentStore, Write};

/// Firestore's limit on writes in a single commit
pub const MAX_BATCH_WRITES: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub skipped: usize,
}

/// Read a JSON array of objects from disk
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Map<String, Value>>, SeedError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let value: Value = serde_json::from_str(&content)?;

    let Value::Array(items) = value else {
        return Err(SeedError::Invalid(format!(
            "{} does not contain a JSON array",
            path.as_ref().display()
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(SeedError::Invalid(format!(
                "entry {} is not an object: {}",
                index, other
            ))),
        })
        .collect()
}

/// Document id for a record: the first non-empty id field
fn record_id(record: &Map<String, Value>, id_fields: &[&str]) -> Option<String> {
    id_fields.iter().find_map(|field| match record.get(*field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Write records into a collection, keyed by the first id field present
///
/// Records without a usable id are skipped. Writes are committed in
/// batches of at most [`MAX_BATCH_WRITES`].
pub async fn upload_collection(
    store: &dyn DocumentStore,
    collection: &str,
    records: Vec<Map<String, Value>>,
    id_fields: &[&str],
) -> Result<UploadSummary, SeedError> {
    let mut summary = UploadSummary::default();

    if records.is_empty() {
        tracing::info!("No data to upload for collection '{}'", collection);
        return Ok(summary);
    }

    tracing::info!("Found {} items to upload to '{}'", records.len(), collection);

    let mut writes = Vec::with_capacity(records.len());
    for data in records {
        let Some(id) = record_id(&data, id_fields) else {
            tracing::warn!(
                "Skipping an entry with no {:?} for collection '{}'",
                id_fields,
                collection
            );
            summary.skipped += 1;
            continue;
        };
        writes.push(Write::Set {
            collection: collection.to_string(),
            id,
            data,
            transforms: Vec::new(),
        });
    }

    while !writes.is_empty() {
        let rest = writes.split_off(writes.len().min(MAX_BATCH_WRITES));
        let batch = std::mem::replace(&mut writes, rest);
        let count = batch.len();
        store.commit(batch).await?;
        summary.uploaded += count;
        tracing::debug!("Committed batch of {} writes to '{}'", count, collection);
    }

    tracing::info!(
        "Uploaded {} documents to '{}' ({} skipped)",
        summary.uploaded,
        collection,
        summary.skipped
    );

    Ok(summary)
}
