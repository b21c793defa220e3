use std::collections::HashMap;

use super::store::DocumentStore;
use crate::models::Hotel;

/// Hotel reference data cached at process start
#[derive(Debug, Clone, Default)]
pub struct HotelDirectory {
    hotels: HashMap<String, Hotel>,
}

impl HotelDirectory {
    pub fn from_hotels(hotels: impl IntoIterator<Item = Hotel>) -> Self {
        Self {
            hotels: hotels.into_iter().map(|h| (h.id.clone(), h)).collect(),
        }
    }

    /// Read every hotel document once
    ///
    /// A failed read is logged and leaves the directory empty; documents
    /// that do not decode are skipped.
    pub async fn load(store: &dyn DocumentStore, collection: &str) -> Self {
        let documents = match store.list(collection).await {
            Ok(docs) => docs,
            Err(e) => {
                tracing::error!("Error fetching hotel data: {}", e);
                return Self::default();
            }
        };

        let hotels = documents.into_iter().filter_map(|doc| match doc.decode::<Hotel>() {
            Ok(mut hotel) => {
                hotel.id = doc.id;
                Some(hotel)
            }
            Err(e) => {
                tracing::warn!("Skipping hotel document {}: {}", doc.id, e);
                None
            }
        });

        let directory = Self::from_hotels(hotels);
        tracing::info!("Cached {} hotels from '{}'", directory.len(), collection);
        directory
    }

    pub fn get(&self, hotel_id: &str) -> Option<&Hotel> {
        self.hotels.get(hotel_id)
    }

    pub fn len(&self) -> usize {
        self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }

    /// Hotels sorted by id
    pub fn sorted(&self) -> Vec<&Hotel> {
        let mut hotels: Vec<&Hotel> = self.hotels.values().collect();
        hotels.sort_by(|a, b| a.id.cmp(&b.id));
        hotels
    }
}
