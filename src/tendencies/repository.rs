use std::sync::Arc;
use tracing::{info, instrument};

use super::models::{Tendency, TendencyBook};
use crate::stats::{Mode, Rotation};
use crate::store::{keys, load_json_or_default, save_json, KeyValueStore, StoreError};

/// Scouting and live tendency books per team.
///
/// Independent of the stat ledgers.
pub struct TendencyRepository {
    store: Arc<dyn KeyValueStore>,
}

impl TendencyRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Missing or malformed data loads as an empty book
    #[instrument(skip(self))]
    pub async fn load(&self, team: &str, mode: Mode) -> TendencyBook {
        load_json_or_default(self.store.as_ref(), &keys::tendency_key(mode, team)).await
    }

    #[instrument(skip(self, book))]
    pub async fn save(&self, team: &str, mode: Mode, book: &TendencyBook) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), &keys::tendency_key(mode, team), book).await
    }

    pub async fn load_scouting(&self, team: &str) -> TendencyBook {
        self.load(team, Mode::Scouting).await
    }

    pub async fn save_scouting(&self, team: &str, book: &TendencyBook) -> Result<(), StoreError> {
        self.save(team, Mode::Scouting, book).await
    }

    pub async fn load_live(&self, team: &str) -> TendencyBook {
        self.load(team, Mode::Live).await
    }

    pub async fn save_live(&self, team: &str, book: &TendencyBook) -> Result<(), StoreError> {
        self.save(team, Mode::Live, book).await
    }

    /// Replaces one rotation's entry and returns the updated book
    #[instrument(skip(self))]
    pub async fn set_rotation(
        &self,
        team: &str,
        mode: Mode,
        rotation: Rotation,
        tendency: Tendency,
    ) -> Result<TendencyBook, StoreError> {
        let mut book = self.load(team, mode).await;
        book.insert(rotation, tendency);
        self.save(team, mode, &book).await?;
        Ok(book)
    }

    #[instrument(skip(self))]
    pub async fn reset_live(&self, team: &str) -> Result<(), StoreError> {
        self.store
            .remove(&keys::tendency_key(Mode::Live, team))
            .await?;
        info!(team, "Live tendencies reset");
        Ok(())
    }
}
