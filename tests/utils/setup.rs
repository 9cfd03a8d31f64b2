use axum::Router;
use std::sync::Arc;

use volleyscout::{app, AppState, Lineup, LedgerKey, Mode};

use super::mocks::MockStore;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub store: MockStore,
    pub state: AppState,
    pub team: String,
}

#[allow(dead_code)]
impl TestSetup {
    pub fn router(&self) -> Router {
        app(self.state.clone())
    }

    pub fn scouting_key(&self) -> LedgerKey {
        LedgerKey::new(self.team.clone(), Mode::Scouting)
    }

    pub fn live_key(&self) -> LedgerKey {
        LedgerKey::new(self.team.clone(), Mode::Live)
    }

    /// Waits for queued ledger writes to reach the store
    pub async fn flush(&self) {
        self.state.scouting.persistence().flush().await;
    }

    /// Fresh state over the same store, as after a server restart
    pub async fn restart(&self) -> TestSetup {
        self.flush().await;
        TestSetup {
            store: self.store.clone(),
            state: AppState::new(Arc::new(self.store.clone())),
            team: self.team.clone(),
        }
    }
}

pub struct TestSetupBuilder {
    store: MockStore,
    lineup: Option<Lineup>,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            store: MockStore::new(),
            lineup: None,
        }
    }

    pub fn with_store(mut self, store: MockStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_lineup(mut self, lineup: Lineup) -> Self {
        self.lineup = Some(lineup);
        self
    }

    pub async fn build(self) -> TestSetup {
        let state = AppState::new(Arc::new(self.store.clone()));

        let lineup = match self.lineup {
            Some(lineup) => state.lineups.save(lineup).await.unwrap(),
            None => state.lineups.load().await,
        };

        TestSetup {
            store: self.store,
            state,
            team: lineup.team_name().to_string(),
        }
    }
}
