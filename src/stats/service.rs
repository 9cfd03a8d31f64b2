use std::collections::{hash_map::Entry, HashMap};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::store::{keys, KeyValueStore, PersistenceHandle};

use super::{
    ledger::Ledger,
    models::{Detail, Mode, PlayerKey, Rotation},
    selection::PendingSelection,
    undo::{UndoEntry, UndoLog},
    StatsError,
};

/// Identifies one ledger: a team in a mode
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgerKey {
    pub team: String,
    pub mode: Mode,
}

impl LedgerKey {
    pub fn new(team: impl Into<String>, mode: Mode) -> Self {
        Self {
            team: team.into(),
            mode,
        }
    }

    pub fn storage_key(&self) -> String {
        keys::ledger_key(self.mode, &self.team)
    }
}

/// Ledger plus the undo log of commits made since it was loaded or reset
#[derive(Debug, Default, Clone)]
pub struct LedgerSession {
    ledger: Ledger,
    undo_log: UndoLog,
}

impl LedgerSession {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            undo_log: UndoLog::new(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_log.len()
    }

    /// Commits the selection if it is complete and records it for undo
    pub fn record(
        &mut self,
        rotation: Rotation,
        player: PlayerKey,
        selection: &mut PendingSelection,
        detail: Detail,
    ) -> Result<Option<UndoEntry>, StatsError> {
        let Some(outcome) = selection.finish(detail)? else {
            return Ok(None);
        };

        let entry = self.ledger.commit(rotation, player, outcome)?;
        self.undo_log.push(entry.clone());
        Ok(Some(entry))
    }

    pub fn undo(&mut self) -> Result<Option<UndoEntry>, StatsError> {
        self.undo_log.undo(&mut self.ledger)
    }

    /// Starts a new match: empty ledger, empty undo log
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.undo_log.clear();
    }
}

/// Owns the ledger sessions and keeps the store in step with them.
///
/// All mutations go through one lock, so they never interleave. Store writes
/// are queued on the persistence worker and never awaited here.
pub struct ScoutingService {
    store: Arc<dyn KeyValueStore>,
    persistence: PersistenceHandle,
    sessions: Mutex<HashMap<LedgerKey, LedgerSession>>,
}

impl ScoutingService {
    pub fn new(store: Arc<dyn KeyValueStore>, persistence: PersistenceHandle) -> Self {
        Self {
            store,
            persistence,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn persistence(&self) -> &PersistenceHandle {
        &self.persistence
    }

    #[instrument(skip(self), fields(team = %key.team, mode = %key.mode))]
    pub async fn snapshot(&self, key: &LedgerKey) -> Ledger {
        self.inspect(key, |session| session.ledger().clone()).await
    }

    pub async fn undo_depth(&self, key: &LedgerKey) -> usize {
        self.inspect(key, LedgerSession::undo_depth).await
    }

    /// Ledger and undo depth read under one lock
    pub async fn view(&self, key: &LedgerKey) -> (Ledger, usize) {
        self.inspect(key, |session| (session.ledger().clone(), session.undo_depth()))
            .await
    }

    /// Records one stat entry; an incomplete selection is ignored
    #[instrument(skip(self, selection), fields(team = %key.team, mode = %key.mode))]
    pub async fn record(
        &self,
        key: &LedgerKey,
        rotation: Rotation,
        player: PlayerKey,
        mut selection: PendingSelection,
        detail: Detail,
    ) -> Result<Option<UndoEntry>, StatsError> {
        if !selection.is_complete() {
            debug!(%rotation, %player, "Ignoring entry without main stat and contact");
            return Ok(None);
        }

        self.with_session(key, |session| {
            let entry = session.record(rotation, player, &mut selection, detail)?;
            if let Some(entry) = &entry {
                info!(
                    %rotation,
                    player = %entry.player,
                    main = %entry.main_stat(),
                    contact = %entry.contact(),
                    detail = %entry.detail(),
                    "Stat recorded"
                );
                self.persist(key, session.ledger());
            }
            Ok(entry)
        })
        .await
    }

    #[instrument(skip(self), fields(team = %key.team, mode = %key.mode))]
    pub async fn undo(&self, key: &LedgerKey) -> Result<Option<UndoEntry>, StatsError> {
        let mut sessions = self.sessions.lock().await;
        // a session that was never loaded has no undo history
        let Some(session) = sessions.get_mut(key) else {
            debug!("Nothing to undo");
            return Ok(None);
        };

        let undone = session.undo();
        match &undone {
            Ok(Some(entry)) => {
                info!(rotation = %entry.rotation, player = %entry.player, "Stat undone");
                self.persist(key, session.ledger());
            }
            Ok(None) => debug!("Nothing to undo"),
            Err(err) => warn!(error = %err, "Undo entry did not match ledger, discarded"),
        }
        undone
    }

    /// Clears the ledger and undo log for this team and mode only
    #[instrument(skip(self), fields(team = %key.team, mode = %key.mode))]
    pub async fn new_match(&self, key: &LedgerKey) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(key) {
            session.reset();
        }
        self.persist(key, &Ledger::new());
        info!("New match started");
    }

    /// Drops the in-memory session once its queued writes have landed.
    ///
    /// Returns false when no session was loaded for `key`.
    #[instrument(skip(self), fields(team = %key.team, mode = %key.mode))]
    pub async fn evict(&self, key: &LedgerKey) -> bool {
        let mut sessions = self.sessions.lock().await;
        if !sessions.contains_key(key) {
            return false;
        }

        self.persistence.flush().await;
        sessions.remove(key);
        info!("Ledger session evicted");
        true
    }

    async fn with_session<R>(&self, key: &LedgerKey, f: impl FnOnce(&mut LedgerSession) -> R) -> R {
        let mut sessions = self.sessions.lock().await;
        let session = match sessions.entry(key.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let loaded = self.load_session(key).await;
                entry.insert(loaded)
            }
        };
        f(session)
    }

    /// Runs `f` on the loaded session, or on a fresh load from the store
    /// that is not kept.
    async fn inspect<R>(&self, key: &LedgerKey, f: impl FnOnce(&LedgerSession) -> R) -> R {
        let sessions = self.sessions.lock().await;
        match sessions.get(key) {
            Some(session) => f(session),
            None => f(&self.load_session(key).await),
        }
    }

    async fn load_session(&self, key: &LedgerKey) -> LedgerSession {
        let storage_key = key.storage_key();
        let ledger = match self.store.get(&storage_key).await {
            Ok(Some(raw)) => Ledger::from_json_lenient(&raw),
            Ok(None) => Ledger::new(),
            Err(err) => {
                warn!(key = %storage_key, error = %err, "Failed to load ledger, starting empty");
                Ledger::new()
            }
        };
        debug!(key = %storage_key, empty = ledger.is_empty(), "Ledger session loaded");
        LedgerSession::new(ledger)
    }

    fn persist(&self, key: &LedgerKey, ledger: &Ledger) {
        self.persistence.write_json(key.storage_key(), ledger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::models::{ContactType, ErrorKind, MainStat, Zone};
    use crate::store::InMemoryStore;

    fn rotation(value: u8) -> Rotation {
        Rotation::new(value).unwrap()
    }

    fn kill_swing() -> PendingSelection {
        PendingSelection::new(Some(MainStat::Kills), Some(ContactType::Swing))
    }

    fn zone(value: u8) -> Detail {
        Detail::Zone(Zone::new(value).unwrap())
    }

    fn service_with(store: InMemoryStore) -> ScoutingService {
        let (persistence, _task) = PersistenceHandle::spawn(Arc::new(store.clone()));
        ScoutingService::new(Arc::new(store), persistence)
    }

    #[tokio::test]
    async fn record_updates_memory_and_store() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());
        let key = LedgerKey::new("Tigers", Mode::Scouting);

        let entry = service
            .record(&key, rotation(3), PlayerKey::new("12"), kill_swing(), zone(4))
            .await
            .unwrap();
        assert!(entry.is_some());

        service.persistence().flush().await;

        let raw = store.get("scout_Tigers").await.unwrap().unwrap();
        assert_eq!(Ledger::from_json_lenient(&raw), service.snapshot(&key).await);
        assert_eq!(service.undo_depth(&key).await, 1);
    }

    #[tokio::test]
    async fn incomplete_selection_is_a_noop() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());
        let key = LedgerKey::new("Tigers", Mode::Live);

        let entry = service
            .record(
                &key,
                rotation(1),
                PlayerKey::new("4"),
                PendingSelection::new(Some(MainStat::Kills), None),
                Detail::Tool,
            )
            .await
            .unwrap();

        assert!(entry.is_none());
        service.persistence().flush().await;
        assert!(store.is_empty().await);
        assert!(service.snapshot(&key).await.is_empty());
    }

    #[tokio::test]
    async fn undo_restores_previous_state_and_persists_it() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());
        let key = LedgerKey::new("Tigers", Mode::Live);

        service
            .record(&key, rotation(2), PlayerKey::new("5"), kill_swing(), Detail::Tool)
            .await
            .unwrap();
        let before = service.snapshot(&key).await;
        service
            .record(
                &key,
                rotation(2),
                PlayerKey::new("5"),
                PendingSelection::new(Some(MainStat::Errors), Some(ContactType::Tip)),
                Detail::Error(ErrorKind::Net),
            )
            .await
            .unwrap();

        let undone = service.undo(&key).await.unwrap().unwrap();
        assert_eq!(undone.main_stat(), MainStat::Errors);
        assert_eq!(service.snapshot(&key).await, before);

        service.persistence().flush().await;
        let raw = store.get("live_Tigers").await.unwrap().unwrap();
        assert_eq!(Ledger::from_json_lenient(&raw), before);
    }

    #[tokio::test]
    async fn undo_with_empty_log_returns_none() {
        let service = service_with(InMemoryStore::new());
        let key = LedgerKey::new("Tigers", Mode::Scouting);

        assert!(service.undo(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn new_match_only_clears_the_active_mode() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());
        let scouting = LedgerKey::new("Tigers", Mode::Scouting);
        let live = LedgerKey::new("Tigers", Mode::Live);

        for key in [&scouting, &live] {
            service
                .record(key, rotation(1), PlayerKey::new("9"), kill_swing(), zone(1))
                .await
                .unwrap();
        }

        service.new_match(&live).await;

        assert!(service.snapshot(&live).await.is_empty());
        assert_eq!(service.undo_depth(&live).await, 0);
        assert!(!service.snapshot(&scouting).await.is_empty());
        assert_eq!(service.undo_depth(&scouting).await, 1);
    }

    #[tokio::test]
    async fn sessions_rehydrate_from_store() {
        let store = InMemoryStore::with_entries(vec![(
            "scout_Tigers",
            r#"{"4":{"11":{"attempts":{"total":2,"contact":{"swing":2},"zones":{"5":2}}}}}"#,
        )]);
        let service = service_with(store);
        let key = LedgerKey::new("Tigers", Mode::Scouting);

        let ledger = service.snapshot(&key).await;

        assert_eq!(ledger.event_count(rotation(4), &PlayerKey::new("11")), 2);
        assert_eq!(service.undo_depth(&key).await, 0);
    }

    #[tokio::test]
    async fn reads_do_not_keep_sessions() {
        let store = InMemoryStore::with_entries(vec![(
            "live_Hawks",
            r#"{"2":{"3":{"attempts":{"total":1,"contact":{"tip":1},"tool":1}}}}"#,
        )]);
        let service = service_with(store);
        let key = LedgerKey::new("Hawks", Mode::Live);

        let (ledger, depth) = service.view(&key).await;
        assert_eq!(ledger.event_count(rotation(2), &PlayerKey::new("3")), 1);
        assert_eq!(depth, 0);
        assert_eq!(service.snapshot(&key).await, ledger);
        assert_eq!(service.undo_depth(&key).await, 0);
        assert!(service.undo(&key).await.unwrap().is_none());

        assert!(service.sessions.lock().await.is_empty());
    }

    #[tokio::test]
    async fn view_reads_ledger_and_depth_together() {
        let service = service_with(InMemoryStore::new());
        let key = LedgerKey::new("Tigers", Mode::Scouting);

        for _ in 0..2 {
            service
                .record(&key, rotation(5), PlayerKey::new("1"), kill_swing(), zone(6))
                .await
                .unwrap();
        }

        let (ledger, depth) = service.view(&key).await;

        assert_eq!(depth, 2);
        assert_eq!(ledger.event_count(rotation(5), &PlayerKey::new("1")), 4);
    }

    #[tokio::test]
    async fn new_match_on_unloaded_ledger_persists_empty_state() {
        let store = InMemoryStore::with_entries(vec![(
            "scout_Tigers",
            r#"{"1":{"2":{"attempts":{"total":1,"contact":{"roll":1},"tool":1}}}}"#,
        )]);
        let service = service_with(store.clone());
        let key = LedgerKey::new("Tigers", Mode::Scouting);

        service.new_match(&key).await;
        service.persistence().flush().await;

        assert_eq!(store.get("scout_Tigers").await.unwrap().as_deref(), Some("{}"));
        assert!(service.snapshot(&key).await.is_empty());
        assert!(service.sessions.lock().await.is_empty());
    }

    #[tokio::test]
    async fn evict_flushes_then_drops_the_session() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());
        let key = LedgerKey::new("Tigers", Mode::Live);

        service
            .record(&key, rotation(3), PlayerKey::new("7"), kill_swing(), Detail::Tool)
            .await
            .unwrap();
        let before = service.snapshot(&key).await;

        assert!(service.evict(&key).await);

        assert!(service.sessions.lock().await.is_empty());
        let raw = store.get("live_Tigers").await.unwrap().unwrap();
        assert_eq!(Ledger::from_json_lenient(&raw), before);
        assert_eq!(service.snapshot(&key).await, before);
        assert_eq!(service.undo_depth(&key).await, 0);
        assert!(!service.evict(&key).await);
    }

    #[tokio::test]
    async fn malformed_stored_ledger_starts_empty() {
        let store = InMemoryStore::with_entries(vec![("live_Tigers", "{{{")]);
        let service = service_with(store);

        let ledger = service.snapshot(&LedgerKey::new("Tigers", Mode::Live)).await;

        assert!(ledger.is_empty());
    }
}
