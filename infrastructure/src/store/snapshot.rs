//! JSON snapshot store
//!
//! Serves events from a JSON file on disk. Every read re-parses the file, so
//! edits made by other processes are picked up. Writes go through a temp file
//! and a rename.
//!
//! ```json
//! {
//!   "events": {
//!     "friday": {
//!       "nominations": [ ... ],
//!       "votes": [ ... ],
//!       "attendees": [ ... ],
//!       "group_members": [ ... ],
//!       "decision": { ... }
//!     }
//!   }
//! }
//! ```
//!
//! Vote changes are detected by polling the file and diffing the ballot.

use super::memory::EventRecord;
use async_trait::async_trait;
use marquee_application::ports::ballot_box::BallotBox;
use marquee_application::ports::selection_store::{SelectionStore, StoreError};
use marquee_application::ports::vote_feed::{
    VoteChange, VoteChangeFeed, VoteChangeKind, VoteChangeStream,
};
use marquee_domain::{
    Decision, EventId, MovieId, Nomination, NominationId, Person, Reaction, UserId, Vote,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Default interval between file polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Polls never run faster than this
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

const FEED_CAPACITY: usize = 64;

/// On-disk layout: events keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub events: BTreeMap<EventId, EventRecord>,
}

impl SnapshotFile {
    pub fn single(event_id: impl Into<EventId>, record: EventRecord) -> Self {
        let mut events = BTreeMap::new();
        events.insert(event_id.into(), record);
        Self { events }
    }
}

async fn read_snapshot(path: &Path) -> Result<SnapshotFile, StoreError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(format!(
                "snapshot file {}",
                path.display()
            )));
        }
        Err(e) => {
            return Err(StoreError::Unavailable(format!(
                "{}: {}",
                path.display(),
                e
            )));
        }
    };
    serde_json::from_str(&text)
        .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))
}

async fn write_snapshot(path: &Path, snapshot: &SnapshotFile) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| StoreError::Other(format!("Failed to serialize snapshot: {}", e)))?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let io_err = |e: std::io::Error| StoreError::Unavailable(format!("{}: {}", path.display(), e));
    tokio::fs::write(&tmp, json).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    Ok(())
}

fn take_event(mut snapshot: SnapshotFile, event_id: &EventId) -> Result<EventRecord, StoreError> {
    snapshot
        .events
        .remove(event_id)
        .ok_or_else(|| StoreError::NotFound(format!("event {}", event_id)))
}

pub struct JsonSnapshotStore {
    path: PathBuf,
    poll_interval: Duration,
    write_lock: Mutex<()>,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            write_lock: Mutex::new(()),
        }
    }

    /// Set the feed's poll interval, clamped to [`MIN_POLL_INTERVAL`]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a whole snapshot, replacing the file
    pub async fn save(&self, snapshot: &SnapshotFile) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        write_snapshot(&self.path, snapshot).await
    }

    pub async fn load(&self) -> Result<SnapshotFile, StoreError> {
        read_snapshot(&self.path).await
    }

    async fn event(&self, event_id: &EventId) -> Result<EventRecord, StoreError> {
        take_event(self.load().await?, event_id)
    }

    /// Read-modify-write of one event under the write lock
    async fn modify<T>(
        &self,
        event_id: &EventId,
        f: impl FnOnce(&mut EventRecord) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut snapshot = read_snapshot(&self.path).await?;
        let record = snapshot
            .events
            .get_mut(event_id)
            .ok_or_else(|| StoreError::NotFound(format!("event {}", event_id)))?;
        let out = f(record)?;
        write_snapshot(&self.path, &snapshot).await?;
        Ok(out)
    }
}

#[async_trait]
impl SelectionStore for JsonSnapshotStore {
    async fn list_nominations(&self, event_id: &EventId) -> Result<Vec<Nomination>, StoreError> {
        Ok(self.event(event_id).await?.nominations)
    }

    async fn list_votes(&self, event_id: &EventId) -> Result<Vec<Vote>, StoreError> {
        Ok(self.event(event_id).await?.votes)
    }

    async fn list_attendees(&self, event_id: &EventId) -> Result<Vec<Person>, StoreError> {
        Ok(self.event(event_id).await?.attendees)
    }

    async fn list_group_members(&self, event_id: &EventId) -> Result<Vec<Person>, StoreError> {
        Ok(self.event(event_id).await?.group_members)
    }

    async fn current_decision(&self, event_id: &EventId) -> Result<Option<Decision>, StoreError> {
        Ok(self.event(event_id).await?.decision)
    }

    async fn write_decision(&self, decision: &Decision) -> Result<(), StoreError> {
        self.modify(&decision.event_id, |record| record.set_decision(decision))
            .await
    }

    async fn clear_decision(&self, event_id: &EventId) -> Result<(), StoreError> {
        self.modify(event_id, |record| {
            record.decision = None;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl BallotBox for JsonSnapshotStore {
    async fn upsert_vote(
        &self,
        event_id: &EventId,
        nomination_id: &NominationId,
        voter: &UserId,
        reaction: Reaction,
    ) -> Result<Vote, StoreError> {
        let (vote, kind) = self
            .modify(event_id, |record| {
                let revision = record.highest_revision() + 1;
                record.upsert_vote(nomination_id, voter, reaction, revision)
            })
            .await?;
        debug!("Vote {} in {}", kind, self.path.display());
        Ok(vote)
    }

    async fn delete_vote(
        &self,
        event_id: &EventId,
        nomination_id: &NominationId,
        voter: &UserId,
    ) -> Result<(), StoreError> {
        self.modify(event_id, |record| Ok(record.remove_vote(nomination_id, voter)))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl VoteChangeFeed for JsonSnapshotStore {
    /// Poll the file and report ballot differences
    ///
    /// Own writes are observed the same way as external edits.
    async fn subscribe(&self, event_id: &EventId) -> Result<VoteChangeStream, StoreError> {
        let initial = BallotDigest::of(&self.event(event_id).await?);
        let (tx, rx) = mpsc::channel(FEED_CAPACITY);

        let poller = SnapshotPoller {
            path: self.path.clone(),
            event_id: event_id.clone(),
            interval: self.poll_interval,
            last: initial,
            tx,
        };
        tokio::spawn(poller.run());
        info!(
            "Polling {} every {:?} for {}",
            self.path.display(),
            self.poll_interval,
            event_id
        );
        Ok(VoteChangeStream::new(rx))
    }
}

type VoteKey = (Option<NominationId>, Option<MovieId>, UserId);

/// The parts of an event a vote feed cares about
#[derive(Debug, Clone, PartialEq, Eq)]
struct BallotDigest {
    nominations: Vec<NominationId>,
    votes: BTreeMap<VoteKey, (Reaction, u64)>,
}

impl BallotDigest {
    fn of(record: &EventRecord) -> Self {
        Self {
            nominations: record.nominations.iter().map(|n| n.id.clone()).collect(),
            votes: record
                .votes
                .iter()
                .map(|v| {
                    (
                        (v.nomination_id.clone(), v.movie_id.clone(), v.voter.clone()),
                        (v.reaction, v.revision),
                    )
                })
                .collect(),
        }
    }

    /// Changes that turn `self` into `next`
    ///
    /// A changed nomination list collapses into a single resync.
    fn diff(&self, next: &BallotDigest, event_id: &EventId) -> Vec<VoteChange> {
        if self.nominations != next.nominations {
            return vec![VoteChange::resync(event_id.clone())];
        }

        let change = |kind, key: &VoteKey| {
            VoteChange::new(event_id.clone(), kind, key.0.clone(), key.2.clone())
        };
        let mut changes = Vec::new();
        for (key, value) in &next.votes {
            match self.votes.get(key) {
                None => changes.push(change(VoteChangeKind::Inserted, key)),
                Some(old) if old != value => changes.push(change(VoteChangeKind::Updated, key)),
                Some(_) => {}
            }
        }
        for key in self.votes.keys() {
            if !next.votes.contains_key(key) {
                changes.push(change(VoteChangeKind::Deleted, key));
            }
        }
        changes
    }
}

struct SnapshotPoller {
    path: PathBuf,
    event_id: EventId,
    interval: Duration,
    last: BallotDigest,
    tx: mpsc::Sender<VoteChange>,
}

impl SnapshotPoller {
    async fn run(mut self) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut failing = false;

        loop {
            tokio::select! {
                _ = self.tx.closed() => {
                    debug!("Vote feed for {} dropped, stopping poller", self.event_id);
                    return;
                }
                _ = ticker.tick() => {}
            }

            let current = match read_snapshot(&self.path)
                .await
                .and_then(|snapshot| take_event(snapshot, &self.event_id))
            {
                Ok(record) => BallotDigest::of(&record),
                Err(e) => {
                    if !failing {
                        warn!("Snapshot poll failed, will retry: {}", e);
                        failing = true;
                    }
                    continue;
                }
            };

            let mut changes = self.last.diff(&current, &self.event_id);
            if failing {
                info!("Snapshot {} readable again", self.path.display());
                failing = false;
                changes = vec![VoteChange::resync(self.event_id.clone())];
            }
            self.last = current;

            for change in changes {
                if self.tx.send(change).await.is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_application::{
        CastVoteInput, CastVoteUseCase, RunSelectionInput, RunSelectionUseCase, SelectionConfig,
        SelectionOutcome,
    };
    use marquee_domain::{SelectionMethod, VoteMutation};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn friday() -> EventId {
        EventId::new("friday")
    }

    fn record() -> EventRecord {
        EventRecord {
            nominations: vec![
                Nomination::movie("n1", "friday", "m1", "host").with_title("Alien"),
                Nomination::movie("n2", "friday", "m2", "host").with_title("Heat"),
            ],
            votes: vec![
                Vote::new("n1", "ana", Reaction::Like).with_revision(1),
                Vote::new("n2", "ana", Reaction::Superlike).with_revision(2),
                Vote::new("n2", "ben", Reaction::Superlike).with_revision(3),
            ],
            attendees: vec![Person::new("ana"), Person::new("ben")],
            ..Default::default()
        }
    }

    async fn store_in(dir: &TempDir) -> JsonSnapshotStore {
        let store = JsonSnapshotStore::new(dir.path().join("night.json"))
            .with_poll_interval(Duration::from_millis(20));
        store
            .save(&SnapshotFile::single("friday", record()))
            .await
            .unwrap();
        store
    }

    async fn next_change(stream: &mut VoteChangeStream) -> VoteChange {
        tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("no change observed")
            .expect("feed closed")
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("absent.json"));
        let err = store.list_nominations(&friday()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_malformed_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonSnapshotStore::new(path)
            .list_votes(&friday())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_unknown_event() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let err = store
            .list_votes(&EventId::new("saturday"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reads_event_sections() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        assert_eq!(store.list_nominations(&friday()).await.unwrap().len(), 2);
        assert_eq!(store.list_votes(&friday()).await.unwrap().len(), 3);
        assert_eq!(store.list_attendees(&friday()).await.unwrap().len(), 2);
        assert!(store.list_group_members(&friday()).await.unwrap().is_empty());
        assert!(store.current_decision(&friday()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_vote_writes_persist() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let vote = store
            .upsert_vote(&friday(), &NominationId::new("n1"), &UserId::new("ana"), Reaction::Dislike)
            .await
            .unwrap();
        assert_eq!(vote.revision, 4);

        let reopened = JsonSnapshotStore::new(store.path());
        let votes = reopened.list_votes(&friday()).await.unwrap();
        assert_eq!(votes.len(), 3);
        assert!(votes.iter().any(|v| v.reaction == Reaction::Dislike));

        store
            .delete_vote(&friday(), &NominationId::new("n1"), &UserId::new("ana"))
            .await
            .unwrap();
        assert_eq!(reopened.list_votes(&friday()).await.unwrap().len(), 2);
        assert!(!dir.path().join("night.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_decision_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let decision = Decision::new("friday", "n2", Some(MovieId::new("m2")));

        store.write_decision(&decision).await.unwrap();
        assert_eq!(store.current_decision(&friday()).await.unwrap(), Some(decision));

        store.clear_decision(&friday()).await.unwrap();
        assert!(store.current_decision(&friday()).await.unwrap().is_none());

        let stale = Decision::new("friday", "n9", None);
        assert!(store.write_decision(&stale).await.is_err());
    }

    #[tokio::test]
    async fn test_feed_sees_external_edits() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let mut stream = store.subscribe(&friday()).await.unwrap();

        // another process rewrites the file
        let mut edited = record();
        edited.votes.remove(0);
        edited
            .votes
            .push(Vote::new("n1", "cid", Reaction::Like).with_revision(9));
        JsonSnapshotStore::new(store.path())
            .save(&SnapshotFile::single("friday", edited))
            .await
            .unwrap();

        let first = next_change(&mut stream).await;
        let second = next_change(&mut stream).await;
        assert_eq!(first.kind, VoteChangeKind::Inserted);
        assert_eq!(first.voter, Some(UserId::new("cid")));
        assert_eq!(second.kind, VoteChangeKind::Deleted);
        assert_eq!(second.voter, Some(UserId::new("ana")));
    }

    #[tokio::test]
    async fn test_feed_sees_own_writes() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let mut stream = store.subscribe(&friday()).await.unwrap();

        store
            .upsert_vote(&friday(), &NominationId::new("n1"), &UserId::new("ana"), Reaction::Superlike)
            .await
            .unwrap();

        let change = next_change(&mut stream).await;
        assert_eq!(change.kind, VoteChangeKind::Updated);
        assert_eq!(change.nomination_id, Some(NominationId::new("n1")));
    }

    #[tokio::test]
    async fn test_zero_poll_interval_is_clamped() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await.with_poll_interval(Duration::ZERO);
        assert_eq!(store.poll_interval(), MIN_POLL_INTERVAL);

        let mut stream = store.subscribe(&friday()).await.unwrap();
        store
            .delete_vote(&friday(), &NominationId::new("n1"), &UserId::new("ana"))
            .await
            .unwrap();
        assert_eq!(next_change(&mut stream).await.kind, VoteChangeKind::Deleted);
    }

    #[tokio::test]
    async fn test_toggle_retracts_legacy_row() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonSnapshotStore::new(dir.path().join("legacy.json")));
        let mut legacy = record();
        legacy.votes = vec![Vote::legacy("m1", "cid", Reaction::Dislike)];
        store
            .save(&SnapshotFile::single("friday", legacy))
            .await
            .unwrap();

        let out = CastVoteUseCase::new(store.clone())
            .execute(CastVoteInput::new(friday(), "n1", "cid", Reaction::Dislike))
            .await
            .unwrap();
        assert_eq!(out.mutation, VoteMutation::Retract);
        assert!(store.list_votes(&friday()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nomination_change_resyncs() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let mut stream = store.subscribe(&friday()).await.unwrap();

        let mut edited = record();
        edited
            .nominations
            .push(Nomination::movie("n3", "friday", "m3", "host"));
        store
            .save(&SnapshotFile::single("friday", edited))
            .await
            .unwrap();

        let change = next_change(&mut stream).await;
        assert_eq!(change.kind, VoteChangeKind::Resync);
        assert!(change.voter.is_none());
    }

    #[tokio::test]
    async fn test_recovery_after_corrupt_write_resyncs() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let mut stream = store.subscribe(&friday()).await.unwrap();

        std::fs::write(store.path(), "garbage").unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        store
            .save(&SnapshotFile::single("friday", record()))
            .await
            .unwrap();

        assert_eq!(next_change(&mut stream).await.kind, VoteChangeKind::Resync);
    }

    #[tokio::test]
    async fn test_battle_from_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir).await);
        let config = SelectionConfig::default()
            .with_method(SelectionMethod::BattleRoyale)
            .with_seed(Some(11));

        let run = RunSelectionUseCase::new(store.clone())
            .execute(RunSelectionInput::new("friday", &config))
            .await
            .unwrap();

        assert_eq!(run.seed, 11);
        match run.outcome {
            SelectionOutcome::Tournament(outcome) => {
                assert_eq!(outcome.winner.nomination.id.as_str(), "n2");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
