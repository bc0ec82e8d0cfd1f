//! In-process event store
//!
//! Holds events in memory and pushes vote changes to subscribers directly.
//! [`EventRecord`] is also the per-event layout of the JSON snapshot.

use async_trait::async_trait;
use marquee_application::ports::ballot_box::BallotBox;
use marquee_application::ports::selection_store::{SelectionStore, StoreError};
use marquee_application::ports::vote_feed::{
    VoteChange, VoteChangeFeed, VoteChangeKind, VoteChangeStream,
};
use marquee_domain::{
    Decision, EventId, Nomination, NominationId, Person, Reaction, UserId, Vote, vote_targets,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Subscriber queue depth
const FEED_CAPACITY: usize = 64;

/// Everything stored for one event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub nominations: Vec<Nomination>,
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[serde(default)]
    pub attendees: Vec<Person>,
    #[serde(default)]
    pub group_members: Vec<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
}

impl EventRecord {
    pub(crate) fn highest_revision(&self) -> u64 {
        self.votes.iter().map(|v| v.revision).max().unwrap_or(0)
    }

    fn has_nomination(&self, nomination_id: &NominationId) -> bool {
        self.nominations.iter().any(|n| &n.id == nomination_id)
    }

    /// Which rows count toward `nomination_id`, optionally for one voter
    ///
    /// Follows the tally's matching, so legacy movie-id rows are included.
    fn attached_rows(&self, nomination_id: &NominationId, voter: Option<&UserId>) -> Vec<bool> {
        vote_targets(&self.nominations, &self.votes)
            .into_iter()
            .zip(&self.votes)
            .map(|(target, vote)| {
                target == Some(nomination_id) && voter.is_none_or(|voter| &vote.voter == voter)
            })
            .collect()
    }

    /// Keep only the rows where `keep` is set, returning the others
    fn drain_rows(&mut self, keep: &[bool]) -> Vec<Vote> {
        let (kept, removed): (Vec<_>, Vec<_>) = std::mem::take(&mut self.votes)
            .into_iter()
            .zip(keep)
            .partition(|(_, keep)| **keep);
        self.votes = kept.into_iter().map(|(vote, _)| vote).collect();
        removed.into_iter().map(|(vote, _)| vote).collect()
    }

    /// Insert or replace the voter's vote on a live nomination
    ///
    /// Every earlier row for the pair, legacy rows included, collapses into
    /// the new one.
    pub(crate) fn upsert_vote(
        &mut self,
        nomination_id: &NominationId,
        voter: &UserId,
        reaction: Reaction,
        revision: u64,
    ) -> Result<(Vote, VoteChangeKind), StoreError> {
        if !self.has_nomination(nomination_id) {
            return Err(StoreError::NotFound(format!("nomination {}", nomination_id)));
        }
        let vote =
            Vote::new(nomination_id.clone(), voter.clone(), reaction).with_revision(revision);
        let attached = self.attached_rows(nomination_id, Some(voter));
        match attached.iter().position(|hit| *hit) {
            Some(idx) => {
                let keep: Vec<bool> = attached
                    .iter()
                    .enumerate()
                    .map(|(i, hit)| i == idx || !hit)
                    .collect();
                self.votes[idx] = vote.clone();
                self.drain_rows(&keep);
                Ok((vote, VoteChangeKind::Updated))
            }
            None => {
                self.votes.push(vote.clone());
                Ok((vote, VoteChangeKind::Inserted))
            }
        }
    }

    /// Returns whether a vote was removed
    pub(crate) fn remove_vote(&mut self, nomination_id: &NominationId, voter: &UserId) -> bool {
        let keep: Vec<bool> = self
            .attached_rows(nomination_id, Some(voter))
            .into_iter()
            .map(|hit| !hit)
            .collect();
        !self.drain_rows(&keep).is_empty()
    }

    /// Remove a nomination, returning the votes that went with it
    pub(crate) fn withdraw_nomination(
        &mut self,
        nomination_id: &NominationId,
    ) -> Result<Vec<Vote>, StoreError> {
        if !self.has_nomination(nomination_id) {
            return Err(StoreError::NotFound(format!("nomination {}", nomination_id)));
        }
        // resolve before the nomination disappears, or its legacy rows would
        // move to another nomination of the same movie
        let keep: Vec<bool> = self
            .attached_rows(nomination_id, None)
            .into_iter()
            .map(|hit| !hit)
            .collect();
        let removed = self.drain_rows(&keep);
        self.nominations.retain(|n| &n.id != nomination_id);
        if self
            .decision
            .as_ref()
            .is_some_and(|d| &d.nomination_id == nomination_id)
        {
            self.decision = None;
        }
        Ok(removed)
    }

    pub(crate) fn set_decision(&mut self, decision: &Decision) -> Result<(), StoreError> {
        if !self.has_nomination(&decision.nomination_id) {
            return Err(StoreError::NotFound(format!(
                "nomination {}",
                decision.nomination_id
            )));
        }
        self.decision = Some(decision.clone());
        Ok(())
    }
}

pub struct InMemoryStore {
    events: RwLock<HashMap<EventId, EventRecord>>,
    revision: AtomicU64,
    subscribers: RwLock<HashMap<EventId, Vec<mpsc::Sender<VoteChange>>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            revision: AtomicU64::new(0),
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Register an event, replacing any existing record
    ///
    /// Vote revisions continue after the highest revision seen in `record`.
    pub fn insert_event(&self, event_id: impl Into<EventId>, record: EventRecord) {
        let event_id = event_id.into();
        self.revision
            .fetch_max(record.highest_revision(), Ordering::SeqCst);
        debug!(
            "Event {} loaded: {} nomination(s), {} vote(s)",
            event_id,
            record.nominations.len(),
            record.votes.len()
        );
        self.write_events().insert(event_id, record);
    }

    pub fn create_event(&self, event_id: impl Into<EventId>) {
        self.insert_event(event_id, EventRecord::default());
    }

    /// Copy of an event's record
    pub fn event(&self, event_id: &EventId) -> Option<EventRecord> {
        self.read_events().get(event_id).cloned()
    }

    pub fn add_nomination(&self, nomination: Nomination) -> Result<(), StoreError> {
        let event_id = nomination.event_id.clone();
        self.with_event(&event_id, |record| {
            if record.nominations.iter().any(|n| n.id == nomination.id) {
                return Err(StoreError::Other(format!(
                    "Nomination {} already exists",
                    nomination.id
                )));
            }
            record.nominations.push(nomination);
            Ok(())
        })
    }

    /// Remove a nomination and every vote cast on it
    ///
    /// A decision pointing at the nomination is cleared as well.
    pub fn withdraw_nomination(
        &self,
        event_id: &EventId,
        nomination_id: &NominationId,
    ) -> Result<(), StoreError> {
        let removed = self.with_event(event_id, |record| record.withdraw_nomination(nomination_id))?;

        info!(
            "Withdrew nomination {} with {} vote(s)",
            nomination_id,
            removed.len()
        );
        for vote in removed {
            self.notify(VoteChange::new(
                event_id.clone(),
                VoteChangeKind::Deleted,
                Some(nomination_id.clone()),
                vote.voter,
            ));
        }
        Ok(())
    }

    pub fn set_attendees(&self, event_id: &EventId, attendees: Vec<Person>) -> Result<(), StoreError> {
        self.with_event(event_id, |record| {
            record.attendees = attendees;
            Ok(())
        })
    }

    pub fn set_group_members(
        &self,
        event_id: &EventId,
        members: Vec<Person>,
    ) -> Result<(), StoreError> {
        self.with_event(event_id, |record| {
            record.group_members = members;
            Ok(())
        })
    }

    /// Append a vote row as-is, without the one-vote-per-voter rule
    ///
    /// For legacy and imported rows. Subscribers are notified.
    pub fn insert_raw_vote(&self, event_id: &EventId, vote: Vote) -> Result<(), StoreError> {
        let change = VoteChange::new(
            event_id.clone(),
            VoteChangeKind::Inserted,
            vote.nomination_id.clone(),
            vote.voter.clone(),
        );
        self.with_event(event_id, |record| {
            record.votes.push(vote);
            Ok(())
        })?;
        self.notify(change);
        Ok(())
    }

    /// Number of live subscriptions for an event
    pub fn subscriber_count(&self, event_id: &EventId) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(event_id)
            .map(|subs| subs.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }

    /// Push a change to the event's subscribers
    ///
    /// A full queue already holds a pending change, so its subscriber will
    /// re-read anyway and the notification is dropped.
    fn notify(&self, change: VoteChange) {
        let mut subscribers = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        if let Some(subs) = subscribers.get_mut(&change.event_id) {
            subs.retain(|tx| match tx.try_send(change.clone()) {
                Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => true,
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            });
        }
    }

    /// Drop every subscription, ending all change streams
    pub fn close_feeds(&self) {
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn next_revision(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn read_events(&self) -> std::sync::RwLockReadGuard<'_, HashMap<EventId, EventRecord>> {
        self.events.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_events(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<EventId, EventRecord>> {
        self.events.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read_event<T>(
        &self,
        event_id: &EventId,
        f: impl FnOnce(&EventRecord) -> T,
    ) -> Result<T, StoreError> {
        self.read_events()
            .get(event_id)
            .map(f)
            .ok_or_else(|| StoreError::NotFound(format!("event {}", event_id)))
    }

    fn with_event<T>(
        &self,
        event_id: &EventId,
        f: impl FnOnce(&mut EventRecord) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut events = self.write_events();
        let record = events
            .get_mut(event_id)
            .ok_or_else(|| StoreError::NotFound(format!("event {}", event_id)))?;
        f(record)
    }
}

#[async_trait]
impl SelectionStore for InMemoryStore {
    async fn list_nominations(&self, event_id: &EventId) -> Result<Vec<Nomination>, StoreError> {
        self.read_event(event_id, |r| r.nominations.clone())
    }

    async fn list_votes(&self, event_id: &EventId) -> Result<Vec<Vote>, StoreError> {
        self.read_event(event_id, |r| r.votes.clone())
    }

    async fn list_attendees(&self, event_id: &EventId) -> Result<Vec<Person>, StoreError> {
        self.read_event(event_id, |r| r.attendees.clone())
    }

    async fn list_group_members(&self, event_id: &EventId) -> Result<Vec<Person>, StoreError> {
        self.read_event(event_id, |r| r.group_members.clone())
    }

    async fn current_decision(&self, event_id: &EventId) -> Result<Option<Decision>, StoreError> {
        self.read_event(event_id, |r| r.decision.clone())
    }

    async fn write_decision(&self, decision: &Decision) -> Result<(), StoreError> {
        self.with_event(&decision.event_id, |record| record.set_decision(decision))
    }

    async fn clear_decision(&self, event_id: &EventId) -> Result<(), StoreError> {
        self.with_event(event_id, |record| {
            record.decision = None;
            Ok(())
        })
    }
}

#[async_trait]
impl BallotBox for InMemoryStore {
    async fn upsert_vote(
        &self,
        event_id: &EventId,
        nomination_id: &NominationId,
        voter: &UserId,
        reaction: Reaction,
    ) -> Result<Vote, StoreError> {
        let revision = self.next_revision();
        let (vote, kind) = self.with_event(event_id, |record| {
            record.upsert_vote(nomination_id, voter, reaction, revision)
        })?;

        self.notify(VoteChange::new(
            event_id.clone(),
            kind,
            Some(nomination_id.clone()),
            voter.clone(),
        ));
        Ok(vote)
    }

    async fn delete_vote(
        &self,
        event_id: &EventId,
        nomination_id: &NominationId,
        voter: &UserId,
    ) -> Result<(), StoreError> {
        let removed =
            self.with_event(event_id, |record| Ok(record.remove_vote(nomination_id, voter)))?;

        if removed {
            self.notify(VoteChange::new(
                event_id.clone(),
                VoteChangeKind::Deleted,
                Some(nomination_id.clone()),
                voter.clone(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl VoteChangeFeed for InMemoryStore {
    async fn subscribe(&self, event_id: &EventId) -> Result<VoteChangeStream, StoreError> {
        if !self.read_events().contains_key(event_id) {
            return Err(StoreError::NotFound(format!("event {}", event_id)));
        }
        let (tx, rx) = mpsc::channel(FEED_CAPACITY);
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(event_id.clone())
            .or_default()
            .push(tx);
        debug!("New vote feed subscriber for {}", event_id);
        Ok(VoteChangeStream::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_application::{
        CastVoteInput, CastVoteUseCase, ComputeRankingInput, ComputeRankingUseCase,
        FinalizeDecisionUseCase, LiveRankingSync, RankingView,
    };
    use marquee_domain::{ScoringMethod, VoteMutation};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn event() -> EventId {
        EventId::new("friday")
    }

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.create_event("friday");
        for (id, movie, title) in [("n1", "m1", "Alien"), ("n2", "m2", "Heat")] {
            store
                .add_nomination(Nomination::movie(id, "friday", movie, "host").with_title(title))
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_unknown_event_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.list_votes(&EventId::new("nope")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.subscribe(&EventId::new("nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_upsert_replaces_previous_vote() {
        let store = store();
        let nom = NominationId::new("n1");
        let voter = UserId::new("ana");

        let first = store.upsert_vote(&event(), &nom, &voter, Reaction::Like).await.unwrap();
        let second = store
            .upsert_vote(&event(), &nom, &voter, Reaction::Superlike)
            .await
            .unwrap();

        assert!(second.revision > first.revision);
        let votes = store.list_votes(&event()).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].reaction, Reaction::Superlike);
    }

    #[tokio::test]
    async fn test_upsert_on_unknown_nomination_fails() {
        let store = store();
        let err = store
            .upsert_vote(&event(), &NominationId::new("n9"), &UserId::new("ana"), Reaction::Like)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_feed_reports_insert_update_delete() {
        let store = store();
        let mut stream = store.subscribe(&event()).await.unwrap();
        let nom = NominationId::new("n1");
        let voter = UserId::new("ana");

        store.upsert_vote(&event(), &nom, &voter, Reaction::Like).await.unwrap();
        store.upsert_vote(&event(), &nom, &voter, Reaction::Dislike).await.unwrap();
        store.delete_vote(&event(), &nom, &voter).await.unwrap();
        // deleting again is silent
        store.delete_vote(&event(), &nom, &voter).await.unwrap();

        let kinds: Vec<VoteChangeKind> = [
            stream.next().await.unwrap(),
            stream.next().await.unwrap(),
            stream.next().await.unwrap(),
        ]
        .iter()
        .map(|c| c.kind)
        .collect();
        assert_eq!(
            kinds,
            vec![
                VoteChangeKind::Inserted,
                VoteChangeKind::Updated,
                VoteChangeKind::Deleted
            ]
        );
        assert!(stream.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_feed_is_scoped_to_event() {
        let store = store();
        store.create_event("saturday");
        store
            .add_nomination(Nomination::movie("s1", "saturday", "m9", "host"))
            .unwrap();
        let mut stream = store.subscribe(&event()).await.unwrap();

        store
            .upsert_vote(
                &EventId::new("saturday"),
                &NominationId::new("s1"),
                &UserId::new("ana"),
                Reaction::Like,
            )
            .await
            .unwrap();
        assert!(stream.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_withdraw_cascades_votes() {
        let store = store();
        let mut stream = store.subscribe(&event()).await.unwrap();
        for voter in ["ana", "ben"] {
            store
                .upsert_vote(&event(), &NominationId::new("n1"), &UserId::new(voter), Reaction::Like)
                .await
                .unwrap();
        }
        store
            .upsert_vote(&event(), &NominationId::new("n2"), &UserId::new("ana"), Reaction::Like)
            .await
            .unwrap();

        store
            .write_decision(&Decision::new("friday", "n1", None))
            .await
            .unwrap();
        store
            .withdraw_nomination(&event(), &NominationId::new("n1"))
            .unwrap();
        assert!(store.current_decision(&event()).await.unwrap().is_none());

        let votes = store.list_votes(&event()).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(store.list_nominations(&event()).await.unwrap().len(), 1);

        let mut deleted = 0;
        while let Ok(change) = stream.receiver.try_recv() {
            if change.kind == VoteChangeKind::Deleted {
                deleted += 1;
            }
        }
        assert_eq!(deleted, 2);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_is_pruned() {
        let store = store();
        let stream = store.subscribe(&event()).await.unwrap();
        assert_eq!(store.subscriber_count(&event()), 1);
        drop(stream);
        store
            .upsert_vote(&event(), &NominationId::new("n1"), &UserId::new("ana"), Reaction::Like)
            .await
            .unwrap();
        assert_eq!(store.subscriber_count(&event()), 0);
    }

    #[tokio::test]
    async fn test_decision_requires_live_nomination() {
        let store = store();
        let bad = Decision::new("friday", "n7", None);
        assert!(store.write_decision(&bad).await.is_err());

        store
            .write_decision(&Decision::new("friday", "n2", None))
            .await
            .unwrap();
        store.clear_decision(&event()).await.unwrap();
        assert!(store.current_decision(&event()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_event_continues_revisions() {
        let store = InMemoryStore::new();
        let mut record = EventRecord::default();
        record
            .nominations
            .push(Nomination::movie("n1", "friday", "m1", "host"));
        record
            .votes
            .push(Vote::new("n1", "ana", Reaction::Like).with_revision(41));
        store.insert_event("friday", record);

        let vote = store
            .upsert_vote(&event(), &NominationId::new("n1"), &UserId::new("ben"), Reaction::Like)
            .await
            .unwrap();
        assert_eq!(vote.revision, 42);
    }

    #[tokio::test]
    async fn test_cast_vote_toggles_through_store() {
        let store = Arc::new(store());
        let cast = CastVoteUseCase::new(store.clone());
        let input = CastVoteInput::new(event(), "n1", "ana", Reaction::Superlike);

        let first = cast.execute(input.clone()).await.unwrap();
        assert_eq!(first.mutation, VoteMutation::Upsert(Reaction::Superlike));

        let second = cast.execute(input).await.unwrap();
        assert_eq!(second.mutation, VoteMutation::Retract);
        assert!(store.list_votes(&event()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cast_vote_retracts_legacy_row() {
        let store = Arc::new(store());
        store
            .insert_raw_vote(&event(), Vote::legacy("m1", "alice", Reaction::Like))
            .unwrap();

        let cast = CastVoteUseCase::new(store.clone());
        let out = cast
            .execute(CastVoteInput::new(event(), "n1", "alice", Reaction::Like))
            .await
            .unwrap();
        assert_eq!(out.mutation, VoteMutation::Retract);

        let ranking = ComputeRankingUseCase::new(store.clone())
            .tally(&event())
            .await
            .unwrap();
        assert_eq!(ranking[0].tally.like_count, 0);
        assert!(store.list_votes(&event()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_legacy_row() {
        let store = store();
        store
            .insert_raw_vote(&event(), Vote::legacy("m1", "alice", Reaction::Like))
            .unwrap();
        store
            .insert_raw_vote(&event(), Vote::legacy("m1", "ben", Reaction::Dislike))
            .unwrap();

        store
            .upsert_vote(&event(), &NominationId::new("n1"), &UserId::new("alice"), Reaction::Superlike)
            .await
            .unwrap();

        let votes = store.list_votes(&event()).await.unwrap();
        assert_eq!(votes.len(), 2);
        let alice: Vec<&Vote> = votes.iter().filter(|v| v.voter.as_str() == "alice").collect();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].nomination_id, Some(NominationId::new("n1")));
        assert_eq!(alice[0].reaction, Reaction::Superlike);
    }

    #[tokio::test]
    async fn test_withdraw_removes_legacy_rows() {
        let store = store();
        store
            .insert_raw_vote(&event(), Vote::legacy("m1", "alice", Reaction::Like))
            .unwrap();
        store
            .withdraw_nomination(&event(), &NominationId::new("n1"))
            .unwrap();
        assert!(store.list_votes(&event()).await.unwrap().is_empty());

        // a fresh nomination of the same movie starts from zero
        store
            .add_nomination(Nomination::movie("n3", "friday", "m1", "host"))
            .unwrap();
        let tallies = ComputeRankingUseCase::new(Arc::new(store))
            .tally(&event())
            .await
            .unwrap();
        let n3 = tallies
            .iter()
            .find(|t| t.nomination.id.as_str() == "n3")
            .unwrap();
        assert_eq!(n3.tally.total(), 0);
    }

    #[tokio::test]
    async fn test_ranking_and_decision_end_to_end() {
        let store = Arc::new(store());
        for (voter, reaction) in [("ana", Reaction::Superlike), ("ben", Reaction::Like)] {
            store
                .upsert_vote(&event(), &NominationId::new("n2"), &UserId::new(voter), reaction)
                .await
                .unwrap();
        }

        let ranking = ComputeRankingUseCase::new(store.clone())
            .execute(&ComputeRankingInput::new(event(), ScoringMethod::WeightedScore))
            .await
            .unwrap();
        assert_eq!(ranking[0].nomination.id.as_str(), "n2");
        assert_eq!(ranking[0].score, 3);

        let finalize = FinalizeDecisionUseCase::new(store.clone());
        let decision = finalize
            .select(&event(), &ranking[0].nomination.id, None)
            .await
            .unwrap();
        assert_eq!(decision.candidate_id.as_ref().map(|m| m.as_str()), Some("m2"));
        assert_eq!(store.current_decision(&event()).await.unwrap(), Some(decision));
    }

    #[tokio::test]
    async fn test_live_sync_follows_votes() {
        let store = Arc::new(store());
        let handle = LiveRankingSync::new(store.clone())
            .start(event(), RankingView::default(), CancellationToken::new())
            .await
            .unwrap();
        let mut snapshots = handle.subscribe();

        store
            .upsert_vote(&event(), &NominationId::new("n2"), &UserId::new("ana"), Reaction::Superlike)
            .await
            .unwrap();

        let leader = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                snapshots.changed().await.unwrap();
                let leader = snapshots
                    .borrow_and_update()
                    .as_ref()
                    .and_then(|s| s.entries.first().map(|e| (e.nomination.id.clone(), e.score)));
                if let Some((id, score)) = leader
                    && score > 0
                {
                    return id;
                }
            }
        })
        .await
        .expect("ranking never updated");
        assert_eq!(leader.as_str(), "n2");
        handle.stop().await;
    }
}
