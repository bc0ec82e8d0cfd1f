//! In-crate store double for use case tests

use crate::ports::ballot_box::BallotBox;
use crate::ports::selection_store::{SelectionStore, StoreError};
use crate::ports::vote_feed::{VoteChange, VoteChangeFeed, VoteChangeKind, VoteChangeStream};
use async_trait::async_trait;
use marquee_domain::{
    Decision, EventId, Nomination, NominationId, Person, Reaction, UserId, Vote,
};
use std::sync::Mutex;
use tokio::sync::mpsc;

#[derive(Default)]
struct State {
    nominations: Vec<Nomination>,
    votes: Vec<Vote>,
    attendees: Vec<Person>,
    group_members: Vec<Person>,
    decision: Option<Decision>,
    revision: u64,
    failing: bool,
    decision_writes: usize,
}

#[derive(Default)]
pub(crate) struct FakeStore {
    state: Mutex<State>,
    subscribers: Mutex<Vec<mpsc::Sender<VoteChange>>>,
}

impl FakeStore {
    pub(crate) fn with_nominations(nominations: Vec<Nomination>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().nominations = nominations;
        store
    }

    pub(crate) fn set_votes(&self, votes: Vec<Vote>) {
        self.state.lock().unwrap().votes = votes;
    }

    pub(crate) fn set_attendees(&self, attendees: Vec<Person>) {
        self.state.lock().unwrap().attendees = attendees;
    }

    pub(crate) fn set_group_members(&self, members: Vec<Person>) {
        self.state.lock().unwrap().group_members = members;
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    pub(crate) fn decision_writes(&self) -> usize {
        self.state.lock().unwrap().decision_writes
    }

    /// Append a vote row and notify subscribers
    pub(crate) fn push_vote(&self, event_id: &str, vote: Vote) {
        let change = VoteChange::new(
            EventId::new(event_id),
            VoteChangeKind::Inserted,
            vote.nomination_id.clone(),
            vote.voter.clone(),
        );
        self.state.lock().unwrap().votes.push(vote);
        self.notify(change);
    }

    pub(crate) fn notify(&self, change: VoteChange) {
        for tx in self.subscribers.lock().unwrap().iter() {
            let _ = tx.try_send(change.clone());
        }
    }

    pub(crate) fn close_feed(&self) {
        self.subscribers.lock().unwrap().clear();
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.state.lock().unwrap().failing {
            Err(StoreError::Unavailable("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SelectionStore for FakeStore {
    async fn list_nominations(&self, _event_id: &EventId) -> Result<Vec<Nomination>, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().nominations.clone())
    }

    async fn list_votes(&self, _event_id: &EventId) -> Result<Vec<Vote>, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().votes.clone())
    }

    async fn list_attendees(&self, _event_id: &EventId) -> Result<Vec<Person>, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().attendees.clone())
    }

    async fn list_group_members(&self, _event_id: &EventId) -> Result<Vec<Person>, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().group_members.clone())
    }

    async fn current_decision(&self, _event_id: &EventId) -> Result<Option<Decision>, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().decision.clone())
    }

    async fn write_decision(&self, decision: &Decision) -> Result<(), StoreError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        state.decision = Some(decision.clone());
        state.decision_writes += 1;
        Ok(())
    }

    async fn clear_decision(&self, _event_id: &EventId) -> Result<(), StoreError> {
        self.check()?;
        self.state.lock().unwrap().decision = None;
        Ok(())
    }
}

#[async_trait]
impl BallotBox for FakeStore {
    async fn upsert_vote(
        &self,
        _event_id: &EventId,
        nomination_id: &NominationId,
        voter: &UserId,
        reaction: Reaction,
    ) -> Result<Vote, StoreError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        state.revision += 1;
        let vote = Vote::new(nomination_id.clone(), voter.clone(), reaction)
            .with_revision(state.revision);
        state
            .votes
            .retain(|v| !(v.nomination_id.as_ref() == Some(nomination_id) && &v.voter == voter));
        state.votes.push(vote.clone());
        Ok(vote)
    }

    async fn delete_vote(
        &self,
        _event_id: &EventId,
        nomination_id: &NominationId,
        voter: &UserId,
    ) -> Result<(), StoreError> {
        self.check()?;
        self.state
            .lock()
            .unwrap()
            .votes
            .retain(|v| !(v.nomination_id.as_ref() == Some(nomination_id) && &v.voter == voter));
        Ok(())
    }
}

#[async_trait]
impl VoteChangeFeed for FakeStore {
    async fn subscribe(&self, _event_id: &EventId) -> Result<VoteChangeStream, StoreError> {
        let (tx, rx) = mpsc::channel(64);
        self.subscribers.lock().unwrap().push(tx);
        Ok(VoteChangeStream::new(rx))
    }
}

/// Four-movie ballot used across use case tests
pub(crate) fn movie_night() -> FakeStore {
    let store = FakeStore::with_nominations(vec![
        Nomination::movie("n1", "e1", "m1", "alice").with_title("Alien"),
        Nomination::movie("n2", "e1", "m2", "bob").with_title("Heat"),
        Nomination::movie("n3", "e1", "m3", "carol").with_title("Ran"),
        Nomination::movie("n4", "e1", "m4", "dave").with_title("Jaws"),
    ]);
    store.set_votes(vec![
        Vote::new("n1", "alice", Reaction::Superlike),
        Vote::new("n1", "bob", Reaction::Dislike),
        Vote::new("n2", "alice", Reaction::Like),
        Vote::new("n2", "bob", Reaction::Like),
        Vote::new("n3", "carol", Reaction::Superlike),
        Vote::new("n3", "dave", Reaction::Superlike),
    ]);
    store
}
