//! Live ranking sync
//!
//! Keeps a leaderboard current while votes come in. Every vote change (and
//! every change of the viewed method or dislike filter) triggers one fresh
//! read → tally → rank pass; the result is pushed to the observer and to a
//! watch channel.
//!
//! The loop is a single task selecting over:
//! - the cancellation token
//! - the view channel (method / filter toggles)
//! - the vote change stream
//!
//! A failed refresh is logged and reported; the last good ranking stays
//! published.

use super::compute_ranking::{ComputeRankingInput, ComputeRankingUseCase};
use crate::ports::ranking_observer::{NoRankingObserver, RankingObserver, RankingSnapshot};
use crate::ports::selection_log::SelectionLogger;
use crate::ports::selection_store::{SelectionStore, StoreError};
use crate::ports::vote_feed::{VoteChangeFeed, VoteChangeStream};
use marquee_domain::{EventId, ScoringMethod};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LiveSyncError {
    #[error("Could not subscribe to vote changes: {0}")]
    Subscribe(#[from] StoreError),
}

/// What the leaderboard is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingView {
    pub scoring: ScoringMethod,
    pub filter_dislikes: bool,
}

impl RankingView {
    pub fn new(scoring: ScoringMethod, filter_dislikes: bool) -> Self {
        Self {
            scoring,
            filter_dislikes,
        }
    }
}

impl Default for RankingView {
    fn default() -> Self {
        Self::new(ScoringMethod::default(), false)
    }
}

pub struct LiveRankingSync<S: SelectionStore + VoteChangeFeed + ?Sized + 'static> {
    store: Arc<S>,
    ranking: ComputeRankingUseCase<S>,
    observer: Arc<dyn RankingObserver>,
}

impl<S: SelectionStore + VoteChangeFeed + ?Sized + 'static> LiveRankingSync<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            ranking: ComputeRankingUseCase::new(store.clone()),
            store,
            observer: Arc::new(NoRankingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RankingObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_selection_logger(mut self, logger: Arc<dyn SelectionLogger>) -> Self {
        self.ranking = self.ranking.with_selection_logger(logger);
        self
    }

    /// Subscribe and start the sync task
    ///
    /// The first ranking is computed right away. The task ends when `cancel`
    /// fires, the handle is dropped, or the feed closes.
    pub async fn start(
        &self,
        event_id: EventId,
        view: RankingView,
        cancel: CancellationToken,
    ) -> Result<LiveRankingHandle, LiveSyncError> {
        let stream = self.store.subscribe(&event_id).await?;
        info!("Live ranking sync started for event {}", event_id);

        let (view_tx, view_rx) = watch::channel(view);
        let (snapshot_tx, snapshot_rx) = watch::channel(None);

        let worker = SyncWorker {
            ranking: self.ranking.clone(),
            observer: self.observer.clone(),
            event_id,
            generation: 0,
            snapshot_tx,
        };
        let task = tokio::spawn(worker.run(view_rx, stream, cancel.clone()));

        Ok(LiveRankingHandle {
            view_tx,
            snapshot_rx,
            cancel,
            task,
        })
    }
}

struct SyncWorker<S: SelectionStore + ?Sized + 'static> {
    ranking: ComputeRankingUseCase<S>,
    observer: Arc<dyn RankingObserver>,
    event_id: EventId,
    generation: u64,
    snapshot_tx: watch::Sender<Option<RankingSnapshot>>,
}

impl<S: SelectionStore + ?Sized + 'static> SyncWorker<S> {
    async fn run(
        mut self,
        mut view_rx: watch::Receiver<RankingView>,
        mut stream: VoteChangeStream,
        cancel: CancellationToken,
    ) {
        let view = *view_rx.borrow_and_update();
        self.refresh(view).await;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Live sync for {} cancelled", self.event_id);
                    break;
                }
                changed = view_rx.changed() => {
                    if changed.is_err() {
                        debug!("Live sync handle dropped");
                        break;
                    }
                    let view = *view_rx.borrow_and_update();
                    debug!("View changed to {} (filter: {})", view.scoring, view.filter_dislikes);
                    self.refresh(view).await;
                }
                change = stream.next() => {
                    let Some(change) = change else {
                        info!("Vote feed for {} closed", self.event_id);
                        break;
                    };
                    debug!("Vote {} on {:?}", change.kind, change.nomination_id);
                    // one pass covers everything already queued
                    let mut coalesced = 0;
                    while stream.receiver.try_recv().is_ok() {
                        coalesced += 1;
                    }
                    if coalesced > 0 {
                        debug!("Coalesced {} further vote change(s)", coalesced);
                    }
                    let view = *view_rx.borrow();
                    self.refresh(view).await;
                }
            }
        }
    }

    async fn refresh(&mut self, view: RankingView) {
        let input = ComputeRankingInput::new(self.event_id.clone(), view.scoring)
            .with_filter_dislikes(view.filter_dislikes);

        match self.ranking.execute(&input).await {
            Ok(entries) => {
                self.generation += 1;
                let snapshot = RankingSnapshot {
                    event_id: self.event_id.clone(),
                    scoring: view.scoring,
                    filter_dislikes: view.filter_dislikes,
                    entries,
                    generation: self.generation,
                };
                self.observer.on_ranking(&snapshot);
                self.snapshot_tx.send_replace(Some(snapshot));
            }
            Err(e) => {
                warn!(
                    "Ranking refresh for {} failed, keeping generation {}: {}",
                    self.event_id, self.generation, e
                );
                self.observer.on_refresh_failed(&e.to_string());
            }
        }
    }
}

/// Control handle for a running live sync
pub struct LiveRankingHandle {
    view_tx: watch::Sender<RankingView>,
    snapshot_rx: watch::Receiver<Option<RankingSnapshot>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl LiveRankingHandle {
    /// Switch method or filter; returns false if the task has ended
    pub fn set_view(&self, view: RankingView) -> bool {
        self.view_tx.send(view).is_ok()
    }

    pub fn view(&self) -> RankingView {
        *self.view_tx.borrow()
    }

    /// Receiver for every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Option<RankingSnapshot>> {
        self.snapshot_rx.clone()
    }

    pub fn latest(&self) -> Option<RankingSnapshot> {
        self.snapshot_rx.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the task to end on its own (feed closed or token cancelled)
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!("Live sync task failed: {}", e);
        }
    }

    /// Cancel and wait for the task to end
    pub async fn stop(self) {
        self.cancel.cancel();
        self.join().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{FakeStore, movie_night};
    use marquee_domain::{Reaction, Vote};
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[derive(Debug, PartialEq)]
    enum Seen {
        Ranking { generation: u64, leader: String },
        Failed,
    }

    struct ChannelObserver {
        tx: mpsc::UnboundedSender<Seen>,
    }

    impl RankingObserver for ChannelObserver {
        fn on_ranking(&self, snapshot: &RankingSnapshot) {
            let leader = snapshot
                .entries
                .first()
                .map(|e| e.nomination.id.to_string())
                .unwrap_or_default();
            let _ = self.tx.send(Seen::Ranking {
                generation: snapshot.generation,
                leader,
            });
        }

        fn on_refresh_failed(&self, _error: &str) {
            let _ = self.tx.send(Seen::Failed);
        }
    }

    async fn start(
        store: Arc<FakeStore>,
        view: RankingView,
    ) -> (LiveRankingHandle, mpsc::UnboundedReceiver<Seen>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sync = LiveRankingSync::new(store).with_observer(Arc::new(ChannelObserver { tx }));
        let handle = sync
            .start(EventId::new("e1"), view, CancellationToken::new())
            .await
            .unwrap();
        (handle, rx)
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<Seen>) -> Seen {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("observer timed out")
            .expect("observer channel closed")
    }

    #[tokio::test]
    async fn test_publishes_initial_ranking() {
        let (handle, mut rx) = start(Arc::new(movie_night()), RankingView::default()).await;
        assert_eq!(
            next(&mut rx).await,
            Seen::Ranking {
                generation: 1,
                leader: "n3".into()
            }
        );
        assert_eq!(handle.latest().unwrap().generation, 1);
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_recomputes_on_vote_change() {
        let store = Arc::new(movie_night());
        let (handle, mut rx) = start(store.clone(), RankingView::default()).await;
        next(&mut rx).await;

        for voter in ["u1", "u2", "u3"] {
            store.push_vote("e1", Vote::new("n4", voter, Reaction::Superlike));
        }

        // changes may be coalesced; wait for n4 to take the lead
        loop {
            match next(&mut rx).await {
                Seen::Ranking { leader, .. } if leader == "n4" => break,
                Seen::Ranking { .. } => continue,
                Seen::Failed => panic!("refresh failed"),
            }
        }
        assert!(handle.latest().unwrap().generation >= 2);
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_recomputes_on_view_toggle() {
        let (handle, mut rx) = start(Arc::new(movie_night()), RankingView::default()).await;
        next(&mut rx).await;

        assert!(handle.set_view(RankingView::new(ScoringMethod::Approval, true)));
        match next(&mut rx).await {
            Seen::Ranking { generation, .. } => assert_eq!(generation, 2),
            Seen::Failed => panic!("refresh failed"),
        }
        let latest = handle.latest().unwrap();
        assert_eq!(latest.scoring, ScoringMethod::Approval);
        assert!(latest.entries.iter().all(|e| e.tally.dislike_count == 0));
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_ranking() {
        let store = Arc::new(movie_night());
        let (handle, mut rx) = start(store.clone(), RankingView::default()).await;
        next(&mut rx).await;

        store.set_failing(true);
        store.push_vote("e1", Vote::new("n4", "u1", Reaction::Like));
        assert_eq!(next(&mut rx).await, Seen::Failed);

        let latest = handle.latest().unwrap();
        assert_eq!(latest.generation, 1);
        assert_eq!(latest.entries[0].nomination.id.as_str(), "n3");
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_cancellation_stops_task() {
        let store = Arc::new(movie_night());
        let cancel = CancellationToken::new();
        let handle = LiveRankingSync::new(store)
            .start(EventId::new("e1"), RankingView::default(), cancel.clone())
            .await
            .unwrap();
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle.join())
            .await
            .expect("task did not stop");
    }

    #[tokio::test]
    async fn test_feed_close_ends_task() {
        let store = Arc::new(movie_night());
        let (handle, mut rx) = start(store.clone(), RankingView::default()).await;
        next(&mut rx).await;
        store.close_feed();
        tokio::time::timeout(Duration::from_secs(2), handle.join())
            .await
            .expect("task did not stop");
    }
}
