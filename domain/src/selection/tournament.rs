//! Battle Royale tournament
//!
//! Two layers:
//!
//! - [`decide_winner`]: pure maximum over `(score, superlikes, tie_break)`
//! - [`BattleRoyale`]: a step-wise state machine whose step log replays the
//!   elimination and the finals runoff
//!
//! The machine can be dropped between any two steps; nothing is written until
//! the caller finalizes the winner.
//!
//! ```text
//! Idle ──> Eliminating ──> HeadToHead ──> Finished
//!   │                                        ^
//!   └──────────── single contender ──────────┘
//! ```

use crate::ballot::tally::{NominationTally, Tally};
use crate::core::error::SelectionError;
use crate::core::ids::NominationId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::VecDeque;

/// Runoff alternations when none are configured
pub const DEFAULT_RUNOFF_ALTERNATIONS: usize = 12;

/// Tournament score: `2×superlike + like − dislike`
pub fn battle_score(tally: &Tally) -> i64 {
    2 * i64::from(tally.superlike_count) + i64::from(tally.like_count)
        - i64::from(tally.dislike_count)
}

/// Round a configured alternation count up to an even number, minimum 2
pub fn normalize_alternations(requested: usize) -> usize {
    let even = requested + requested % 2;
    even.max(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContenderStatus {
    Active,
    Eliminated,
    Winner,
}

/// A nomination entered into the tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contender {
    pub entry: NominationTally,
    pub score: i64,
    pub superlikes: u32,
    pub tie_break: u64,
    pub status: ContenderStatus,
}

impl Contender {
    fn new(entry: NominationTally, tie_break: u64) -> Self {
        Self {
            score: battle_score(&entry.tally),
            superlikes: entry.tally.superlike_count,
            tie_break,
            status: ContenderStatus::Active,
            entry,
        }
    }

    pub fn nomination_id(&self) -> &NominationId {
        &self.entry.nomination.id
    }

    fn key(&self) -> (i64, u32, u64) {
        (self.score, self.superlikes, self.tie_break)
    }
}

/// Strict order: best first, earlier pool position breaks exact collisions
fn standing_order(contenders: &[Contender]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..contenders.len()).collect();
    order.sort_by(|&a, &b| match contenders[b].key().cmp(&contenders[a].key()) {
        Ordering::Equal => a.cmp(&b),
        other => other,
    });
    order
}

/// The contender with the greatest `(score, superlikes, tie_break)`
pub fn decide_winner(contenders: &[Contender]) -> Option<&Contender> {
    standing_order(contenders)
        .first()
        .map(|&idx| &contenders[idx])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentPhase {
    Idle,
    Eliminating,
    HeadToHead,
    Finished,
}

/// One observable transition of the tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TournamentStep {
    Eliminated {
        nomination_id: NominationId,
        /// 1-based standing of the eliminated contender
        rank: usize,
    },
    RunoffStarted {
        runner_up: NominationId,
        finalist: NominationId,
    },
    Highlighted {
        nomination_id: NominationId,
        /// 1-based
        alternation: usize,
    },
    Crowned {
        winner: NominationId,
        runner_up: Option<NominationId>,
    },
}

/// Elimination state machine
///
/// # Example
///
/// ```
/// use marquee_domain::{BattleRoyale, Nomination, NominationTally, Tally, TournamentStep};
///
/// let pool: Vec<NominationTally> = [("n1", 3), ("n2", 2), ("n3", 0)]
///     .into_iter()
///     .map(|(id, likes)| NominationTally {
///         nomination: Nomination::movie(id, "e1", id, "alice"),
///         tally: Tally::new(0, likes, 0),
///         breakdown: Default::default(),
///     })
///     .collect();
///
/// let mut battle = BattleRoyale::with_tie_breaks(pool, &[0, 0, 0]).unwrap();
/// match battle.advance() {
///     Some(TournamentStep::Eliminated { nomination_id, .. }) => assert_eq!(nomination_id.as_str(), "n3"),
///     other => panic!("unexpected step {other:?}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BattleRoyale {
    contenders: Vec<Contender>,
    order: Vec<usize>,
    queue: VecDeque<usize>,
    phase: TournamentPhase,
    alternations: usize,
    highlights: usize,
    log: Vec<TournamentStep>,
}

impl BattleRoyale {
    /// Enter a pool, drawing a fresh tie-break key per contender
    pub fn new<R>(pool: Vec<NominationTally>, rng: &mut R) -> Result<Self, SelectionError>
    where
        R: Rng + ?Sized,
    {
        let keys: Vec<u64> = pool.iter().map(|_| rng.random::<u64>()).collect();
        Self::with_tie_breaks(pool, &keys)
    }

    /// Enter a pool with explicit tie-break keys (missing keys count as 0)
    pub fn with_tie_breaks(
        pool: Vec<NominationTally>,
        tie_breaks: &[u64],
    ) -> Result<Self, SelectionError> {
        if pool.is_empty() {
            return Err(SelectionError::EmptyPool);
        }

        let contenders: Vec<Contender> = pool
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Contender::new(entry, tie_breaks.get(i).copied().unwrap_or(0)))
            .collect();
        let order = standing_order(&contenders);
        // lowest rank first, stopping above the two finalists
        let queue = order.iter().skip(2).rev().copied().collect();

        Ok(Self {
            contenders,
            order,
            queue,
            phase: TournamentPhase::Idle,
            alternations: DEFAULT_RUNOFF_ALTERNATIONS,
            highlights: 0,
            log: Vec::new(),
        })
    }

    pub fn with_alternations(mut self, alternations: usize) -> Self {
        self.alternations = normalize_alternations(alternations);
        self
    }

    pub fn phase(&self) -> TournamentPhase {
        self.phase
    }

    pub fn alternations(&self) -> usize {
        self.alternations
    }

    /// Steps emitted so far
    pub fn log(&self) -> &[TournamentStep] {
        &self.log
    }

    pub fn is_finished(&self) -> bool {
        self.phase == TournamentPhase::Finished
    }

    /// Contenders from best to worst
    pub fn standings(&self) -> impl Iterator<Item = &Contender> {
        self.order.iter().map(|&idx| &self.contenders[idx])
    }

    pub fn contenders(&self) -> &[Contender] {
        &self.contenders
    }

    /// The crowned contender, once finished
    pub fn winner(&self) -> Option<&Contender> {
        self.contenders
            .iter()
            .find(|c| c.status == ContenderStatus::Winner)
    }

    fn finalist(&self) -> usize {
        self.order[0]
    }

    fn runner_up(&self) -> Option<usize> {
        self.order.get(1).copied()
    }

    fn id_of(&self, idx: usize) -> NominationId {
        self.contenders[idx].nomination_id().clone()
    }

    /// Emit the next step, or `None` once finished
    pub fn advance(&mut self) -> Option<TournamentStep> {
        let step = match self.phase {
            TournamentPhase::Finished => return None,
            TournamentPhase::Idle => match self.runner_up() {
                None => self.crown(),
                Some(_) => {
                    self.phase = TournamentPhase::Eliminating;
                    self.eliminate_next()
                }
            },
            TournamentPhase::Eliminating => self.eliminate_next(),
            TournamentPhase::HeadToHead => {
                if self.highlights < self.alternations {
                    self.highlight_next()
                } else {
                    self.crown()
                }
            }
        };
        self.log.push(step.clone());
        Some(step)
    }

    fn eliminate_next(&mut self) -> TournamentStep {
        match self.queue.pop_front() {
            Some(idx) => {
                self.contenders[idx].status = ContenderStatus::Eliminated;
                let rank = self.order.iter().position(|&o| o == idx).unwrap_or(0) + 1;
                TournamentStep::Eliminated {
                    nomination_id: self.id_of(idx),
                    rank,
                }
            }
            None => {
                self.phase = TournamentPhase::HeadToHead;
                let runner_up = self.runner_up().unwrap_or(self.finalist());
                TournamentStep::RunoffStarted {
                    runner_up: self.id_of(runner_up),
                    finalist: self.id_of(self.finalist()),
                }
            }
        }
    }

    fn highlight_next(&mut self) -> TournamentStep {
        let idx = if self.highlights % 2 == 0 {
            self.runner_up().unwrap_or(self.finalist())
        } else {
            self.finalist()
        };
        self.highlights += 1;
        TournamentStep::Highlighted {
            nomination_id: self.id_of(idx),
            alternation: self.highlights,
        }
    }

    fn crown(&mut self) -> TournamentStep {
        let winner = self.finalist();
        let runner_up = self.runner_up();
        if let Some(idx) = runner_up {
            self.contenders[idx].status = ContenderStatus::Eliminated;
        }
        self.contenders[winner].status = ContenderStatus::Winner;
        self.phase = TournamentPhase::Finished;
        TournamentStep::Crowned {
            winner: self.id_of(winner),
            runner_up: runner_up.map(|idx| self.id_of(idx)),
        }
    }

    /// Drive to completion
    pub fn run_to_end(mut self) -> TournamentOutcome {
        while self.advance().is_some() {}
        let winner_idx = self.finalist();
        let runner_up = self.runner_up().map(|idx| self.contenders[idx].entry.clone());
        TournamentOutcome {
            winner: self.contenders[winner_idx].entry.clone(),
            runner_up,
            standings: self.standings().cloned().collect(),
            steps: self.log,
        }
    }
}

/// A finished tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentOutcome {
    pub steps: Vec<TournamentStep>,
    pub winner: NominationTally,
    pub runner_up: Option<NominationTally>,
    /// Final standings, best first
    pub standings: Vec<Contender>,
}

impl TournamentOutcome {
    pub fn elimination_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, TournamentStep::Eliminated { .. }))
            .count()
    }

    pub fn runoffs(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, TournamentStep::RunoffStarted { .. }))
            .count()
    }
}

/// Run a full tournament over a pool
pub fn run_tournament<R>(
    pool: Vec<NominationTally>,
    rng: &mut R,
    alternations: usize,
) -> Result<TournamentOutcome, SelectionError>
where
    R: Rng + ?Sized,
{
    Ok(BattleRoyale::new(pool, rng)?
        .with_alternations(alternations)
        .run_to_end())
}
