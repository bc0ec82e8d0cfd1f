//! Selection engine: scoring, ranking, roulette and the tournament
//!
//! Everything here is pure and synchronous. Randomness is injected through
//! [`rand::Rng`], normally a [`rng::SelectionRng`].

pub mod method;
pub mod ranking;
pub mod rng;
pub mod roulette;
pub mod scoring;
pub mod tournament;
