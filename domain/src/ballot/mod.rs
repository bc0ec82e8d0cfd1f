//! Ballot domain: votes, reactions and tallies

pub mod tally;
pub mod vote;
