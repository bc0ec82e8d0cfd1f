//! Event entities: nominations, the decider roster and the final decision

pub mod decision;
pub mod nomination;
pub mod roster;
