//! Progress display: live leaderboard and draw replays

pub mod replay;
pub mod reporter;
