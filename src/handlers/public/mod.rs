pub mod invite;
pub mod jobs;
pub mod leaderboard;
pub mod parties;
pub mod ranks;
