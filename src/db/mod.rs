pub mod curriculum;
pub mod db_utils;
pub mod events;
pub mod gyms;
pub mod initialize;
pub mod injuries;
pub mod leaderboard;
pub mod log;
pub mod members;
pub mod migrate;
pub mod pool;
pub mod rounds;
pub mod sessions;
pub mod stats;
pub mod weights;
