//! devscore - GitHub developer activity scoring
//!
//! Fetches a user's public GitHub activity and scores it with weighted,
//! time-decayed heuristics. Two schemes share one aggregation core: the
//! advanced scheme (eight component scorers plus activity damping) and the
//! model scheme (four composite components).

pub mod cli;
pub mod clock;
pub mod config;
pub mod decay;
pub mod github;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
pub mod server;
pub mod stats;
