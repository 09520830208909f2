pub mod scenario;
pub mod scores;
