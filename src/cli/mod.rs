pub mod classify;
pub mod search;
pub mod stats;

pub use classify::classify;
pub use search::search;
pub use stats::stats;
