mod analytics;
mod common;
mod match_detail;
mod player;
mod team;

pub use analytics::*;
pub use common::*;
pub use match_detail::*;
pub use player::*;
pub use team::*;
