pub mod builder;
pub mod format;

pub use builder::{build_view, sorted_markets, DashboardView, NO_DECISION};
pub use format::Tone;
