//! View derivations.
//!
//! Pure functions turning result collections into rankings, trends,
//! counts and a renderable dashboard snapshot.

pub mod dashboard;
pub mod derive;
pub mod sparkline;

pub use dashboard::{build_dashboard, DashboardOptions};
pub use derive::*;
pub use sparkline::render_sparkline;
