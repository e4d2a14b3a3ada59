// ATS module — deterministic resume health checks.
// impact: quantified-bullet heuristics
// score: weighted completeness report

pub mod impact;
pub mod score;

pub use score::{compute_ats_report, AtsReport};
