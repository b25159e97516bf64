//! Accessibility queries and suitability scenarios

pub mod accessibility;
pub mod scenarios;

pub use accessibility::{
    AccessibilityResult, DestinationCost, SnappedDestination, SnappedPoints, TravelCost,
    accessibility_from_snapped, compute_accessibility,
};
pub use scenarios::{Scenario, ScenarioReport, run_scenario, run_scenarios};
