use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::assessment::assess_scenario;
use crate::assessment::recommendations::ActionPriority;
use crate::assessment::scenario::PolicyScenario;

/// Phase 3 always closes this many days after the roadmap start.
pub const ROADMAP_HORIZON_DAYS: u64 = 1080;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapPhase {
    pub phase: String,
    pub tasks: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub responsible: String,
    pub budget: String,
    pub priority: ActionPriority,
}

/// Three-phase rollout starting on `start`. Pressing scenarios compress the first two phases.
pub fn generate_roadmap(scenario: &PolicyScenario, start: NaiveDate) -> Vec<RoadmapPhase> {
    let (foundation_days, scaling_days) = if assess_scenario(scenario).urgency.is_pressing() {
        (90, 270)
    } else {
        (180, 360)
    };
    let scaling_start = foundation_days + 1;
    let scaling_end = scaling_start + scaling_days;

    let day = |offset: u64| start.checked_add_days(Days::new(offset)).unwrap_or(NaiveDate::MAX);
    let tasks = |items: [&str; 3]| items.iter().map(|task| task.to_string()).collect();

    vec![
        RoadmapPhase {
            phase: "Phase 1: Foundation".to_string(),
            tasks: tasks(["Regulatory framework", "Pilot programs", "Capacity building"]),
            start,
            end: day(foundation_days),
            responsible: scenario.stakeholder.clone(),
            budget: "$5-10M".to_string(),
            priority: ActionPriority::High,
        },
        RoadmapPhase {
            phase: "Phase 2: Scaling".to_string(),
            tasks: tasks(["Infrastructure deployment", "Incentive rollout", "Grid upgrades"]),
            start: day(scaling_start),
            end: day(scaling_end),
            responsible: "Multiple stakeholders".to_string(),
            budget: "$20-50M".to_string(),
            priority: ActionPriority::Medium,
        },
        RoadmapPhase {
            phase: "Phase 3: Optimization".to_string(),
            tasks: tasks(["Smart charging", "V2G implementation", "System integration"]),
            start: day(scaling_end + 1),
            end: day(ROADMAP_HORIZON_DAYS),
            responsible: "REG + Private sector".to_string(),
            budget: "$30-70M".to_string(),
            priority: ActionPriority::Low,
        },
    ]
}
