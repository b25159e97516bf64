//! Ordered rule table that rates cycling infrastructure from street tags

use crate::model::{
    Suitability, Tags,
    tags::{BICYCLE, CYCLEWAY_KEYS, HIGHWAY},
};

/// A single classification rule. Rules are evaluated in table order and the
/// first match decides the level.
#[derive(Debug, Clone, Copy)]
pub struct SuitabilityRule {
    pub name: &'static str,
    pub level: Suitability,
    pub matches: fn(&Tags) -> bool,
}

const TRACK_VALUES: [&str; 2] = ["track", "opposite_track"];
const LOW_TRAFFIC_HIGHWAYS: [&str; 2] = ["residential", "living_street"];
const LANE_VALUES: [&str; 6] = [
    "lane",
    "opposite_lane",
    "shared_lane",
    "share_busway",
    "shared_busway",
    "opposite_share_busway",
];
const FOOTWAY_HIGHWAYS: [&str; 3] = ["footway", "path", "pedestrian"];
const BICYCLE_ALLOWED: [&str; 2] = ["designated", "yes"];

pub static SUITABILITY_RULES: [SuitabilityRule; 4] = [
    SuitabilityRule {
        name: "cycle_track",
        level: Suitability::Good,
        matches: is_cycle_track,
    },
    SuitabilityRule {
        name: "low_traffic_road",
        level: Suitability::Medium,
        matches: is_low_traffic_road,
    },
    SuitabilityRule {
        name: "marked_bike_lane",
        level: Suitability::Medium,
        matches: has_bike_lane,
    },
    SuitabilityRule {
        name: "footway_with_bicycle_access",
        level: Suitability::Medium,
        matches: is_cyclable_footway,
    },
];

fn is_cycle_track(tags: &Tags) -> bool {
    tags.is_one_of(HIGHWAY, &["cycleway"]) || tags.any_is_one_of(&CYCLEWAY_KEYS, &TRACK_VALUES)
}

fn is_low_traffic_road(tags: &Tags) -> bool {
    tags.is_one_of(HIGHWAY, &LOW_TRAFFIC_HIGHWAYS)
}

fn has_bike_lane(tags: &Tags) -> bool {
    tags.any_is_one_of(&CYCLEWAY_KEYS, &LANE_VALUES)
}

fn is_cyclable_footway(tags: &Tags) -> bool {
    tags.is_one_of(HIGHWAY, &FOOTWAY_HIGHWAYS) && tags.is_one_of(BICYCLE, &BICYCLE_ALLOWED)
}

/// First rule matching `tags`, `None` when the segment falls through to `low`
pub fn matching_rule(tags: &Tags) -> Option<&'static SuitabilityRule> {
    SUITABILITY_RULES.iter().find(|rule| (rule.matches)(tags))
}

pub fn classify(tags: &Tags) -> Suitability {
    matching_rule(tags).map_or(Suitability::Low, |rule| rule.level)
}
