use crate::models::direction::Direction;
use crate::models::event::RoundEvent;
use serde::Serialize;
use std::collections::BTreeMap;

/// technique → (from position, to position). A fixed table, nothing is
/// inferred from the logged position.
const TRANSITIONS: &[(&str, &str, &str)] = &[
    // sweeps
    ("scissor sweep", "Closed guard", "Mount"),
    ("hip bump", "Closed guard", "Mount"),
    ("flower sweep", "Closed guard", "Mount"),
    ("butterfly sweep", "Butterfly guard", "Side control"),
    ("x-guard sweep", "Open guard", "Side control"),
    ("tripod sweep", "Open guard", "Standing"),
    ("berimbolo", "De la Riva", "Back"),
    ("old school sweep", "Half guard", "Side control"),
    // passes
    ("toreando", "Open guard", "Side control"),
    ("knee slice", "Half guard", "Side control"),
    ("over-under", "Open guard", "Side control"),
    ("leg drag", "Open guard", "Side control"),
    ("stack pass", "Closed guard", "Side control"),
    ("smash pass", "Half guard", "Side control"),
    // takedowns
    ("double leg", "Standing", "Side control"),
    ("single leg", "Standing", "Side control"),
    ("osoto gari", "Standing", "Side control"),
    ("uchi mata", "Standing", "Side control"),
    ("seoi nage", "Standing", "Side control"),
    ("ankle pick", "Standing", "Side control"),
    ("guard pull", "Standing", "Closed guard"),
    // escapes
    ("bridge and roll", "Mount", "Closed guard"),
    ("elbow-knee escape", "Mount", "Half guard"),
    ("back escape", "Back", "Closed guard"),
    ("side control escape", "Side control", "Open guard"),
];

pub fn lookup(technique: &str) -> Option<(&'static str, &'static str)> {
    let t = technique.trim().to_lowercase();
    TRANSITIONS
        .iter()
        .find(|(name, _, _)| *name == t)
        .map(|(_, from, to)| (*from, *to))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEdge {
    pub from: &'static str,
    pub to: &'static str,
    pub offensive: usize,
    pub defensive: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowGraph {
    pub edges: Vec<FlowEdge>,
    /// Events whose technique has no entry in the table.
    pub unmapped: usize,
}

pub fn build_flow(events: &[RoundEvent]) -> FlowGraph {
    let mut map: BTreeMap<(&'static str, &'static str), (usize, usize)> = BTreeMap::new();
    let mut unmapped = 0;

    for e in events {
        let Some(edge) = lookup(&e.tag.technique) else {
            unmapped += 1;
            continue;
        };
        let slot = map.entry(edge).or_default();
        match e.tag.direction {
            Direction::Offensive => slot.0 += 1,
            Direction::Defensive => slot.1 += 1,
        }
    }

    let mut edges: Vec<FlowEdge> = map
        .into_iter()
        .map(|((from, to), (offensive, defensive))| FlowEdge {
            from,
            to,
            offensive,
            defensive,
        })
        .collect();
    edges.sort_by(|a, b| (b.offensive + b.defensive).cmp(&(a.offensive + a.defensive)));

    FlowGraph { edges, unmapped }
}
