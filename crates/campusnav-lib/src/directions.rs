//! Turn-by-turn text for indoor paths.
//!
//! Node ids follow the `<building><floor>_<name>` convention used by the
//! campus data (`h2_209`, `h2_hw4`, `h8_elevator`). Directions are derived
//! from the ids alone, so they work for any graph that follows it.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::path::{walking_time, PathResult};

/// Vertical connectors recognised from node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    Elevator,
    Stairs,
    Escalator,
}

impl ConnectorKind {
    fn detect(id: &str) -> Option<Self> {
        let id = id.to_ascii_lowercase();
        if id.contains("elevator") {
            Some(ConnectorKind::Elevator)
        } else if id.contains("stairs") {
            Some(ConnectorKind::Stairs)
        } else if id.contains("escalator") {
            Some(ConnectorKind::Escalator)
        } else {
            None
        }
    }

    fn noun(self) -> &'static str {
        match self {
            ConnectorKind::Elevator => "elevator",
            ConnectorKind::Stairs => "stairs",
            ConnectorKind::Escalator => "escalator",
        }
    }

    fn title(self) -> &'static str {
        match self {
            ConnectorKind::Elevator => "Elevator",
            ConnectorKind::Stairs => "Stairs",
            ConnectorKind::Escalator => "Escalator",
        }
    }
}

/// Components of a node id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeName<'a> {
    /// Uppercased building code, e.g. `H` or `MB`.
    pub building: String,
    pub floor: &'a str,
    /// Last `_`-separated part of the id.
    pub room: &'a str,
    pub hallway: bool,
    pub connector: Option<ConnectorKind>,
}

impl<'a> NodeName<'a> {
    pub fn parse(id: &'a str) -> Self {
        let mut parts = id.split('_');
        let prefix = parts.next().unwrap_or_default();
        let split = prefix
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(prefix.len());
        let (building, floor) = prefix.split_at(split);
        let second = parts.next();
        let room = id.rsplit('_').next().unwrap_or(id);

        Self {
            building: building.to_ascii_uppercase(),
            floor,
            room,
            hallway: second.is_some_and(|part| part.starts_with("hw")),
            connector: ConnectorKind::detect(id),
        }
    }

    fn room_label(&self) -> String {
        format!("{}-{}", self.building, self.room)
    }
}

/// One sentence describing the move from `current` to `next`.
pub fn describe_transition(current: &NodeName<'_>, next: &NodeName<'_>) -> String {
    if let (Some(a), Some(b)) = (current.connector, next.connector) {
        if a == b {
            return format!(
                "Take the {} from floor {} to floor {}",
                a.noun(),
                current.floor,
                next.floor
            );
        }
    }

    if current.hallway && next.hallway {
        return format!("Continue through the hallway on floor {}", current.floor);
    }

    if current.hallway {
        return match next.connector {
            Some(kind) => format!("Look for the {} along the hallway", kind.noun()),
            None => format!("Look for room {} along the hallway", next.room_label()),
        };
    }

    if next.hallway {
        return match current.connector {
            Some(kind) => format!("Exit the {} and enter the hallway", kind.noun()),
            None => format!("Exit room {} and enter the hallway", current.room_label()),
        };
    }

    if let Some(kind) = current.connector {
        return format!(
            "Exit the {} and go to room {}",
            kind.noun(),
            next.room_label()
        );
    }

    format!(
        "Go from room {} to room {}",
        current.room_label(),
        next.room_label()
    )
}

/// Human-readable name of a node, e.g. `h2_209` → `H-209 (Floor 2)`.
pub fn location_label(id: &str) -> String {
    if let Some(kind) = ConnectorKind::detect(id) {
        return kind.title().to_string();
    }
    let name = NodeName::parse(id);
    if id.matches('_').count() == 1 && !name.building.is_empty() && !name.floor.is_empty() {
        format!("{} (Floor {})", name.room_label(), name.floor)
    } else {
        id.to_ascii_uppercase()
    }
}

/// Step-by-step instructions for a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Directions {
    pub from: String,
    pub to: String,
    pub steps: Vec<String>,
    pub distance: f64,
    #[serde(serialize_with = "serialize_minutes", rename = "walking_minutes")]
    pub walking_time: Duration,
}

fn serialize_minutes<S: serde::Serializer>(
    value: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64() / 60.0)
}

impl Directions {
    /// Build directions for `path`, estimating time at `walking_speed` m/s.
    pub fn for_path(path: &PathResult, walking_speed: f64) -> Self {
        let steps = path
            .path
            .windows(2)
            .map(|pair| {
                describe_transition(&NodeName::parse(&pair[0]), &NodeName::parse(&pair[1]))
            })
            .collect();
        Self {
            from: path.start().map(location_label).unwrap_or_default(),
            to: path.goal().map(location_label).unwrap_or_default(),
            steps,
            distance: path.distance,
            walking_time: walking_time(path.distance, walking_speed),
        }
    }

    pub fn walking_minutes(&self) -> f64 {
        self.walking_time.as_secs_f64() / 60.0
    }
}

impl fmt::Display for Directions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return writeln!(f, "You are already at {}.", self.to);
        }
        writeln!(f, "Here's how to get to your destination:")?;
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(f, "{}. {}", index + 1, step)?;
        }
        writeln!(
            f,
            "Total distance: {:.1} meters (about {:.1} minutes on foot)",
            self.distance,
            self.walking_minutes()
        )
    }
}
