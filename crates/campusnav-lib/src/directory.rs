//! Campus access points and inter-campus connectors.
//!
//! The integrated router needs to know where each building can be left or
//! entered and which buildings are joined by an underground connector. This
//! is described by `campuses.json` at the data root:
//!
//! ```json
//! {
//!   "campuses": {
//!     "hall": {
//!       "exits": [{"id": "h1_exit_main", "location": {"lat": 45.4972, "lng": -73.579}}],
//!       "entrances": [{"id": "h1_entrance_main", "location": {"lat": 45.4972, "lng": -73.579}}]
//!     }
//!   },
//!   "connectors": [
//!     {"from_campus": "hall", "from_node": "h1_tunnel", "to_campus": "mb", "to_node": "mbs2_tunnel"}
//!   ]
//! }
//! ```
//!
//! When the file is absent the built-in directory for the `hall` and `mb`
//! campuses is used.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::LatLng;
use crate::store::CampusGraphStore;

/// File name of the campus directory under the data root.
pub const CAMPUS_DIRECTORY_FILE: &str = "campuses.json";

/// A node where a building meets the street.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPoint {
    pub id: String,
    pub location: LatLng,
}

impl AccessPoint {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            location: LatLng::new(lat, lng),
        }
    }
}

/// Exits and entrances of one campus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampusAccess {
    #[serde(default)]
    pub exits: Vec<AccessPoint>,
    #[serde(default)]
    pub entrances: Vec<AccessPoint>,
}

/// A physical indoor link between two campuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub from_campus: String,
    pub from_node: String,
    pub to_campus: String,
    pub to_node: String,
    /// Tunnel length in metres; the configured tunnel distance applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Connector {
    /// This connector oriented to run from `from` to `to`, if it joins them.
    fn oriented(&self, from: &str, to: &str) -> Option<Connector> {
        if self.from_campus == from && self.to_campus == to {
            Some(self.clone())
        } else if self.from_campus == to && self.to_campus == from {
            Some(Connector {
                from_campus: self.to_campus.clone(),
                from_node: self.to_node.clone(),
                to_campus: self.from_campus.clone(),
                to_node: self.from_node.clone(),
                distance: self.distance,
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampusDirectory {
    #[serde(default)]
    campuses: BTreeMap<String, CampusAccess>,
    #[serde(default)]
    connectors: Vec<Connector>,
}

impl Default for CampusDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CampusDirectory {
    /// A directory with no campuses and no connectors.
    pub fn empty() -> Self {
        Self {
            campuses: BTreeMap::new(),
            connectors: Vec::new(),
        }
    }

    /// Access points of the Hall and John Molson buildings and the tunnel between them.
    pub fn builtin() -> Self {
        let mut campuses = BTreeMap::new();
        campuses.insert(
            "hall".to_string(),
            CampusAccess {
                exits: vec![
                    AccessPoint::new("h1_exit_main", 45.4972, -73.5790),
                    AccessPoint::new("h1_exit_side", 45.4975, -73.5785),
                ],
                entrances: vec![
                    AccessPoint::new("h1_entrance_main", 45.4972, -73.5790),
                    AccessPoint::new("h1_entrance_side", 45.4975, -73.5785),
                ],
            },
        );
        campuses.insert(
            "mb".to_string(),
            CampusAccess {
                exits: vec![
                    AccessPoint::new("mb1_exit_main", 45.4950, -73.5780),
                    AccessPoint::new("mb1_exit_side", 45.4955, -73.5775),
                ],
                entrances: vec![
                    AccessPoint::new("mb1_entrance_main", 45.4950, -73.5780),
                    AccessPoint::new("mb1_entrance_side", 45.4955, -73.5775),
                ],
            },
        );
        Self {
            campuses,
            connectors: vec![Connector {
                from_campus: "hall".to_string(),
                from_node: "h1_tunnel".to_string(),
                to_campus: "mb".to_string(),
                to_node: "mbs2_tunnel".to_string(),
                distance: None,
            }],
        }
    }

    /// Read `campuses.json` from the data root, or fall back to [`CampusDirectory::builtin`].
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CAMPUS_DIRECTORY_FILE);
        if !path.is_file() {
            debug!(path = %path.display(), "no campus directory file; using built-in directory");
            return Ok(Self::builtin());
        }
        let raw = fs::read_to_string(&path)?;
        let directory: CampusDirectory =
            serde_json::from_str(&raw).map_err(|err| Error::InvalidGraphData {
                path: path.clone(),
                message: err.to_string(),
            })?;
        debug!(
            path = %path.display(),
            campuses = directory.campuses.len(),
            connectors = directory.connectors.len(),
            "campus directory loaded"
        );
        Ok(directory)
    }

    pub fn with_campus(mut self, name: impl Into<String>, access: CampusAccess) -> Self {
        self.campuses.insert(name.into(), access);
        self
    }

    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connectors.push(connector);
        self
    }

    pub fn campus_names(&self) -> impl Iterator<Item = &str> {
        self.campuses.keys().map(String::as_str)
    }

    pub fn access(&self, campus: &str) -> Option<&CampusAccess> {
        self.campuses.get(campus)
    }

    pub fn exits(&self, campus: &str) -> &[AccessPoint] {
        self.campuses
            .get(campus)
            .map(|access| access.exits.as_slice())
            .unwrap_or_default()
    }

    pub fn entrances(&self, campus: &str) -> &[AccessPoint] {
        self.campuses
            .get(campus)
            .map(|access| access.entrances.as_slice())
            .unwrap_or_default()
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// The first connector joining the two campuses, oriented `from` → `to`.
    pub fn connector_between(&self, from: &str, to: &str) -> Option<Connector> {
        self.connectors
            .iter()
            .find_map(|connector| connector.oriented(from, to))
    }

    /// A representative street coordinate for a campus: its first exit, else
    /// its first entrance.
    pub fn reference_point(&self, campus: &str) -> Option<LatLng> {
        let access = self.campuses.get(campus)?;
        access
            .exits
            .first()
            .or_else(|| access.entrances.first())
            .map(|point| point.location)
    }

    /// Warn about access points and connectors naming nodes the loaded graphs
    /// do not contain. Returns the number of dangling references.
    pub fn check_against(&self, store: &CampusGraphStore) -> usize {
        let mut dangling = 0;
        let mut check = |campus: &str, node: &str, role: &str| {
            let known = store
                .campus(campus)
                .map(|entry| entry.graph().contains(node))
                .unwrap_or(false);
            if !known {
                warn!(campus, node, role, "campus directory references an unknown node");
                dangling += 1;
            }
        };
        for (campus, access) in &self.campuses {
            for point in &access.exits {
                check(campus, &point.id, "exit");
            }
            for point in &access.entrances {
                check(campus, &point.id, "entrance");
            }
        }
        for connector in &self.connectors {
            check(&connector.from_campus, &connector.from_node, "connector");
            check(&connector.to_campus, &connector.to_node, "connector");
        }
        dangling
    }
}
