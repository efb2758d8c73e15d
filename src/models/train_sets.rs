//! Train-set topology model.
//!
//! Describes which trains run where, and which pairs of train movements
//! compete for shared infrastructure:
//!
//! - **Common line groups**: trains following each other on the same directed
//!   line segment (minimum headway applies).
//! - **Single-track pairs**: trains traversing the same physical single track
//!   in opposite directions (meet/overtake deadlock avoidance applies).
//! - **Circulations**: rolling-stock continuations — one train terminates and
//!   its stock immediately departs as another train.
//! - **Shared-track groups**: trains using the same platform/track at a
//!   station (mutual-exclusion occupancy applies).
//! - **Switch groups**: pairs of train movements crossing the same physical
//!   switch while entering or leaving a station.
//!
//! Group tables are vectors of small named structs rather than nested maps:
//! declaration order is meaningful (it drives auxiliary-variable enumeration)
//! and membership queries are linear scans over what are, in practice, short
//! lists.
//!
//! # Reference
//! Domino, Koniorczyk, Krawiec, Jałowiecki & Gardas (2021),
//! "Quantum annealing in the NISQ era: railway conflict management",
//! arXiv:2107.03234

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Train identifier.
pub type TrainId = String;
/// Station identifier.
pub type StationId = String;

/// Role of a train movement at a shared switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchRole {
    /// The train crosses the switch while arriving at the station.
    Arriving,
    /// The train crosses the switch while leaving the station.
    Leaving,
}

/// One train's use of a shared switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchUse {
    pub train: TrainId,
    pub role: SwitchRole,
}

/// A pair of train movements crossing the same physical switch at a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchGroup {
    pub station: StationId,
    pub uses: [SwitchUse; 2],
}

/// Trains sharing a directed line segment `from` → `to` on one track.
///
/// Any two distinct trains of the group must keep the minimum headway
/// between their departures, in either running order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonLineGroup {
    pub from: StationId,
    pub to: StationId,
    pub trains: Vec<TrainId>,
}

/// An ordered pair of trains traversing the same physical single track in
/// opposite directions: `first` runs `from` → `to`, `second` runs `to` → `from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleTrackPair {
    pub from: StationId,
    pub to: StationId,
    pub first: TrainId,
    pub second: TrainId,
}

/// A rolling-stock continuation: `arriving` terminates at `station` and its
/// stock immediately departs as `departing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circulation {
    pub station: StationId,
    pub arriving: TrainId,
    pub departing: TrainId,
}

/// Trains sharing one physical platform/track at a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedTrackGroup {
    pub station: StationId,
    pub trains: Vec<TrainId>,
}

/// Static topology of a rescheduling instance.
///
/// `trains` fixes the declaration order used for variable enumeration;
/// `paths` gives the ordered station sequence of each train. The group
/// tables register which pairs of movements are coupled by a feasibility
/// rule; movements not registered anywhere are unconstrained against each
/// other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainSets {
    /// All trains, in declaration order.
    pub trains: Vec<TrainId>,
    /// Ordered station sequence per train.
    pub paths: HashMap<TrainId, Vec<StationId>>,
    /// Trains sharing a directed line segment (headway ordering).
    #[serde(default)]
    pub common_line_groups: Vec<CommonLineGroup>,
    /// Opposite-direction pairs on single-track segments.
    #[serde(default)]
    pub single_track_pairs: Vec<SingleTrackPair>,
    /// Rolling-stock continuations.
    #[serde(default)]
    pub circulations: Vec<Circulation>,
    /// Station tracks shared by several trains.
    #[serde(default)]
    pub shared_track_groups: Vec<SharedTrackGroup>,
    /// Pairs of movements crossing the same switch.
    #[serde(default)]
    pub switch_groups: Vec<SwitchGroup>,
    /// Stations where a train's departure is not physically meaningful;
    /// no variables or constraints are generated for these pairs.
    #[serde(default)]
    pub skipped_stations: HashMap<TrainId, StationId>,
    /// Stations where an extra switch-clearance margin is subtracted from
    /// the approach time in the shared-track occupancy rule.
    #[serde(default)]
    pub switch_margin_stations: Vec<StationId>,
}

impl TrainSets {
    /// The ordered station sequence of `train`.
    ///
    /// # Panics
    /// Panics if the train has no registered path; `validate_instance`
    /// reports this as a configuration error beforehand.
    pub fn path(&self, train: &str) -> &[StationId] {
        self.paths
            .get(train)
            .map(|p| p.as_slice())
            .unwrap_or_else(|| panic!("train '{train}' has no registered path"))
    }

    fn path_position(&self, train: &str, station: &str) -> usize {
        self.path(train)
            .iter()
            .position(|s| s == station)
            .unwrap_or_else(|| {
                panic!("station '{station}' is not on the path of train '{train}'")
            })
    }

    /// The station preceding `station` on the path of `train`, if any.
    ///
    /// # Panics
    /// Panics if `station` is not on the train's path.
    pub fn previous_station(&self, train: &str, station: &str) -> Option<&str> {
        match self.path_position(train, station) {
            0 => None,
            k => Some(self.path(train)[k - 1].as_str()),
        }
    }

    /// The station following `station` on the path of `train`, if any.
    ///
    /// # Panics
    /// Panics if `station` is not on the train's path.
    pub fn subsequent_station(&self, train: &str, station: &str) -> Option<&str> {
        let path = self.path(train);
        match self.path_position(train, station) {
            k if k == path.len() - 1 => None,
            k => Some(path[k + 1].as_str()),
        }
    }

    /// Whether variable generation is suppressed for `train` at `station`.
    pub fn skips_station(&self, train: &str, station: &str) -> bool {
        self.skipped_stations.get(train).map(|s| s.as_str()) == Some(station)
    }

    /// Whether the switch-clearance margin applies to the shared-track rule
    /// at `station`.
    pub fn has_switch_margin(&self, station: &str) -> bool {
        self.switch_margin_stations.iter().any(|s| s == station)
    }

    /// Whether two distinct trains share a common-line group on `from` → `to`.
    pub fn common_line_pair(&self, from: &str, to: &str, a: &str, b: &str) -> bool {
        a != b
            && self.common_line_groups.iter().any(|g| {
                g.from == from
                    && g.to == to
                    && g.trains.iter().any(|t| t == a)
                    && g.trains.iter().any(|t| t == b)
            })
    }

    /// Whether `(first, second)` is a registered opposite-direction pair on
    /// the single track `from` → `to`. The order of the pair is significant.
    pub fn single_track_pair(&self, from: &str, to: &str, first: &str, second: &str) -> bool {
        self.single_track_pairs
            .iter()
            .any(|p| p.from == from && p.to == to && p.first == first && p.second == second)
    }

    /// Whether two distinct trains share a station track at `station`.
    pub fn shared_track_pair(&self, station: &str, a: &str, b: &str) -> bool {
        a != b
            && self.shared_track_groups.iter().any(|g| {
                g.station == station
                    && g.trains.iter().any(|t| t == a)
                    && g.trains.iter().any(|t| t == b)
            })
    }

    /// Whether `arriving` hands its rolling stock over to `departing` at
    /// `station`.
    pub fn circulation_pair(&self, station: &str, arriving: &str, departing: &str) -> bool {
        self.circulations
            .iter()
            .any(|c| c.station == station && c.arriving == arriving && c.departing == departing)
    }

    /// Whether two trains are served by the same physical rolling stock.
    ///
    /// A train never shares stock with itself in the sense of this query;
    /// the pairwise exclusions it feeds only concern distinct trains.
    pub fn same_rolling_stock(&self, a: &str, b: &str) -> bool {
        a != b
            && self.circulations.iter().any(|c| {
                (c.arriving == a && c.departing == b) || (c.arriving == b && c.departing == a)
            })
    }

    /// The train whose stock `train` takes over when it starts at `station`
    /// as a continuation, if any.
    pub fn circulation_predecessor(&self, train: &str, station: &str) -> Option<&str> {
        self.circulations
            .iter()
            .find(|c| c.station == station && c.departing == train)
            .map(|c| c.arriving.as_str())
    }

    /// The station from which `train` departs before crossing the switch at
    /// `station` in the given role: the station itself when leaving, the
    /// preceding station on the train's path when arriving.
    ///
    /// # Panics
    /// Panics if `station` is not on the train's path.
    pub fn departure_station_for_switch<'a>(
        &'a self,
        station: &'a str,
        train: &str,
        role: SwitchRole,
    ) -> Option<&'a str> {
        match role {
            SwitchRole::Leaving => Some(station),
            SwitchRole::Arriving => self.previous_station(train, station),
        }
    }
}
