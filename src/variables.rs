//! Binary decision variables and their enumeration order.
//!
//! Two kinds of variables span the QUBO:
//!
//! - `x_{j,s,d}` ([`Variable::Departure`]): train `j` leaves station `s`
//!   with secondary delay `d`. One-hot per (train, station).
//! - `z_{j,j',s,d,d'}` ([`Variable::TrackPair`]): auxiliary product
//!   variable linearizing the cubic shared-track occupancy term for a pair
//!   of trains at a station, via the Rosenberg decomposition.
//!
//! [`VariableIndex`] fixes the matrix order once per instance: all
//! departure variables first (train declaration order, then path order,
//! then delay ascending), auxiliaries after (shared-track group declaration
//! order, then in-group pair order, then delay pairs). The order is fully
//! determined by the instance declaration, so matrices built from the same
//! instance are comparable cell by cell.

use std::collections::HashMap;

use crate::models::{StationId, TrainId, TrainSets};

/// A binary decision variable of the QUBO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variable {
    /// `x_{j,s,d}`: `train` departs `station` with secondary delay `delay`.
    Departure {
        train: TrainId,
        station: StationId,
        delay: u32,
    },
    /// `z_{j,j',s,d,d'}`: product of the two departure variables
    /// `x_{train,station,delay}` and `x_{train2,station,delay2}`.
    TrackPair {
        train: TrainId,
        train2: TrainId,
        station: StationId,
        delay: u32,
        delay2: u32,
    },
}

impl Variable {
    /// The (first) train of the variable.
    pub fn train(&self) -> &str {
        match self {
            Variable::Departure { train, .. } => train,
            Variable::TrackPair { train, .. } => train,
        }
    }

    /// The station of the variable.
    pub fn station(&self) -> &str {
        match self {
            Variable::Departure { station, .. } => station,
            Variable::TrackPair { station, .. } => station,
        }
    }
}

/// The ordered variable list of one instance.
#[derive(Debug, Clone)]
pub struct VariableIndex {
    variables: Vec<Variable>,
    departure_count: usize,
    positions: HashMap<(TrainId, StationId, u32), usize>,
}

impl VariableIndex {
    /// Enumerates all variables of the instance for delays `0..=max_delay`.
    ///
    /// Departures come first, in train declaration order, path order and
    /// delay order; stations a train skips generate no variables.
    /// Auxiliary track-pair variables follow, one block per unordered train
    /// pair of each shared-track group, omitting pairs served by the same
    /// rolling stock (their occupancy exclusion is void).
    pub fn new(train_sets: &TrainSets, max_delay: u32) -> Self {
        let mut variables = Vec::new();
        let mut positions = HashMap::new();

        for train in &train_sets.trains {
            for station in train_sets.path(train) {
                if train_sets.skips_station(train, station) {
                    continue;
                }
                for delay in 0..=max_delay {
                    positions.insert((train.clone(), station.clone(), delay), variables.len());
                    variables.push(Variable::Departure {
                        train: train.clone(),
                        station: station.clone(),
                        delay,
                    });
                }
            }
        }
        let departure_count = variables.len();

        for group in &train_sets.shared_track_groups {
            for (i, train) in group.trains.iter().enumerate() {
                for train2 in &group.trains[i + 1..] {
                    if train_sets.same_rolling_stock(train, train2) {
                        continue;
                    }
                    for delay in 0..=max_delay {
                        for delay2 in 0..=max_delay {
                            variables.push(Variable::TrackPair {
                                train: train.clone(),
                                train2: train2.clone(),
                                station: group.station.clone(),
                                delay,
                                delay2,
                            });
                        }
                    }
                }
            }
        }

        Self {
            variables,
            departure_count,
            positions,
        }
    }

    /// Total number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the instance generates no variables at all.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Number of leading departure variables.
    pub fn departure_count(&self) -> usize {
        self.departure_count
    }

    /// Number of trailing auxiliary track-pair variables.
    pub fn auxiliary_count(&self) -> usize {
        self.variables.len() - self.departure_count
    }

    /// All variables in matrix order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The variable at matrix position `k`.
    pub fn get(&self, k: usize) -> &Variable {
        &self.variables[k]
    }

    /// Matrix position of the departure variable `x_{train,station,delay}`,
    /// if it exists.
    pub fn position_of(&self, train: &str, station: &str, delay: u32) -> Option<usize> {
        self.positions
            .get(&(train.to_owned(), station.to_owned(), delay))
            .copied()
    }
}
