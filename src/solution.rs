//! Decoding optimizer output back into a timetable.

use serde::{Deserialize, Serialize};

use crate::models::{earliest_departure, StationId, TrainId, TrainSets, TrainsTiming};
use crate::variables::{Variable, VariableIndex};

/// One realized departure recovered from an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedDeparture {
    pub train: TrainId,
    pub station: StationId,
    /// Chosen secondary delay.
    pub delay: u32,
    /// Realized departure time: earliest departure plus the chosen delay.
    pub departure_time: f64,
}

/// Reads the set departure variables of an assignment.
///
/// Accepts {0, 1} or {-1, 1} vectors; an entry counts as set when its
/// binary value rounds to one. Auxiliary positions are ignored, they
/// carry no schedule information of their own. An infeasible assignment
/// decodes as is: a one-hot violation simply yields zero or several
/// entries for the affected (train, station).
///
/// # Panics
/// Panics if the assignment length differs from the variable count.
pub fn decode_assignment(
    index: &VariableIndex,
    assignment: &[f64],
    sets: &TrainSets,
    timing: &TrainsTiming,
) -> Vec<DecodedDeparture> {
    assert_eq!(
        assignment.len(),
        index.len(),
        "assignment length {} does not match variable count {}",
        assignment.len(),
        index.len()
    );

    let spins = assignment.iter().any(|&v| v < 0.0);
    let bit = |v: f64| if spins { (v + 1.0) / 2.0 } else { v };

    let mut departures = Vec::new();
    for (k, &value) in assignment[..index.departure_count()].iter().enumerate() {
        if bit(value) < 0.5 {
            continue;
        }
        let Variable::Departure {
            train,
            station,
            delay,
        } = index.get(k)
        else {
            unreachable!("leading positions hold departure variables")
        };
        let departure_time =
            earliest_departure(sets, timing, train, station) + f64::from(*delay);
        departures.push(DecodedDeparture {
            train: train.clone(),
            station: station.clone(),
            delay: *delay,
            departure_time,
        });
    }
    departures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Circulation;
    use std::collections::HashMap;

    fn circulation_instance() -> (TrainSets, TrainsTiming) {
        let sets = TrainSets {
            trains: vec!["0".into(), "1".into()],
            paths: HashMap::from([
                ("0".into(), vec!["A".into(), "B".into()]),
                ("1".into(), vec!["B".into(), "A".into()]),
            ]),
            circulations: vec![Circulation {
                station: "B".into(),
                arriving: "0".into(),
                departing: "1".into(),
            }],
            skipped_stations: HashMap::from([
                ("0".into(), "B".into()),
                ("1".into(), "A".into()),
            ]),
            ..Default::default()
        };
        let timing = TrainsTiming::default()
            .with_passing_time("0", "A", "B", 4.0)
            .with_passing_time("1", "B", "A", 8.0)
            .with_preparation_time("1", "B", 2.0)
            .with_initial_condition("0", "A", 3.0)
            .with_initial_condition("1", "B", 1.0);
        (sets, timing)
    }

    #[test]
    fn test_decode_spin_assignment() {
        let (sets, timing) = circulation_instance();
        let index = VariableIndex::new(&sets, 10);

        let mut spins = vec![-1.0; index.len()];
        spins[0] = 1.0;
        spins[19] = 1.0;
        let decoded = decode_assignment(&index, &spins, &sets, &timing);

        assert_eq!(
            decoded,
            vec![
                DecodedDeparture {
                    train: "0".into(),
                    station: "A".into(),
                    delay: 0,
                    departure_time: 3.0,
                },
                DecodedDeparture {
                    train: "1".into(),
                    station: "B".into(),
                    delay: 8,
                    departure_time: 9.0,
                },
            ]
        );
    }

    #[test]
    fn test_decode_binary_assignment() {
        let (sets, timing) = circulation_instance();
        let index = VariableIndex::new(&sets, 10);

        let mut bits = vec![0.0; index.len()];
        bits[index.position_of("0", "A", 2).unwrap()] = 1.0;
        let decoded = decode_assignment(&index, &bits, &sets, &timing);

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].delay, 2);
        assert_eq!(decoded[0].departure_time, 5.0);
    }
}
