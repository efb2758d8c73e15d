//! Pairwise feasibility encoders over departure variables.
//!
//! Each encoder is a pure function of two departure variables and the
//! instance, returning the unweighted contribution to the matrix cell of
//! the pair. All encoders are symmetric: swapping the two variables yields
//! the same value, so the assembler may fill `(k, l)` and `(l, k)`
//! independently.
//!
//! The encoded rules, with `t = delay + earliest departure`:
//!
//! - [`one_hot`]: exactly one delay per (train, station).
//! - [`headway`]: minimum headway between consecutive trains on a shared
//!   directed segment.
//! - [`minimal_stay`]: a train cannot recover delay by cutting its dwell
//!   below the minimum.
//! - [`single_track_line`]: opposite-direction trains cannot meet on a
//!   single track.
//! - [`rolling_stock_circulation`]: a continuation cannot depart before
//!   its stock has arrived and been turned around.
//! - [`switch_occupation`]: two movements cannot hold the same switch
//!   within the clearance time.

use crate::models::{earliest_departure, TrainSets, TrainsTiming};
use crate::variables::Variable;

/// Unpacks a departure variable.
///
/// # Panics
/// Panics when fed an auxiliary track-pair variable; pairwise encoders are
/// defined on departure variables only.
fn departure_fields(var: &Variable) -> (&str, &str, u32) {
    match var {
        Variable::Departure {
            train,
            station,
            delay,
        } => (train, station, *delay),
        Variable::TrackPair { .. } => {
            panic!("pairwise encoder expects departure variables, got an auxiliary track pair")
        }
    }
}

/// One-hot condition: each train leaves each station on its path exactly
/// once. Within one (train, station) block the diagonal gets -1 and every
/// off-diagonal pair +1, so any assignment with exactly one bit set per
/// block reaches the constraint minimum.
pub fn one_hot(a: &Variable, b: &Variable) -> f64 {
    let (j, s, d) = departure_fields(a);
    let (j1, s1, d1) = departure_fields(b);

    if j == j1 && s == s1 {
        if d == d1 {
            return -1.0;
        }
        return 1.0;
    }
    0.0
}

/// Minimal headway condition for two trains of a common-line group
/// departing the same station onto the same segment.
pub fn headway(a: &Variable, b: &Variable, sets: &TrainSets, timing: &TrainsTiming) -> f64 {
    let (j, s, d) = departure_fields(a);
    let (j1, s1, d1) = departure_fields(b);

    if s != s1 {
        return 0.0;
    }
    let Some(next) = sets.subsequent_station(j, s) else {
        return 0.0;
    };
    if sets.subsequent_station(j1, s1) != Some(next) || !sets.common_line_pair(s, next, j, j1) {
        return 0.0;
    }

    let t = f64::from(d) + earliest_departure(sets, timing, j, s);
    let t1 = f64::from(d1) + earliest_departure(sets, timing, j1, s);
    let behind = timing.headway(j1, j, s, next);
    let ahead = timing.headway(j, j1, s, next);

    if -behind < t1 - t && t1 - t < ahead {
        return 1.0;
    }
    0.0
}

/// Minimal stay condition: consecutive departures of one train must be
/// separated by at least running plus dwell time. Symmetric over both
/// orderings of the pair.
pub fn minimal_stay(a: &Variable, b: &Variable, sets: &TrainSets, timing: &TrainsTiming) -> f64 {
    minimal_stay_directed(a, b, sets, timing) + minimal_stay_directed(b, a, sets, timing)
}

fn minimal_stay_directed(
    a: &Variable,
    b: &Variable,
    sets: &TrainSets,
    timing: &TrainsTiming,
) -> f64 {
    let (j, sp, d) = departure_fields(a);
    let (j1, s, d1) = departure_fields(b);

    if j != j1 || sets.subsequent_station(j, sp) != Some(s) {
        return 0.0;
    }

    let lhs = f64::from(d1) + earliest_departure(sets, timing, j, s);
    let rhs = f64::from(d)
        + earliest_departure(sets, timing, j, sp)
        + timing.passing_time(j, sp, s)
        + timing.stop_time(j, s);

    if lhs < rhs {
        return 1.0;
    }
    0.0
}

/// Single-track meet avoidance: a registered opposite-direction pair must
/// not be on the track simultaneously. Symmetric over both orderings.
pub fn single_track_line(
    a: &Variable,
    b: &Variable,
    sets: &TrainSets,
    timing: &TrainsTiming,
) -> f64 {
    single_track_directed(a, b, sets, timing) + single_track_directed(b, a, sets, timing)
}

fn single_track_directed(
    a: &Variable,
    b: &Variable,
    sets: &TrainSets,
    timing: &TrainsTiming,
) -> f64 {
    let (j, s, d) = departure_fields(a);
    let (j1, s1, d1) = departure_fields(b);

    if sets.same_rolling_stock(j, j1) || !sets.single_track_pair(s, s1, j, j1) {
        return 0.0;
    }

    // j occupies the track from its departure at s until it reaches s1;
    // j1 entering from s1 during that span would meet it head on.
    let departure = f64::from(d) + earliest_departure(sets, timing, j, s);
    let enter = departure - timing.passing_time(j1, s1, s);
    let leave = departure + timing.passing_time(j, s, s1);
    let t1 = f64::from(d1) + earliest_departure(sets, timing, j1, s1);

    if enter < t1 && t1 < leave {
        return 1.0;
    }
    0.0
}

/// Rolling-stock readiness: the continuation train cannot depart before
/// the arriving train's stock has reached the station and been prepared.
/// Symmetric over both orderings.
pub fn rolling_stock_circulation(
    a: &Variable,
    b: &Variable,
    sets: &TrainSets,
    timing: &TrainsTiming,
) -> f64 {
    circulation_directed(a, b, sets, timing) + circulation_directed(b, a, sets, timing)
}

fn circulation_directed(
    a: &Variable,
    b: &Variable,
    sets: &TrainSets,
    timing: &TrainsTiming,
) -> f64 {
    let (j, s, d) = departure_fields(a);
    let (j1, s1, d1) = departure_fields(b);

    if !sets.path(j).iter().any(|st| st == s1) {
        return 0.0;
    }
    if sets.previous_station(j, s1) != Some(s) || !sets.circulation_pair(s1, j, j1) {
        return 0.0;
    }

    let stock_ready = f64::from(d)
        + earliest_departure(sets, timing, j, s)
        + timing.preparation_time(j1, s1)
        + timing.passing_time(j, s, s1);
    let continuation = f64::from(d1) + earliest_departure(sets, timing, j1, s1);

    if stock_ready > continuation {
        return 1.0;
    }
    0.0
}

/// Switch clearance: two movements registered on the same physical switch
/// must reach it at least the clearance time apart. Matches the switch
/// group in either train order, so the encoder is symmetric as is.
pub fn switch_occupation(
    a: &Variable,
    b: &Variable,
    sets: &TrainSets,
    timing: &TrainsTiming,
) -> f64 {
    let (jp, sp, d) = departure_fields(a);
    let (jpp, spp, d1) = departure_fields(b);

    if sets.same_rolling_stock(jp, jpp) {
        return 0.0;
    }

    for group in &sets.switch_groups {
        let [u0, u1] = &group.uses;
        let (use_p, use_pp) = if u0.train == jp && u1.train == jpp {
            (u0, u1)
        } else if u0.train == jpp && u1.train == jp {
            (u1, u0)
        } else {
            continue;
        };
        let s = group.station.as_str();

        if sets.departure_station_for_switch(s, jp, use_p.role) != Some(sp)
            || sets.departure_station_for_switch(s, jpp, use_pp.role) != Some(spp)
        {
            continue;
        }

        let mut t = f64::from(d) + earliest_departure(sets, timing, jp, sp);
        if s != sp {
            t += timing.passing_time(jp, sp, s);
        }
        let mut t1 = f64::from(d1) + earliest_departure(sets, timing, jpp, spp);
        if s != spp {
            t1 += timing.passing_time(jpp, spp, s);
        }

        if (t1 - t).abs() < timing.switch_clearance {
            return 1.0;
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Circulation, CommonLineGroup, SingleTrackPair, SwitchGroup, SwitchRole, SwitchUse,
    };
    use std::collections::HashMap;

    fn dep(train: &str, station: &str, delay: u32) -> Variable {
        Variable::Departure {
            train: train.into(),
            station: station.into(),
            delay,
        }
    }

    fn assert_symmetric(
        f: impl Fn(&Variable, &Variable) -> f64,
        a: &Variable,
        b: &Variable,
        expected: f64,
    ) {
        assert_eq!(f(a, b), expected);
        assert_eq!(f(b, a), expected);
    }

    #[test]
    fn test_one_hot() {
        assert_symmetric(|a, b| one_hot(a, b), &dep("0", "A", 2), &dep("0", "A", 2), -1.0);
        assert_symmetric(|a, b| one_hot(a, b), &dep("0", "A", 2), &dep("0", "A", 5), 1.0);
        assert_symmetric(|a, b| one_hot(a, b), &dep("0", "A", 2), &dep("0", "B", 2), 0.0);
        assert_symmetric(|a, b| one_hot(a, b), &dep("0", "A", 2), &dep("1", "A", 2), 0.0);
    }

    #[test]
    fn test_headway() {
        let sets = TrainSets {
            trains: vec!["0".into(), "1".into()],
            paths: HashMap::from([
                ("0".into(), vec!["A".into(), "B".into()]),
                ("1".into(), vec!["A".into(), "B".into()]),
            ]),
            common_line_groups: vec![CommonLineGroup {
                from: "A".into(),
                to: "B".into(),
                trains: vec!["0".into(), "1".into()],
            }],
            ..Default::default()
        };
        let timing = TrainsTiming::default()
            .with_passing_time("0", "A", "B", 4.0)
            .with_passing_time("1", "A", "B", 8.0)
            .with_headway("0", "1", "A", "B", 2.0)
            .with_headway("1", "0", "A", "B", 6.0)
            .with_initial_condition("0", "A", 4.0)
            .with_initial_condition("1", "A", 1.0);

        // Gap of exactly six is permitted, the window is open.
        assert_symmetric(
            |a, b| headway(a, b, &sets, &timing),
            &dep("0", "A", 3),
            &dep("1", "A", 0),
            0.0,
        );
        // Gap of five violates the six unit headway behind train 1.
        assert_symmetric(
            |a, b| headway(a, b, &sets, &timing),
            &dep("0", "A", 2),
            &dep("1", "A", 0),
            1.0,
        );
    }

    #[test]
    fn test_minimal_stay() {
        let sets = TrainSets {
            trains: vec!["0".into()],
            paths: HashMap::from([("0".into(), vec!["A".into(), "B".into()])]),
            ..Default::default()
        };
        let timing = TrainsTiming::default()
            .with_passing_time("0", "A", "B", 4.0)
            .with_stop_time("0", "B", 1.0)
            .with_initial_condition("0", "A", 4.0);

        // Delay cannot be recovered by shortening the dwell at B.
        assert_symmetric(
            |a, b| minimal_stay(a, b, &sets, &timing),
            &dep("0", "A", 2),
            &dep("0", "B", 1),
            1.0,
        );
        assert_symmetric(
            |a, b| minimal_stay(a, b, &sets, &timing),
            &dep("0", "A", 1),
            &dep("0", "B", 1),
            0.0,
        );
    }

    #[test]
    fn test_single_track_line() {
        let sets = TrainSets {
            trains: vec!["1".into(), "2".into()],
            paths: HashMap::from([
                ("1".into(), vec!["A".into(), "B".into()]),
                ("2".into(), vec!["B".into(), "A".into()]),
            ]),
            single_track_pairs: vec![SingleTrackPair {
                from: "A".into(),
                to: "B".into(),
                first: "1".into(),
                second: "2".into(),
            }],
            ..Default::default()
        };
        let timing = TrainsTiming::default()
            .with_passing_time("1", "A", "B", 8.0)
            .with_passing_time("2", "B", "A", 8.0)
            .with_initial_condition("1", "A", 1.0)
            .with_initial_condition("2", "B", 8.0);

        for (d1, d2, expected) in [(0, 0, 1.0), (6, 0, 1.0), (10, 0, 1.0)] {
            assert_symmetric(
                |a, b| single_track_line(a, b, &sets, &timing),
                &dep("1", "A", d1),
                &dep("2", "B", d2),
                expected,
            );
        }
        // Both at B: train 1 has already cleared the single track.
        assert_symmetric(
            |a, b| single_track_line(a, b, &sets, &timing),
            &dep("1", "B", 0),
            &dep("2", "B", 1),
            0.0,
        );
    }

    #[test]
    fn test_rolling_stock_circulation() {
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
            ..Default::default()
        };
        let timing = TrainsTiming::default()
            .with_passing_time("0", "A", "B", 4.0)
            .with_passing_time("1", "B", "A", 8.0)
            .with_preparation_time("1", "B", 2.0)
            .with_initial_condition("0", "A", 3.0)
            .with_initial_condition("1", "B", 1.0);

        for (d0, d1, expected) in [(0, 7, 1.0), (2, 9, 1.0), (0, 8, 0.0), (2, 10, 0.0)] {
            assert_symmetric(
                |a, b| rolling_stock_circulation(a, b, &sets, &timing),
                &dep("0", "A", d0),
                &dep("1", "B", d1),
                expected,
            );
        }
    }

    #[test]
    fn test_switch_occupation() {
        let sets = TrainSets {
            trains: vec!["1".into(), "2".into()],
            paths: HashMap::from([
                ("1".into(), vec!["A".into(), "B".into()]),
                ("2".into(), vec!["B".into(), "A".into()]),
            ]),
            switch_groups: vec![
                SwitchGroup {
                    station: "A".into(),
                    uses: [
                        SwitchUse {
                            train: "1".into(),
                            role: SwitchRole::Leaving,
                        },
                        SwitchUse {
                            train: "2".into(),
                            role: SwitchRole::Arriving,
                        },
                    ],
                },
                SwitchGroup {
                    station: "B".into(),
                    uses: [
                        SwitchUse {
                            train: "1".into(),
                            role: SwitchRole::Arriving,
                        },
                        SwitchUse {
                            train: "2".into(),
                            role: SwitchRole::Leaving,
                        },
                    ],
                },
            ],
            ..Default::default()
        };
        let timing = TrainsTiming::default()
            .with_passing_time("1", "A", "B", 8.0)
            .with_passing_time("2", "B", "A", 8.0)
            .with_switch_clearance(1.0)
            .with_initial_condition("1", "A", 1.0)
            .with_initial_condition("2", "B", 8.0);

        for (d1, d2, expected) in [(0, 0, 0.0), (0, 2, 0.0), (0, 1, 1.0), (5, 6, 1.0)] {
            assert_symmetric(
                |a, b| switch_occupation(a, b, &sets, &timing),
                &dep("1", "A", d1),
                &dep("2", "B", d2),
                expected,
            );
        }
    }

    #[test]
    #[should_panic(expected = "expects departure variables")]
    fn test_auxiliary_variable_rejected() {
        let z = Variable::TrackPair {
            train: "0".into(),
            train2: "1".into(),
            station: "B".into(),
            delay: 0,
            delay2: 0,
        };
        one_hot(&dep("0", "A", 0), &z);
    }
}
