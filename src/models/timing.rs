//! Timing constants and the timing model.
//!
//! [`TrainsTiming`] holds the static time spans of an instance, keyed by
//! composite train/station tuples:
//!
//! | Table | Meaning |
//! |-------|---------|
//! | `passing_times` | τ_pass(j, s, s′): running time of j from s to s′ |
//! | `headways` | τ_headway(j, j′, s, s′): minimum gap behind j for j′ |
//! | `stop_times` | τ_stop(j, s): minimum dwell of j at s |
//! | `preparation_times` | τ_prep(j, s): stock turnaround before j departs s |
//! | `switch_clearance` | τ_res: global switch occupation time |
//! | `initial_conditions` | unavoidable earliest departure of j from s |
//! | `schedule` | hard timetable floor (optional per pair) |
//! | `penalty_weights` | soft weight for delay beyond the unavoidable minimum |
//!
//! [`earliest_departure`] combines these into the earliest feasible
//! departure of a train from a station given the fixed input delays; it is
//! a pure function of the static tables and may be memoized freely.
//!
//! # Reference
//! arXiv:2107.03234, Sec. 2 (timetable and delay model)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::train_sets::{StationId, TrainId, TrainSets};

/// Static timing constants of a rescheduling instance.
///
/// Lookup methods for table entries required by the topology panic when the
/// entry is absent; run `validate_instance` first to surface such gaps as
/// ordinary configuration errors. Documented defaults: a missing penalty
/// weight is 0, a missing schedule entry is an unbounded past floor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainsTiming {
    pub passing_times: HashMap<(TrainId, StationId, StationId), f64>,
    pub headways: HashMap<(TrainId, TrainId, StationId, StationId), f64>,
    pub stop_times: HashMap<(TrainId, StationId), f64>,
    pub preparation_times: HashMap<(TrainId, StationId), f64>,
    pub switch_clearance: f64,
    pub initial_conditions: HashMap<(TrainId, StationId), f64>,
    pub schedule: HashMap<(TrainId, StationId), f64>,
    pub penalty_weights: HashMap<(TrainId, StationId), f64>,
}

impl TrainsTiming {
    /// Registers the running time of `train` from `from` to `to`.
    pub fn with_passing_time(
        mut self,
        train: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        time: f64,
    ) -> Self {
        self.passing_times
            .insert((train.into(), from.into(), to.into()), time);
        self
    }

    /// Registers the minimum headway behind `first` for `second` on
    /// `from` → `to`.
    pub fn with_headway(
        mut self,
        first: impl Into<String>,
        second: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        time: f64,
    ) -> Self {
        self.headways
            .insert((first.into(), second.into(), from.into(), to.into()), time);
        self
    }

    /// Registers the minimum dwell of `train` at `station`.
    pub fn with_stop_time(
        mut self,
        train: impl Into<String>,
        station: impl Into<String>,
        time: f64,
    ) -> Self {
        self.stop_times.insert((train.into(), station.into()), time);
        self
    }

    /// Registers the stock turnaround time before `train` departs `station`.
    pub fn with_preparation_time(
        mut self,
        train: impl Into<String>,
        station: impl Into<String>,
        time: f64,
    ) -> Self {
        self.preparation_times
            .insert((train.into(), station.into()), time);
        self
    }

    /// Sets the global switch occupation time τ_res.
    pub fn with_switch_clearance(mut self, time: f64) -> Self {
        self.switch_clearance = time;
        self
    }

    /// Registers the unavoidable earliest departure of `train` from `station`.
    pub fn with_initial_condition(
        mut self,
        train: impl Into<String>,
        station: impl Into<String>,
        time: f64,
    ) -> Self {
        self.initial_conditions
            .insert((train.into(), station.into()), time);
        self
    }

    /// Registers the timetable floor for `train` at `station`.
    pub fn with_scheduled_departure(
        mut self,
        train: impl Into<String>,
        station: impl Into<String>,
        time: f64,
    ) -> Self {
        self.schedule.insert((train.into(), station.into()), time);
        self
    }

    /// Registers the soft delay penalty weight for `train` at `station`.
    pub fn with_penalty_weight(
        mut self,
        train: impl Into<String>,
        station: impl Into<String>,
        weight: f64,
    ) -> Self {
        self.penalty_weights
            .insert((train.into(), station.into()), weight);
        self
    }

    /// τ_pass(train, from, to).
    ///
    /// # Panics
    /// Panics if the combination is not registered.
    pub fn passing_time(&self, train: &str, from: &str, to: &str) -> f64 {
        *self
            .passing_times
            .get(&(train.to_owned(), from.to_owned(), to.to_owned()))
            .unwrap_or_else(|| {
                panic!("no passing time for train '{train}' on segment '{from}' -> '{to}'")
            })
    }

    /// τ_headway(first, second, from, to): the minimum gap `second` must keep
    /// behind `first` when departing onto `from` → `to`.
    ///
    /// # Panics
    /// Panics if the combination is not registered.
    pub fn headway(&self, first: &str, second: &str, from: &str, to: &str) -> f64 {
        *self
            .headways
            .get(&(
                first.to_owned(),
                second.to_owned(),
                from.to_owned(),
                to.to_owned(),
            ))
            .unwrap_or_else(|| {
                panic!("no headway for trains '{first}'/'{second}' on segment '{from}' -> '{to}'")
            })
    }

    /// τ_stop(train, station).
    ///
    /// # Panics
    /// Panics if the combination is not registered.
    pub fn stop_time(&self, train: &str, station: &str) -> f64 {
        *self
            .stop_times
            .get(&(train.to_owned(), station.to_owned()))
            .unwrap_or_else(|| panic!("no stop time for train '{train}' at station '{station}'"))
    }

    /// τ_prep(train, station).
    ///
    /// # Panics
    /// Panics if the combination is not registered.
    pub fn preparation_time(&self, train: &str, station: &str) -> f64 {
        *self
            .preparation_times
            .get(&(train.to_owned(), station.to_owned()))
            .unwrap_or_else(|| {
                panic!("no preparation time for train '{train}' at station '{station}'")
            })
    }

    /// The unavoidable earliest departure of `train` from `station`, if one
    /// is registered.
    pub fn initial_condition(&self, train: &str, station: &str) -> Option<f64> {
        self.initial_conditions
            .get(&(train.to_owned(), station.to_owned()))
            .copied()
    }

    /// The timetable floor for `train` at `station`; an unregistered pair is
    /// unbounded towards the past.
    pub fn scheduled_departure(&self, train: &str, station: &str) -> f64 {
        self.schedule
            .get(&(train.to_owned(), station.to_owned()))
            .copied()
            .unwrap_or(f64::NEG_INFINITY)
    }

    /// The soft delay penalty weight for `train` at `station`; unregistered
    /// pairs carry no penalty.
    pub fn penalty_weight(&self, train: &str, station: &str) -> f64 {
        self.penalty_weights
            .get(&(train.to_owned(), station.to_owned()))
            .copied()
            .unwrap_or(0.0)
    }
}

/// The earliest feasible departure of `train` from `station` given the fixed
/// input delays.
///
/// If an unavoidable initial condition is registered for the pair, it applies
/// directly; otherwise the departure follows recursively from the previous
/// station on the train's path plus running and dwell time. Either way the
/// timetable floor is honoured.
///
/// # Panics
/// Panics if no initial condition is reachable walking back along the path,
/// or if a required passing or stop time is missing; `validate_instance`
/// reports both as configuration errors beforehand.
pub fn earliest_departure(
    train_sets: &TrainSets,
    timing: &TrainsTiming,
    train: &str,
    station: &str,
) -> f64 {
    let floor = timing.scheduled_departure(train, station);
    if let Some(unavoidable) = timing.initial_condition(train, station) {
        return floor.max(unavoidable);
    }

    let previous = train_sets
        .previous_station(train, station)
        .unwrap_or_else(|| {
            panic!("no initial condition reachable for train '{train}' at station '{station}'")
        });
    let unavoidable = earliest_departure(train_sets, timing, train, previous)
        + timing.passing_time(train, previous, station)
        + timing.stop_time(train, station);
    floor.max(unavoidable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_timing() -> TrainsTiming {
        TrainsTiming::default()
            .with_passing_time("0", "0", "1", 5.0)
            .with_passing_time("1", "0", "1", 7.0)
            .with_passing_time("2", "1", "0", 10.0)
            .with_headway("0", "1", "0", "1", 2.0)
            .with_headway("1", "0", "0", "1", 5.0)
            .with_stop_time("0", "1", 1.0)
            .with_stop_time("1", "1", 2.0)
            .with_stop_time("2", "0", 1.0)
            .with_switch_clearance(3.0)
            .with_scheduled_departure("0", "0", -10.0)
            .with_scheduled_departure("1", "0", 0.0)
            .with_scheduled_departure("2", "1", 0.0)
            .with_scheduled_departure("0", "1", -3.0)
            .with_scheduled_departure("1", "1", 9.0)
            .with_scheduled_departure("2", "0", 11.0)
            .with_initial_condition("0", "0", 4.0)
            .with_initial_condition("1", "0", 1.0)
            .with_initial_condition("2", "1", 8.0)
            .with_penalty_weight("0", "0", 2.0)
            .with_penalty_weight("1", "0", 1.0)
            .with_penalty_weight("2", "1", 1.0)
    }

    fn sample_sets() -> TrainSets {
        TrainSets {
            trains: vec!["0".into(), "1".into(), "2".into()],
            paths: HashMap::from([
                ("0".into(), vec!["0".into(), "1".into()]),
                ("1".into(), vec!["0".into(), "1".into()]),
                ("2".into(), vec!["1".into(), "0".into()]),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_lookups() {
        let timing = sample_timing();

        assert_eq!(timing.passing_time("0", "0", "1"), 5.0);
        assert_eq!(timing.headway("1", "0", "0", "1"), 5.0);
        assert_eq!(timing.stop_time("1", "1"), 2.0);
        assert_eq!(timing.switch_clearance, 3.0);
    }

    #[test]
    fn test_penalty_weight_defaults_to_zero() {
        let timing = sample_timing();

        assert_eq!(timing.penalty_weight("1", "0"), 1.0);
        assert_eq!(timing.penalty_weight("1", "1"), 0.0);
        assert_eq!(timing.penalty_weight("2", "1"), 1.0);
    }

    #[test]
    fn test_missing_schedule_is_unbounded_past() {
        let timing = TrainsTiming::default();
        assert_eq!(timing.scheduled_departure("0", "0"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_earliest_departure() {
        let sets = sample_sets();
        let timing = sample_timing();

        // Initial conditions apply directly.
        assert_eq!(earliest_departure(&sets, &timing, "0", "0"), 4.0);
        assert_eq!(earliest_departure(&sets, &timing, "2", "1"), 8.0);

        // Recursive case: previous departure + passing + dwell.
        assert_eq!(earliest_departure(&sets, &timing, "0", "1"), 10.0);

        // The recursion dominates the schedule floor here (8 + 10 + 1 > 11).
        assert_eq!(earliest_departure(&sets, &timing, "2", "0"), 19.0);
    }

    #[test]
    fn test_schedule_floor_applies() {
        let sets = sample_sets();
        let timing = sample_timing().with_scheduled_departure("0", "1", 30.0);

        assert_eq!(earliest_departure(&sets, &timing, "0", "1"), 30.0);
    }

    #[test]
    #[should_panic(expected = "no initial condition reachable")]
    fn test_unresolvable_departure_panics() {
        let sets = sample_sets();
        let timing = TrainsTiming::default().with_passing_time("0", "0", "1", 5.0);

        earliest_departure(&sets, &timing, "0", "0");
    }
}
