//! Input validation for rescheduling instances.
//!
//! Checks an instance before matrix assembly. Lookup methods on the
//! timing tables panic when a required entry is absent; running
//! [`validate_instance`] first turns every such gap into an ordinary
//! configuration error. Detects:
//! - trains without (or with empty) paths
//! - constraint groups referencing unknown trains or off-path stations
//! - unresolvable earliest departures (no initial condition reachable)
//! - missing passing, stop, headway and preparation entries implied by
//!   the topology
//!
//! Documented defaults are not errors: a missing penalty weight means no
//! delay penalty, a missing schedule entry means no timetable floor.

use crate::models::{SwitchRole, TrainSets, TrainsTiming};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ConfigError>>;

/// A configuration error.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Error category.
    pub kind: ConfigErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// A declared train has no path.
    MissingPath,
    /// A declared train has an empty path.
    EmptyPath,
    /// A constraint group references a train that is not declared.
    UnknownTrain,
    /// A constraint group references a station that is not on the
    /// train's path.
    StationNotOnPath,
    /// No initial condition is reachable walking the path backwards.
    UnresolvableDeparture,
    /// A passing time implied by the topology is missing.
    MissingPassingTime,
    /// A stop time implied by the topology is missing.
    MissingStopTime,
    /// A headway entry implied by a common-line group is missing.
    MissingHeadway,
    /// A preparation time implied by a circulation is missing.
    MissingPreparationTime,
}

impl ConfigError {
    fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a rescheduling instance.
///
/// Checks:
/// 1. Every declared train has a non-empty path
/// 2. Every constraint group references declared trains only
/// 3. The earliest departure of every generated variable is resolvable
///    (an initial condition is reachable, with passing and stop times
///    along the recursion)
/// 4. Common-line groups have headway entries in both train orders
/// 5. Single-track pairs have passing times in both directions
/// 6. Circulations have preparation times and an arriving leg
/// 7. Switch groups sit on the paths of both trains, with passing times
///    for arriving legs
/// 8. Shared-track groups have the passing time of every approaching
///    train (or its rolling-stock predecessor)
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(sets: &TrainSets, timing: &TrainsTiming) -> ValidationResult {
    let mut errors = Vec::new();
    let push = |errors: &mut Vec<ConfigError>, e: ConfigError| {
        if !errors.contains(&e) {
            errors.push(e);
        }
    };

    for train in &sets.trains {
        match sets.paths.get(train) {
            None => errors.push(ConfigError::new(
                ConfigErrorKind::MissingPath,
                format!("train '{train}' has no path"),
            )),
            Some(path) if path.is_empty() => errors.push(ConfigError::new(
                ConfigErrorKind::EmptyPath,
                format!("train '{train}' has an empty path"),
            )),
            Some(_) => {}
        }
    }
    // Everything below walks paths; bail out while they are unusable.
    if !errors.is_empty() {
        return Err(errors);
    }

    let known = |t: &str| sets.trains.iter().any(|j| j == t);
    let on_path = |t: &str, s: &str| sets.path(t).iter().any(|st| st == s);
    let has_pass = |t: &str, a: &str, b: &str| {
        timing
            .passing_times
            .contains_key(&(t.to_owned(), a.to_owned(), b.to_owned()))
    };

    // Earliest-departure chains.
    for train in &sets.trains {
        let path = sets.path(train);
        let initial: Vec<bool> = path
            .iter()
            .map(|s| timing.initial_condition(train, s).is_some())
            .collect();

        // Legs whose passing and stop times the recursion needs.
        let mut needed = vec![false; path.len()];
        for (i, station) in path.iter().enumerate() {
            if sets.skips_station(train, station) {
                continue;
            }
            match (0..=i).rev().find(|&k| initial[k]) {
                None => push(
                    &mut errors,
                    ConfigError::new(
                        ConfigErrorKind::UnresolvableDeparture,
                        format!(
                            "no initial condition reachable for train '{train}' at station '{station}'"
                        ),
                    ),
                ),
                Some(k) => {
                    for slot in &mut needed[k + 1..=i] {
                        *slot = true;
                    }
                }
            }
        }
        for (i, station) in path.iter().enumerate() {
            if !needed[i] || initial[i] {
                continue;
            }
            let prev = &path[i - 1];
            if !has_pass(train, prev, station) {
                push(
                    &mut errors,
                    ConfigError::new(
                        ConfigErrorKind::MissingPassingTime,
                        format!("no passing time for train '{train}' on segment '{prev}' -> '{station}'"),
                    ),
                );
            }
            if !timing
                .stop_times
                .contains_key(&(train.clone(), station.clone()))
            {
                push(
                    &mut errors,
                    ConfigError::new(
                        ConfigErrorKind::MissingStopTime,
                        format!("no stop time for train '{train}' at station '{station}'"),
                    ),
                );
            }
        }
    }

    // Common-line groups: headway entries in both orders for every pair
    // actually traversing the segment.
    for group in &sets.common_line_groups {
        for train in &group.trains {
            if !known(train) {
                push(
                    &mut errors,
                    ConfigError::new(
                        ConfigErrorKind::UnknownTrain,
                        format!("common-line group references unknown train '{train}'"),
                    ),
                );
            }
        }
        let traverses = |t: &str| {
            known(t)
                && on_path(t, &group.from)
                && sets.subsequent_station(t, &group.from) == Some(group.to.as_str())
        };
        for a in &group.trains {
            for b in &group.trains {
                if a == b || !traverses(a) || !traverses(b) {
                    continue;
                }
                if !timing.headways.contains_key(&(
                    a.clone(),
                    b.clone(),
                    group.from.clone(),
                    group.to.clone(),
                )) {
                    push(
                        &mut errors,
                        ConfigError::new(
                            ConfigErrorKind::MissingHeadway,
                            format!(
                                "no headway for trains '{a}'/'{b}' on segment '{}' -> '{}'",
                                group.from, group.to
                            ),
                        ),
                    );
                }
            }
        }
    }

    // Single-track pairs: both directed passing times.
    for pair in &sets.single_track_pairs {
        for train in [&pair.first, &pair.second] {
            if !known(train) {
                push(
                    &mut errors,
                    ConfigError::new(
                        ConfigErrorKind::UnknownTrain,
                        format!("single-track pair references unknown train '{train}'"),
                    ),
                );
            }
        }
        if !known(&pair.first) || !known(&pair.second) {
            continue;
        }
        for (train, a, b) in [
            (&pair.first, &pair.from, &pair.to),
            (&pair.second, &pair.to, &pair.from),
        ] {
            if !has_pass(train, a, b) {
                push(
                    &mut errors,
                    ConfigError::new(
                        ConfigErrorKind::MissingPassingTime,
                        format!("no passing time for train '{train}' on segment '{a}' -> '{b}'"),
                    ),
                );
            }
        }
    }

    // Circulations: arriving leg and stock preparation.
    for circ in &sets.circulations {
        for train in [&circ.arriving, &circ.departing] {
            if !known(train) {
                push(
                    &mut errors,
                    ConfigError::new(
                        ConfigErrorKind::UnknownTrain,
                        format!("circulation references unknown train '{train}'"),
                    ),
                );
            }
        }
        if !known(&circ.arriving) || !known(&circ.departing) {
            continue;
        }
        if !on_path(&circ.arriving, &circ.station) {
            push(
                &mut errors,
                ConfigError::new(
                    ConfigErrorKind::StationNotOnPath,
                    format!(
                        "circulation station '{}' is not on the path of train '{}'",
                        circ.station, circ.arriving
                    ),
                ),
            );
        } else if let Some(prev) = sets.previous_station(&circ.arriving, &circ.station) {
            if !has_pass(&circ.arriving, prev, &circ.station) {
                push(
                    &mut errors,
                    ConfigError::new(
                        ConfigErrorKind::MissingPassingTime,
                        format!(
                            "no passing time for train '{}' on segment '{prev}' -> '{}'",
                            circ.arriving, circ.station
                        ),
                    ),
                );
            }
        }
        if !timing
            .preparation_times
            .contains_key(&(circ.departing.clone(), circ.station.clone()))
        {
            push(
                &mut errors,
                ConfigError::new(
                    ConfigErrorKind::MissingPreparationTime,
                    format!(
                        "no preparation time for train '{}' at station '{}'",
                        circ.departing, circ.station
                    ),
                ),
            );
        }
    }

    // Switch groups: both movements on their paths, arriving legs timed.
    for group in &sets.switch_groups {
        for use_ in &group.uses {
            if !known(&use_.train) {
                push(
                    &mut errors,
                    ConfigError::new(
                        ConfigErrorKind::UnknownTrain,
                        format!("switch group references unknown train '{}'", use_.train),
                    ),
                );
                continue;
            }
            if !on_path(&use_.train, &group.station) {
                push(
                    &mut errors,
                    ConfigError::new(
                        ConfigErrorKind::StationNotOnPath,
                        format!(
                            "switch station '{}' is not on the path of train '{}'",
                            group.station, use_.train
                        ),
                    ),
                );
                continue;
            }
            if use_.role == SwitchRole::Arriving {
                if let Some(prev) = sets.previous_station(&use_.train, &group.station) {
                    if !has_pass(&use_.train, prev, &group.station) {
                        push(
                            &mut errors,
                            ConfigError::new(
                                ConfigErrorKind::MissingPassingTime,
                                format!(
                                    "no passing time for train '{}' on segment '{prev}' -> '{}'",
                                    use_.train, group.station
                                ),
                            ),
                        );
                    }
                }
            }
        }
    }

    // Shared-track groups: approach legs of every competing pair.
    for group in &sets.shared_track_groups {
        for train in &group.trains {
            if !known(train) {
                push(
                    &mut errors,
                    ConfigError::new(
                        ConfigErrorKind::UnknownTrain,
                        format!("shared-track group references unknown train '{train}'"),
                    ),
                );
            }
        }
        for (i, a) in group.trains.iter().enumerate() {
            for b in &group.trains[i + 1..] {
                if !known(a) || !known(b) || sets.same_rolling_stock(a, b) {
                    continue;
                }
                for occupant in [a, b] {
                    if !on_path(occupant, &group.station) {
                        push(
                            &mut errors,
                            ConfigError::new(
                                ConfigErrorKind::StationNotOnPath,
                                format!(
                                    "shared-track station '{}' is not on the path of train '{occupant}'",
                                    group.station
                                ),
                            ),
                        );
                        continue;
                    }
                    let approach = sets
                        .circulation_predecessor(occupant, &group.station)
                        .unwrap_or(occupant.as_str());
                    if !on_path(approach, &group.station) {
                        continue;
                    }
                    if let Some(prev) = sets.previous_station(approach, &group.station) {
                        if !has_pass(approach, prev, &group.station) {
                            push(
                                &mut errors,
                                ConfigError::new(
                                    ConfigErrorKind::MissingPassingTime,
                                    format!(
                                        "no passing time for train '{approach}' on segment '{prev}' -> '{}'",
                                        group.station
                                    ),
                                ),
                            );
                        }
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
