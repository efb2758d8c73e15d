//! Shared station-track occupancy and its quadratization.
//!
//! The occupancy rule is cubic in the departure variables: train `j'`
//! leaving the previous station may only be penalized against a pair of
//! departures of the occupying trains from the shared station. The cubic
//! term `x · x · x` is quadratized the standard way: each product of two
//! same-station departures gets an auxiliary variable `z` and the
//! Rosenberg penalty `3z + xy - 2z(x + y)` forces `z = xy` at any
//! penalty minimum.
//!
//! [`track_occupation_quadratic`] contributes the conflict term between a
//! departure variable and an auxiliary variable;
//! [`rosenberg_decomposition`] contributes the quadratization penalty
//! itself. Both are symmetric in their two variable arguments.

use crate::models::{earliest_departure, TrainSets, TrainsTiming};
use crate::variables::Variable;

/// Conflict between an approaching departure and an occupying pair.
///
/// Nonzero only for a (departure, auxiliary) pair where the departing
/// train's next station is the auxiliary's shared station. When an
/// occupant starts at the station as a rolling-stock continuation, the
/// approaching train is matched against the predecessor that brings the
/// stock in.
pub fn track_occupation_quadratic(
    a: &Variable,
    b: &Variable,
    sets: &TrainSets,
    timing: &TrainsTiming,
) -> f64 {
    if sets.same_rolling_stock(a.train(), b.train()) {
        return 0.0;
    }
    match (a, b) {
        (Variable::Departure { .. }, Variable::TrackPair { .. }) => {
            occupation_conflict(a, b, sets, timing)
        }
        (Variable::TrackPair { .. }, Variable::Departure { .. }) => {
            occupation_conflict(b, a, sets, timing)
        }
        _ => 0.0,
    }
}

fn occupation_conflict(
    x: &Variable,
    z: &Variable,
    sets: &TrainSets,
    timing: &TrainsTiming,
) -> f64 {
    let Variable::Departure {
        train: jx,
        station: sx,
        delay: d,
    } = x
    else {
        unreachable!("occupation_conflict is dispatched with the departure variable first")
    };
    let Variable::TrackPair {
        train: jz,
        train2: jz1,
        station: sz,
        delay: d1,
        delay2: d2,
    } = z
    else {
        unreachable!("occupation_conflict is dispatched with the auxiliary variable second")
    };

    if sets.subsequent_station(jx, sx) != Some(sz.as_str()) {
        return 0.0;
    }

    // First occupant blocks the track for the approaching train.
    let target = sets.circulation_predecessor(jz, sz).unwrap_or(jz.as_str());
    if jx == target
        && sets.shared_track_pair(sz, jx, jz1)
        && blocks(sets, timing, jx, sx, sz, *d, jz, *d1, jz1, *d2)
    {
        return 1.0;
    }

    // Second occupant in the role of the blocker.
    let target = sets.circulation_predecessor(jz1, sz).unwrap_or(jz1.as_str());
    if jx == target
        && sets.shared_track_pair(sz, jx, jz)
        && blocks(sets, timing, jx, sx, sz, *d, jz1, *d2, jz, *d1)
    {
        return 1.0;
    }

    0.0
}

/// Whether the approaching train reaches the shared station while the
/// blocking occupant still holds the track: arrival falls strictly after
/// the other occupant left but not after the blocker leaves.
#[allow(clippy::too_many_arguments)]
fn blocks(
    sets: &TrainSets,
    timing: &TrainsTiming,
    jx: &str,
    sx: &str,
    sz: &str,
    d: u32,
    blocker: &str,
    blocker_delay: u32,
    other: &str,
    other_delay: u32,
) -> bool {
    let mut arrival = f64::from(d)
        + earliest_departure(sets, timing, jx, sx)
        + timing.passing_time(jx, sx, sz);
    if sets.has_switch_margin(sz) {
        arrival -= timing.switch_clearance;
    }
    let blocker_leaves = f64::from(blocker_delay) + earliest_departure(sets, timing, blocker, sz);
    let other_leaves = f64::from(other_delay) + earliest_departure(sets, timing, other, sz);

    arrival < other_leaves && other_leaves <= blocker_leaves
}

/// Rosenberg quadratization penalty `3z + xy - 2z(x + y)`, spread over the
/// symmetric matrix: +3 on the auxiliary diagonal, -1 on each cell pairing
/// the auxiliary with one of its two constituent departures, +0.5 on each
/// cell pairing two same-station departures of a shared-track pair.
pub fn rosenberg_decomposition(a: &Variable, b: &Variable, sets: &TrainSets) -> f64 {
    match (a, b) {
        (Variable::TrackPair { .. }, Variable::TrackPair { .. }) => {
            if a == b {
                3.0
            } else {
                0.0
            }
        }
        (Variable::Departure { .. }, Variable::TrackPair { .. }) => constituent_coupling(a, b),
        (Variable::TrackPair { .. }, Variable::Departure { .. }) => constituent_coupling(b, a),
        (
            Variable::Departure {
                train: j,
                station: s,
                ..
            },
            Variable::Departure {
                train: j1,
                station: s1,
                ..
            },
        ) => {
            if s == s1 && sets.shared_track_pair(s, j, j1) {
                0.5
            } else {
                0.0
            }
        }
    }
}

fn constituent_coupling(x: &Variable, z: &Variable) -> f64 {
    let Variable::Departure {
        train: jx,
        station: sx,
        delay: d,
    } = x
    else {
        unreachable!("constituent_coupling is dispatched with the departure variable first")
    };
    let Variable::TrackPair {
        train: jz,
        train2: jz1,
        station: sz,
        delay: d1,
        delay2: d2,
    } = z
    else {
        unreachable!("constituent_coupling is dispatched with the auxiliary variable second")
    };

    if sx != sz {
        return 0.0;
    }
    if (jx == jz && d == d1) || (jx == jz1 && d == d2) {
        return -1.0;
    }
    0.0
}
