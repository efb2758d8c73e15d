//! QUBO assembly.
//!
//! [`build_qubo`] turns a validated instance into the dense symmetric
//! matrix: the soft delay objective on the departure diagonal, the
//! weighted pairwise encoders over departure pairs, and the shared-track
//! quadratization over all pairs. Every cell is a pure function of the
//! two variables at its row and column, so rows are filled in parallel.
//!
//! Penalty weights follow the reference formulation: the one-hot weight
//! must dominate the soft objective, the pair weight prices every
//! infeasible pairwise combination, and the cubic weight scales the
//! Rosenberg penalty that ties each auxiliary variable to its two
//! constituent departures.
//!
//! # Reference
//! arXiv:2107.03234, Sec. 4 (QUBO formulation)

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::encoders::{
    headway, minimal_stay, one_hot, rolling_stock_circulation, rosenberg_decomposition,
    single_track_line, switch_occupation, track_occupation_quadratic,
};
use crate::models::{TrainSets, TrainsTiming};
use crate::qubo::Qubo;
use crate::validation::{validate_instance, ConfigError};
use crate::variables::{Variable, VariableIndex};

/// Penalty weights and delay range of the encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyConfig {
    /// Largest considered secondary delay d_max.
    pub max_delay: u32,
    /// Weight of the one-hot condition.
    pub one_hot_weight: f64,
    /// Weight of the pairwise feasibility conditions.
    pub pair_weight: f64,
    /// Weight of the Rosenberg quadratization penalty.
    pub cubic_weight: f64,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            max_delay: 5,
            one_hot_weight: 2.0,
            pair_weight: 1.0,
            cubic_weight: 2.0,
        }
    }
}

impl PenaltyConfig {
    pub fn with_max_delay(mut self, max_delay: u32) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_one_hot_weight(mut self, weight: f64) -> Self {
        self.one_hot_weight = weight;
        self
    }

    pub fn with_pair_weight(mut self, weight: f64) -> Self {
        self.pair_weight = weight;
        self
    }

    pub fn with_cubic_weight(mut self, weight: f64) -> Self {
        self.cubic_weight = weight;
        self
    }
}

/// Weighted coupling of two departure variables: the one-hot condition
/// plus all pairwise feasibility conditions.
pub fn departure_coupling(
    a: &Variable,
    b: &Variable,
    sets: &TrainSets,
    timing: &TrainsTiming,
    config: &PenaltyConfig,
) -> f64 {
    let mut value = config.one_hot_weight * one_hot(a, b);
    value += config.pair_weight
        * (headway(a, b, sets, timing)
            + minimal_stay(a, b, sets, timing)
            + single_track_line(a, b, sets, timing)
            + rolling_stock_circulation(a, b, sets, timing)
            + switch_occupation(a, b, sets, timing));
    value
}

/// Weighted coupling involving auxiliary variables: the shared-track
/// conflict term plus the Rosenberg quadratization penalty.
pub fn auxiliary_coupling(
    a: &Variable,
    b: &Variable,
    sets: &TrainSets,
    timing: &TrainsTiming,
    config: &PenaltyConfig,
) -> f64 {
    config.pair_weight * track_occupation_quadratic(a, b, sets, timing)
        + config.cubic_weight * rosenberg_decomposition(a, b, sets)
}

/// Soft objective on the departure diagonal: delay scaled by the station
/// penalty weight, normalized by the delay range. Auxiliary variables and
/// a zero delay range carry no objective.
pub fn soft_delay_penalty(var: &Variable, timing: &TrainsTiming, config: &PenaltyConfig) -> f64 {
    match var {
        Variable::Departure {
            train,
            station,
            delay,
        } => {
            if config.max_delay == 0 {
                return 0.0;
            }
            f64::from(*delay) * timing.penalty_weight(train, station) / f64::from(config.max_delay)
        }
        Variable::TrackPair { .. } => 0.0,
    }
}

/// Builds the QUBO matrix of an instance.
///
/// Validates the instance first and returns all configuration errors if
/// any; on success the returned matrix is symmetric and its leading
/// block corresponds to the departure variables of
/// [`VariableIndex::new`].
pub fn build_qubo(
    sets: &TrainSets,
    timing: &TrainsTiming,
    config: &PenaltyConfig,
) -> Result<Qubo, Vec<ConfigError>> {
    validate_instance(sets, timing)?;

    let index = VariableIndex::new(sets, config.max_delay);
    let size = index.len();
    let departures = index.departure_count();
    debug!(
        "assembling {size}x{size} QUBO: {departures} departure and {} auxiliary variables",
        index.auxiliary_count()
    );

    let mut data = vec![0.0; size * size];
    data.par_chunks_mut(size).enumerate().for_each(|(k, row)| {
        let a = index.get(k);
        for (l, cell) in row.iter_mut().enumerate() {
            let b = index.get(l);
            let mut value = 0.0;
            if k < departures && l < departures {
                value += departure_coupling(a, b, sets, timing, config);
                if k == l {
                    value += soft_delay_penalty(a, timing, config);
                }
            }
            value += auxiliary_coupling(a, b, sets, timing, config);
            *cell = value;
        }
    });

    Ok(Qubo::new(size, departures, data))
}
