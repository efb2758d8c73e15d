//! Constraint encoders.
//!
//! Every encoder maps a pair of variables to the unweighted contribution
//! of one feasibility rule to the corresponding matrix cell. The assembler
//! weighs and sums them; no encoder mutates anything or depends on
//! enumeration order.

mod pairwise;
mod track_occupation;

pub use pairwise::{
    headway, minimal_stay, one_hot, rolling_stock_circulation, single_track_line,
    switch_occupation,
};
pub use track_occupation::{rosenberg_decomposition, track_occupation_quadratic};
