//! Rescheduling instance model.
//!
//! An instance splits into two halves: the train-set topology
//! ([`TrainSets`]) saying which movements exist and which pairs compete
//! for shared infrastructure, and the timing constants ([`TrainsTiming`])
//! saying how long each movement takes and when it may start at the
//! earliest. Both halves are plain serde-serializable data; all derived
//! quantities (earliest departures, variable positions, couplings) are
//! computed from them on demand.

mod timing;
mod train_sets;

pub use timing::{earliest_departure, TrainsTiming};
pub use train_sets::{
    Circulation, CommonLineGroup, SharedTrackGroup, SingleTrackPair, StationId, SwitchGroup,
    SwitchRole, SwitchUse, TrainId, TrainSets,
};
