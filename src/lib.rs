//! Railway rescheduling as QUBO.
//!
//! Encodes the delay-conflict management problem of a railway network as
//! a Quadratic Unconstrained Binary Optimization matrix, ready for
//! simulated or quantum annealing. Solving the matrix is out of scope;
//! this crate defines the encoding and the decoding of solver output.
//!
//! Each binary variable fixes the secondary delay of one train departing
//! one station. Feasibility rules (minimum headways, single-track meets,
//! station-track occupancy, rolling-stock circulation, switch clearance)
//! become pairwise penalty terms; the cubic track-occupancy term is
//! quadratized with auxiliary variables via the Rosenberg penalty. The
//! soft objective weighs every delay beyond the unavoidable minimum.
//!
//! # Modules
//!
//! - **`models`**: instance data — train-set topology and timing constants
//! - **`variables`**: binary variable enumeration and stable indexing
//! - **`encoders`**: pairwise constraint encoders and the quadratization
//! - **`assembler`**: penalty weighting and parallel matrix assembly
//! - **`qubo`**: the symmetric matrix and its energy evaluator
//! - **`solution`**: decoding annealer output into a timetable
//! - **`validation`**: instance integrity checks before assembly
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use rail_qubo::{build_qubo, PenaltyConfig, TrainSets, TrainsTiming};
//!
//! let sets = TrainSets {
//!     trains: vec!["regional".into()],
//!     paths: HashMap::from([("regional".into(), vec!["A".into(), "B".into()])]),
//!     ..Default::default()
//! };
//! let timing = TrainsTiming::default()
//!     .with_passing_time("regional", "A", "B", 4.0)
//!     .with_stop_time("regional", "B", 1.0)
//!     .with_initial_condition("regional", "A", 0.0)
//!     .with_penalty_weight("regional", "A", 1.0);
//!
//! let q = build_qubo(&sets, &timing, &PenaltyConfig::default()).unwrap();
//! assert_eq!(q.size(), 12);
//! ```
//!
//! # References
//!
//! - Domino, Koniorczyk, Krawiec, Jałowiecki & Gardas (2021),
//!   "Quantum annealing in the NISQ era: railway conflict management",
//!   arXiv:2107.03234
//! - Rosenberg (1975), "Reduction of bivalent maximization to the
//!   quadratic case", Cahiers du Centre d'Études de Recherche
//!   Opérationnelle 17

pub mod assembler;
pub mod encoders;
pub mod models;
pub mod qubo;
pub mod solution;
pub mod validation;
pub mod variables;

pub use assembler::{build_qubo, PenaltyConfig};
pub use models::{earliest_departure, TrainSets, TrainsTiming};
pub use qubo::Qubo;
pub use solution::{decode_assignment, DecodedDeparture};
pub use validation::{validate_instance, ConfigError, ConfigErrorKind};
pub use variables::{Variable, VariableIndex};
