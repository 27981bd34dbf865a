//! Probability building blocks for ergo.
//!
//! - the affine [`Scale`] between true units and the normalized `[0, 1]` domain
//! - the [`Logistic`] distribution
//! - a tag registry for rebuilding destructured distributions
//! - serde configuration specs
//! - small numeric helpers (stable log/exp/sigmoid primitives)

pub mod logistic;
pub mod math;
pub mod registry;
pub mod scale;
pub mod spec;

pub use ergo_core::{ClassNode, Destructured, Distribution, Error, NumericNode, Result, Structured};
pub use logistic::{Logistic, MIN_S, NORM_GRID_POINTS};
pub use registry::StructureRegistry;
pub use scale::{NormTerm, Scale};
pub use spec::{DistributionSpec, LogisticSpec, ScaleSpec};
