//! Clause indexing for subsumption filtering
//!
//! The feature vector index answers "which stored clauses subsume this
//! one?" and "which stored clauses does this one subsume?" in sub-linear
//! average time. The resolution engine's default clause store is built on
//! it to enforce forward and backward subsumption.

pub mod feature_vector;

pub use feature_vector::{
    default_features, ClauseFeature, FeatureSelector, FeatureVectorIndex,
};
