//! Feature availability resolution for extension API symbols.
//!
//! Given a dotted symbol path (`alarms.create`), the [`FeatureResolver`]
//! walks the feature dependency graph and computes the symbol's effective
//! availability: release channel, manifest-version bounds, required
//! permissions and manifest keys, platform restrictions and so on.
//!
//! A query that returns `Ok(None)` means the symbol is disallowed and must
//! not be rendered. Ambiguous complex features and dependency cycles are
//! fatal errors.

// Release channel ordering
pub mod channel;
pub use channel::Channel;

// Raw feature definitions as read from the feature JSON files
pub mod raw;
pub use raw::{FeatureKind, RawFeature, RawFeatureTables, RawSet};

// Resolved feature values and sparse diffs
pub mod query;
pub use query::{AllowSet, FeatureDiff, FeatureQuery, Since};

// Complex-feature disambiguation
pub mod merge;
pub use merge::merge_complex_feature;

// Historic symbol availability
pub mod history;
pub use history::{HistoricSymbol, HistoricSymbols};

// The resolver itself
pub mod resolver;
pub use resolver::{FeatureResolver, ResolverOptions};

#[cfg(test)]
#[path = "tests/channel_tests.rs"]
mod channel_tests;

#[cfg(test)]
#[path = "tests/merge_tests.rs"]
mod merge_tests;

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod resolver_tests;
