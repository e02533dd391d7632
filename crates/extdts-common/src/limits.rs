//! Centralized limits and thresholds for the declaration compiler.
//!
//! Keeping these in one place avoids magic numbers at the call sites in the
//! parser, the feature resolver and the renderer.

// =============================================================================
// Parser
// =============================================================================

/// Maximum nesting depth of schema nodes.
///
/// Upstream schemas nest a handful of levels (namespace → type → property →
/// callback → parameter object). Anything past this is treated as malformed
/// input rather than risking a stack overflow.
pub const MAX_SCHEMA_DEPTH: u32 = 64;

// =============================================================================
// Feature Resolver
// =============================================================================

/// Maximum number of feature ids visited by a single top-level query.
///
/// Real queries touch fewer than a dozen ids. The work-list stops with a
/// cycle error if it ever grows past this bound.
pub const MAX_FEATURE_WORKLIST: usize = 1024;

// =============================================================================
// Signature Expander
// =============================================================================

/// Maximum number of left-optional parameters in one function.
///
/// Expansion is `2^k`; upstream functions have at most two such positions.
pub const MAX_LEFT_OPTIONAL: usize = 6;

// =============================================================================
// Renderer
// =============================================================================

/// Maximum width of a tuple union produced for a bounded sequence.
///
/// `minItems: 1, maxItems: 3` renders as `[T] | [T, T] | [T, T, T]`. Wider
/// ranges fall back to `T[]` (with a fixed prefix when a minimum exists).
pub const MAX_TUPLE_EXPANSION: usize = 8;

/// Default indentation unit of the emitted declaration text.
pub const DEFAULT_INDENT: &str = "  ";
