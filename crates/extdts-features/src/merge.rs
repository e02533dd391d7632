//! Complex-feature disambiguation.
//!
//! A feature id backed by several raw definitions is reduced to one by a
//! fixed sequence of tie-break rules. Each rule narrows the candidate set
//! when it can; the first rule that leaves exactly one candidate wins.
//!
//! 1. All candidates identical apart from `dependencies` → one feature with
//!    the union of their dependencies.
//! 2. Candidates on the least restrictive channel.
//! 3. Candidates that allow the `extension` extension type.
//! 4. Candidates without an install `location` restriction.
//!
//! If none of these isolates a single definition the ambiguity is reported
//! instead of guessed at.

use extdts_common::FeatureError;
use tracing::debug;

use crate::channel::Channel;
use crate::raw::RawFeature;

/// Reduce the variants of complex feature `id` to a single definition.
///
/// `path` is the symbol being resolved and only feeds the error message.
pub fn merge_complex_feature(
    id: &str,
    path: &str,
    variants: &[RawFeature],
) -> Result<RawFeature, FeatureError> {
    match variants {
        [] => {
            return Err(FeatureError::Malformed {
                id: id.to_string(),
                detail: "complex feature has no variants".to_string(),
            });
        }
        [only] => return Ok(only.clone()),
        _ => {}
    }

    if let Some(merged) = merge_identical(variants) {
        debug!(id, variants = variants.len(), "merged identical variants");
        return Ok(merged);
    }

    let mut candidates: Vec<&RawFeature> = variants.iter().collect();

    let least = candidates
        .iter()
        .map(|f| f.channel())
        .fold(Channel::Trunk, Channel::least_restrictive);
    narrow(&mut candidates, |f| f.channel() == least);
    if let [picked] = candidates.as_slice() {
        debug!(id, channel = %least, "picked variant by channel");
        return Ok((*picked).clone());
    }

    narrow(&mut candidates, RawFeature::allows_extension);
    if let [picked] = candidates.as_slice() {
        debug!(id, "picked variant allowing extensions");
        return Ok((*picked).clone());
    }

    narrow(&mut candidates, |f| f.location.is_none());
    if let [picked] = candidates.as_slice() {
        debug!(id, "picked variant without install location");
        return Ok((*picked).clone());
    }

    let remaining: Vec<RawFeature> = candidates.into_iter().cloned().collect();
    if let Some(merged) = merge_identical(&remaining) {
        return Ok(merged);
    }

    Err(FeatureError::Ambiguous {
        id: id.to_string(),
        path: path.to_string(),
        variants: remaining.len(),
    })
}

/// Keep only candidates matching `keep`, unless that would remove all of them.
fn narrow(candidates: &mut Vec<&RawFeature>, keep: impl Fn(&RawFeature) -> bool) {
    if candidates.iter().any(|f| keep(*f)) {
        candidates.retain(|f| keep(*f));
    }
}

fn merge_identical(variants: &[RawFeature]) -> Option<RawFeature> {
    let (first, rest) = variants.split_first()?;
    let shape = first.without_dependencies();
    if !rest.iter().all(|v| v.without_dependencies() == shape) {
        return None;
    }

    let mut dependencies: Vec<String> = Vec::new();
    for dep in variants.iter().flat_map(|v| v.dependencies()) {
        if !dependencies.contains(dep) {
            dependencies.push(dep.clone());
        }
    }
    dependencies.sort();

    let any_declared = variants.iter().any(|v| v.dependencies.is_some());
    Some(RawFeature {
        dependencies: any_declared.then_some(dependencies),
        ..shape
    })
}
