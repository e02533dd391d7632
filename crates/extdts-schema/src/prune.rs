//! Feature annotation and nodoc pruning.
//!
//! One top-down pass over a namespace re-queries the feature resolver for
//! every dotted path. A member whose query comes back disallowed, or that is
//! already nodoc, is hidden together with everything below it and the pass
//! does not descend further. Visible members get their canonical feature and
//! the sparse diff against their parent's.
//!
//! Marking only flips flags in place. Removing hidden members is a separate
//! copy ([`Namespace::into_visible`]), so no map changes shape while it is
//! being walked.

use extdts_common::FeatureError;
use extdts_features::{FeatureQuery, FeatureResolver};
use tracing::{debug, instrument};

use crate::model::{Namespace, Property};

/// Annotate `ns` and drop everything that must not be rendered.
pub fn prune_namespace(mut ns: Namespace, resolver: &FeatureResolver) -> Result<Namespace, FeatureError> {
    mark_namespace(&mut ns, resolver)?;
    Ok(ns.into_visible())
}

/// The marking half of [`prune_namespace`]. Hidden members stay in place
/// with `nodoc` set.
#[instrument(level = "debug", skip_all, fields(namespace = %ns.name))]
pub fn mark_namespace(ns: &mut Namespace, resolver: &FeatureResolver) -> Result<(), FeatureError> {
    let canonical = match resolver.query(&ns.name)? {
        Some(canonical) if !ns.nodoc => canonical,
        _ => {
            debug!("namespace hidden");
            ns.nodoc = true;
            ns.all.values_mut().for_each(hide);
            return Ok(());
        }
    };

    ns.feature = canonical.diff(None);
    for prop in ns.all.values_mut() {
        let path = format!("{}.{}", ns.name, prop.name);
        mark(prop, &path, &canonical, ns.deprecated.as_deref(), resolver)?;
    }
    ns.canonical_feature = Some(canonical);
    Ok(())
}

fn mark(
    prop: &mut Property,
    path: &str,
    parent: &FeatureQuery,
    parent_deprecated: Option<&str>,
    resolver: &FeatureResolver,
) -> Result<(), FeatureError> {
    if prop.nodoc {
        hide(prop);
        return Ok(());
    }
    let Some(canonical) = resolver.query(path)? else {
        debug!(path, "pruned disallowed symbol");
        hide(prop);
        return Ok(());
    };

    prop.feature = canonical.diff(Some(parent));
    if prop.deprecated.is_none() {
        prop.deprecated = parent_deprecated.map(str::to_owned);
    }

    let deprecated = prop.deprecated.clone();
    prop.ty.try_for_each_property_mut(&mut |child| {
        let child_path = format!("{path}.{}", child.name);
        mark(child, &child_path, &canonical, deprecated.as_deref(), resolver)
    })?;
    prop.canonical_feature = Some(canonical);
    Ok(())
}

fn hide(prop: &mut Property) {
    prop.nodoc = true;
    prop.ty.for_each_property_mut(hide);
}
