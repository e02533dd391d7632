//! The feature resolver.
//!
//! A query starts at the nearest `api:` definition of a dotted symbol path
//! and walks a breadth-first work-list over `dependencies`. Every id on the
//! work-list is resolved once to a single definition (merging complex
//! features, inheriting from its dotted parent). The resulting graph is
//! checked for cycles depth-first, then each definition is checked against
//! the rejection gates and folded into an aggregate. The aggregate keeps the tightest bound of
//! every restriction seen.

use std::collections::{BTreeSet, VecDeque};

use extdts_common::FeatureError;
use extdts_common::limits::MAX_FEATURE_WORKLIST;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, instrument, trace};

use crate::channel::Channel;
use crate::history::HistoricSymbols;
use crate::merge::merge_complex_feature;
use crate::query::{AllowSet, FeatureQuery, Since};
use crate::raw::{FeatureKind, RawFeature, RawFeatureTables};

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Disallow features whose `session_types` do not include `regular`.
    ///
    /// Defaults to `true`: kiosk-only surfaces are rejected rather than
    /// passed through.
    pub reject_non_regular_sessions: bool,
    /// Disallow features flagged `internal`. Defaults to `true`.
    pub reject_internal: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            reject_non_regular_sessions: true,
            reject_internal: true,
        }
    }
}

pub struct FeatureResolver {
    tables: RawFeatureTables,
    options: ResolverOptions,
    history: Option<HistoricSymbols>,
}

impl FeatureResolver {
    pub fn new(tables: RawFeatureTables, options: ResolverOptions) -> Self {
        FeatureResolver {
            tables,
            options,
            history: None,
        }
    }

    /// Attach a historic symbol map. Without one every query is marked
    /// `unknown_version`.
    pub fn with_history(mut self, history: HistoricSymbols) -> Self {
        self.history = Some(history);
        self
    }

    pub fn tables(&self) -> &RawFeatureTables {
        &self.tables
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve the availability of `path`.
    ///
    /// `Ok(None)` means the symbol is disallowed. A dependency cycle anywhere
    /// in the reachable set is fatal, even when a gate would reject first.
    #[instrument(level = "debug", skip(self))]
    pub fn query(&self, path: &str) -> Result<Option<FeatureQuery>, FeatureError> {
        let Some(root) = self.nearest_api_id(path) else {
            debug!(path, "no feature definition");
            return Ok(None);
        };

        let graph = self.collect(&root, path)?;
        graph.check_acyclic(&root)?;

        let mut aggregate = Aggregate::default();
        for id in &graph.order {
            let Some(feature) = graph.definition(id) else {
                debug!(path, %id, "dependency has no definition");
                return Ok(None);
            };
            if let Some(gate) = self.rejection(feature) {
                debug!(path, %id, gate, "feature rejected");
                return Ok(None);
            }
            aggregate.absorb(id, feature)?;
        }

        let Some(mut query) = aggregate.finish() else {
            debug!(path, "restrictions leave nothing allowed");
            return Ok(None);
        };
        self.apply_history(path, &mut query);
        Ok(Some(query))
    }

    /// Breadth-first walk over `dependencies`, resolving every reachable id once.
    fn collect(&self, root: &str, path: &str) -> Result<DependencyGraph, FeatureError> {
        let mut graph = DependencyGraph::default();
        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(root.to_string());

        while let Some(id) = queue.pop_front() {
            if graph.features.contains_key(&id) {
                continue;
            }
            if graph.order.len() >= MAX_FEATURE_WORKLIST {
                let mut cycle = graph.order;
                cycle.push(id);
                return Err(FeatureError::Cycle { cycle });
            }

            trace!(path, %id, "resolving feature");
            let feature = self.resolve_definition(&id, path)?;
            if let Some(feature) = &feature {
                queue.extend(feature.dependencies().iter().cloned());
            }
            graph.order.push(id.clone());
            graph.features.insert(id, feature);
        }
        Ok(graph)
    }

    /// Convenience wrapper: whether `path` resolves to anything.
    pub fn is_allowed(&self, path: &str) -> Result<bool, FeatureError> {
        Ok(self.query(path)?.is_some())
    }

    fn nearest_api_id(&self, path: &str) -> Option<String> {
        let mut current = path;
        loop {
            let id = FeatureKind::Api.id(current);
            if self.tables.contains(&id) {
                return Some(id);
            }
            current = current.rsplit_once('.')?.0;
        }
    }

    /// The single definition for `id`, merged and with parent fields filled in.
    fn resolve_definition(&self, id: &str, path: &str) -> Result<Option<RawFeature>, FeatureError> {
        let variants = self.tables.get(id);
        if variants.is_empty() {
            return Ok(None);
        }
        let mut feature = merge_complex_feature(id, path, variants)?;
        if !feature.is_noparent()
            && let Some(parent) = self.parent_definition(id, path)?
        {
            feature.inherit_from(&parent);
        }
        Ok(Some(feature))
    }

    /// Nearest defined dotted ancestor of `id`, itself fully inherited.
    ///
    /// When the ancestor is complex, the variant flagged `default_parent` is
    /// used as-is; the variants are only merged when none is flagged.
    fn parent_definition(&self, id: &str, path: &str) -> Result<Option<RawFeature>, FeatureError> {
        let mut current = id;
        while let Some((parent, _)) = current.rsplit_once('.') {
            let variants = self.tables.get(parent);
            if !variants.is_empty() {
                let mut selected = match variants {
                    [only] => only.clone(),
                    many => match many.iter().find(|v| v.is_default_parent()) {
                        Some(flagged) => flagged.clone(),
                        None => merge_complex_feature(parent, path, many)?,
                    },
                };
                if !selected.is_noparent()
                    && let Some(grandparent) = self.parent_definition(parent, path)?
                {
                    selected.inherit_from(&grandparent);
                }
                return Ok(Some(selected));
            }
            current = parent;
        }
        Ok(None)
    }

    /// Name of the gate that rejects `feature` outright, if any.
    fn rejection(&self, feature: &RawFeature) -> Option<&'static str> {
        if feature.allowlist.as_ref().is_some_and(|list| !list.is_empty()) {
            return Some("allowlist");
        }
        if feature.command_line_switch.is_some() {
            return Some("command_line_switch");
        }
        if self.options.reject_non_regular_sessions
            && feature
                .session_types
                .as_ref()
                .is_some_and(|types| !types.iter().any(|t| t == "regular"))
        {
            return Some("session_types");
        }
        if feature
            .matches
            .as_ref()
            .is_some_and(|patterns| !patterns.iter().any(|p| p == "<all_urls>"))
        {
            return Some("matches");
        }
        if self.options.reject_internal && feature.internal == Some(true) {
            return Some("internal");
        }
        None
    }

    fn apply_history(&self, path: &str, query: &mut FeatureQuery) {
        let Some(history) = &self.history else {
            query.unknown_version = true;
            return;
        };

        // Members the history does not track take their nearest ancestor's entry.
        let mut current = path;
        loop {
            if let Some(symbol) = history.get(current) {
                query.since = Some(symbol.since());
                query.deprecated_since_version = symbol.deprecated_at_version;
                return;
            }
            match current.rsplit_once('.') {
                Some((parent, _)) => current = parent,
                None => break,
            }
        }
        query.since = Some(Since::Pending);
    }
}

/// Every id reachable from one query root, in breadth-first order.
///
/// `None` marks an id with no definition; it has no outgoing edges.
#[derive(Debug, Default)]
struct DependencyGraph {
    order: Vec<String>,
    features: FxHashMap<String, Option<RawFeature>>,
}

impl DependencyGraph {
    fn definition(&self, id: &str) -> Option<&RawFeature> {
        self.features.get(id).and_then(Option::as_ref)
    }

    fn dependencies(&self, id: &str) -> &[String] {
        match self.definition(id) {
            Some(feature) => feature.dependencies(),
            None => &[],
        }
    }

    /// Depth-first search with an on-stack set. Every back edge is a cycle,
    /// whichever path first reached its target.
    fn check_acyclic(&self, root: &str) -> Result<(), FeatureError> {
        let mut stack: Vec<&str> = Vec::new();
        let mut on_stack: FxHashSet<&str> = FxHashSet::default();
        let mut done: FxHashSet<&str> = FxHashSet::default();
        self.visit(root, &mut stack, &mut on_stack, &mut done)
    }

    fn visit<'g>(
        &'g self,
        id: &'g str,
        stack: &mut Vec<&'g str>,
        on_stack: &mut FxHashSet<&'g str>,
        done: &mut FxHashSet<&'g str>,
    ) -> Result<(), FeatureError> {
        if on_stack.contains(id) {
            let start = stack.iter().position(|entry| *entry == id).unwrap_or(0);
            let mut cycle: Vec<String> = stack[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(id.to_string());
            return Err(FeatureError::Cycle { cycle });
        }
        if !done.insert(id) {
            return Ok(());
        }

        stack.push(id);
        on_stack.insert(id);
        for dep in self.dependencies(id) {
            self.visit(dep, stack, on_stack, done)?;
        }
        on_stack.remove(id);
        stack.pop();
        Ok(())
    }
}

/// Running aggregate over every feature in one query's dependency set.
#[derive(Debug, Default)]
struct Aggregate {
    channel: Channel,
    permissions: BTreeSet<String>,
    manifest_keys: BTreeSet<String>,
    platforms: Option<BTreeSet<String>>,
    contexts: AllowSet,
    extension_types: AllowSet,
    min_manifest_version: Option<u32>,
    max_manifest_version: Option<u32>,
    location: Option<String>,
    disallow_for_service_workers: bool,
}

impl Aggregate {
    fn absorb(&mut self, id: &str, feature: &RawFeature) -> Result<(), FeatureError> {
        let (kind, name) = FeatureKind::split_id(id)?;
        match kind {
            FeatureKind::Permission => {
                self.permissions.insert(name.to_string());
            }
            FeatureKind::Manifest => {
                self.manifest_keys.insert(name.to_string());
            }
            FeatureKind::Api | FeatureKind::Behavior => {}
        }

        self.channel = Channel::most_restrictive(self.channel, feature.channel());

        if let Some(platforms) = &feature.platforms {
            self.platforms
                .get_or_insert_with(BTreeSet::new)
                .extend(platforms.iter().cloned());
        }
        if let Some(contexts) = &feature.contexts {
            self.contexts = self.contexts.intersect(&AllowSet::from_raw(contexts));
        }
        if let Some(types) = &feature.extension_types {
            self.extension_types = self.extension_types.intersect(&AllowSet::from_raw(types));
        }

        if let Some(min) = feature.min_manifest_version {
            self.min_manifest_version = Some(self.min_manifest_version.map_or(min, |m| m.max(min)));
        }
        if let Some(max) = feature.max_manifest_version {
            self.max_manifest_version = Some(self.max_manifest_version.map_or(max, |m| m.min(max)));
        }

        if self.location.is_none() {
            self.location = feature.location.clone().filter(|l| !l.is_empty());
        }
        self.disallow_for_service_workers |= feature.disallow_for_service_workers == Some(true);
        Ok(())
    }

    fn finish(self) -> Option<FeatureQuery> {
        if self.contexts.is_empty() || self.extension_types.is_empty() {
            return None;
        }
        if let (Some(min), Some(max)) = (self.min_manifest_version, self.max_manifest_version)
            && min > max
        {
            return None;
        }

        Some(FeatureQuery {
            channel: self.channel,
            permissions: self.permissions,
            manifest_keys: self.manifest_keys,
            platforms: self.platforms.map_or(AllowSet::All, AllowSet::Only),
            contexts: self.contexts,
            extension_types: self.extension_types,
            min_manifest_version: self.min_manifest_version,
            max_manifest_version: self.max_manifest_version,
            location: self.location,
            disallow_for_service_workers: self.disallow_for_service_workers,
            since: None,
            deprecated_since_version: None,
            unknown_version: false,
        })
    }
}
