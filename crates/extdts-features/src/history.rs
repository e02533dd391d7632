//! Historic symbol availability.
//!
//! The historic-symbol tracker runs elsewhere and produces a map of dotted
//! path → first stable release / deprecation release. The resolver consults
//! it only when one is supplied.

use extdts_common::FeatureError;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::channel::Channel;
use crate::query::Since;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricSymbol {
    #[serde(default)]
    pub channel: Option<Channel>,
    #[serde(default)]
    pub deprecated_at_version: Option<u32>,
    #[serde(default)]
    pub first_stable_version: Option<u32>,
}

impl HistoricSymbol {
    /// The `since` marker for this entry. A symbol that has not reached
    /// stable, or has no recorded release, is pending.
    pub fn since(&self) -> Since {
        match (self.channel.unwrap_or_default(), self.first_stable_version) {
            (Channel::Stable, Some(version)) => Since::Version(version),
            _ => Since::Pending,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoricSymbols {
    symbols: FxHashMap<String, HistoricSymbol>,
}

impl HistoricSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, FeatureError> {
        let symbols: FxHashMap<String, HistoricSymbol> =
            serde_json::from_str(text).map_err(|e| FeatureError::Malformed {
                id: "history".to_string(),
                detail: e.to_string(),
            })?;
        Ok(Self { symbols })
    }

    pub fn insert(&mut self, path: impl Into<String>, symbol: HistoricSymbol) {
        self.symbols.insert(path.into(), symbol);
    }

    pub fn get(&self, path: &str) -> Option<&HistoricSymbol> {
        self.symbols.get(path)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
