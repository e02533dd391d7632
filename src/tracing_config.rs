//! Log output for the compiler pipeline.
//!
//! Every stage records a span, so a trace reads top-down as the pipeline
//! runs:
//!
//! ```text
//! parse_namespace{namespace=alarms}
//! compile
//!   prune{count=12}
//!     prune_namespace{namespace=alarms}
//!       query{path="alarms.create"}
//!         feature rejected gate="allowlist"
//!   render{namespaces=12}
//! ```
//!
//! `EXTDTS_LOG` holds the filter (`RUST_LOG` syntax, with `RUST_LOG` as the
//! fallback) and `EXTDTS_LOG_FORMAT` picks the layout: `text`, `tree`
//! (`tracing-tree`, best for following one feature query) or `json`.
//!
//! ```bash
//! # Why did a namespace disappear from the output?
//! EXTDTS_LOG=extdts_features=debug,extdts_schema=debug EXTDTS_LOG_FORMAT=tree \
//!     extdts schemas/ -f features/
//!
//! # Every work-list step of every query, for tooling
//! EXTDTS_LOG=extdts_features=trace EXTDTS_LOG_FORMAT=json extdts schemas/ -f features/
//! ```
//!
//! Logs always go to stderr (the `tracing-tree` default); stdout may be
//! carrying the declaration file.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "EXTDTS_LOG";
const LOG_FORMAT_VAR: &str = "EXTDTS_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    /// Indented span tree; a pruned symbol sits under its namespace.
    Tree,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Unknown names fall back to [`LogFormat::Text`].
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// The configured filter, or `None` when logging was not asked for.
fn filter_from_env() -> Option<EnvFilter> {
    match std::env::var(LOG_VAR) {
        Ok(directives) => Some(EnvFilter::builder().parse_lossy(directives)),
        Err(_) if std::env::var_os("RUST_LOG").is_some() => Some(EnvFilter::from_default_env()),
        Err(_) => None,
    }
}

/// Install the global subscriber if `EXTDTS_LOG` or `RUST_LOG` is set.
pub fn init_tracing() {
    let Some(filter) = filter_from_env() else {
        return;
    };
    let format = LogFormat::parse(&std::env::var(LOG_FORMAT_VAR).unwrap_or_default());

    let registry = Registry::default().with(filter);
    match format {
        LogFormat::Tree => registry
            .with(
                tracing_tree::HierarchicalLayer::default()
                    .with_indent_amount(2)
                    .with_indent_lines(true)
                    .with_deferred_spans(true)
                    .with_targets(true),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::LogFormat;

    #[test]
    fn test_log_format_names() {
        assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    }
}
