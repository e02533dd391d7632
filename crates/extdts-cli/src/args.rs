use clap::Parser;
use std::path::PathBuf;

use extdts::{CompileOptions, RenderOptions, ResolverOptions};

/// Root namespace used unless `--root-namespace` or `--no-root` says otherwise.
pub const DEFAULT_ROOT_NAMESPACE: &str = "chrome";

/// CLI arguments for the extdts binary.
#[derive(Parser, Debug)]
#[command(
    name = "extdts",
    version,
    about = "Compile extension API schemas into a TypeScript declaration file"
)]
pub struct CliArgs {
    // ==================== Inputs ====================
    /// Schema JSON files, or directories searched recursively for them.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory holding `_api_features.json` and its sibling feature files.
    #[arg(short = 'f', long)]
    pub features: PathBuf,

    /// Historic symbol JSON used for `@since` and deprecation tags.
    #[arg(long)]
    pub history: Option<PathBuf>,

    // ==================== Output ====================
    /// Write the declaration file here instead of stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Also write every rendered symbol path as JSON.
    #[arg(long)]
    pub symbols: Option<PathBuf>,

    /// Namespace wrapping every schema namespace.
    #[arg(long = "root-namespace", conflicts_with = "no_root")]
    pub root_namespace: Option<String>,

    /// Emit each schema namespace as a top-level `declare namespace`.
    #[arg(long = "no-root")]
    pub no_root: bool,

    /// Order members by name instead of schema order.
    #[arg(long)]
    pub sort: bool,

    /// Spaces per indentation level.
    #[arg(long, default_value_t = 2)]
    pub indent: usize,

    // ==================== Feature Gates ====================
    /// Keep features flagged `internal`.
    #[arg(long = "allow-internal")]
    pub allow_internal: bool,

    /// Keep features whose `session_types` exclude regular sessions.
    #[arg(long = "allow-non-regular-sessions")]
    pub allow_non_regular_sessions: bool,

    // ==================== Performance ====================
    /// Worker threads for parsing schema files. Defaults to the CPU count.
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
}

impl CliArgs {
    pub fn compile_options(&self) -> CompileOptions {
        let root_namespace = if self.no_root {
            None
        } else {
            Some(
                self.root_namespace
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ROOT_NAMESPACE.to_string()),
            )
        };

        CompileOptions {
            resolver: ResolverOptions {
                reject_non_regular_sessions: !self.allow_non_regular_sessions,
                reject_internal: !self.allow_internal,
            },
            render: RenderOptions {
                root_namespace,
                sort_members: self.sort,
                indent: " ".repeat(self.indent),
            },
        }
    }
}
