//! Compilation driver: file discovery, loading and output.

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use extdts::features::FeatureKind;
use extdts::schema::parse_namespaces_json;
use extdts::{Compiler, HistoricSymbols, Namespace, RawFeatureTables, SymbolTable};

use crate::args::CliArgs;

/// What one run produced.
#[derive(Debug)]
pub struct CompilationResult {
    pub declarations: String,
    pub files: usize,
    pub namespaces: usize,
    pub symbols: Option<SymbolTable>,
}

/// Expand the inputs into schema files. Directories are searched
/// recursively for `.json` files; feature files (leading `_`) are skipped.
pub fn discover_schemas(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            bail!("input not found: {}", input.display());
        }

        for entry in WalkDir::new(input).follow_links(true) {
            let entry = entry.with_context(|| format!("failed to walk {}", input.display()))?;
            let path = entry.path();
            if path.is_dir() || !is_schema_file(path) {
                continue;
            }
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_schema_file(path: &Path) -> bool {
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let is_feature_file = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('_'));
    is_json && !is_feature_file
}

/// Load every feature file present in `dir`. The API feature file is
/// required; the others are optional.
pub fn load_feature_tables(dir: &Path) -> Result<RawFeatureTables> {
    let mut tables = RawFeatureTables::new();

    for kind in FeatureKind::ALL {
        let path = dir.join(kind.file_name());
        if !path.is_file() {
            if kind == FeatureKind::Api {
                bail!("missing {}", path.display());
            }
            debug!(path = %path.display(), "feature file absent");
            continue;
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        tables
            .load_json(kind, &text)
            .with_context(|| format!("invalid feature file {}", path.display()))?;
    }

    Ok(tables)
}

pub fn load_history(path: &Path) -> Result<HistoricSymbols> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    HistoricSymbols::from_json(&text)
        .with_context(|| format!("invalid history file {}", path.display()))
}

/// Parse schema files in parallel. The result keeps file order.
pub fn parse_schemas(files: &[PathBuf], jobs: Option<usize>) -> Result<Vec<Namespace>> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build().context("failed to start worker pool")?;

    let parsed: Vec<Vec<Namespace>> = pool.install(|| {
        files
            .par_iter()
            .map(|path| -> Result<Vec<Namespace>> {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                parse_namespaces_json(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))
            })
            .collect::<Result<_>>()
    })?;

    Ok(parsed.into_iter().flatten().collect())
}

/// Run one compilation as described by `args`, without writing anything.
pub fn compile(args: &CliArgs) -> Result<CompilationResult> {
    let files = discover_schemas(&args.inputs)?;
    if files.is_empty() {
        bail!("no schema files found");
    }

    let tables = load_feature_tables(&args.features)?;
    let mut compiler = Compiler::new(tables, args.compile_options());
    if let Some(path) = &args.history {
        compiler = compiler.with_history(load_history(path)?);
    }

    let namespaces = parse_schemas(&files, args.jobs)?;
    let count = namespaces.len();
    info!(files = files.len(), namespaces = count, "parsed schemas");

    let (declarations, symbols) = if args.symbols.is_some() {
        let mut table = SymbolTable::new();
        let out = compiler.compile_with_observer(namespaces, &mut table)?;
        (out, Some(table))
    } else {
        (compiler.compile(namespaces)?, None)
    };

    Ok(CompilationResult {
        declarations,
        files: files.len(),
        namespaces: count,
        symbols,
    })
}

/// Compile and write every requested output.
pub fn run(args: &CliArgs) -> Result<CompilationResult> {
    let result = compile(args)?;

    match &args.output {
        Some(path) => write_file(path, &result.declarations)?,
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(result.declarations.as_bytes())
                .context("failed to write declarations to stdout")?;
        }
    }

    if let (Some(path), Some(table)) = (&args.symbols, &result.symbols) {
        let json = serde_json::to_string_pretty(&table.to_json())
            .context("failed to serialize symbol table")?;
        write_file(path, &json)?;
    }

    Ok(result)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
