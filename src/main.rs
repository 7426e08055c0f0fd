//! lpcdoc: generate Markdown API documentation from documented LPC files.
//!
//! Two modes:
//!
//! - **stdin mode**: `lpcdoc -n room < room.c` prints one document to stdout
//! - **file mode**: `lpcdoc -o docs/api std/*.c` writes `docs/api/<module>.md`
//!
//! With no inputs, the `files` list of `lpc-config.json` is used if present.

use anyhow::{bail, Context, Result};
use clap::Parser;
use lpcdoc::contract::ModuleContract;
use lpcdoc::markdown::DEFAULT_COLUMNS;
use lpcdoc::{extract_module, logger, DocError, ModuleRenderer, ParseContext, RenderOptions};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(
    name = "lpcdoc",
    about = "Generate Markdown API documentation from documented LPC source files"
)]
struct Cli {
    /// Input files (glob patterns and directories supported). If omitted,
    /// uses the files listed in lpc-config.json, else reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Module name for stdin mode
    #[arg(short = 'n', long, default_value = "stdin")]
    name: String,

    /// Wrap paragraphs at this many columns
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    columns: usize,

    /// Write CRLF line endings
    #[arg(long)]
    crlf: bool,

    /// Info string for signature and example code fences
    #[arg(long, default_value = "lpc")]
    lang: String,

    /// Path to lpc-config.json (default: search upward from the first input)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the extracted records as JSON instead of Markdown
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    // Built once; every module in this run shares it.
    let ctx = build_context(&cli)?;
    let renderer = ModuleRenderer::new(RenderOptions {
        columns: cli.columns,
        newline: if cli.crlf { "\r\n" } else { "\n" }.to_string(),
        code_lang: cli.lang.clone(),
    });

    let inputs = if cli.files.is_empty() {
        ctx.root_files()
    } else {
        cli.files.clone()
    };

    if inputs.is_empty() {
        return stdin_mode(&cli, &ctx, &renderer);
    }

    file_mode(&cli, &ctx, &renderer, &inputs)
}

fn build_context(cli: &Cli) -> Result<ParseContext> {
    if let Some(path) = &cli.config {
        return ParseContext::load(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }

    let start = match cli.files.first() {
        Some(first) => search_root(first),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    ParseContext::discover(&start).context("failed to load lpc-config.json")
}

/// Directory to start the config search from for an input argument.
/// `std/*.c` → `std`, `room.c` → `.`
fn search_root(input: &str) -> PathBuf {
    let path = Path::new(input);
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// stdin mode: read one module from stdin and print it to stdout.
fn stdin_mode(cli: &Cli, ctx: &ParseContext, renderer: &ModuleRenderer) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let functions = extract_module(ctx, "<stdin>", &input)?;

    if cli.json {
        if functions.is_empty() {
            return Err(DocError::NoContent.into());
        }
        println!("{}", ModuleContract::new(&functions).to_json()?);
        return Ok(());
    }

    let rendered = renderer.render(&cli.name, &functions)?;
    print!("{}", rendered.dest_content);
    Ok(())
}

/// file mode: one output file per input module.
fn file_mode(
    cli: &Cli,
    ctx: &ParseContext,
    renderer: &ModuleRenderer,
    inputs: &[String],
) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files: Vec<PathBuf> = expand_globs(inputs)?
        .into_iter()
        .filter(|path| {
            let excluded = ctx.is_excluded(path);
            if excluded {
                debug!("excluded {}", path.display());
            }
            !excluded
        })
        .collect();

    let modules = module_names(&input_files);
    let mut written = HashSet::new();

    for (path, module) in input_files.iter().zip(modules) {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let functions = match extract_module(ctx, &path.to_string_lossy(), &content) {
            Ok(functions) => functions,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let (dest_file, dest_content) = if cli.json {
            if functions.is_empty() {
                info!("skipping {}: {}", path.display(), DocError::NoContent);
                continue;
            }
            (
                format!("{}.json", module),
                ModuleContract::new(&functions).to_json()?,
            )
        } else {
            match renderer.render(&module, &functions) {
                Ok(rendered) => (rendered.dest_file, rendered.dest_content),
                Err(DocError::NoContent) => {
                    info!("skipping {}: {}", path.display(), DocError::NoContent);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        };

        if !written.insert(dest_file.clone()) {
            bail!(
                "{} maps to {}, which an earlier input already wrote",
                path.display(),
                dest_file
            );
        }
        let out_path = output_dir.join(&dest_file);
        fs::write(&out_path, &dest_content)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        debug!("wrote {}", out_path.display());
    }

    Ok(())
}

/// File extensions recognized as LPC sources.
const SUPPORTED_EXTENSIONS: &[&str] = &["c", "h", "lpc"];

/// Resolve file, directory and glob arguments to a sorted list of sources.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            files.extend(lpc_files_in(path)?);
        } else {
            let before = files.len();
            for entry in glob::glob(pattern)
                .with_context(|| format!("invalid glob pattern: {}", pattern))?
                .flatten()
            {
                if entry.is_file() {
                    files.push(entry);
                }
            }
            if files.len() == before {
                warn!("no files matched: {}", pattern);
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Supported sources directly inside `dir`.
fn lpc_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;
    Ok(entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && is_lpc_source(p))
        .collect())
}

fn is_lpc_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Module name of each source: the file stem, qualified with as many parent
/// directories as it takes to tell inputs apart.
/// `["a/room.c", "b/room.c", "a/obj.c"]` → `["a.room", "b.room", "obj"]`
fn module_names(paths: &[PathBuf]) -> Vec<String> {
    let parts: Vec<Vec<String>> = paths.iter().map(|p| name_parts(p)).collect();
    let mut depth = vec![1; paths.len()];

    loop {
        let names: Vec<String> = parts
            .iter()
            .zip(&depth)
            .map(|(parts, &depth)| parts[parts.len() - depth..].join("."))
            .collect();

        let mut deepened = false;
        for (i, name) in names.iter().enumerate() {
            let clashes = names
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && name == other);
            if clashes && depth[i] < parts[i].len() {
                depth[i] += 1;
                deepened = true;
            }
        }
        if !deepened {
            return names;
        }
    }
}

/// "std/room.c" → `["std", "room"]`. Never empty.
fn name_parts(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = path
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let stem = path
        .file_stem()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned();
    parts.push(stem);
    parts
}
