//! texfind CLI

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use texfind_core::cancel::CancellationToken;
use texfind_core::config::TexRoots;
use texfind_core::font::find_font;
use texfind_core::output::{write_json_pretty, write_lookup, write_search_result, PathLookup};
use texfind_core::search::{find_doc, search_by_name, SearchOptions};

/// CLI entrypoint for texfind.
#[derive(Debug, Parser)]
#[command(
    name = "texfind",
    version,
    about = "Locate TeX Live packages, documentation and fonts"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    roots: RootArgs,

    #[command(flatten)]
    search: SearchArgs,

    /// Emit JSON instead of plain text
    #[arg(long = "json", action = ArgAction::SetTrue, global = true)]
    json: bool,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Race the package tree against the documentation tree
    Package(NameArgs),
    /// Look up a font file by exact name, ignoring case
    Font(NameArgs),
    /// Look up documentation whose name starts with the query's stem
    Doc(NameArgs),
}

#[derive(Debug, Args)]
struct NameArgs {
    /// File name to look for, with extension (e.g. amsmath.sty, cmr10.tfm)
    name: String,
}

#[derive(Debug, Args)]
struct RootArgs {
    /// Root of the TeX distribution (the texmf-dist directory)
    #[arg(
        long = "texmf-dist",
        env = "TEXFIND_TEXMF_DIST",
        value_hint = ValueHint::DirPath,
        global = true
    )]
    texmf_dist: Option<PathBuf>,

    /// Override the package tree (default: <texmf-dist>/tex)
    #[arg(long = "package-root", value_hint = ValueHint::DirPath, global = true)]
    package_root: Option<PathBuf>,

    /// Override the font tree (default: <texmf-dist>/fonts)
    #[arg(long = "font-root", value_hint = ValueHint::DirPath, global = true)]
    font_root: Option<PathBuf>,

    /// Override the documentation tree (default: <texmf-dist>/doc)
    #[arg(long = "doc-root", value_hint = ValueHint::DirPath, global = true)]
    doc_root: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Follow symlinks while walking
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue, global = true)]
    follow_symlinks: bool,

    /// Visit entries in file-name order so repeated runs pick the same match
    #[arg(long = "sorted", action = ArgAction::SetTrue, global = true)]
    sorted: bool,

    /// Threads for the package/documentation race
    #[arg(short = 'j', long = "jobs", global = true)]
    jobs: Option<usize>,

    /// Give up on a package query after this many seconds
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    timeout: Option<u64>,
}

impl SearchArgs {
    fn options(&self) -> SearchOptions {
        SearchOptions {
            follow_symlinks: self.follow_symlinks,
            sorted: self.sorted,
            jobs: self.jobs,
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let started = Instant::now();
    let stdout = io::stdout();
    let handle = stdout.lock();
    execute(&cli, handle)?;
    log::info!("elapsed time: {:?}", started.elapsed());

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running under tests.
    env_logger::Builder::from_env(env).try_init().ok();
}

fn execute(cli: &Cli, w: impl Write) -> Result<()> {
    let roots = resolve_roots(&cli.roots)?;
    let opts = cli.search.options();
    log::debug!("searching with {roots:?}");

    match &cli.command {
        Command::Package(args) => {
            let result = search_by_name(&roots, &args.name, &opts)?;
            if cli.json {
                write_json_pretty(&result, w)
            } else {
                write_search_result(&result, &args.name, w)
            }
        }
        Command::Font(args) => {
            let path = find_font(&roots.font_root, &args.name, &opts)?;
            emit_lookup(&args.name, path.as_deref(), cli.json, w)
        }
        Command::Doc(args) => {
            let path = find_doc(&roots.doc_root, &args.name, &opts, &CancellationToken::new())?;
            emit_lookup(&args.name, path.as_deref(), cli.json, w)
        }
    }
}

fn emit_lookup(query: &str, path: Option<&Path>, json: bool, w: impl Write) -> Result<()> {
    let lookup = PathLookup { query, path };
    if json {
        write_json_pretty(&lookup, w)
    } else {
        write_lookup(&lookup, w)
    }
}

fn resolve_roots(args: &RootArgs) -> Result<TexRoots> {
    if let (Some(package), Some(font), Some(doc)) =
        (&args.package_root, &args.font_root, &args.doc_root)
    {
        return Ok(TexRoots::new(package, font, doc));
    }

    let texmf = match &args.texmf_dist {
        Some(dir) => dir.clone(),
        None => discover_texmf_dist()?,
    };
    if !texmf.is_dir() {
        bail!("TeX distribution not found at {}", texmf.display());
    }

    let mut roots = TexRoots::from_texmf_dist(&texmf);
    if let Some(root) = &args.package_root {
        roots = roots.with_package_root(root);
    }
    if let Some(root) = &args.font_root {
        roots = roots.with_font_root(root);
    }
    if let Some(root) = &args.doc_root {
        roots = roots.with_doc_root(root);
    }
    Ok(roots)
}

fn discover_texmf_dist() -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        candidates.extend(newest_texlive(Path::new("/usr/local/texlive")));
        if let Some(home) = std::env::var_os("HOME") {
            candidates.extend(newest_texlive(&PathBuf::from(home).join("texlive")));
        }
    }

    #[cfg(target_os = "linux")]
    {
        candidates.push(PathBuf::from("/usr/share/texlive/texmf-dist"));
        candidates.push(PathBuf::from("/usr/share/texmf-dist"));
    }

    #[cfg(target_os = "windows")]
    {
        candidates.extend(newest_texlive(Path::new(r"C:\texlive")));
    }

    candidates
        .into_iter()
        .find(|p| p.is_dir())
        .ok_or_else(|| {
            anyhow!("no TeX Live installation found; pass --texmf-dist or set TEXFIND_TEXMF_DIST")
        })
}

/// `<base>/<year>/texmf-dist` for the highest numeric year directory under `base`.
fn newest_texlive(base: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(base).ok()?;
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            name.parse::<u32>().ok().map(|year| (year, entry.path()))
        })
        .filter(|(_, path)| path.join("texmf-dist").is_dir())
        .max_by_key(|(year, _)| *year)
        .map(|(_, path)| path.join("texmf-dist"))
}
