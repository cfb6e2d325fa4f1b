//! stimseq - command line front end for the balanced sequence generator.
//!
//! Examples:
//!   stimseq generate -k 2 -p 6 -n 30 --seed 42
//!   stimseq generate -f json -o run.json
//!   stimseq verify run.json
//!   stimseq check -k 2 -p 5
//!   stimseq paths
//!
//! Sequences go to stdout (or `--output`); logs go to stderr.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stimseq::export;
use stimseq::observer::RunAdapter;
use stimseq::orchestrator::Orchestrator;
use stimseq::verifier;
use tracing::{debug, error, info, warn, Level};

mod args;
mod error;
mod paths;
mod settings;

use args::{Command, Overrides, Verbosity, USAGE};
use error::CliError;
use paths::AppPaths;
use settings::Settings;

fn init_logging(verbosity: Verbosity) {
    let level = match verbosity {
        Verbosity::Quiet => Level::WARN,
        Verbosity::Normal => Level::INFO,
        Verbosity::Verbose => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn resolve_settings(overrides: &Overrides) -> Result<Settings, CliError> {
    // A missing config dir only matters when nothing else names a file.
    let default_file = match AppPaths::new() {
        Ok(p) => Some(p.config_file()),
        Err(e) => {
            debug!("{}", e);
            None
        }
    };
    let settings = settings::resolve(overrides, default_file.as_deref(), |name| {
        std::env::var(name).ok()
    })?;
    if let Some(path) = &settings.source {
        debug!("Settings file: {:?}", path);
    }
    Ok(settings)
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>, CliError> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn cmd_generate(overrides: &Overrides) -> Result<(), CliError> {
    let settings = resolve_settings(overrides)?;
    let orchestrator = Orchestrator::new(settings.run)?;
    let cfg = orchestrator.config();

    let effective = cfg.tier.effective();
    if effective != cfg.tier {
        warn!(
            "Requested execution tier {:?} but using {:?} (built without the parallel feature)",
            cfg.tier,
            effective
        );
    }

    let run = orchestrator.run()?;
    info!(
        "Generated {} verified blocks (K={} P={} seed={})",
        run.blocks.len(),
        cfg.sequence.ordinary_categories,
        cfg.sequence.presentations_per_category,
        run.seed().unwrap_or_default(),
    );

    if overrides.stats {
        let summary = RunAdapter::new(&run).summary();
        for b in &summary.blocks {
            info!(
                "block {:>3}: predecessors={:?} longest special run={} longest ordinary run={}",
                b.index, b.tables.predecessors, b.longest_special_run, b.longest_ordinary_run
            );
        }
        info!(
            "max special run={} max ordinary run={}",
            summary.max_special_run(),
            summary.max_ordinary_run()
        );
    }

    let mut out = open_output(overrides.output.as_ref())?;
    export::write_run(&mut out, &run, settings.format)?;
    out.flush()?;
    if let Some(path) = &overrides.output {
        info!("Wrote {:?} ({:?})", path, settings.format);
    }
    Ok(())
}

fn cmd_verify(file: &Path, overrides: &Overrides) -> Result<(), CliError> {
    let text = fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    let imported = export::import_blocks(&text).map_err(|source| CliError::Parse {
        path: file.to_path_buf(),
        source,
    })?;

    // Blocks from a JSON run carry their own shape; flags can still override it.
    let settings = resolve_settings(overrides)?;
    let mut cfg = imported.sequence.unwrap_or(settings.run.sequence);
    if let Some(k) = overrides.categories {
        cfg.ordinary_categories = k;
    }
    if let Some(p) = overrides.presentations {
        cfg.presentations_per_category = p;
    }
    cfg.validate()?;

    let mut failed = 0;
    for (i, block) in imported.blocks.iter().enumerate() {
        let violations = verifier::audit(block, &cfg);
        if violations.is_empty() {
            println!("block {i}: ok");
            continue;
        }
        failed += 1;
        for v in &violations {
            println!("block {i}: {v}");
        }
    }

    let total = imported.blocks.len();
    if failed > 0 {
        error!("{} of {} blocks unbalanced", failed, total);
        return Err(CliError::VerifyFailed { failed, total });
    }
    info!(
        "All {} blocks balanced (K={} P={})",
        total, cfg.ordinary_categories, cfg.presentations_per_category
    );
    Ok(())
}

fn cmd_check(overrides: &Overrides) -> Result<(), CliError> {
    let settings = resolve_settings(overrides)?;
    let seq = settings.run.sequence;
    seq.validate()?;

    println!("ordinary categories       {}", seq.ordinary_categories);
    println!("presentations / category  {}", seq.presentations_per_category);
    println!("special category label    {}", seq.special());
    println!("special presentations     {}", seq.special_presentations());
    println!("pairs per predecessor     {}", seq.pairs_per_predecessor());
    println!("fillers per category      {}", seq.fillers_per_category());
    println!("block length              {}", seq.block_len());
    println!("blocks per run            {}", settings.run.blocks);
    Ok(())
}

fn cmd_paths() -> Result<(), CliError> {
    let paths = AppPaths::new()?;
    let file = paths.config_file();
    println!("Config directory: {}", paths.config_dir().display());
    println!(
        "Config file: {} ({})",
        file.display(),
        if file.is_file() { "present" } else { "absent" }
    );
    Ok(())
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let cli = match args::parse(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}\n");
            eprint!("{USAGE}");
            return ExitCode::from(e.exit_code());
        }
    };

    init_logging(cli.verbosity);

    let result = match &cli.command {
        Command::Generate(o) => cmd_generate(o),
        Command::Verify { file, overrides } => cmd_verify(file, overrides),
        Command::Check(o) => cmd_check(o),
        Command::Paths => cmd_paths(),
        Command::Help => {
            print!("{USAGE}");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
