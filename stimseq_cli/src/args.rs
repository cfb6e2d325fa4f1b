//! Hand-rolled argument parsing.

use std::path::PathBuf;

use stimseq::config::ExecutionTier;
use stimseq::export::Format;

use crate::error::CliError;

pub const USAGE: &str = "\
stimseq - predecessor-balanced stimulus sequences

Usage: stimseq [-v|-q] <command> [options]

Commands:
  generate                    Generate and verify blocks, print them
  verify <file.json>          Re-verify blocks from a JSON run or array of arrays
  check                       Validate a configuration and print derived counts
  paths                       Show the user config file location
  help                        Show this message

Options (generate, verify, check):
  -k, --categories <K>        Ordinary categories (special category is K)
  -p, --presentations <P>     Presentations per ordinary category per block
  -n, --blocks <N>            Blocks per run (generate)
      --seed <S>              Run seed (default: drawn and reported)
      --tier <sequential|parallel>
      --parallel              Same as --tier parallel
      --config <file.json>    Settings file (default: user config file if present)
  -f, --format <list|column|json>
  -o, --output <file>         Write sequences to a file instead of stdout
      --stats                 Log a per-block summary

Environment:
  STIMSEQ_SEED, STIMSEQ_EXEC_TIER override the settings file; flags override both.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub categories: Option<usize>,
    pub presentations: Option<usize>,
    pub blocks: Option<usize>,
    pub seed: Option<u64>,
    pub tier: Option<ExecutionTier>,
    pub config: Option<PathBuf>,
    pub format: Option<Format>,
    pub output: Option<PathBuf>,
    pub stats: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate(Overrides),
    Verify { file: PathBuf, overrides: Overrides },
    Check(Overrides),
    Paths,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub verbosity: Verbosity,
    pub command: Command,
}

fn usage_err(msg: impl Into<String>) -> CliError {
    CliError::Usage(msg.into())
}

fn value<'a>(flag: &str, it: &mut impl Iterator<Item = &'a String>) -> Result<&'a str, CliError> {
    it.next()
        .map(String::as_str)
        .ok_or_else(|| usage_err(format!("{flag} needs a value")))
}

fn number<T: std::str::FromStr>(
    flag: &str,
    it: &mut std::slice::Iter<'_, String>,
) -> Result<T, CliError> {
    let raw = value(flag, it)?;
    raw.parse()
        .map_err(|_| usage_err(format!("{flag} must be a non-negative integer, got {raw:?}")))
}

pub fn parse(args: &[String]) -> Result<Cli, CliError> {
    let mut verbosity = Verbosity::Normal;
    let mut it = args.iter();

    let cmd = loop {
        match it.next().map(String::as_str) {
            Some("-v") | Some("--verbose") => verbosity = Verbosity::Verbose,
            Some("-q") | Some("--quiet") => verbosity = Verbosity::Quiet,
            Some(cmd) => break cmd,
            None => return Err(usage_err("missing command")),
        }
    };

    let command = match cmd {
        "generate" | "gen" => Command::Generate(parse_overrides(&mut it, None)?),
        "verify" => {
            let mut file = None;
            let overrides = parse_overrides(&mut it, Some(&mut file))?;
            let file = file.ok_or_else(|| usage_err("verify needs a file"))?;
            Command::Verify { file, overrides }
        }
        "check" => Command::Check(parse_overrides(&mut it, None)?),
        "paths" => Command::Paths,
        "help" | "-h" | "--help" => Command::Help,
        other => return Err(usage_err(format!("unknown command: {other}"))),
    };

    Ok(Cli { verbosity, command })
}

fn parse_overrides(
    it: &mut std::slice::Iter<'_, String>,
    mut positional: Option<&mut Option<PathBuf>>,
) -> Result<Overrides, CliError> {
    let mut o = Overrides::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-k" | "--categories" => o.categories = Some(number(arg, it)?),
            "-p" | "--presentations" => o.presentations = Some(number(arg, it)?),
            "-n" | "--blocks" => o.blocks = Some(number(arg, it)?),
            "--seed" => o.seed = Some(number(arg, it)?),
            "--tier" => {
                let raw = value(arg, it)?;
                o.tier = Some(
                    ExecutionTier::parse(raw)
                        .ok_or_else(|| usage_err(format!("unknown tier: {raw}")))?,
                );
            }
            "--parallel" => o.tier = Some(ExecutionTier::Parallel),
            "--config" => o.config = Some(PathBuf::from(value(arg, it)?)),
            "-f" | "--format" => {
                let raw = value(arg, it)?;
                o.format = Some(
                    Format::parse(raw).ok_or_else(|| usage_err(format!("unknown format: {raw}")))?,
                );
            }
            "-o" | "--output" => o.output = Some(PathBuf::from(value(arg, it)?)),
            "--stats" => o.stats = true,
            flag if flag.starts_with('-') => {
                return Err(usage_err(format!("unknown option: {flag}")));
            }
            other => match positional.as_deref_mut() {
                Some(slot) if slot.is_none() => *slot = Some(PathBuf::from(other)),
                _ => return Err(usage_err(format!("unexpected argument: {other}"))),
            },
        }
    }

    Ok(o)
}
