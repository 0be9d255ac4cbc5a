//! `useai`: generate the bodies of `"use ai"` functions from the command line

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use useai_cache::GenerationCache;
use useai_directive::Metadata;
use useai_core::{
    scan, Dialect, FingerprintMode, Generator, PluginConfig, PluginOptions, Scheduling, CONFIG_FILE,
};

mod logging;

fn cli() -> Command {
    let config_arg = Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("Configuration file (default: ./useai.toml when present)");
    let cache_arg = Arg::new("cache")
        .long("cache")
        .value_parser(value_parser!(PathBuf))
        .help("Cache file (default: ./.ai-cache.json)");

    Command::new("useai")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate the bodies of functions marked with the \"use ai\" directive")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .subcommand(
            Command::new("transform")
                .about("Generate every marked function in a file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("TypeScript or JavaScript source file"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the result here instead of stdout"),
                )
                .arg(config_arg.clone())
                .arg(cache_arg.clone())
                .arg(
                    Arg::new("model")
                        .long("model")
                        .help("Default model"),
                )
                .arg(
                    Arg::new("temperature")
                        .long("temperature")
                        .value_parser(value_parser!(f64))
                        .help("Default temperature"),
                )
                .arg(
                    Arg::new("fingerprint")
                        .long("fingerprint")
                        .value_parser(["signature", "source"])
                        .help("Cache fingerprint text"),
                )
                .arg(
                    Arg::new("blocking")
                        .long("blocking")
                        .action(ArgAction::SetTrue)
                        .help("Generate one function at a time"),
                ),
        )
        .subcommand(
            Command::new("scan")
                .about("List marked functions and their hints without generating")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("cache")
                .about("Inspect or clear the generation cache")
                .subcommand_required(true)
                .arg(config_arg)
                .arg(cache_arg)
                .subcommand(Command::new("size").about("Number of cached entries"))
                .subcommand(Command::new("clear").about("Remove every cached entry")),
        )
}

/// Options from the config file, when one is given or present
fn file_options(args: &ArgMatches) -> Result<PluginOptions> {
    if let Some(path) = args.get_one::<PathBuf>("config") {
        return PluginOptions::load(path).with_context(|| format!("loading {}", path.display()));
    }
    let default = Path::new(CONFIG_FILE);
    if default.is_file() {
        debug!(path = %default.display(), "using configuration file");
        return PluginOptions::load(default).context("loading useai.toml");
    }
    Ok(PluginOptions::new())
}

/// Options given as flags
///
/// Each id is looked up on its own since `cache` defines only `--cache`.
fn flag_options(args: &ArgMatches) -> Result<PluginOptions> {
    let mut options = PluginOptions::new();
    options.cache_path = flag::<PathBuf>(args, "cache");
    options.model = flag::<String>(args, "model");
    options.temperature = flag::<f64>(args, "temperature");
    options.fingerprint = flag::<String>(args, "fingerprint")
        .map(|s| s.parse::<FingerprintMode>())
        .transpose()?;
    if flag::<bool>(args, "blocking").unwrap_or(false) {
        options.scheduling = Some(Scheduling::Blocking);
    }
    Ok(options)
}

/// Value of `id`, or `None` when absent or not defined for this subcommand
fn flag<T: Clone + Send + Sync + 'static>(args: &ArgMatches, id: &str) -> Option<T> {
    args.try_get_one::<T>(id).ok().flatten().cloned()
}

fn read_source(path: &Path) -> Result<(String, Dialect)> {
    let dialect = Dialect::detect(path)?;
    let source =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok((source, dialect))
}

async fn run_transform(args: &ArgMatches) -> Result<()> {
    let Some(file) = args.get_one::<PathBuf>("file") else {
        bail!("missing source file");
    };
    let (source, dialect) = read_source(file)?;

    let options = file_options(args)?.overlay(flag_options(args)?);
    let config = PluginConfig::resolve(options)?;
    let generator = Generator::from_config(config)?;

    let output = generator.transform_source(&source, dialect).await?;
    info!(file = %file.display(), rewritten = output.rewritten.len(), "done");

    match args.get_one::<PathBuf>("output") {
        Some(out) => std::fs::write(out, &output.code)
            .with_context(|| format!("writing {}", out.display()))?,
        None => print!("{}", output.code),
    }
    Ok(())
}

fn run_scan(args: &ArgMatches) -> Result<()> {
    let Some(file) = args.get_one::<PathBuf>("file") else {
        bail!("missing source file");
    };
    let (source, dialect) = read_source(file)?;

    let targets = scan(&source, dialect)?;
    if targets.is_empty() {
        println!("no marked functions in {}", file.display());
    }
    for target in targets {
        println!("{}:{}  {}", file.display(), target.line, target.name);
        println!("    {}", target.signature);
        if !target.metadata.is_empty() {
            println!("    hints: {}", describe_hints(&target.metadata));
        }
    }
    Ok(())
}

fn describe_hints(metadata: &Metadata) -> String {
    let mut parts = Vec::new();
    if let Some(model) = &metadata.model {
        parts.push(format!("model={model}"));
    }
    if let Some(temperature) = &metadata.temperature {
        parts.push(format!("temperature={temperature}"));
    }
    if let Some(seed) = &metadata.seed {
        parts.push(format!("seed={seed}"));
    }
    if let Some(instructions) = &metadata.instructions {
        parts.push(format!("instructions={instructions}"));
    }
    parts.join(", ")
}

fn run_cache(args: &ArgMatches) -> Result<()> {
    let options = file_options(args)?.overlay(flag_options(args)?);
    let path = options
        .cache_path
        .unwrap_or_else(|| PathBuf::from(useai_cache::DEFAULT_CACHE_FILE));
    let cache = GenerationCache::open(&path);

    match args.subcommand() {
        Some(("size", _)) => println!("{}", cache.len()),
        Some(("clear", _)) => {
            let removed = cache.len();
            cache.clear();
            cache.save()?;
            println!("removed {removed} entries from {}", cache.path().display());
        }
        _ => bail!("unknown cache command"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    logging::init(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("transform", args)) => run_transform(args).await,
        Some(("scan", args)) => run_scan(args),
        Some(("cache", args)) => run_cache(args),
        _ => Ok(()),
    }
}
