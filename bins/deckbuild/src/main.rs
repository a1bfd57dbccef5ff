#[macro_use]
extern crate log;

use clap::{Args, Parser, Subcommand};
use deckforge::compliance::Status;
use deckforge::config::{EnforcementMode, EnvSettings, TagMode};
use deckforge::random_entry::{self, RandomOptions};
use deckforge::resolver::normalize_card_name;
use deckforge::{BuildConfig, BuildError, Catalog, PolicyStore};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::exit;

#[derive(Parser)]
#[command(name = "deckbuild", about = "Commander deck construction engine")]
struct Cli {
    /// Tagged catalog file (.csv or compiled)
    #[arg(long, global = true, default_value = "cards.csv")]
    catalog: PathBuf,
    /// Directory holding policy JSON lists (game_changers.json, combos.json, ...)
    #[arg(long, global = true)]
    policies: Option<PathBuf>,
    /// Output directory for exports (defaults to $DECK_EXPORTS)
    #[arg(long, global = true)]
    out: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a deck for a chosen commander
    Build(BuildArgs),
    /// Pick a commander at random from a theme-filtered pool, then build
    Random(RandomArgs),
}

#[derive(Args)]
struct BuildArgs {
    #[arg(long)]
    commander: String,
    /// Comma-separated: PRIMARY[,SECONDARY[,TERTIARY]]
    #[arg(long, default_value = "")]
    themes: String,
    #[arg(long, default_value_t = 2)]
    bracket: u8,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Combine themes with OR instead of AND
    #[arg(long)]
    or_mode: bool,
    /// Restrict the pool to the owned-cards collection
    #[arg(long)]
    owned_only: bool,
    /// Apply enforcement when compliance fails
    #[arg(long)]
    enforce: bool,
    /// JSON build request; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct RandomArgs {
    #[arg(long)]
    theme: Option<String>,
    #[arg(long)]
    secondary: Option<String>,
    #[arg(long)]
    tertiary: Option<String>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 2)]
    bracket: u8,
    #[arg(long)]
    strict: bool,
    #[arg(long)]
    auto_fill: bool,
}

/// Card names from *.txt files under the owned-cards directory, one per line
fn load_owned(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("txt") {
                if let Ok(text) = std::fs::read_to_string(&path) {
                    for line in text.lines() {
                        let line = line.trim();
                        if !line.is_empty() && !line.starts_with('#') {
                            names.push(line.to_string());
                        }
                    }
                }
            }
        }
    }
    names
}

fn build_config(args: &BuildArgs, env: &EnvSettings) -> Result<BuildConfig, BuildError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text)?
        }
        None => BuildConfig::default(),
    };
    config.commander = args.commander.clone();
    if !args.themes.is_empty() {
        config.themes = args
            .themes
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }
    config.bracket_level = args.bracket;
    config.seed = args.seed;
    if args.or_mode {
        config.tag_mode = TagMode::Or;
    }
    if args.enforce {
        config.enforcement_mode = EnforcementMode::Enforce;
    }
    if args.owned_only {
        config.use_owned_only = true;
    }
    if config.owned_names.is_empty() {
        if let Some(dir) = &env.owned_cards_dir {
            config.owned_names = load_owned(dir);
        }
    }
    Ok(config)
}

fn load_policies(path: &Option<PathBuf>) -> Result<PolicyStore, BuildError> {
    match path {
        Some(dir) => PolicyStore::load_dir(dir),
        None => Ok(PolicyStore::fallback()),
    }
}

fn export_stem(commander: &str, seed: u64) -> String {
    let slug: String = commander
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("{}_{}", slug.trim_matches('_'), seed)
}

fn run(cli: Cli) -> Result<i32, BuildError> {
    let env = EnvSettings::from_env();
    let catalog = Catalog::load(&cli.catalog)?;
    let policies = load_policies(&cli.policies)?;
    let out_dir = cli.out.clone().unwrap_or_else(|| env.deck_exports.clone());

    let result = match &cli.command {
        Command::Build(args) => {
            let config = build_config(args, &env)?;
            deckforge::DeckBuilder::new(&catalog, config)?.run(&policies)?
        }
        Command::Random(args) => {
            if !env.random_modes {
                warn!("RANDOM_MODES is not enabled; proceeding anyway");
            }
            let mut base = BuildConfig::default();
            base.bracket_level = args.bracket;
            let options = RandomOptions {
                seed: args.seed,
                attempts: env.random_max_attempts,
                timeout: std::time::Duration::from_millis(env.random_timeout_ms),
                strict_theme_match: args.strict,
                auto_fill_secondary: args.auto_fill,
                auto_fill_tertiary: args.auto_fill,
                ..RandomOptions::default()
            };
            let (selection, result) = random_entry::build_random_full_deck(
                &catalog,
                &policies,
                base,
                args.theme.as_deref(),
                args.secondary.as_deref(),
                args.tertiary.as_deref(),
                &options,
            )?;
            info!(
                "random pick: {} (themes {:?}, fallback: {:?})",
                selection.commander, selection.resolved_themes, selection.fallback_reason
            );
            result
        }
    };

    let owned: HashSet<String> = match &cli.command {
        Command::Build(args) => build_config(args, &env)?
            .owned_names
            .iter()
            .map(|n| normalize_card_name(n))
            .collect(),
        Command::Random(_) => HashSet::new(),
    };
    let stem = export_stem(&result.commander, result.diagnostics.seed);
    let suppress = matches!(cli.command, Command::Random(_)) && env.random_suppress_initial_export;
    if !suppress {
        let written = deckforge::export::write_all(&result, &catalog, &owned, &out_dir, &stem)?;
        for path in &written {
            println!("wrote {}", path.display());
        }
    }

    println!(
        "{}: {} cards, compliance {:?} ({} warnings)",
        result.commander,
        result.decklist.iter().map(|e| e.count).sum::<u32>(),
        result.compliance.overall,
        result.diagnostics.warnings.len()
    );
    for message in &result.compliance.messages {
        println!("  {}", message);
    }
    Ok(match result.compliance.overall {
        Status::Fail => 2,
        _ => 0,
    })
}

fn main() {
    let _ = env_logger::try_init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => exit(code),
        Err(err) => {
            eprintln!("error: {}", err);
            exit(err.exit_code());
        }
    }
}
