use clap::ArgMatches;
use colored::Colorize;
use outlink_core::checkpoint::CheckpointStore;
use outlink_core::crawl::{
    CrawlOptions, CrawlProgressCallback, execute_crawl, generate_crawl_report,
};
use outlink_scanner::{DEFAULT_ACCEPT_SUFFIXES, DomainTarget, Strategy, seed_url};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

// Helper functions for the crawl handler

/// Validate a seed host, returning the URL that will be fetched first
pub fn parse_seed(raw: &str) -> Result<String, String> {
    seed_url(raw).map_err(|e| format!("Invalid seed '{}': {}", raw, e))
}

/// Expand `~` in a state directory argument
pub fn resolve_state_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn parse_strategy(raw: &str) -> Result<Strategy, String> {
    match raw.to_lowercase().as_str() {
        "links" => Ok(Strategy::Links),
        "domains" => Ok(Strategy::Domains),
        other => Err(format!("Unknown strategy '{}'", other)),
    }
}

/// Combine explicit `--accept` suffixes with the optional built-in list.
/// `None` means no filtering at all.
pub fn accept_suffixes_from(explicit: Vec<String>, use_default: bool) -> Option<Vec<String>> {
    let mut suffixes: Vec<String> = explicit
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if use_default {
        for suffix in DEFAULT_ACCEPT_SUFFIXES {
            if !suffixes.iter().any(|s| s == suffix) {
                suffixes.push(suffix.to_string());
            }
        }
    }
    (!suffixes.is_empty()).then_some(suffixes)
}

/// Map parsed `crawl` arguments onto crawl options
pub fn crawl_options_from_args(args: &ArgMatches) -> Result<CrawlOptions, String> {
    let host = args
        .get_one::<String>("HOST")
        .ok_or("A seed host is required")?;
    let seed = parse_seed(host)?;
    let state_dir = resolve_state_dir(
        args.get_one::<String>("state-dir")
            .map(String::as_str)
            .unwrap_or("."),
    );

    let mut options = CrawlOptions::new(seed, state_dir);
    if let Some(depth) = args.get_one::<usize>("depth") {
        options.max_depth = *depth;
    }
    if let Some(max_urls) = args.get_one::<usize>("max-urls") {
        options.max_urls = *max_urls;
    }
    if let Some(strategy) = args.get_one::<String>("strategy") {
        options.strategy = parse_strategy(strategy)?;
    }
    if let Some(target) = args.get_one::<usize>("target-domains") {
        let mut domain_target = DomainTarget::new(*target);
        if let Some(max_reseeds) = args.get_one::<usize>("max-reseeds") {
            domain_target = domain_target.with_max_reseeds(*max_reseeds);
        }
        options.domain_target = Some(domain_target);
    }

    let explicit: Vec<String> = args
        .get_many::<String>("accept")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    options.accept_suffixes = accept_suffixes_from(explicit, args.get_flag("default-filter"));

    options.persist_exclusions = args.get_flag("persist-exclusions");
    options.checkpoint_every = args.get_one::<usize>("checkpoint-every").copied();
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        options.timeout_secs = *timeout;
    }
    options.rng_seed = args.get_one::<u64>("rng-seed").copied();
    options.fresh = args.get_flag("fresh");
    options.show_progress_bars = !args.get_flag("no-progress");

    Ok(options)
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

pub async fn handle_crawl(args: &ArgMatches, quiet: bool) {
    init_logging(args.get_flag("verbose"));

    let options = match crawl_options_from_args(args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if !quiet {
        print_divider();
        println!("{} {}", "→".blue(), options.seed.bright_white());
        println!("  Max depth: {}", options.max_depth);
        println!("  Max urls: {}", options.max_urls);
        println!("  Strategy: {:?}", options.strategy);
        if let Some(target) = options.domain_target {
            println!(
                "  Domain target: {} (give up after {} idle re-seeds)",
                target.domains, target.max_reseeds
            );
        }
        println!("  State: {}", options.state_dir.display());
        print_divider();
    }

    // Liveness: every accepted URL goes to stdout as soon as it is claimed
    let progress_callback: CrawlProgressCallback = Arc::new(|url: String| {
        println!("{}", url);
    });

    match execute_crawl(options, Some(progress_callback)).await {
        Ok(outcome) => {
            if !quiet {
                println!("\n{} Crawl complete!\n", "✓".green().bold());
                print!(
                    "{}",
                    generate_crawl_report(&outcome.state, Some(&outcome.summary))
                );
            }
        }
        Err(e) => {
            eprintln!("{} Crawl failed: {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

pub fn handle_report(args: &ArgMatches) {
    let state_dir = resolve_state_dir(
        args.get_one::<String>("state-dir")
            .map(String::as_str)
            .unwrap_or("."),
    );
    let store = CheckpointStore::new(&state_dir);

    match store.load_state(true) {
        Ok(state) => print!("{}", generate_crawl_report(&state, None)),
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}
