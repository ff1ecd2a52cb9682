use outlink::commands::command_argument_builder;
use outlink::handlers::*;
use outlink_scanner::{DEFAULT_ACCEPT_SUFFIXES, Strategy};
use std::path::PathBuf;
use tempfile::TempDir;

fn crawl_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["outlink", "crawl"];
    argv.extend_from_slice(args);
    let matches = command_argument_builder()
        .try_get_matches_from(argv)
        .unwrap();
    matches.subcommand_matches("crawl").unwrap().clone()
}

#[test]
fn test_parse_seed_without_scheme() {
    assert_eq!(
        parse_seed("news.ycombinator.com"),
        Ok("http://news.ycombinator.com".to_string())
    );
}

#[test]
fn test_parse_seed_keeps_scheme() {
    assert_eq!(
        parse_seed("https://example.com/start"),
        Ok("https://example.com/start".to_string())
    );
}

#[test]
fn test_parse_seed_invalid() {
    assert!(parse_seed("").is_err());
    assert!(parse_seed("   ").is_err());
}

#[test]
fn test_resolve_state_dir_plain_path() {
    assert_eq!(resolve_state_dir("./state"), PathBuf::from("./state"));
}

#[test]
fn test_resolve_state_dir_expands_tilde() {
    let resolved = resolve_state_dir("~/outlink");
    assert!(!resolved.to_string_lossy().starts_with('~'));
    assert!(resolved.ends_with("outlink"));
}

#[test]
fn test_parse_strategy() {
    assert_eq!(parse_strategy("links"), Ok(Strategy::Links));
    assert_eq!(parse_strategy("Domains"), Ok(Strategy::Domains));
    assert!(parse_strategy("breadth").is_err());
}

#[test]
fn test_accept_suffixes_none_means_no_filter() {
    assert_eq!(accept_suffixes_from(Vec::new(), false), None);
    assert_eq!(accept_suffixes_from(vec!["  ".to_string()], false), None);
}

#[test]
fn test_accept_suffixes_explicit_only() {
    let suffixes = accept_suffixes_from(vec![".html".to_string(), " .php ".to_string()], false);
    assert_eq!(suffixes, Some(vec![".html".to_string(), ".php".to_string()]));
}

#[test]
fn test_accept_suffixes_default_list_without_duplicates() {
    let suffixes = accept_suffixes_from(vec![".html".to_string()], true).unwrap();

    assert_eq!(suffixes.len(), DEFAULT_ACCEPT_SUFFIXES.len());
    for suffix in DEFAULT_ACCEPT_SUFFIXES {
        assert!(suffixes.iter().any(|s| s == suffix));
    }
}

#[test]
fn test_crawl_options_defaults() {
    let matches = crawl_matches(&["example.com"]);
    let options = crawl_options_from_args(&matches).unwrap();

    assert_eq!(options.seed, "http://example.com");
    assert_eq!(options.max_depth, 3);
    assert_eq!(options.max_urls, 200);
    assert_eq!(options.strategy, Strategy::Links);
    assert!(options.domain_target.is_none());
    assert!(options.accept_suffixes.is_none());
    assert_eq!(options.state_dir, PathBuf::from("."));
    assert_eq!(options.timeout_secs, 10);
    assert!(options.show_progress_bars);
    assert!(!options.fresh);
    assert!(!options.persist_exclusions);
}

#[test]
fn test_crawl_options_from_flags() {
    let temp_dir = TempDir::new().unwrap();
    let state_dir = temp_dir.path().to_string_lossy().to_string();
    let matches = crawl_matches(&[
        "example.com",
        "--depth",
        "2",
        "--max-urls",
        "50",
        "--strategy",
        "domains",
        "--target-domains",
        "12",
        "--max-reseeds",
        "4",
        "--accept",
        ".html",
        "--accept",
        "/",
        "--state-dir",
        &state_dir,
        "--persist-exclusions",
        "--checkpoint-every",
        "25",
        "--timeout",
        "3",
        "--rng-seed",
        "7",
        "--fresh",
        "--no-progress",
    ]);
    let options = crawl_options_from_args(&matches).unwrap();

    assert_eq!(options.max_depth, 2);
    assert_eq!(options.max_urls, 50);
    assert_eq!(options.strategy, Strategy::Domains);
    let target = options.domain_target.unwrap();
    assert_eq!(target.domains, 12);
    assert_eq!(target.max_reseeds, 4);
    assert_eq!(
        options.accept_suffixes,
        Some(vec![".html".to_string(), "/".to_string()])
    );
    assert_eq!(options.state_dir, temp_dir.path());
    assert!(options.persist_exclusions);
    assert_eq!(options.checkpoint_every, Some(25));
    assert_eq!(options.timeout_secs, 3);
    assert_eq!(options.rng_seed, Some(7));
    assert!(options.fresh);
    assert!(!options.show_progress_bars);
}

#[test]
fn test_target_domains_uses_default_reseed_limit() {
    let matches = crawl_matches(&["example.com", "--target-domains", "5"]);
    let options = crawl_options_from_args(&matches).unwrap();

    let target = options.domain_target.unwrap();
    assert_eq!(target.domains, 5);
    assert_eq!(target.max_reseeds, 10);
}

#[test]
fn test_crawl_requires_host() {
    let result = command_argument_builder().try_get_matches_from(["outlink", "crawl"]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_strategy_rejected_by_parser() {
    let result = command_argument_builder().try_get_matches_from([
        "outlink",
        "crawl",
        "example.com",
        "--strategy",
        "breadth",
    ]);
    assert!(result.is_err());
}
