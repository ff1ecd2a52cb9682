use crate::CLAP_STYLING;
use clap::{arg, command};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("outlink")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("outlink")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl outward from a seed host, following external links. Contributes \
                findings to the checkpoint in the state directory.",
                )
                .arg(
                    arg!(<HOST>)
                        .required(true)
                        .help("Seed host to start from, e.g. news.ycombinator.com"),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Hops each branch may descend from its seed")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("3"),
                )
                .arg(
                    arg!(-m --"max-urls" <COUNT>)
                        .required(false)
                        .help("Stop descending once this many URLs are visited")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("200"),
                )
                .arg(
                    arg!(-s --"strategy" <STRATEGY>)
                        .required(false)
                        .help("Descend into every external link, or only into new domains")
                        .value_parser(["links", "domains"])
                        .default_value("links"),
                )
                .arg(
                    arg!(--"target-domains" <COUNT>)
                        .required(false)
                        .help("Keep re-seeding from random known domains until this many are known")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"max-reseeds" <COUNT>)
                        .required(false)
                        .help("Consecutive re-seeds without a new domain before giving up")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(-a --"accept" <SUFFIX>)
                        .required(false)
                        .help("Only keep links ending with this suffix (repeatable)")
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(--"default-filter")
                        .required(false)
                        .help("Use the built-in suffix filter (.html .com .org .io /)")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"state-dir" <PATH>)
                        .required(false)
                        .help("Directory holding urls.json and domains.json")
                        .default_value("."),
                )
                .arg(
                    arg!(--"persist-exclusions")
                        .required(false)
                        .help("Also read and write exclusions.json")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"checkpoint-every" <COUNT>)
                        .required(false)
                        .help("Save state after every COUNT accepted URLs")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"rng-seed" <SEED>)
                        .required(false)
                        .help("Seed for picking re-seed domains")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--"fresh")
                        .required(false)
                        .help("Discard any existing checkpoint before crawling")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"no-progress")
                        .required(false)
                        .help("Do not show the progress spinner")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-v --"verbose")
                        .required(false)
                        .help("Log every fetch and decision to stderr")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("report")
                .about("Summarise the checkpoint in a state directory without crawling")
                .arg(
                    arg!(--"state-dir" <PATH>)
                        .required(false)
                        .help("Directory holding urls.json and domains.json")
                        .default_value("."),
                ),
        )
}
