pub mod checkpoint;
pub mod crawl;

use colored::Colorize;

pub fn print_banner() {
    println!(
        "{} {}",
        "outlink".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    println!("{}", "chasing outbound links".bright_black());
    println!();
}
