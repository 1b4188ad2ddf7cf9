use clap::Parser;
use passvault::cli::{interactive, Cli};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = interactive::run(&cli) {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
