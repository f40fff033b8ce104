//! Cafe API tester - end-to-end checks for the cafe ordering backend
//!
//! Runs a fixed sequence of HTTP scenarios against a running backend and
//! exits 0 when every check passed, 1 otherwise.

use cafe_tester::commands::RunOptions;
use cafe_tester::common::logging;
use cafe_tester::testing::{run_suite, Scenario, TestContext};
use clap::Parser;

#[derive(Parser)]
#[command(name = "cafe-tester", about = "End-to-end checks for the cafe ordering API")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    options: RunOptions,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.options.verbose);

    if cli.options.list {
        for (i, scenario) in Scenario::ALL.iter().enumerate() {
            println!("{:>2}. {}", i + 1, scenario.name());
        }
        return;
    }

    let mut ctx = match cli
        .options
        .resolve_config()
        .and_then(|config| TestContext::from_config(&config))
    {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let report = run_suite(&mut ctx).await;
    report.print_summary();
    std::process::exit(report.exit_code());
}
