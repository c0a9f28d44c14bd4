//! prunfor runs a command for an optionally limited amount of time.
//!
//!     usage: prunfor LIMIT COMMAND [ARGUMENT ...]
//!
//! A zero LIMIT runs the command without a time limit. The exit status is the
//! command's own when it exits normally, 2 for invalid arguments and 1 for
//! everything else, including being killed at the limit.

use clap::Parser;
use prun::cli::{program_name, ForCli};
use prun::{exit, logging, Outcome};

fn main() {
    let me = program_name("prunfor");
    logging::init_from_env(&me);

    let cli = ForCli::parse();
    std::process::exit(run(cli, &me));
}

#[tokio::main(flavor = "current_thread")]
async fn run(cli: ForCli, me: &str) -> i32 {
    match cli.execute().await {
        Ok(outcome) => {
            if !matches!(outcome, Outcome::Succeeded | Outcome::Failed(_)) {
                eprintln!("{me}: {outcome}");
            }
            exit::for_outcome(&outcome)
        }
        Err(e) => {
            eprintln!("{me}: {e}");
            exit::for_error(&e)
        }
    }
}
