//! prunevery enforces a minimum period between runs of a command.
//!
//!     usage: prunevery PERIOD COMMAND [ARGUMENT ...]
//!
//! Exit status:
//!
//!       1 Unidentified error running or waiting on the command.
//!       2 Invalid arguments.
//!      40 Minimum period not yet elapsed (silent).
//!      41 Error creating, opening, examining or updating the marker file.
//!     127 The command could not be found.
//!   128+N The command was killed by signal N.
//!     255 The command failed but its status is unavailable.
//!
//! Otherwise the command's own exit status.

use clap::Parser;
use prun::cli::{program_name, EveryCli, Verdict};
use prun::{exit, logging, Outcome};

fn main() {
    let me = program_name("prunevery");
    logging::init_from_env(&me);

    let cli = EveryCli::parse();
    std::process::exit(run(cli, &me));
}

#[tokio::main(flavor = "current_thread")]
async fn run(cli: EveryCli, me: &str) -> i32 {
    match cli.execute(me, &std::env::temp_dir()).await {
        Ok(Verdict::TooEarly) => exit::TOO_EARLY,
        Ok(Verdict::Ran(outcome)) => {
            if matches!(outcome, Outcome::Signaled(_) | Outcome::Unknown) {
                eprintln!("{me}: {outcome}");
            }
            exit::every_outcome(&outcome)
        }
        Err(e) => {
            eprintln!("{me}: {e}");
            exit::every_error(&e)
        }
    }
}
