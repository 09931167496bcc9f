use std::env;
use std::process;

use ev_policy_engine::{cli, telemetry};

fn main() {
    telemetry::init_tracing();
    let args: Vec<String> = env::args().collect();
    process::exit(cli::run_with_args(&args));
}
