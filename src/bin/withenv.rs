use std::ffi::OsString;
use std::io;
use std::process;

use clap::Parser;
use log::debug;

use withenv::{EnvLoader, Launch, Outcome, Source};

const LOG_ENV: &str = "WITHENV_LOG";

/// Run a command with an environment loaded from files, stdin, or the
/// current environment. Without a command, print the environment.
#[derive(Parser, Debug)]
#[command(name = "withenv", version)]
struct Args {
    /// Environment source: a file path, `-` for stdin, or `@` for the
    /// current environment. Repeat to merge; later sources win.
    #[arg(short = 'f', long = "file", value_name = "SOURCE")]
    sources: Vec<Source>,

    /// Start from an empty environment instead of inheriting the current one.
    #[arg(short = 'i', long)]
    ignore_environment: bool,

    /// Print loader diagnostics to stderr.
    #[arg(long)]
    verbose: bool,

    /// Command to run, followed by its arguments. Prints the environment
    /// when omitted.
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    command: Vec<OsString>,
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);
    process::exit(run(args));
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, default_level))
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> i32 {
    debug!("sources: {:?}", args.sources);
    debug!("command: {:?}", args.command);

    let loader = EnvLoader::new()
        .inherit(!args.ignore_environment)
        .sources(args.sources);
    let mut launch = Launch::new(loader);
    if let Some((command, command_args)) = args.command.split_first() {
        launch = launch.command(command.clone()).args(command_args.iter().cloned());
    }

    match launch.run(&mut io::stdout().lock()) {
        Ok(Outcome::Printed) => 0,
        Ok(Outcome::Exited(code)) => code,
        Err(err) => {
            eprintln!("withenv: {err}");
            1
        }
    }
}
