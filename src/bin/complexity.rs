//! Complexity simulations with product codes: decode batches of words with
//! a fixed number of symbol errors for every error count the code can
//! guarantee, and report the decoder work done.

use std::io;
use std::process;

use clap::Parser;
use log::info;

use pcsim::cli::CodeArgs;
use pcsim::rng;
use pcsim::sim::{self, RunConfig};

/// Run complexity simulations for product codes with different algorithms.
/// The component codes are Reed-Solomon codes over fields of size 2^m.
/// Outputs to stdout.
#[derive(Parser, Debug)]
#[command(name = "complexity", version)]
struct Cli {
    #[command(flatten)]
    code: CodeArgs,

    /// The total number of words to decode per sweep point.
    #[arg(short = 'n', long = "num-words")]
    num_words: u64,
}

fn prog_name() -> String {
    std::env::args()
        .next()
        .unwrap_or_else(|| "complexity".into())
}

fn usage_error(msg: impl std::fmt::Display) -> ! {
    let prog = prog_name();
    eprintln!("{}: {}", prog, msg);
    eprintln!("Try '{} --help' for more information.", prog);
    process::exit(1);
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.code.rng == "list" {
        rng::print_generators(&mut io::stdout()).ok();
        return;
    }

    if cli.num_words == 0 {
        usage_error("num-words must be positive");
    }

    let (spec, alg, rng_kind) = match cli.code.validate() {
        Ok(v) => v,
        Err(e) => usage_error(e),
    };

    let seed = if cli.code.seed == 0 {
        let seed = rng::random_seed();
        info!("no seed given, using {}", seed);
        seed
    } else {
        cli.code.seed
    };

    let cfg = RunConfig {
        spec,
        alg,
        rng: rng_kind,
        seed,
        threads: cli.code.threads,
        num_words: cli.num_words,
    };

    if let Err(e) = sim::run_complexity(&cfg, &mut io::stdout().lock()) {
        eprintln!("{}: {}", prog_name(), e);
        process::exit(1);
    }
}
