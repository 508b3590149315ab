//! Channel simulations with product codes: sweep the symbol error
//! probability of a q-ary symmetric channel and report frame error rates.

use std::io;
use std::process;

use clap::{ArgAction, Parser};
use log::info;

use pcsim::cli::CodeArgs;
use pcsim::rng;
use pcsim::sim::{self, ChannelSweep, RunConfig};

/// Run simulation with product codes. The component codes are Reed-Solomon
/// codes over fields of size 2^m and the channel is a q-ary symmetric
/// channel. Outputs to stdout.
#[derive(Parser, Debug)]
#[command(name = "simulate", version, disable_help_flag = true)]
struct Cli {
    #[command(flatten)]
    code: CodeArgs,

    /// The minimum number of words to decode per sweep point.
    #[arg(short = 'n', long = "num-words", default_value_t = 0)]
    num_words: u64,

    /// The minimum number of decoding errors per channel quality.
    #[arg(short = 'E', long = "min-errors", default_value_t = 100)]
    min_errors: u64,

    /// The frame error rate cutoff. Set to zero to disable.
    #[arg(short = 'f', long = "fer-cutoff", default_value_t = 1e-8)]
    fer_cutoff: f64,

    /// The initial value of p.
    #[arg(short = 'b', long = "p-begin", default_value_t = 0.1)]
    p_begin: f64,

    /// The last value of p. The simulation runs until this value is
    /// reached, unless the frame error rate cutoff is reached first.
    #[arg(short = 'e', long = "p-end", default_value_t = 0.01)]
    p_end: f64,

    /// The step size when decreasing the value of p.
    #[arg(short = 't', long = "p-step", default_value_t = 0.01)]
    p_step: f64,

    /// Halve the step size once p crosses this value.
    #[arg(short = 'h', long = "p-halve-at", default_value_t = 0.0)]
    p_halve_at: f64,

    /// Display this help and exit.
    #[arg(long, action = ArgAction::Help, value_parser = clap::value_parser!(bool))]
    help: Option<bool>,
}

fn prog_name() -> String {
    std::env::args()
        .next()
        .unwrap_or_else(|| "simulate".into())
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

    if cli.p_begin < cli.p_end {
        usage_error("p-begin must be larger than p-end");
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
    let sweep = ChannelSweep {
        min_errs: cli.min_errors,
        fer_cutoff: cli.fer_cutoff,
        p_start: cli.p_begin,
        p_stop: cli.p_end,
        p_step: cli.p_step,
        p_halve_at: cli.p_halve_at,
    };

    if let Err(e) = sim::run_channel(&cfg, &sweep, &mut io::stdout().lock()) {
        eprintln!("{}: {}", prog_name(), e);
        process::exit(1);
    }
}
