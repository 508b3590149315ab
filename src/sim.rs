//! Simulation drivers: a fixed-error complexity sweep and a q-ary symmetric
//! channel FER sweep, both running the same worker-pool skeleton.
//!
//! Every worker owns its product code, scratch buffers, generator and stats
//! block, so the inner loops share nothing. The pool joins between sweep
//! points and the master merges and prints; records go to a caller-supplied
//! writer so the binaries can hand over stdout and the tests a buffer.

use std::io::Write;

use log::debug;
use rand::RngCore;
use rayon::prelude::*;

use crate::errgen;
use crate::error::Error;
use crate::product::{Algorithm, CodeSpec, ProductCode};
use crate::rng::RngKind;
use crate::stats::Stats;

/// Sweep-termination tolerance; keeps the last point of a descending float
/// sweep from falling victim to accumulated rounding.
const P_EPS: f64 = 10E-10;

const CHANNEL_COLUMNS: [&str; 12] = [
    "channel error probability",
    "number of codewords",
    "algorithm 2",
    "algorithm 3",
    "viable strategies",
    "max strategies",
    "row decoder actual",
    "row decoder worst case",
    "column decoder actual",
    "decoding failures",
    "reported failures",
    "critical failures",
];

const COMPLEXITY_COLUMNS: [&str; 9] = [
    "number of errors in codeword",
    "number of codewords",
    "viable strategies",
    "max strategies",
    "row decoder actual",
    "row decoder worst case",
    "column decoder actual",
    "decoding failures",
    "reported failures",
];

/// Common knobs of both experiment modes.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub spec: CodeSpec,
    pub alg: Algorithm,
    pub rng: RngKind,
    pub seed: u64,
    pub threads: usize,
    pub num_words: u64,
}

/// Channel-mode sweep parameters.
#[derive(Debug, Clone)]
pub struct ChannelSweep {
    pub min_errs: u64,
    pub fer_cutoff: f64,
    pub p_start: f64,
    pub p_stop: f64,
    pub p_step: f64,
    pub p_halve_at: f64,
}

struct Worker {
    pc: ProductCode,
    alg: Algorithm,
    rng: Box<dyn RngCore + Send>,
    sent: Vec<u16>,
    recv: Vec<u16>,
    errlocs: Vec<bool>,
    stats: Stats,
}

impl Worker {
    fn new(cfg: &RunConfig, seed: u64) -> Result<Self, Error> {
        let pc = ProductCode::new(&cfg.spec)?;
        let len = pc.len();
        Ok(Self {
            pc,
            alg: cfg.alg,
            rng: cfg.rng.seeded(seed),
            sent: vec![0; len],
            recv: vec![0; len],
            errlocs: vec![false; len],
            stats: Stats::default(),
        })
    }

    /// One complexity sweep point: `trials` words with exactly `errs`
    /// symbol errors each.
    fn run_fixed_errors(&mut self, errs: usize, trials: u64) {
        self.stats = Stats::default();
        for _ in 0..trials {
            errgen::codeword_with_errors(
                &mut self.pc,
                &mut self.sent,
                &mut self.recv,
                errs,
                &mut self.errlocs,
                &mut *self.rng,
            );
            let ok = self.pc.decode(self.alg, &mut self.recv, &mut self.stats);
            if !ok {
                self.stats.rfail += 1;
            }
            if self.recv != self.sent {
                self.stats.dwrong += 1;
            }
        }
        self.stats.nwords = trials;
    }

    /// One channel sweep point: at least `trials` words, continuing until
    /// this worker has seen `min_errs` decoding errors of its own.
    fn run_channel_point(&mut self, p: f64, trials: u64, min_errs: u64) {
        self.stats = Stats::default();
        let t = (self.pc.mind() - 1) / 2;

        let mut j: u64 = 0;
        while j < trials || self.stats.dwrong < min_errs {
            let errs = errgen::codeword_through_channel(
                &mut self.pc,
                &mut self.sent,
                &mut self.recv,
                p,
                &mut *self.rng,
            );
            let ok = self.pc.decode(self.alg, &mut self.recv, &mut self.stats);
            if !ok {
                self.stats.rfail += 1;
            }
            if self.recv != self.sent {
                self.stats.dwrong += 1;
                if errs <= t {
                    self.stats.cfail += 1;
                }
            }
            j += 1;
        }
        self.stats.nwords = j;
    }
}

fn build_workers(cfg: &RunConfig) -> Result<Vec<Worker>, Error> {
    let mut workers = Vec::with_capacity(cfg.threads);
    for i in 0..cfg.threads {
        workers.push(Worker::new(cfg, cfg.seed + i as u64)?);
    }
    debug!("built {} workers with base seed {}", cfg.threads, cfg.seed);
    Ok(workers)
}

fn merged_stats(workers: &[Worker]) -> Stats {
    let mut total = Stats::default();
    for w in workers {
        total.merge(&w.stats);
    }
    total
}

fn print_banner<W: Write>(
    w: &mut W,
    pc: &ProductCode,
    alg: Algorithm,
    seed: u64,
    threads: usize,
    columns: &[&str],
) -> std::io::Result<()> {
    pc.write_summary(w, "# ")?;
    writeln!(w, "# Algorithm: {}", alg.name())?;
    writeln!(w, "# Seed: {}", seed)?;
    writeln!(w, "# Threads: {}", threads)?;
    for (i, col) in columns.iter().enumerate() {
        writeln!(w, "# ({}) {}", i + 1, col)?;
    }
    Ok(())
}

/// Fixed-error complexity sweep: one record per error count 0..=t.
pub fn run_complexity<W: Write>(cfg: &RunConfig, out: &mut W) -> Result<(), Error> {
    let mut workers = build_workers(cfg)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.threads)
        .build()?;

    let t = (workers[0].pc.mind() - 1) / 2;
    let trials = cfg.num_words / cfg.threads as u64;
    print_banner(
        out,
        &workers[0].pc,
        cfg.alg,
        cfg.seed,
        cfg.threads,
        &COMPLEXITY_COLUMNS,
    )?;

    for errs in 0..=t {
        pool.install(|| {
            workers
                .par_iter_mut()
                .for_each(|w| w.run_fixed_errors(errs, trials))
        });
        let s = merged_stats(&workers);
        writeln!(
            out,
            "{} {} {} {} {} {} {} {} {}",
            errs, s.nwords, s.viable, s.max, s.rdec, s.rdec_max, s.cdec, s.dwrong, s.rfail
        )?;
        out.flush()?;
    }

    Ok(())
}

/// Channel FER sweep over decreasing symbol error probability.
pub fn run_channel<W: Write>(
    cfg: &RunConfig,
    sweep: &ChannelSweep,
    out: &mut W,
) -> Result<(), Error> {
    let mut workers = build_workers(cfg)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.threads)
        .build()?;

    let trials = cfg.num_words / cfg.threads as u64;
    let min_errs = sweep.min_errs / cfg.threads as u64;
    print_banner(
        out,
        &workers[0].pc,
        cfg.alg,
        cfg.seed,
        cfg.threads,
        &CHANNEL_COLUMNS,
    )?;

    let mut p = sweep.p_start;
    let mut step = sweep.p_step;
    let mut halve_at = sweep.p_halve_at;
    while p >= sweep.p_stop - P_EPS {
        pool.install(|| {
            workers
                .par_iter_mut()
                .for_each(|w| w.run_channel_point(p, trials, min_errs))
        });
        let s = merged_stats(&workers);
        writeln!(
            out,
            "{:.6} {} {} {} {} {} {} {} {} {} {} {}",
            p,
            s.nwords,
            s.alg2,
            s.alg3,
            s.viable,
            s.max,
            s.rdec,
            s.rdec_max,
            s.cdec,
            s.dwrong,
            s.rfail,
            s.cfail
        )?;
        out.flush()?;

        // FER fell below the measurement threshold; the rest of the sweep
        // would only measure noise. A zero cutoff never triggers.
        if (s.dwrong as f64) / (s.nwords as f64) < sweep.fer_cutoff {
            break;
        }

        if halve_at - p >= -P_EPS {
            step /= 2.0;
            halve_at = 0.0;
        }
        p -= step;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(alg: Algorithm, threads: usize, num_words: u64) -> RunConfig {
        RunConfig {
            spec: CodeSpec::standard(4, 0x13, 7, 7, 2, 2),
            alg,
            rng: RngKind::Std,
            seed: 42,
            threads,
            num_words,
        }
    }

    #[test]
    fn complexity_sweep_is_deterministic() {
        let cfg = config(Algorithm::Gmd, 4, 80);
        let mut a = Vec::new();
        let mut b = Vec::new();
        run_complexity(&cfg, &mut a).unwrap();
        run_complexity(&cfg, &mut b).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn channel_sweep_is_deterministic() {
        let cfg = config(Algorithm::Itergd, 2, 40);
        let sweep = ChannelSweep {
            min_errs: 0,
            fer_cutoff: 0.0,
            p_start: 0.1,
            p_stop: 0.05,
            p_step: 0.05,
            p_halve_at: 0.0,
        };
        let mut a = Vec::new();
        let mut b = Vec::new();
        run_channel(&cfg, &sweep, &mut a).unwrap();
        run_channel(&cfg, &sweep, &mut b).unwrap();
        assert_eq!(a, b);

        let text = String::from_utf8(a).unwrap();
        let records: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn banner_lists_every_column() {
        let cfg = config(Algorithm::Iter, 1, 10);
        let mut buf = Vec::new();
        run_complexity(&cfg, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("# (49, 25, 9)_16 code...\n"));
        assert!(text.contains("# Algorithm: iter\n"));
        assert!(text.contains("# Seed: 42\n"));
        assert!(text.contains("# Threads: 1\n"));
        for (i, col) in COMPLEXITY_COLUMNS.iter().enumerate() {
            assert!(text.contains(&format!("# ({}) {}", i + 1, col)));
        }
    }

    #[test]
    fn trivial_roundtrip_counts() {
        // Zero-error complexity point: every word decodes in one round.
        let cfg = config(Algorithm::Iter, 1, 100);
        let mut buf = Vec::new();
        run_complexity(&cfg, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let first = text
            .lines()
            .find(|l| !l.starts_with('#'))
            .expect("no records");
        let fields: Vec<u64> = first
            .split_whitespace()
            .map(|f| f.parse().unwrap())
            .collect();
        // errs nwords viable max rdec rdec_max cdec dwrong rfail
        assert_eq!(fields[0], 0);
        assert_eq!(fields[1], 100);
        assert_eq!(fields[4], 700);
        assert_eq!(fields[6], 700);
        assert_eq!(fields[7], 0);
        assert_eq!(fields[8], 0);
    }

    #[test]
    fn gmd_has_no_critical_failures_within_radius() {
        // All complexity points run errs <= t, so gmd must never be wrong.
        let cfg = config(Algorithm::Gmd, 2, 200);
        let mut buf = Vec::new();
        run_complexity(&cfg, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut records = 0;
        for line in text.lines().filter(|l| !l.starts_with('#')) {
            let fields: Vec<u64> = line
                .split_whitespace()
                .map(|f| f.parse().unwrap())
                .collect();
            assert_eq!(fields[7], 0, "dwrong at errs = {}", fields[0]);
            assert_eq!(fields[8], 0, "rfail at errs = {}", fields[0]);
            records += 1;
        }
        // t = 4 for the (49, 25, 9) code: points 0..=4.
        assert_eq!(records, 5);
    }

    #[test]
    fn fallback_counters_stay_bounded() {
        let cfg = config(Algorithm::Erasgd, 1, 60);
        let sweep = ChannelSweep {
            min_errs: 0,
            fer_cutoff: 0.0,
            p_start: 0.2,
            p_stop: 0.2,
            p_step: 0.01,
            p_halve_at: 0.0,
        };
        let mut buf = Vec::new();
        run_channel(&cfg, &sweep, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let line = text.lines().find(|l| !l.starts_with('#')).unwrap();
        let fields: Vec<f64> = line
            .split_whitespace()
            .map(|f| f.parse().unwrap())
            .collect();
        let nwords = fields[1];
        let alg2 = fields[2];
        let alg3 = fields[3];
        assert!(alg2 <= nwords);
        assert!(alg3 <= alg2);
    }
}
