//! Seedable generator registry behind the `--rng` flag.
//!
//! The simulation only needs `RngCore` plus the `Rng` convenience draws, so
//! every kind is boxed behind the same trait object. Worker i is seeded with
//! `base_seed + i`, which keeps a run reproducible for a fixed thread count.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{SmallRng, StdRng};
use rand::{RngCore, SeedableRng};
use rand_chacha::{ChaCha12Rng, ChaCha20Rng, ChaCha8Rng};
use rand_pcg::{Pcg32, Pcg64};
use rand_xorshift::XorShiftRng;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngKind {
    Std,
    Small,
    ChaCha8,
    ChaCha12,
    ChaCha20,
    Xorshift,
    Pcg32,
    Pcg64,
}

const NAMES: [(&str, RngKind); 8] = [
    ("std", RngKind::Std),
    ("small", RngKind::Small),
    ("chacha8", RngKind::ChaCha8),
    ("chacha12", RngKind::ChaCha12),
    ("chacha20", RngKind::ChaCha20),
    ("xorshift", RngKind::Xorshift),
    ("pcg32", RngKind::Pcg32),
    ("pcg64", RngKind::Pcg64),
];

impl Default for RngKind {
    fn default() -> Self {
        RngKind::Std
    }
}

impl RngKind {
    pub fn from_name(name: &str) -> Result<Self, Error> {
        NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, k)| k)
            .ok_or_else(|| Error::UnknownRng(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        NAMES.iter().find(|&&(_, k)| k == *self).unwrap().0
    }

    pub fn seeded(&self, seed: u64) -> Box<dyn RngCore + Send> {
        match self {
            RngKind::Std => Box::new(StdRng::seed_from_u64(seed)),
            RngKind::Small => Box::new(SmallRng::seed_from_u64(seed)),
            RngKind::ChaCha8 => Box::new(ChaCha8Rng::seed_from_u64(seed)),
            RngKind::ChaCha12 => Box::new(ChaCha12Rng::seed_from_u64(seed)),
            RngKind::ChaCha20 => Box::new(ChaCha20Rng::seed_from_u64(seed)),
            RngKind::Xorshift => Box::new(XorShiftRng::seed_from_u64(seed)),
            RngKind::Pcg32 => Box::new(Pcg32::seed_from_u64(seed)),
            RngKind::Pcg64 => Box::new(Pcg64::seed_from_u64(seed)),
        }
    }
}

/// Print the available generator names, four per line.
pub fn print_generators<W: Write>(w: &mut W) -> std::io::Result<()> {
    writeln!(w, "Available random number generators are:")?;
    for (i, (name, _)) in NAMES.iter().enumerate() {
        if (i + 1) % 4 == 0 {
            writeln!(w, "{:<18}", name)?;
        } else {
            write!(w, "{:<18}", name)?;
        }
    }
    if NAMES.len() % 4 != 0 {
        writeln!(w)?;
    }
    Ok(())
}

/// Wall-clock fallback seed for runs that did not pin one.
pub fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
