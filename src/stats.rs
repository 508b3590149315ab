//! Per-worker decoding counters.
//!
//! Every worker accumulates into its own block; the driver folds them
//! together after the join. The merge is plain componentwise addition, so
//! any fold order produces the same aggregate.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Codewords processed.
    pub nwords: u64,
    /// Viable erasure strategies actually considered.
    pub viable: u64,
    /// Structural strategy maximum (nstrat_bound per codeword).
    pub max: u64,
    /// Row decoder invocations.
    pub rdec: u64,
    /// Worst-case row decoder invocations.
    pub rdec_max: u64,
    /// Column decoder invocations.
    pub cdec: u64,
    /// Decoded word differs from the sent word.
    pub dwrong: u64,
    /// Decoder reported failure.
    pub rfail: u64,
    /// Wrong although the channel stayed within the guaranteed radius.
    pub cfail: u64,
    /// Second-stage fallback entries.
    pub alg2: u64,
    /// Third-stage fallback entries.
    pub alg3: u64,
}

impl Stats {
    pub fn merge(&mut self, other: &Stats) {
        self.nwords += other.nwords;
        self.viable += other.viable;
        self.max += other.max;
        self.rdec += other.rdec;
        self.rdec_max += other.rdec_max;
        self.cdec += other.cdec;
        self.dwrong += other.dwrong;
        self.rfail += other.rfail;
        self.cfail += other.cfail;
        self.alg2 += other.alg2;
        self.alg3 += other.alg3;
    }
}
