//! Flags shared by the `simulate` and `complexity` binaries.

use clap::Args;

use crate::error::Error;
use crate::gf::default_gfpoly;
use crate::product::{Algorithm, CodeSpec};
use crate::rng::RngKind;

#[derive(Args, Debug, Clone)]
pub struct CodeArgs {
    /// The decoding algorithm to use.
    #[arg(short = 'a', long, value_enum)]
    pub algorithm: Algorithm,

    /// The number of columns in the codeword.
    #[arg(short = 'c', long)]
    pub cols: usize,

    /// The number of rows in the codeword.
    #[arg(short = 'r', long)]
    pub rows: usize,

    /// The number of roots in the row code. The minimum distance of the
    /// row code is NUM + 1.
    #[arg(long = "r-nroots", value_name = "NUM")]
    pub r_nroots: usize,

    /// The number of roots in the column code. The minimum distance of the
    /// column code is NUM + 1.
    #[arg(long = "c-nroots", value_name = "NUM")]
    pub c_nroots: usize,

    /// The symbol size in bits.
    #[arg(short = 's', long = "sym-size", value_name = "NUM")]
    pub sym_size: usize,

    /// The random number generator to use; give 'list' to see all
    /// available generators.
    #[arg(short = 'R', long, default_value = "std", value_name = "RNG")]
    pub rng: String,

    /// The seed for the random number generator; zero derives one from the
    /// clock.
    #[arg(short = 'S', long, default_value_t = 0)]
    pub seed: u64,

    /// Number of computational threads to use.
    #[arg(short = 'T', long, default_value_t = 1)]
    pub threads: usize,
}

impl CodeArgs {
    /// Validate the shared flags and resolve them into a code description.
    pub fn validate(&self) -> Result<(CodeSpec, Algorithm, RngKind), Error> {
        if !(2..=16).contains(&self.sym_size) {
            return Err(Error::SymbolSize(self.sym_size));
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::Geometry("rows and cols must be positive".into()));
        }
        if self.r_nroots == 0 || self.c_nroots == 0 {
            return Err(Error::RsParams("nroots must be positive"));
        }
        if self.threads == 0 {
            return Err(Error::Geometry("at least one thread is required".into()));
        }

        let rng = RngKind::from_name(&self.rng)?;
        let gfpoly = default_gfpoly(self.sym_size)
            .ok_or(Error::SymbolSize(self.sym_size))?;
        let spec = CodeSpec::standard(
            self.sym_size,
            gfpoly,
            self.rows,
            self.cols,
            self.r_nroots,
            self.c_nroots,
        );
        Ok((spec, self.algorithm, rng))
    }
}
