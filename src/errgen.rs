//! Random codeword synthesis and channel models for the simulation.

use rand::{Rng, RngCore};

use crate::product::ProductCode;

/// Fill the information block with uniform symbols and encode in place.
/// Symbol draws mask with nn, which is exact because nn = 2^m - 1.
pub fn random_codeword(pc: &mut ProductCode, c: &mut [u16], rng: &mut dyn RngCore) {
    let nn = pc.nn() as u64;
    let cols = pc.cols();
    let rdlen = cols - pc.row_nroots();
    let cdlen = pc.rows() - pc.col_nroots();

    for j in 0..cdlen {
        for i in 0..rdlen {
            c[j * cols + i] = (rng.next_u64() & nn) as u16;
        }
    }
    pc.encode(c);
}

/// Generate a codeword in `c` and a copy with exactly `errs` symbol errors
/// in `r`. `errlocs` records the corrupted positions.
pub fn codeword_with_errors(
    pc: &mut ProductCode,
    c: &mut [u16],
    r: &mut [u16],
    errs: usize,
    errlocs: &mut [bool],
    rng: &mut dyn RngCore,
) {
    let nn = pc.nn() as u64;
    let len = pc.len();

    random_codeword(pc, c, rng);
    r.copy_from_slice(c);
    errlocs.fill(false);

    for _ in 0..errs {
        // Error value must be nonzero.
        let errval = loop {
            let v = (rng.next_u64() & nn) as u16;
            if v != 0 {
                break v;
            }
        };
        // Must not pick the same location twice.
        let errloc = loop {
            let l = rng.gen_range(0..len);
            if !errlocs[l] {
                break l;
            }
        };
        errlocs[errloc] = true;
        r[errloc] ^= errval;
    }
}

/// Generate a codeword in `c` and push it through a q-ary symmetric channel
/// with symbol error probability `p` into `r`. Returns the number of
/// corrupted positions.
pub fn codeword_through_channel(
    pc: &mut ProductCode,
    c: &mut [u16],
    r: &mut [u16],
    p: f64,
    rng: &mut dyn RngCore,
) -> usize {
    let nn = pc.nn() as u64;
    let len = pc.len();
    let mut errs = 0;

    random_codeword(pc, c, rng);
    r.copy_from_slice(c);

    for i in 0..len {
        let u: f64 = rng.gen();
        if u > p {
            continue;
        }
        let errval = loop {
            let v = (rng.next_u64() & nn) as u16;
            if v != 0 {
                break v;
            }
        };
        r[i] ^= errval;
        errs += 1;
    }

    errs
}
