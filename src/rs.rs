//! Reed-Solomon component codec over GF(2^m).
//!
//! This is a classic syndrome-based bounded-distance codec in the libfec
//! mould: a code is described by the field, the first consecutive root
//! `fcr`, the primitive element `prim` used to space the roots, and the
//! generator degree `nroots`. Codewords may be shortened (`len <= nn`) and
//! laid out with an arbitrary stride, which is what lets the product code
//! run the same codec down columns and across rows of one matrix.
//!
//! Decoding is errors-and-erasures: syndromes, Berlekamp-Massey seeded with
//! the erasure locator, Chien search and Forney's algorithm. All scratch is
//! owned by the descriptor, so a descriptor must not be shared between
//! threads; the simulation gives every worker its own.

use crate::error::Error;
use crate::gf::GfField;

pub struct RsCode {
    field: GfField,
    fcr: usize,
    prim: usize,
    iprim: usize,
    nroots: usize,
    /// Generator polynomial in index form.
    genpoly: Vec<usize>,

    // Decoder/encoder scratch, sized once at init.
    syn: Vec<usize>,
    lambda: Vec<usize>,
    bpoly: Vec<usize>,
    tpoly: Vec<usize>,
    omega: Vec<usize>,
    reg: Vec<usize>,
    root: Vec<usize>,
    loc: Vec<usize>,
    par: Vec<usize>,
}

impl RsCode {
    pub fn new(
        symsize: usize,
        gfpoly: usize,
        fcr: usize,
        prim: usize,
        nroots: usize,
    ) -> Result<Self, Error> {
        let field = GfField::new(symsize, gfpoly)?;
        let nn = field.nn();

        if fcr > nn {
            return Err(Error::RsParams("first consecutive root out of range"));
        }
        if prim == 0 || prim > nn {
            return Err(Error::RsParams("primitive element out of range"));
        }
        if nroots == 0 || nroots >= nn {
            return Err(Error::RsParams("generator degree out of range"));
        }

        // iprim is the multiplicative inverse of prim mod nn, used to turn
        // Chien-search step counts back into codeword positions.
        let mut iprim = 1usize;
        while iprim % prim != 0 {
            iprim += nn;
        }
        let iprim = iprim / prim;

        let mut genpoly = vec![0usize; nroots + 1];
        genpoly[0] = 1;
        let mut root = fcr * prim;
        for i in 0..nroots {
            genpoly[i + 1] = 1;
            for j in (1..=i).rev() {
                genpoly[j] = if genpoly[j] != 0 {
                    genpoly[j - 1]
                        ^ field.alpha(field.modnn(field.log(genpoly[j]) + root))
                } else {
                    genpoly[j - 1]
                };
            }
            genpoly[0] = field.alpha(field.modnn(field.log(genpoly[0]) + root));
            root += prim;
        }
        for g in genpoly.iter_mut() {
            *g = field.log(*g);
        }

        Ok(Self {
            field,
            fcr,
            prim,
            iprim,
            nroots,
            genpoly,
            syn: vec![0; nroots],
            lambda: vec![0; nroots + 1],
            bpoly: vec![0; nroots + 1],
            tpoly: vec![0; nroots + 1],
            omega: vec![0; nroots + 1],
            reg: vec![0; nroots + 1],
            root: vec![0; nroots],
            loc: vec![0; nroots],
            par: vec![0; nroots],
        })
    }

    #[inline]
    pub fn nn(&self) -> usize {
        self.field.nn()
    }

    #[inline]
    pub fn nroots(&self) -> usize {
        self.nroots
    }

    /// Minimum distance of the (MDS) code.
    #[inline]
    pub fn mind(&self) -> usize {
        self.nroots + 1
    }

    #[inline]
    pub fn gfpoly(&self) -> usize {
        self.field.gfpoly()
    }

    /// Systematic encode of a strided codeword of `len` symbols: the first
    /// `len - nroots` positions are data, the trailing `nroots` receive the
    /// parity.
    pub fn encode(&mut self, data: &mut [u16], len: usize, stride: usize) {
        debug_assert!(len > self.nroots && len <= self.nn());
        let nroots = self.nroots;
        let a0 = self.field.a0();
        let dlen = len - nroots;

        self.par.iter_mut().for_each(|p| *p = 0);
        for i in 0..dlen {
            let fb = self.field.log(data[i * stride] as usize ^ self.par[0]);
            if fb != a0 {
                for j in 1..nroots {
                    self.par[j] ^= self
                        .field
                        .alpha(self.field.modnn(fb + self.genpoly[nroots - j]));
                }
            }
            self.par.copy_within(1..nroots, 0);
            self.par[nroots - 1] = if fb != a0 {
                self.field.alpha(self.field.modnn(fb + self.genpoly[0]))
            } else {
                0
            };
        }
        for j in 0..nroots {
            data[(dlen + j) * stride] = self.par[j] as u16;
        }
    }

    /// Bounded-distance errors-and-erasures decode of a strided codeword.
    ///
    /// `eras_pos` lists known-unreliable positions (indices into the
    /// shortened codeword). On success returns the number of corrected
    /// positions, erasures included, and fills `corr` with their locations;
    /// `None` means the word was flagged uncorrectable and `data` may have
    /// been partially modified.
    pub fn decode(
        &mut self,
        data: &mut [u16],
        len: usize,
        stride: usize,
        eras_pos: &[usize],
        mut corr: Option<&mut Vec<usize>>,
    ) -> Option<usize> {
        debug_assert!(len > self.nroots && len <= self.nn());
        let nn = self.field.nn();
        let a0 = self.field.a0();
        let nroots = self.nroots;
        let pad = nn - len;
        let no_eras = eras_pos.len();

        if no_eras > nroots || eras_pos.iter().any(|&p| p >= len) {
            return None;
        }
        if let Some(c) = corr.as_mut() {
            c.clear();
        }

        // Syndromes: evaluate the received word at the generator roots.
        for i in 0..nroots {
            self.syn[i] = data[0] as usize;
        }
        for j in 1..len {
            let d = data[j * stride] as usize;
            for i in 0..nroots {
                self.syn[i] = if self.syn[i] == 0 {
                    d
                } else {
                    d ^ self.field.alpha(self.field.modnn(
                        self.field.log(self.syn[i]) + (self.fcr + i) * self.prim,
                    ))
                };
            }
        }

        let mut syn_error = 0usize;
        for i in 0..nroots {
            syn_error |= self.syn[i];
            self.syn[i] = self.field.log(self.syn[i]);
        }
        if syn_error == 0 {
            // Already a codeword.
            return Some(0);
        }

        // Seed lambda with the erasure locator polynomial.
        self.lambda.iter_mut().for_each(|x| *x = 0);
        self.lambda[0] = 1;
        if no_eras > 0 {
            self.lambda[1] = self
                .field
                .alpha(self.field.modnn(self.prim * (nn - 1 - (eras_pos[0] + pad))));
            for i in 1..no_eras {
                let u = self.field.modnn(self.prim * (nn - 1 - (eras_pos[i] + pad)));
                for j in (1..=i + 1).rev() {
                    let tmp = self.field.log(self.lambda[j - 1]);
                    if tmp != a0 {
                        self.lambda[j] ^= self.field.alpha(self.field.modnn(u + tmp));
                    }
                }
            }
        }
        for i in 0..=nroots {
            self.bpoly[i] = self.field.log(self.lambda[i]);
        }

        // Berlekamp-Massey over the remaining degrees of freedom.
        let mut el = no_eras;
        for r in (no_eras + 1)..=nroots {
            let mut discr = 0usize;
            for i in 0..r {
                if self.lambda[i] != 0 && self.syn[r - i - 1] != a0 {
                    discr ^= self.field.alpha(self.field.modnn(
                        self.field.log(self.lambda[i]) + self.syn[r - i - 1],
                    ));
                }
            }
            let discr = self.field.log(discr);
            if discr == a0 {
                self.bpoly.copy_within(0..nroots, 1);
                self.bpoly[0] = a0;
            } else {
                self.tpoly[0] = self.lambda[0];
                for i in 0..nroots {
                    self.tpoly[i + 1] = if self.bpoly[i] != a0 {
                        self.lambda[i + 1]
                            ^ self.field.alpha(self.field.modnn(discr + self.bpoly[i]))
                    } else {
                        self.lambda[i + 1]
                    };
                }
                if 2 * el <= r + no_eras - 1 {
                    el = r + no_eras - el;
                    for i in 0..=nroots {
                        self.bpoly[i] = if self.lambda[i] == 0 {
                            a0
                        } else {
                            self.field
                                .modnn(self.field.log(self.lambda[i]) + nn - discr)
                        };
                    }
                } else {
                    self.bpoly.copy_within(0..nroots, 1);
                    self.bpoly[0] = a0;
                }
                self.lambda.copy_from_slice(&self.tpoly);
            }
        }

        let mut deg_lambda = 0usize;
        for i in 0..=nroots {
            self.lambda[i] = self.field.log(self.lambda[i]);
            if self.lambda[i] != a0 {
                deg_lambda = i;
            }
        }
        if deg_lambda == 0 {
            return None;
        }

        // Chien search for the roots of the errata locator.
        self.reg[1..=nroots].copy_from_slice(&self.lambda[1..=nroots]);
        let mut count = 0usize;
        let mut k = self.iprim - 1;
        for i in 1..=nn {
            let mut q = 1usize;
            for j in (1..=deg_lambda).rev() {
                if self.reg[j] != a0 {
                    self.reg[j] = self.field.modnn(self.reg[j] + j);
                    q ^= self.field.alpha(self.reg[j]);
                }
            }
            if q == 0 {
                self.root[count] = i;
                self.loc[count] = k;
                count += 1;
                if count == deg_lambda {
                    break;
                }
            }
            k = self.field.modnn(k + self.iprim);
        }
        // deg(lambda) distinct roots or the word is uncorrectable.
        if count != deg_lambda {
            return None;
        }

        // omega(x) = s(x) * lambda(x) mod x^nroots, in index form.
        let deg_omega = deg_lambda - 1;
        for i in 0..=deg_omega {
            let mut tmp = 0usize;
            for j in (0..=i).rev() {
                if self.syn[i - j] != a0 && self.lambda[j] != a0 {
                    tmp ^= self
                        .field
                        .alpha(self.field.modnn(self.syn[i - j] + self.lambda[j]));
                }
            }
            self.omega[i] = self.field.log(tmp);
        }

        // Forney: error magnitude at each root.
        for j in (0..count).rev() {
            if self.loc[j] < pad {
                // A root landed in the shortened prefix; miscorrection.
                return None;
            }
            let mut num1 = 0usize;
            for i in (0..=deg_omega).rev() {
                if self.omega[i] != a0 {
                    num1 ^= self
                        .field
                        .alpha(self.field.modnn(self.omega[i] + i * self.root[j]));
                }
            }
            let num2 = self
                .field
                .alpha(self.field.modnn(self.root[j] * (self.fcr + nn - 1) + nn));
            let mut den = 0usize;
            let start = deg_lambda.min(nroots - 1) & !1;
            for i in (0..=start).rev().step_by(2) {
                if self.lambda[i + 1] != a0 {
                    den ^= self
                        .field
                        .alpha(self.field.modnn(self.lambda[i + 1] + i * self.root[j]));
                }
            }
            if den == 0 {
                return None;
            }
            if num1 != 0 {
                let cor = self.field.alpha(self.field.modnn(
                    self.field.log(num1) + self.field.log(num2) + nn
                        - self.field.log(den),
                ));
                data[(self.loc[j] - pad) * stride] ^= cor as u16;
            }
        }

        if let Some(c) = corr {
            for i in 0..count {
                c.push(self.loc[i] - pad);
            }
        }
        Some(count)
    }
}
