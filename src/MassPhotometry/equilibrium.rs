//! # Closed-form equilibrium resolvers
//!
//! | System | Reaction | Unknown | Closed form |
//! |--------|----------|---------|-------------|
//! | Homodimer | 2 M ⇌ D | free monomer `M` | `M = (Kd/4)·(√(1 + 8·Ct/Kd) − 1)` |
//! | Heterocomplex | A + B ⇌ AB | complex `AB` | `AB = ½·(S − √(S² − 4·At·Bt))`, `S = Kd + At + Bt` |
//!
//! Both roots are evaluated in their rationalized forms
//! `M = 2·Ct·√Kd / (√(Kd + 8·Ct) + √Kd)` and `AB = 2·At·Bt / (S + √(S² − 4·At·Bt))`,
//! which are algebraically identical but free of cancellation when the total
//! concentration is small compared to Kd. Sums under a root are scaled by their largest
//! term, so any pair of positive finite inputs resolves without overflow.
//!
//! Every resolved state is checked for mass balance and fraction conservation before it is
//! returned. A failed check is reported as [`SimulationError::InvariantViolation`].
use super::sim_errors::{SimulationError, ensure_positive};
use log::debug;

/// relative tolerance of every mass-balance and fraction check
pub const RELATIVE_TOLERANCE: f64 = 1e-9;
/// absolute tolerance used for dimensionless quantities (fractions)
pub const FRACTION_ABSOLUTE_TOLERANCE: f64 = 1e-12;

/// Close when `|a - b| <= atol` or `|a - b| <= rtol * max(|a|, |b|)`.
pub fn is_close(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    approx::relative_eq!(a, b, epsilon = atol, max_relative = rtol)
}

/// Free concentrations (M) of a resolved 2 M ⇌ D system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomodimerState {
    pub monomer_total: f64,
    pub monomer: f64,
    pub dimer: f64,
}

impl HomodimerState {
    /// fraction of monomer units present as free monomer
    pub fn monomer_fraction(&self) -> f64 {
        self.monomer / self.monomer_total
    }
    /// fraction of monomer units bound in dimers
    pub fn dimer_fraction(&self) -> f64 {
        2.0 * self.dimer / self.monomer_total
    }
    /// concentrations of the particles the instrument counts, in species order
    pub fn species_concentrations(&self) -> [f64; 2] {
        [self.monomer, self.dimer]
    }

    pub fn check_invariants(&self) -> Result<(), SimulationError> {
        let balance = self.monomer + 2.0 * self.dimer;
        if !is_close(self.monomer_total, balance, RELATIVE_TOLERANCE, 0.0) {
            return Err(SimulationError::InvariantViolation(format!(
                "total monomer {} != monomer + 2*dimer {}",
                self.monomer_total, balance
            )));
        }
        let fraction_sum = self.monomer_fraction() + self.dimer_fraction();
        if !is_close(
            fraction_sum,
            1.0,
            RELATIVE_TOLERANCE,
            FRACTION_ABSOLUTE_TOLERANCE,
        ) {
            return Err(SimulationError::InvariantViolation(format!(
                "monomer and dimer fractions sum to {}",
                fraction_sum
            )));
        }
        if self.monomer <= 0.0 || self.dimer < 0.0 {
            return Err(SimulationError::InvariantViolation(format!(
                "expected monomer > 0 and dimer >= 0, got monomer {}, dimer {}",
                self.monomer, self.dimer
            )));
        }
        Ok(())
    }
}

/// Resolves 2 M ⇌ D for total monomer concentration `monomer_total` (M) and dissociation
/// constant `kd` (M).
pub fn resolve_homodimer(kd: f64, monomer_total: f64) -> Result<HomodimerState, SimulationError> {
    ensure_positive("Kd", kd)?;
    ensure_positive("total monomer concentration", monomer_total)?;

    // M = 2 Ct sqrt(Kd) / (sqrt(Kd + 8 Ct) + sqrt(Kd)); the sum under the root is scaled by
    // its larger term so neither 8 Ct nor Ct / Kd can overflow
    let scale = kd.max(monomer_total);
    let root = scale.sqrt() * (kd / scale + 8.0 * (monomer_total / scale)).sqrt();
    let sqrt_kd = kd.sqrt();
    let monomer = monomer_total * (2.0 * sqrt_kd / (root + sqrt_kd));
    let dimer = (monomer_total - monomer) / 2.0;
    let state = HomodimerState {
        monomer_total,
        monomer,
        dimer,
    };
    state.check_invariants()?;
    debug!(
        "homodimer Kd={:e} Ct={:e}: M={:e}, D={:e}",
        kd, monomer_total, monomer, dimer
    );
    Ok(state)
}

/// Free and bound concentrations (M) of a resolved A + B ⇌ AB system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeterocomplexState {
    pub a_total: f64,
    pub b_total: f64,
    pub a_free: f64,
    pub b_free: f64,
    pub complex: f64,
}

impl HeterocomplexState {
    pub fn free_a_fraction(&self) -> f64 {
        self.a_free / self.a_total
    }
    pub fn bound_a_fraction(&self) -> f64 {
        self.complex / self.a_total
    }
    pub fn free_b_fraction(&self) -> f64 {
        self.b_free / self.b_total
    }
    pub fn bound_b_fraction(&self) -> f64 {
        self.complex / self.b_total
    }
    /// concentrations of the particles the instrument counts: A, B, AB
    pub fn species_concentrations(&self) -> [f64; 3] {
        [self.a_free, self.b_free, self.complex]
    }

    pub fn check_invariants(&self) -> Result<(), SimulationError> {
        for (name, total, free) in [
            ("A", self.a_total, self.a_free),
            ("B", self.b_total, self.b_free),
        ] {
            if !is_close(total, free + self.complex, RELATIVE_TOLERANCE, 0.0) {
                return Err(SimulationError::InvariantViolation(format!(
                    "total {} {} != free {} + complex {}",
                    name, total, free, self.complex
                )));
            }
            let fraction_sum = free / total + self.complex / total;
            if !is_close(
                fraction_sum,
                1.0,
                RELATIVE_TOLERANCE,
                FRACTION_ABSOLUTE_TOLERANCE,
            ) {
                return Err(SimulationError::InvariantViolation(format!(
                    "free and bound fractions of {} sum to {}",
                    name, fraction_sum
                )));
            }
        }
        if self.complex < 0.0 || self.a_free < 0.0 || self.b_free < 0.0 {
            return Err(SimulationError::InvariantViolation(format!(
                "negative concentration: A {}, B {}, AB {}",
                self.a_free, self.b_free, self.complex
            )));
        }
        Ok(())
    }
}

/// Resolves A + B ⇌ AB for total concentrations `a_total`, `b_total` (M) and dissociation
/// constant `kd` (M).
pub fn resolve_heterocomplex(
    kd: f64,
    a_total: f64,
    b_total: f64,
) -> Result<HeterocomplexState, SimulationError> {
    ensure_positive("Kd", kd)?;
    ensure_positive("total A concentration", a_total)?;
    ensure_positive("total B concentration", b_total)?;

    // AB = 2 At Bt / (S + sqrt(S^2 - 4 At Bt)) with S = Kd + At + Bt, written in the shares
    // At / S and Bt / S so that neither S^2 nor At Bt can overflow
    let s = kd + a_total + b_total;
    let (small, large) = if a_total <= b_total {
        (a_total, b_total)
    } else {
        (b_total, a_total)
    };
    let large_share = large / s;
    let q = (1.0 - 4.0 * large_share * (small / s)).max(0.0).sqrt();
    // rounding can push the smaller root a few ulps past the limiting reagent
    let complex = (2.0 * small * large_share / (1.0 + q)).min(small);
    let state = HeterocomplexState {
        a_total,
        b_total,
        a_free: a_total - complex,
        b_free: b_total - complex,
        complex,
    };
    state.check_invariants()?;
    debug!(
        "heterocomplex Kd={:e} At={:e} Bt={:e}: AB={:e}",
        kd, a_total, b_total, complex
    );
    Ok(state)
}
