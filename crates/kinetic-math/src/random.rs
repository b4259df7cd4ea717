// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Random Streams
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Explicit, per-cell random number streams.
//!
//! Every stepper call receives a `RandomStream` by mutable reference. Streams
//! are derived from a base seed, the process rank and a stream index (the cell
//! index), so runs are reproducible and cells can be advanced concurrently
//! without any shared generator.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp1, Poisson, StandardNormal};
use std::time::{SystemTime, UNIX_EPOCH};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 mix of base seed and rank.
pub fn derive_seed(seed: u64, rank: u64) -> u64 {
    let mut z = seed ^ rank.wrapping_mul(GOLDEN_GAMMA);
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Map a configured seed to a concrete one. Negative seeds are time-based.
pub fn resolve_seed(config_seed: i64) -> u64 {
    if config_seed >= 0 {
        return config_seed as u64;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    log::warn!("negative random seed requested, using time-based seed {nanos}");
    nanos
}

#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: ChaCha8Rng,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self::for_stream(seed, 0, 0)
    }

    /// Stream `stream` of the generator seeded by `(seed, rank)`.
    pub fn for_stream(seed: u64, rank: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(derive_seed(seed, rank));
        rng.set_stream(stream);
        RandomStream { rng }
    }

    /// Uniform on [0, 1).
    #[inline]
    pub fn uniform01(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform integer on [0, n). `n` must be positive.
    #[inline]
    pub fn index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    #[inline]
    pub fn normal01(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// Exponential waiting time with the given rate. Infinite for rate <= 0.
    #[inline]
    pub fn exponential(&mut self, rate: f64) -> f64 {
        if !(rate > 0.0) || !rate.is_finite() {
            return f64::INFINITY;
        }
        let e: f64 = self.rng.sample(Exp1);
        e / rate
    }

    /// Poisson draw with mean `mean`, or a zero-floored rounded Normal draw
    /// with matching mean and variance once `mean >= swap`.
    pub fn poisson(&mut self, mean: f64, swap: f64) -> u64 {
        if !(mean > 0.0) {
            return 0;
        }
        if mean < swap {
            match Poisson::new(mean) {
                Ok(dist) => {
                    let k: f64 = dist.sample(&mut self.rng);
                    k as u64
                }
                Err(_) => 0,
            }
        } else {
            let z = self.normal01();
            let value = mean + mean.sqrt() * z;
            value.max(0.0).round() as u64
        }
    }

    /// Isotropic unit vector in D dimensions.
    pub fn direction<const D: usize>(&mut self) -> [f64; D] {
        const SAFETY: f64 = 1.0e-12;
        loop {
            let mut v = [0.0; D];
            for c in v.iter_mut() {
                *c = self.normal01();
            }
            let norm = v.iter().map(|c| c * c).sum::<f64>().sqrt();
            if norm > SAFETY {
                for c in v.iter_mut() {
                    *c /= norm;
                }
                return v;
            }
        }
    }

    /// Uniform position in the box [lo, hi).
    pub fn position_in_box<const D: usize>(&mut self, lo: &[f64; D], hi: &[f64; D]) -> [f64; D] {
        let mut pos = [0.0; D];
        for d in 0..D {
            pos[d] = lo[d] + self.uniform01() * (hi[d] - lo[d]);
        }
        pos
    }
}
