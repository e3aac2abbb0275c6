// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-FileCopyrightText: © 2020 Dominik Spicher <dominikspicher@gmail.com>
// SPDX-License-Identifier: MIT

//! Random Sampler.

use alloc::vec::Vec;

/// Weighted random sampler, implemented with Vose's alias method.
#[derive(Default)]
pub struct Weighted {
    aliases: Vec<u32>,
    probs: Vec<f64>,
    weights: Vec<f64>,

    s: Vec<usize>,
    l: Vec<usize>,
}

impl Weighted {
    /// Construct a new [`Weighted`].
    pub const fn new() -> Self {
        Self {
            aliases: Vec::new(),
            probs: Vec::new(),
            weights: Vec::new(),
            s: Vec::new(),
            l: Vec::new(),
        }
    }

    /// Initialize random sampler.
    ///
    /// # Panics
    ///
    /// This function panics if any weight is negative, or if the weights
    /// don't sum to a positive value.
    pub fn set<I: ExactSizeIterator<Item = f64>>(&mut self, weights: I) {
        // The maximum number set of probabilities is u32::MAX, as seqNum in a part
        // wraps at u32::MAX, however, seqLen can be higher than a u32::MAX per the
        // CDDL specification, that should be fixed in the specification.
        let count =
            u32::try_from(weights.len()).expect("probabilities set is larger than expected");

        self.weights.clear();
        self.weights.reserve(weights.len());
        self.weights.extend(weights);

        let mut summed = 0.0;
        for &p in self.weights.iter() {
            assert!(p >= 0.0, "negative probability encountered");
            summed += p;
        }
        assert!(summed > 0.0, "probabilities don't sum to a positive value");

        let ratio = f64::from(count) / summed;
        for p in self.weights.iter_mut() {
            *p *= ratio;
        }

        self.reset(self.weights.len());

        for i in (0..self.weights.len()).rev() {
            if self.weights[i] < 1.0 {
                self.s.push(i);
            } else {
                self.l.push(i);
            }
        }

        while !self.s.is_empty() && !self.l.is_empty() {
            let a = self.s.pop().unwrap();
            let g = self.l.pop().unwrap();
            self.probs[a] = self.weights[a];
            self.aliases[a] = g.try_into().unwrap();
            self.weights[g] += self.weights[a] - 1.0;
            if self.weights[g] < 1.0 {
                self.s.push(g);
            } else {
                self.l.push(g);
            }
        }

        while !self.l.is_empty() {
            let g = self.l.pop().unwrap();
            self.probs[g] = 1.0;
        }

        while !self.s.is_empty() {
            let a = self.s.pop().unwrap();
            self.probs[a] = 1.0;
        }
    }

    /// Next sample.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_precision_loss)]
    #[allow(clippy::cast_sign_loss)]
    pub fn next(&mut self, xoshiro: &mut crate::xoshiro::Xoshiro256) -> u32 {
        let r1 = xoshiro.next_double();
        let r2 = xoshiro.next_double();
        let n = self.probs.len();
        let i = (n as f64 * r1) as usize;
        if r2 < self.probs[i] {
            i as u32
        } else {
            self.aliases[i]
        }
    }

    fn reset(&mut self, len: usize) {
        self.aliases.clear();
        self.probs.clear();
        self.s.clear();
        self.l.clear();

        self.aliases.resize(len, 0);
        self.probs.resize(len, 0.0);
    }
}
