// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-FileCopyrightText: © 2020 Dominik Spicher <dominikspicher@gmail.com>
// SPDX-License-Identifier: MIT

//! Fragment Chooser.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::{fountain::sampler::Weighted, xoshiro::Xoshiro256};

/// A fragment chooser.
///
/// Deterministically derives the set of fragment indexes mixed into a given
/// part number, from the part's sequence number, the total sequence count
/// and the message checksum.
#[derive(Default)]
pub struct FragmentChooser {
    sampler: Weighted,
    indexes: Vec<usize>,
    shuffled: Vec<usize>,
}

impl FragmentChooser {
    /// Construct a new [`FragmentChooser`].
    pub const fn new() -> Self {
        Self {
            sampler: Weighted::new(),
            indexes: Vec::new(),
            shuffled: Vec::new(),
        }
    }

    /// Choose fragments from part data.
    ///
    /// # Panics
    ///
    /// This function panics if `sequence` or `sequence_count` are zero.
    pub fn choose_fragments(
        &mut self,
        sequence: u32,
        sequence_count: u32,
        checksum: u32,
    ) -> BTreeSet<usize> {
        assert!(sequence > 0 && sequence_count > 0);

        if sequence <= sequence_count {
            let mut set = BTreeSet::new();
            set.insert((sequence - 1).try_into().unwrap());
            return set;
        }

        let seed = seed(sequence, checksum);
        let mut prng = Xoshiro256::from(seed.as_slice());

        let degree = choose_degree(&mut self.sampler, &mut prng, sequence_count);

        self.shuffled.clear();
        self.indexes.clear();
        self.indexes.reserve(sequence_count.try_into().unwrap());
        self.indexes.extend(0..sequence_count.try_into().unwrap());
        shuffle_indexes(&mut prng, &mut self.indexes, &mut self.shuffled, degree);

        self.shuffled.iter().copied().collect()
    }
}

fn choose_degree(sampler: &mut Weighted, prng: &mut Xoshiro256, sequence_count: u32) -> usize {
    sampler.set((0..sequence_count).map(|x| 1.0 / f64::from(x + 1)));
    usize::try_from(sampler.next(prng) + 1).unwrap()
}

fn shuffle_indexes(
    prng: &mut Xoshiro256,
    indexes: &mut Vec<usize>,
    shuffled: &mut Vec<usize>,
    degree: usize,
) {
    debug_assert!(degree <= indexes.len());

    shuffled.reserve(degree);
    while shuffled.len() < degree {
        let index = usize::try_from(prng.next_int(0, (indexes.len() - 1) as u64)).unwrap();
        let item = indexes.remove(index);
        shuffled.push(item);
    }
}

fn seed(sequence: u32, checksum: u32) -> [u8; 8] {
    let mut seed = [0u8; 8];
    seed[0..4].copy_from_slice(&sequence.to_be_bytes());
    seed[4..8].copy_from_slice(&checksum.to_be_bytes());
    seed
}
