use bitvec::prelude::*;

/// A fixed-width bit vector fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitFingerprint {
    bits: BitVec<u64, Lsb0>,
}

impl BitFingerprint {
    /// Creates an all-zero fingerprint of `n_bits` bits.
    pub fn new(n_bits: usize) -> Self {
        Self {
            bits: bitvec![u64, Lsb0; 0; n_bits],
        }
    }

    /// Builds a fingerprint with the given bit positions set; positions outside the width are ignored.
    pub fn from_bits(n_bits: usize, bits: impl IntoIterator<Item = usize>) -> Self {
        let mut fp = Self::new(n_bits);
        for bit in bits {
            fp.set(bit);
        }
        fp
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Sets the bit at `index`. Returns `false` if `index` is outside the fingerprint width.
    pub fn set(&mut self, index: usize) -> bool {
        if index >= self.bits.len() {
            return false;
        }
        self.bits.set(index, true);
        true
    }

    pub fn contains(&self, index: usize) -> bool {
        self.bits.get(index).is_some_and(|bit| *bit)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    pub fn as_bitslice(&self) -> &BitSlice<u64, Lsb0> {
        &self.bits
    }

    /// Tanimoto (Jaccard) similarity `|a ∩ b| / |a ∪ b|`.
    ///
    /// Bits past the shorter width count toward the union only. Two fingerprints without any
    /// set bits score `0.0`.
    pub fn tanimoto(&self, other: &Self) -> f64 {
        let both = self.iter_ones().filter(|&i| other.contains(i)).count();
        let either = self.count_ones() + other.count_ones() - both;

        if either == 0 {
            0.0
        } else {
            both as f64 / either as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fingerprint_is_all_zero_with_rounded_storage() {
        let fp = BitFingerprint::new(130);
        assert_eq!(fp.len(), 130);
        assert_eq!(fp.as_bitslice().len(), 130);
        assert_eq!(fp.bits.as_raw_slice().len(), 3);
        assert_eq!(fp.count_ones(), 0);
    }

    #[test]
    fn set_ignores_out_of_range_indices() {
        let mut fp = BitFingerprint::new(10);
        assert!(fp.set(9));
        assert!(!fp.set(10));
        assert!(fp.contains(9));
        assert!(!fp.contains(10));
        assert_eq!(fp.count_ones(), 1);
    }

    #[test]
    fn iter_ones_yields_set_positions_in_order() {
        let fp = BitFingerprint::from_bits(200, [150, 3, 64, 3]);
        assert_eq!(fp.iter_ones().collect::<Vec<_>>(), vec![3, 64, 150]);
    }

    #[test]
    fn tanimoto_of_identical_fingerprints_is_one() {
        let fp = BitFingerprint::from_bits(64, [1, 5, 9]);
        assert_eq!(fp.tanimoto(&fp.clone()), 1.0);
    }

    #[test]
    fn tanimoto_counts_intersection_over_union() {
        let a = BitFingerprint::from_bits(128, [0, 1, 2, 100]);
        let b = BitFingerprint::from_bits(128, [1, 2, 3]);
        assert!((a.tanimoto(&b) - 2.0 / 5.0).abs() < 1e-12);
        assert_eq!(a.tanimoto(&b), b.tanimoto(&a));
    }

    #[test]
    fn tanimoto_of_disjoint_or_empty_fingerprints_is_zero() {
        let a = BitFingerprint::from_bits(64, [1]);
        let b = BitFingerprint::from_bits(64, [2]);
        assert_eq!(a.tanimoto(&b), 0.0);
        assert_eq!(BitFingerprint::new(64).tanimoto(&BitFingerprint::new(64)), 0.0);
    }

    #[test]
    fn tanimoto_with_mismatched_widths_counts_extra_bits_in_union() {
        let a = BitFingerprint::from_bits(64, [1]);
        let b = BitFingerprint::from_bits(128, [1, 70]);
        assert!((a.tanimoto(&b) - 0.5).abs() < 1e-12);
        assert!((b.tanimoto(&a) - 0.5).abs() < 1e-12);
    }
}
