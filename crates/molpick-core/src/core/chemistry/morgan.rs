use super::fingerprint::BitFingerprint;
use super::smiles::{MolecularGraph, parse_smiles};
use super::{ChemistryError, ChemistryService, FingerprintParams};
use std::collections::HashSet;
use xxhash_rust::xxh3::xxh3_64;

/// Circular (ECFP-style) fingerprint of a molecular graph.
///
/// Every atom starts from an invariant hashed from its element, aromaticity, heavy-atom degree,
/// formal charge, isotope and bracket hydrogen count. Each of the `radius` rounds rehashes an
/// atom's invariant together with the sorted `(bond order, neighbour invariant)` list, so round
/// `r` describes the environment within `r` bonds. All distinct environment hashes from rounds
/// `0..=radius` are folded into `params.bits` positions.
pub fn morgan_fingerprint(graph: &MolecularGraph, params: &FingerprintParams) -> BitFingerprint {
    let n = graph.atom_count();
    let mut invariants: Vec<u64> = (0..n).map(|i| initial_invariant(graph, i)).collect();
    let mut environments: HashSet<u64> = invariants.iter().copied().collect();

    for round in 1..=params.radius {
        let next: Vec<u64> = (0..n)
            .map(|atom| refine_invariant(graph, &invariants, atom, round))
            .collect();
        environments.extend(next.iter().copied());
        invariants = next;
    }

    let width = params.bits as u64;
    let mut fp = BitFingerprint::new(params.bits);
    if width > 0 {
        for hash in environments {
            fp.set((hash % width) as usize);
        }
    }
    fp
}

fn initial_invariant(graph: &MolecularGraph, atom: usize) -> u64 {
    let a = &graph.atoms()[atom];
    let degree = u8::try_from(graph.degree(atom)).unwrap_or(u8::MAX);
    let mut buf = [0u8; 8];
    buf[0] = a.atomic_number;
    buf[1] = u8::from(a.aromatic);
    buf[2] = degree;
    buf[3] = a.charge.to_le_bytes()[0];
    buf[4..6].copy_from_slice(&a.isotope.unwrap_or(0).to_le_bytes());
    buf[6] = a.explicit_hydrogens.unwrap_or(u8::MAX);
    xxh3_64(&buf)
}

fn refine_invariant(graph: &MolecularGraph, invariants: &[u64], atom: usize, round: u32) -> u64 {
    let mut neighbors: Vec<(u8, u64)> = graph
        .neighbors(atom)
        .iter()
        .map(|&(other, order)| (order.code(), invariants[other]))
        .collect();
    neighbors.sort_unstable();

    let mut buf = Vec::with_capacity(12 + neighbors.len() * 9);
    buf.extend_from_slice(&round.to_le_bytes());
    buf.extend_from_slice(&invariants[atom].to_le_bytes());
    for (code, invariant) in neighbors {
        buf.push(code);
        buf.extend_from_slice(&invariant.to_le_bytes());
    }
    xxh3_64(&buf)
}

/// Bundled [`ChemistryService`]: SMILES identifiers, circular bit-vector fingerprints and
/// Tanimoto similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MorganChemistry;

impl MorganChemistry {
    pub fn new() -> Self {
        Self
    }
}

impl ChemistryService for MorganChemistry {
    type Fingerprint = BitFingerprint;

    fn fingerprint(
        &self,
        identifier: &str,
        params: &FingerprintParams,
    ) -> Result<BitFingerprint, ChemistryError> {
        if params.bits == 0 {
            return Err(ChemistryError::InvalidParameter(
                "fingerprint width must be at least one bit".to_string(),
            ));
        }
        let graph = parse_smiles(identifier)?;
        Ok(morgan_fingerprint(&graph, params))
    }

    fn similarity(&self, a: &BitFingerprint, b: &BitFingerprint) -> f64 {
        a.tanimoto(b)
    }
}
