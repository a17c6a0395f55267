use super::ChemistryError;
use crate::core::utils::elements::{
    atomic_number, capitalize_symbol, is_aromatic_symbol, is_organic_subset,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    /// Stable numeric code used when hashing atom environments.
    pub fn code(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
            BondOrder::Aromatic => 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphAtom {
    /// Capitalized element symbol, or `*` for a wildcard atom.
    pub element: String,
    /// Atomic number; `0` for a wildcard atom.
    pub atomic_number: u8,
    pub aromatic: bool,
    pub isotope: Option<u16>,
    pub charge: i8,
    /// Hydrogen count written inside a bracket atom. `None` outside brackets.
    pub explicit_hydrogens: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphBond {
    pub first: usize,
    pub second: usize,
    pub order: BondOrder,
}

/// Atom/bond graph of a molecule as written in a SMILES string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MolecularGraph {
    atoms: Vec<GraphAtom>,
    bonds: Vec<GraphBond>,
    adjacency: Vec<Vec<(usize, BondOrder)>>,
}

impl MolecularGraph {
    pub fn atoms(&self) -> &[GraphAtom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[GraphBond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Neighbours of `atom` together with the connecting bond order.
    pub fn neighbors(&self, atom: usize) -> &[(usize, BondOrder)] {
        self.adjacency.get(atom).map_or(&[], |n| n.as_slice())
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.neighbors(atom).len()
    }

    fn add_atom(&mut self, atom: GraphAtom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    fn has_bond(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).iter().any(|&(n, _)| n == b)
    }

    fn add_bond(&mut self, first: usize, second: usize, order: BondOrder) {
        self.bonds.push(GraphBond {
            first,
            second,
            order,
        });
        self.adjacency[first].push((second, order));
        self.adjacency[second].push((first, order));
    }

    fn implicit_order(&self, a: usize, b: usize) -> BondOrder {
        if self.atoms[a].aromatic && self.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }
}

/// Reads a SMILES string into a [`MolecularGraph`].
///
/// Only the syntax is checked; valences and aromaticity are taken as written.
///
/// # Errors
///
/// Returns [`ChemistryError::Parse`] with the byte offset of the offending character.
pub fn parse_smiles(smiles: &str) -> Result<MolecularGraph, ChemistryError> {
    SmilesParser::new(smiles).parse()
}

#[derive(Debug, Clone, Copy)]
struct RingOpening {
    atom: usize,
    bond: Option<BondOrder>,
    position: usize,
}

struct SmilesParser<'a> {
    bytes: &'a [u8],
    pos: usize,
    graph: MolecularGraph,
    previous: Option<usize>,
    pending_bond: Option<(BondOrder, usize)>,
    branches: Vec<(Option<usize>, usize)>,
    open_rings: BTreeMap<u16, RingOpening>,
}

impl<'a> SmilesParser<'a> {
    fn new(smiles: &'a str) -> Self {
        Self {
            bytes: smiles.as_bytes(),
            pos: 0,
            graph: MolecularGraph::default(),
            previous: None,
            pending_bond: None,
            branches: Vec::new(),
            open_rings: BTreeMap::new(),
        }
    }

    fn parse(mut self) -> Result<MolecularGraph, ChemistryError> {
        if self.bytes.is_empty() {
            return Err(ChemistryError::parse(0, "empty SMILES string"));
        }

        while let Some(&c) = self.bytes.get(self.pos) {
            match c {
                b'(' => self.open_branch()?,
                b')' => self.close_branch()?,
                b'-' | b'=' | b'#' | b'$' | b':' | b'/' | b'\\' => self.read_bond(c)?,
                b'.' => {
                    if let Some((_, at)) = self.pending_bond {
                        return Err(ChemistryError::parse(at, "bond symbol before '.'"));
                    }
                    self.previous = None;
                    self.pos += 1;
                }
                b'0'..=b'9' | b'%' => self.read_ring_closure()?,
                b'[' => {
                    let atom = self.read_bracket_atom()?;
                    self.push_atom(atom);
                }
                b'*' => {
                    self.pos += 1;
                    self.push_atom(wildcard_atom());
                }
                c if c.is_ascii_alphabetic() => {
                    let atom = self.read_organic_atom()?;
                    self.push_atom(atom);
                }
                _ => {
                    return Err(ChemistryError::parse(
                        self.pos,
                        format!("unexpected character '{}'", char::from(c)),
                    ));
                }
            }
        }

        if let Some((_, at)) = self.pending_bond {
            return Err(ChemistryError::parse(at, "bond symbol without a following atom"));
        }
        if let Some(&(_, at)) = self.branches.last() {
            return Err(ChemistryError::parse(at, "unclosed branch"));
        }
        if let Some((number, opening)) = self.open_rings.iter().next() {
            return Err(ChemistryError::parse(
                opening.position,
                format!("unclosed ring bond {}", number),
            ));
        }
        if self.graph.is_empty() {
            return Err(ChemistryError::parse(0, "SMILES string contains no atoms"));
        }
        Ok(self.graph)
    }

    fn push_atom(&mut self, atom: GraphAtom) {
        let index = self.graph.add_atom(atom);
        if let Some(previous) = self.previous {
            let order = match self.pending_bond.take() {
                Some((order, _)) => order,
                None => self.graph.implicit_order(previous, index),
            };
            self.graph.add_bond(previous, index, order);
        }
        self.previous = Some(index);
    }

    fn open_branch(&mut self) -> Result<(), ChemistryError> {
        if self.previous.is_none() {
            return Err(ChemistryError::parse(self.pos, "branch without a preceding atom"));
        }
        if let Some((_, at)) = self.pending_bond {
            return Err(ChemistryError::parse(at, "bond symbol before '('"));
        }
        self.branches.push((self.previous, self.pos));
        self.pos += 1;
        Ok(())
    }

    fn close_branch(&mut self) -> Result<(), ChemistryError> {
        let (anchor, _) = self
            .branches
            .pop()
            .ok_or_else(|| ChemistryError::parse(self.pos, "unmatched ')'"))?;
        if let Some((_, at)) = self.pending_bond {
            return Err(ChemistryError::parse(at, "bond symbol before ')'"));
        }
        self.previous = anchor;
        self.pos += 1;
        Ok(())
    }

    fn read_bond(&mut self, symbol: u8) -> Result<(), ChemistryError> {
        if self.previous.is_none() {
            return Err(ChemistryError::parse(self.pos, "bond without a preceding atom"));
        }
        if self.pending_bond.is_some() {
            return Err(ChemistryError::parse(self.pos, "consecutive bond symbols"));
        }
        let order = match symbol {
            b'=' => BondOrder::Double,
            b'#' => BondOrder::Triple,
            b'$' => BondOrder::Quadruple,
            b':' => BondOrder::Aromatic,
            _ => BondOrder::Single,
        };
        self.pending_bond = Some((order, self.pos));
        self.pos += 1;
        Ok(())
    }

    fn read_ring_closure(&mut self) -> Result<(), ChemistryError> {
        let start = self.pos;
        let number = if self.bytes[self.pos] == b'%' {
            let digits = self.bytes.get(self.pos + 1..self.pos + 3);
            match digits {
                Some(d) if d.iter().all(u8::is_ascii_digit) => {
                    self.pos += 3;
                    u16::from(d[0] - b'0') * 10 + u16::from(d[1] - b'0')
                }
                _ => {
                    return Err(ChemistryError::parse(
                        start,
                        "'%' must be followed by two digits",
                    ));
                }
            }
        } else {
            self.pos += 1;
            u16::from(self.bytes[start] - b'0')
        };

        let atom = self
            .previous
            .ok_or_else(|| ChemistryError::parse(start, "ring bond without a preceding atom"))?;
        let pending = self.pending_bond.take().map(|(order, _)| order);

        match self.open_rings.remove(&number) {
            Some(opening) => {
                if opening.atom == atom {
                    return Err(ChemistryError::parse(start, "ring bond closes on its own atom"));
                }
                if self.graph.has_bond(opening.atom, atom) {
                    return Err(ChemistryError::parse(
                        start,
                        "ring bond duplicates an existing bond",
                    ));
                }
                let order = match (opening.bond, pending) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(ChemistryError::parse(
                            start,
                            format!("conflicting bond orders for ring bond {}", number),
                        ));
                    }
                    (Some(order), _) | (None, Some(order)) => order,
                    (None, None) => self.graph.implicit_order(opening.atom, atom),
                };
                self.graph.add_bond(opening.atom, atom, order);
            }
            None => {
                self.open_rings.insert(
                    number,
                    RingOpening {
                        atom,
                        bond: pending,
                        position: start,
                    },
                );
            }
        }
        Ok(())
    }

    fn read_organic_atom(&mut self) -> Result<GraphAtom, ChemistryError> {
        let start = self.pos;
        let rest = &self.bytes[start..];

        if rest.len() >= 2 {
            if let Ok(two) = std::str::from_utf8(&rest[..2]) {
                if is_organic_subset(two) {
                    self.pos += 2;
                    return organic_atom(two, false, start);
                }
            }
        }

        let one = std::str::from_utf8(&rest[..1])
            .map_err(|_| ChemistryError::parse(start, "invalid character"))?;
        if is_organic_subset(one) {
            self.pos += 1;
            return organic_atom(one, false, start);
        }
        if is_aromatic_symbol(one) {
            self.pos += 1;
            return organic_atom(&capitalize_symbol(one), true, start);
        }
        Err(ChemistryError::parse(
            start,
            format!("'{}' is not allowed outside brackets", one),
        ))
    }

    fn read_bracket_atom(&mut self) -> Result<GraphAtom, ChemistryError> {
        let open = self.pos;
        self.pos += 1;

        let isotope = match self.read_number() {
            Some(value) => Some(u16::try_from(value).map_err(|_| {
                ChemistryError::parse(open + 1, format!("isotope {} is out of range", value))
            })?),
            None => None,
        };

        let symbol_start = self.pos;
        let (element, aromatic) = self.read_bracket_symbol()?;
        let atomic_number = if element == "*" {
            0
        } else {
            atomic_number(&element).ok_or_else(|| {
                ChemistryError::parse(symbol_start, format!("unknown element '{}'", element))
            })?
        };

        self.skip_chirality();

        let explicit_hydrogens = if self.peek() == Some(b'H') {
            self.pos += 1;
            let count = self.read_number().unwrap_or(1);
            Some(u8::try_from(count).map_err(|_| {
                ChemistryError::parse(self.pos, format!("hydrogen count {} is out of range", count))
            })?)
        } else {
            Some(0)
        };

        let charge = self.read_charge()?;

        if self.peek() == Some(b':') {
            self.pos += 1;
            if self.read_number().is_none() {
                return Err(ChemistryError::parse(self.pos, "atom class requires digits"));
            }
        }

        if self.peek() != Some(b']') {
            return Err(ChemistryError::parse(open, "unterminated bracket atom"));
        }
        self.pos += 1;

        Ok(GraphAtom {
            element,
            atomic_number,
            aromatic,
            isotope,
            charge,
            explicit_hydrogens,
        })
    }

    fn read_bracket_symbol(&mut self) -> Result<(String, bool), ChemistryError> {
        let start = self.pos;
        match self.peek() {
            Some(b'*') => {
                self.pos += 1;
                Ok(("*".to_string(), false))
            }
            Some(c) if c.is_ascii_lowercase() => {
                for len in [2, 1] {
                    if let Some(candidate) = self.slice_str(start, len) {
                        if is_aromatic_symbol(candidate) {
                            self.pos += len;
                            return Ok((capitalize_symbol(candidate), true));
                        }
                    }
                }
                Err(ChemistryError::parse(start, "unknown aromatic symbol"))
            }
            Some(c) if c.is_ascii_uppercase() => {
                if let Some(two) = self.slice_str(start, 2) {
                    if two.as_bytes()[1].is_ascii_lowercase() && atomic_number(two).is_some() {
                        self.pos += 2;
                        return Ok((two.to_string(), false));
                    }
                }
                self.pos += 1;
                Ok((char::from(c).to_string(), false))
            }
            _ => Err(ChemistryError::parse(start, "bracket atom requires an element symbol")),
        }
    }

    fn skip_chirality(&mut self) {
        if self.peek() != Some(b'@') {
            return;
        }
        while self.peek() == Some(b'@') {
            self.pos += 1;
        }
        // Extended classes such as @TH1, @SP2, @TB10, @OH25.
        let class = self.bytes.get(self.pos..self.pos + 2);
        if matches!(class, Some(b"TH" | b"AL" | b"SP" | b"TB" | b"OH")) {
            self.pos += 2;
            self.read_number();
        }
    }

    fn read_charge(&mut self) -> Result<i8, ChemistryError> {
        let sign: i64 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.bytes[self.pos];
        let start = self.pos;
        self.pos += 1;

        let magnitude = match self.read_number() {
            Some(value) => value,
            None => {
                let mut count = 1;
                while self.peek() == Some(symbol) {
                    count += 1;
                    self.pos += 1;
                }
                count
            }
        };
        i64::try_from(magnitude)
            .ok()
            .and_then(|m| m.checked_mul(sign))
            .and_then(|v| i8::try_from(v).ok())
            .ok_or_else(|| ChemistryError::parse(start, "formal charge is out of range"))
    }

    fn read_number(&mut self) -> Option<u64> {
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(c) = self.peek().filter(u8::is_ascii_digit) {
            value = value.saturating_mul(10).saturating_add(u64::from(c - b'0'));
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn slice_str(&self, start: usize, len: usize) -> Option<&'a str> {
        self.bytes
            .get(start..start + len)
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

fn organic_atom(symbol: &str, aromatic: bool, position: usize) -> Result<GraphAtom, ChemistryError> {
    let atomic_number = atomic_number(symbol)
        .ok_or_else(|| ChemistryError::parse(position, format!("unknown element '{}'", symbol)))?;
    Ok(GraphAtom {
        element: symbol.to_string(),
        atomic_number,
        aromatic,
        isotope: None,
        charge: 0,
        explicit_hydrogens: None,
    })
}

fn wildcard_atom() -> GraphAtom {
    GraphAtom {
        element: "*".to_string(),
        atomic_number: 0,
        aromatic: false,
        isotope: None,
        charge: 0,
        explicit_hydrogens: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err_position(smiles: &str) -> usize {
        match parse_smiles(smiles) {
            Err(ChemistryError::Parse { position, .. }) => position,
            other => panic!("expected parse error for {:?}, got {:?}", smiles, other),
        }
    }

    #[test]
    fn parses_linear_chain_with_implicit_single_bonds() {
        let graph = parse_smiles("CCO").unwrap();
        assert_eq!(graph.atom_count(), 3);
        assert_eq!(graph.bond_count(), 2);
        assert_eq!(graph.atoms()[2].element, "O");
        assert!(graph.bonds().iter().all(|b| b.order == BondOrder::Single));
    }

    #[test]
    fn two_letter_organic_symbols_take_precedence() {
        let graph = parse_smiles("ClCBr").unwrap();
        let elements: Vec<_> = graph.atoms().iter().map(|a| a.element.as_str()).collect();
        assert_eq!(elements, vec!["Cl", "C", "Br"]);
    }

    #[test]
    fn explicit_bond_orders_are_recorded() {
        let graph = parse_smiles("C=CC#N").unwrap();
        let orders: Vec<_> = graph.bonds().iter().map(|b| b.order).collect();
        assert_eq!(
            orders,
            vec![BondOrder::Double, BondOrder::Single, BondOrder::Triple]
        );
    }

    #[test]
    fn branches_attach_to_the_atom_before_the_parenthesis() {
        let graph = parse_smiles("CC(C)(C)O").unwrap();
        assert_eq!(graph.atom_count(), 5);
        assert_eq!(graph.degree(1), 4);
        assert_eq!(graph.degree(4), 1);
    }

    #[test]
    fn aromatic_ring_closure_produces_six_aromatic_bonds() {
        let graph = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(graph.atom_count(), 6);
        assert_eq!(graph.bond_count(), 6);
        assert!(graph.atoms().iter().all(|a| a.aromatic && a.element == "C"));
        assert!(graph.bonds().iter().all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn ring_closure_bond_order_can_be_written_on_either_end() {
        let graph = parse_smiles("C=1CCCCC1").unwrap();
        let closing = graph.bonds().last().unwrap();
        assert_eq!((closing.first, closing.second), (0, 5));
        assert_eq!(closing.order, BondOrder::Double);

        let graph = parse_smiles("C1CCCCC=1").unwrap();
        assert_eq!(graph.bonds().last().unwrap().order, BondOrder::Double);
    }

    #[test]
    fn percent_ring_numbers_are_supported() {
        let graph = parse_smiles("C%10CCC%10").unwrap();
        assert_eq!(graph.bond_count(), 4);
    }

    #[test]
    fn ring_numbers_can_be_reused_after_closing() {
        let graph = parse_smiles("C1CC1C1CC1").unwrap();
        assert_eq!(graph.atom_count(), 6);
        assert_eq!(graph.bond_count(), 7);
    }

    #[test]
    fn dot_separates_disconnected_components() {
        let graph = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(graph.atom_count(), 2);
        assert_eq!(graph.bond_count(), 0);
        assert_eq!(graph.atoms()[0].charge, 1);
        assert_eq!(graph.atoms()[1].charge, -1);
    }

    #[test]
    fn bracket_atoms_capture_isotope_hydrogens_and_charge() {
        let graph = parse_smiles("[13CH3][NH4+]").unwrap();
        let carbon = &graph.atoms()[0];
        assert_eq!(carbon.isotope, Some(13));
        assert_eq!(carbon.explicit_hydrogens, Some(3));
        let nitrogen = &graph.atoms()[1];
        assert_eq!(nitrogen.explicit_hydrogens, Some(4));
        assert_eq!(nitrogen.charge, 1);
    }

    #[test]
    fn bracket_atoms_accept_chirality_classes_and_repeated_charges() {
        let graph = parse_smiles("N[C@@H](C)C(=O)O").unwrap();
        assert_eq!(graph.atoms()[1].explicit_hydrogens, Some(1));

        let graph = parse_smiles("[Fe++]").unwrap();
        assert_eq!(graph.atoms()[0].charge, 2);

        let graph = parse_smiles("F[C@TH1](Cl)(Br)I").unwrap();
        assert_eq!(graph.atom_count(), 5);

        let graph = parse_smiles("[O-2:7]").unwrap();
        assert_eq!(graph.atoms()[0].charge, -2);
    }

    #[test]
    fn bracket_aromatic_two_letter_symbols_are_recognised() {
        let graph = parse_smiles("c1cc[se]c1").unwrap();
        assert_eq!(graph.atoms()[3].element, "Se");
        assert!(graph.atoms()[3].aromatic);
    }

    #[test]
    fn bracket_uppercase_two_letter_elements_are_recognised() {
        let graph = parse_smiles("[Sc]").unwrap();
        assert_eq!(graph.atoms()[0].element, "Sc");
        assert!(!graph.atoms()[0].aromatic);
    }

    #[test]
    fn wildcard_atoms_have_atomic_number_zero() {
        let graph = parse_smiles("*C[*]").unwrap();
        assert_eq!(graph.atoms()[0].atomic_number, 0);
        assert_eq!(graph.atoms()[2].element, "*");
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse_err_position(""), 0);
    }

    #[test]
    fn rejects_unknown_characters_with_their_position() {
        assert_eq!(parse_err_position("CC?C"), 2);
        assert_eq!(parse_err_position("CC C"), 2);
    }

    #[test]
    fn rejects_symbols_not_allowed_outside_brackets() {
        assert_eq!(parse_err_position("CNa"), 2);
        assert_eq!(parse_err_position("CX"), 1);
    }

    #[test]
    fn rejects_unknown_bracket_elements() {
        assert_eq!(parse_err_position("C[Xx]"), 2);
    }

    #[test]
    fn rejects_unbalanced_branches() {
        assert_eq!(parse_err_position("CC(C"), 2);
        assert_eq!(parse_err_position("CC)C"), 2);
        assert_eq!(parse_err_position("(C)C"), 0);
    }

    #[test]
    fn rejects_dangling_and_doubled_bonds() {
        assert_eq!(parse_err_position("CC="), 2);
        assert_eq!(parse_err_position("C==C"), 2);
        assert_eq!(parse_err_position("=C"), 0);
    }

    #[test]
    fn rejects_unclosed_rings() {
        assert_eq!(parse_err_position("C1CCC"), 1);
    }

    #[test]
    fn rejects_conflicting_ring_bond_orders() {
        assert_eq!(parse_err_position("C=1CCC#1"), 7);
    }

    #[test]
    fn rejects_unterminated_bracket_atom() {
        assert_eq!(parse_err_position("C[NH4+"), 1);
    }

    #[test]
    fn rejects_oversized_formal_charges() {
        assert_eq!(parse_err_position("[C+128]"), 2);
        assert_eq!(parse_err_position("[C-9223372036854775808]"), 2);
        assert_eq!(parse_err_position("[C-99999999999999999999999]"), 2);
        assert_eq!(parse_err_position("[C+99999999999999999999999]"), 2);
        assert_eq!(parse_smiles("[C-128]").unwrap().atoms()[0].charge, -128);
    }
}
