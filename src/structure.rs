//! In-memory molecular structure snapshot.
//!
//! Atoms arrive already parsed and annotated (chain, residue, secondary
//! structure, backbone marker) from the upstream structure source. This
//! module owns the immutable snapshot the renderer reads from; nothing in
//! the rendering path ever mutates it.

use glam::Vec3;

/// Chemical element, reduced to the set the renderer colors and sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// Hydrogen.
    H,
    /// Carbon.
    C,
    /// Nitrogen.
    N,
    /// Oxygen.
    O,
    /// Sulfur.
    S,
    /// Phosphorus.
    P,
    /// Iron.
    Fe,
    /// Anything else (rendered with neutral defaults).
    Other,
}

impl Element {
    /// Parse a one/two-letter element symbol. Unrecognized symbols map to
    /// [`Element::Other`].
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol.trim() {
            "H" | "h" => Self::H,
            "C" | "c" => Self::C,
            "N" | "n" => Self::N,
            "O" | "o" => Self::O,
            "S" | "s" => Self::S,
            "P" | "p" => Self::P,
            "FE" | "Fe" | "fe" => Self::Fe,
            _ => Self::Other,
        }
    }

    /// Standard CPK color for this element (RGB, 0-1 range).
    #[must_use]
    pub fn cpk_color(self) -> [f32; 3] {
        match self {
            Self::H => [0.9, 0.9, 0.9],
            Self::C => [0.35, 0.35, 0.35],
            Self::N => [0.2, 0.3, 0.9],
            Self::O => [0.9, 0.15, 0.15],
            Self::S => [0.9, 0.8, 0.2],
            Self::P => [0.95, 0.55, 0.1],
            Self::Fe => [0.8, 0.45, 0.1],
            Self::Other => [0.7, 0.5, 0.8],
        }
    }

    /// Relative sphere scale approximating atomic radii.
    ///
    /// Hydrogen is the smallest; sulfur and phosphorus the largest tier.
    #[must_use]
    pub fn radius_scale(self) -> f32 {
        match self {
            Self::H => 0.4,
            Self::C => 0.7,
            Self::N => 0.65,
            Self::O => 0.6,
            Self::S | Self::P => 1.0,
            Self::Fe => 0.9,
            Self::Other => 0.75,
        }
    }
}

/// Secondary structure category for a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecondaryStructure {
    /// Alpha helix.
    Helix,
    /// Beta sheet.
    Sheet,
    /// Loop / random coil.
    Coil,
    /// No annotation available.
    #[default]
    Unknown,
}

impl SecondaryStructure {
    /// Base color for this category (RGB, 0-1 range).
    #[must_use]
    pub fn base_color(self) -> [f32; 3] {
        match self {
            Self::Helix => [0.9, 0.3, 0.5],
            Self::Sheet => [0.95, 0.85, 0.3],
            Self::Coil => [0.6, 0.85, 0.6],
            Self::Unknown => [0.65, 0.65, 0.65],
        }
    }
}

/// A single atom record. Immutable once parsed; owned by the snapshot.
#[derive(Debug, Clone)]
pub struct Atom {
    /// Serial id from the source file.
    pub serial: u32,
    /// Chemical element.
    pub element: Element,
    /// Atom name (e.g. `"CA"`), used upstream to detect backbone markers.
    pub name: String,
    /// Single-character chain identifier.
    pub chain: char,
    /// Three-letter residue name (e.g. `"ALA"`).
    pub residue_name: String,
    /// Residue sequence number within the chain.
    pub residue_number: i32,
    /// Position in angstroms.
    pub position: Vec3,
    /// Secondary structure category of the parent residue.
    pub secondary_structure: SecondaryStructure,
    /// Whether this atom is the per-residue backbone marker (alpha carbon).
    pub is_backbone: bool,
    /// Whether this atom belongs to a ligand.
    pub is_ligand: bool,
    /// Whether this atom lines a binding pocket.
    pub is_pocket: bool,
}

/// A bond between two atoms, as indices into the snapshot's atom list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    /// Index of the first atom.
    pub a: u32,
    /// Index of the second atom.
    pub b: u32,
}

/// The full ordered atom list plus derived bonds for one loaded molecule.
///
/// Replaces any prior snapshot atomically on structure load; the renderer
/// never mutates it.
#[derive(Debug, Clone, Default)]
pub struct StructureSnapshot {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

impl StructureSnapshot {
    /// Build a snapshot from an ordered atom list and derived bond list.
    #[must_use]
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        Self { atoms, bonds }
    }

    /// All atoms, in file order.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Derived bond list.
    #[must_use]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Number of atoms.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Chain identifiers in first-appearance order, deduplicated.
    #[must_use]
    pub fn chains(&self) -> Vec<char> {
        let mut chains = Vec::new();
        for atom in &self.atoms {
            if !chains.contains(&atom.chain) {
                chains.push(atom.chain);
            }
        }
        chains
    }

    /// Number of distinct chains.
    #[must_use]
    pub fn chain_count(&self) -> usize {
        self.chains().len()
    }

    /// Number of distinct residues across all chains.
    #[must_use]
    pub fn residue_count(&self) -> usize {
        let mut count = 0;
        let mut prev: Option<(char, i32)> = None;
        for atom in &self.atoms {
            let key = (atom.chain, atom.residue_number);
            if prev != Some(key) {
                count += 1;
                prev = Some(key);
            }
        }
        count
    }

    /// Backbone-marker atoms of one chain, sorted by residue number.
    ///
    /// This is the trace the spline builder consumes. Chains without
    /// backbone markers yield an empty list (and are skipped downstream).
    #[must_use]
    pub fn backbone_of_chain(&self, chain: char) -> Vec<&Atom> {
        let mut backbone: Vec<&Atom> = self
            .atoms
            .iter()
            .filter(|a| a.chain == chain && a.is_backbone)
            .collect();
        backbone.sort_by_key(|a| a.residue_number);
        backbone
    }

    /// Bounding sphere (centroid + max distance) over all atom positions.
    ///
    /// Returns `None` for an empty snapshot.
    #[must_use]
    pub fn bounding_sphere(&self) -> Option<(Vec3, f32)> {
        if self.atoms.is_empty() {
            return None;
        }
        let centroid: Vec3 = self.atoms.iter().map(|a| a.position).sum::<Vec3>()
            / self.atoms.len() as f32;
        let radius = self
            .atoms
            .iter()
            .map(|a| (a.position - centroid).length())
            .fold(0.0f32, f32::max);
        Some((centroid, radius))
    }
}
