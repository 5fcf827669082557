//! Per-sample and per-atom color assignment.
//!
//! The ribbon path blends chain identity with secondary-structure
//! category; the sphere path picks a color straight from the active
//! color mode with no blending. Highlighting is applied on top and is
//! fully reversible: it is recomputed whenever the highlight set
//! changes, never baked permanently into mesh data.

use std::collections::HashSet;

use crate::options::{ColorMode, ColorOptions};
use crate::structure::Atom;
use crate::structure::SecondaryStructure;

/// Straight per-channel linear interpolation: `a` toward `b` by `alpha`.
#[must_use]
pub fn blend(a: [f32; 3], b: [f32; 3], alpha: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * alpha,
        a[1] + (b[1] - a[1]) * alpha,
        a[2] + (b[2] - a[2]) * alpha,
    ]
}

/// Computes colors for both rendering paths.
///
/// Holds a reference to the palette/policy options and the current
/// highlight set of chain identifiers; cheap to rebuild per frame.
#[derive(Debug)]
pub struct ColorAssigner<'a> {
    options: &'a ColorOptions,
    highlight: &'a HashSet<char>,
}

impl<'a> ColorAssigner<'a> {
    /// Assigner over the given policy and highlight set.
    #[must_use]
    pub fn new(
        options: &'a ColorOptions,
        highlight: &'a HashSet<char>,
    ) -> Self {
        Self { options, highlight }
    }

    /// Ribbon ring color: chain color blended toward the
    /// secondary-structure color, then highlight-adjusted.
    ///
    /// `chain_index` is the chain's first-appearance index (palette
    /// lookup); `chain` its identifier (highlight lookup).
    #[must_use]
    pub fn ribbon_color(
        &self,
        chain_index: usize,
        chain: char,
        structure: SecondaryStructure,
    ) -> [f32; 3] {
        let base = blend(
            self.options.chain_color(chain_index),
            structure.base_color(),
            self.options.blend_alpha,
        );
        self.apply_highlight(base, chain)
    }

    /// Sphere-path atom color for the active color mode, then
    /// highlight-adjusted. No blending: each mode is a direct lookup.
    #[must_use]
    pub fn atom_color(
        &self,
        atom: &Atom,
        chain_index: usize,
        mode: ColorMode,
    ) -> [f32; 3] {
        let base = match mode {
            ColorMode::Element => atom.element.cpk_color(),
            ColorMode::Chain => self.options.chain_color(chain_index),
            ColorMode::Uniform => self.options.uniform_color,
            ColorMode::SecondaryStructure => {
                atom.secondary_structure.base_color()
            }
        };
        self.apply_highlight(base, atom.chain)
    }

    /// Spotlight adjustment: with a non-empty highlight set, highlighted
    /// chains are brightened (boost, clamped to 1.0) and all others
    /// dimmed. An empty set leaves colors bit-identical to the base
    /// blend, so clearing the highlight restores the original colors.
    fn apply_highlight(&self, color: [f32; 3], chain: char) -> [f32; 3] {
        if self.highlight.is_empty() {
            return color;
        }
        let factor = if self.highlight.contains(&chain) {
            self.options.highlight_boost
        } else {
            self.options.dim_factor
        };
        [
            (color[0] * factor).min(1.0),
            (color[1] * factor).min(1.0),
            (color[2] * factor).min(1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Element;
    use glam::Vec3;

    fn atom_in(chain: char) -> Atom {
        Atom {
            serial: 1,
            element: Element::O,
            name: "O".into(),
            chain,
            residue_name: "HOH".into(),
            residue_number: 1,
            position: Vec3::ZERO,
            secondary_structure: SecondaryStructure::Sheet,
            is_backbone: false,
            is_ligand: false,
            is_pocket: false,
        }
    }

    #[test]
    fn blend_is_per_channel_lerp() {
        let c = blend([0.0, 0.5, 1.0], [1.0, 0.5, 0.0], 0.6);
        for (got, want) in c.iter().zip([0.6, 0.5, 0.4].iter()) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn highlight_is_reversible() {
        let options = ColorOptions::default();
        let empty = HashSet::new();
        let base = ColorAssigner::new(&options, &empty).ribbon_color(
            0,
            'A',
            SecondaryStructure::Helix,
        );

        let mut set = HashSet::new();
        let _ = set.insert('A');
        let boosted = ColorAssigner::new(&options, &set).ribbon_color(
            0,
            'A',
            SecondaryStructure::Helix,
        );
        assert_ne!(base, boosted);

        // Clearing the highlight restores the exact pre-highlight blend.
        let restored = ColorAssigner::new(&options, &empty).ribbon_color(
            0,
            'A',
            SecondaryStructure::Helix,
        );
        assert_eq!(base, restored);
    }

    #[test]
    fn non_highlighted_chains_are_dimmed() {
        let options = ColorOptions::default();
        let mut set = HashSet::new();
        let _ = set.insert('B');
        let assigner = ColorAssigner::new(&options, &set);
        let dimmed =
            assigner.ribbon_color(0, 'A', SecondaryStructure::Coil);
        let empty = HashSet::new();
        let base = ColorAssigner::new(&options, &empty).ribbon_color(
            0,
            'A',
            SecondaryStructure::Coil,
        );
        for (d, b) in dimmed.iter().zip(base.iter()) {
            assert!((d - b * options.dim_factor).abs() < 1e-6);
        }
    }

    #[test]
    fn boost_clamps_to_one() {
        let options = ColorOptions {
            chain_palette: vec![[0.9, 0.9, 0.9]],
            blend_alpha: 0.0,
            ..ColorOptions::default()
        };
        let mut set = HashSet::new();
        let _ = set.insert('A');
        let c = ColorAssigner::new(&options, &set).ribbon_color(
            0,
            'A',
            SecondaryStructure::Coil,
        );
        assert_eq!(c, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn sphere_modes_are_direct_lookups() {
        let options = ColorOptions::default();
        let empty = HashSet::new();
        let assigner = ColorAssigner::new(&options, &empty);
        let atom = atom_in('A');

        assert_eq!(
            assigner.atom_color(&atom, 0, ColorMode::Element),
            Element::O.cpk_color()
        );
        assert_eq!(
            assigner.atom_color(&atom, 2, ColorMode::Chain),
            options.chain_color(2)
        );
        assert_eq!(
            assigner.atom_color(&atom, 0, ColorMode::Uniform),
            options.uniform_color
        );
        assert_eq!(
            assigner.atom_color(&atom, 0, ColorMode::SecondaryStructure),
            SecondaryStructure::Sheet.base_color()
        );
    }
}
