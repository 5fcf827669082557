//! Level-of-detail selection.
//!
//! A state machine over five ordered quality levels. Structural
//! complexity picks a base level, the rendering style and recent frame
//! timing adjust it, and each level maps to a fixed immutable
//! [`LodSettings`] record that is swapped wholesale, never partially
//! mutated.

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::options::{LodOptions, RenderStyle};

/// Frame time above which quality is degraded one level (sub-30fps).
const FRAME_SLOW: Duration = Duration::from_micros(33_300);
/// Frame time below which quality is improved one level (≥60fps).
const FRAME_FAST: Duration = Duration::from_micros(16_700);

/// Normalization ceiling for the atom-count complexity term.
const ATOMS_FULL: f32 = 50_000.0;
/// Normalization ceiling for the chain-count complexity term.
const CHAINS_FULL: f32 = 20.0;
/// Normalization ceiling for the residue-count complexity term.
const RESIDUES_FULL: f32 = 5_000.0;

/// Discrete quality tier, ordered lowest to highest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    /// Minimum geometry, aggressive caps.
    UltraLow,
    /// Reduced geometry.
    Low,
    /// Balanced.
    Medium,
    /// Dense geometry.
    High,
    /// Maximum quality, no caps.
    Ultra,
}

impl QualityLevel {
    const ORDERED: [Self; 5] =
        [Self::UltraLow, Self::Low, Self::Medium, Self::High, Self::Ultra];

    /// Rank within the ordering (0 = lowest quality).
    #[must_use]
    pub fn rank(self) -> usize {
        match self {
            Self::UltraLow => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Ultra => 4,
        }
    }

    /// Level for a rank, clamped to the valid range.
    #[must_use]
    pub fn from_rank(rank: i32) -> Self {
        let clamped = rank.clamp(0, 4) as usize;
        Self::ORDERED[clamped]
    }

    /// Shift by `steps` levels (negative degrades), clamped.
    #[must_use]
    pub fn adjusted(self, steps: i32) -> Self {
        Self::from_rank(self.rank() as i32 + steps)
    }

    /// The fixed settings record for this level.
    #[must_use]
    pub fn settings(self) -> LodSettings {
        match self {
            Self::Ultra => LodSettings {
                level: self,
                sphere_rings: 16,
                sphere_sectors: 24,
                tube_segments: 12,
                segments_per_span: 10,
                atom_cap: None,
                quality: 1.0,
                instancing: true,
                shadows: true,
            },
            Self::High => LodSettings {
                level: self,
                sphere_rings: 12,
                sphere_sectors: 18,
                tube_segments: 10,
                segments_per_span: 8,
                atom_cap: Some(50_000),
                quality: 0.8,
                instancing: true,
                shadows: true,
            },
            Self::Medium => LodSettings {
                level: self,
                sphere_rings: 10,
                sphere_sectors: 14,
                tube_segments: 8,
                segments_per_span: 6,
                atom_cap: Some(20_000),
                quality: 0.6,
                instancing: true,
                shadows: false,
            },
            Self::Low => LodSettings {
                level: self,
                sphere_rings: 8,
                sphere_sectors: 10,
                tube_segments: 6,
                segments_per_span: 4,
                atom_cap: Some(10_000),
                quality: 0.4,
                instancing: true,
                shadows: false,
            },
            Self::UltraLow => LodSettings {
                level: self,
                sphere_rings: 5,
                sphere_sectors: 8,
                tube_segments: 4,
                segments_per_span: 2,
                atom_cap: Some(5_000),
                quality: 0.2,
                instancing: true,
                shadows: false,
            },
        }
    }
}

/// Immutable per-level settings: segment counts, atom cap, quality
/// scalar, feature flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodSettings {
    /// The level these settings belong to.
    pub level: QualityLevel,
    /// Unit sphere latitude subdivisions.
    pub sphere_rings: usize,
    /// Unit sphere longitude subdivisions.
    pub sphere_sectors: usize,
    /// Radial segments around the ribbon tube.
    pub tube_segments: usize,
    /// Spline sub-samples per backbone span.
    pub segments_per_span: usize,
    /// Maximum rendered atoms (`None` = unlimited).
    pub atom_cap: Option<usize>,
    /// Quality scalar in (0, 1] for downstream effects.
    pub quality: f32,
    /// Whether instanced drawing is enabled.
    pub instancing: bool,
    /// Whether shadow rendering is enabled.
    pub shadows: bool,
}

/// Selects quality levels from structural complexity, rendering style,
/// and recent frame timing.
#[derive(Debug, Clone, Default)]
pub struct LodManager {
    policy: LodOptions,
    last_frame: Option<Duration>,
}

impl LodManager {
    /// Manager with the given settings-surface policy.
    #[must_use]
    pub fn new(policy: LodOptions) -> Self {
        Self {
            policy,
            last_frame: None,
        }
    }

    /// Replace the settings-surface policy.
    pub fn set_policy(&mut self, policy: LodOptions) {
        self.policy = policy;
    }

    /// Record the most recent frame duration for the timing adjustment.
    pub fn note_frame_time(&mut self, duration: Duration) {
        self.last_frame = Some(duration);
    }

    /// Weighted structural complexity score in [0, 1].
    #[must_use]
    pub fn complexity_score(
        atom_count: usize,
        chain_count: usize,
        residue_count: usize,
    ) -> f32 {
        let atoms = (atom_count as f32 / ATOMS_FULL).min(1.0);
        let chains = (chain_count as f32 / CHAINS_FULL).min(1.0);
        let residues = (residue_count as f32 / RESIDUES_FULL).min(1.0);
        atoms * 0.6 + chains * 0.2 + residues * 0.2
    }

    /// Select the quality level for the given structure and style.
    ///
    /// Monotonic in complexity: increasing atom count (style and frame
    /// timing held fixed) never yields a higher-quality level. An
    /// explicit policy override bypasses selection entirely.
    #[must_use]
    pub fn determine_level(
        &self,
        atom_count: usize,
        chain_count: usize,
        residue_count: usize,
        style: RenderStyle,
    ) -> QualityLevel {
        if let Some(level) = self.policy.override_level {
            return level;
        }

        let score =
            Self::complexity_score(atom_count, chain_count, residue_count);
        let base = if score > 0.9 {
            QualityLevel::UltraLow
        } else if score > 0.7 {
            QualityLevel::Low
        } else if score > 0.5 {
            QualityLevel::Medium
        } else if score > 0.3 {
            QualityLevel::High
        } else {
            QualityLevel::Ultra
        };

        let style_adjust = match style {
            RenderStyle::Ribbon => 1,
            RenderStyle::Spheres => -1,
            RenderStyle::Sticks => 0,
            RenderStyle::Surface => -2,
        };
        let mut level = base.adjusted(style_adjust);

        match self.last_frame {
            Some(d) if d > FRAME_SLOW => level = level.adjusted(-1),
            Some(d) if d < FRAME_FAST => level = level.adjusted(1),
            _ => {}
        }

        log::debug!(
            "lod: score {score:.3} style {style:?} -> {level:?} \
             ({atom_count} atoms, {chain_count} chains)"
        );
        level
    }

    /// Settings for a level with the policy's explicit cap and sampling
    /// ratio folded in.
    #[must_use]
    pub fn settings_for(&self, level: QualityLevel) -> LodSettings {
        let mut settings = level.settings();
        if let Some(cap) = self.policy.atom_cap {
            settings.atom_cap = if cap == 0 { None } else { Some(cap) };
        }
        let ratio = self.policy.effective_sampling_ratio();
        if ratio < 1.0 {
            if let Some(cap) = settings.atom_cap {
                settings.atom_cap =
                    Some(((cap as f32 * ratio) as usize).max(1));
            }
        }
        settings
    }
}

/// Enforce an atom cap by uniform stride sampling (keep every Nth item).
///
/// Deterministic and reproducible for a given cap: the kept items are
/// exactly indices `0, stride, 2·stride, …`. Filtering an already-capped
/// list with the same cap returns it unchanged (idempotent).
#[must_use]
pub fn filter_atoms_for_lod<T: Clone>(items: &[T], cap: usize) -> Vec<T> {
    if cap == 0 || items.len() <= cap {
        return items.to_vec();
    }
    let stride = items.len().div_ceil(cap);
    items.iter().step_by(stride).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering_and_adjustment() {
        assert!(QualityLevel::Ultra > QualityLevel::UltraLow);
        assert_eq!(
            QualityLevel::Ultra.adjusted(3),
            QualityLevel::Ultra
        );
        assert_eq!(
            QualityLevel::UltraLow.adjusted(-1),
            QualityLevel::UltraLow
        );
        assert_eq!(QualityLevel::Medium.adjusted(1), QualityLevel::High);
    }

    #[test]
    fn determine_level_monotonic_in_atom_count() {
        let manager = LodManager::default();
        let mut prev = QualityLevel::Ultra;
        for atoms in (0..100_000).step_by(2_500) {
            let level = manager.determine_level(
                atoms,
                4,
                atoms / 10,
                RenderStyle::Spheres,
            );
            assert!(level <= prev, "quality rose with complexity");
            prev = level;
        }
    }

    #[test]
    fn style_adjustments() {
        let manager = LodManager::default();
        // Same mid-complexity structure under different styles.
        let (atoms, chains, residues) = (30_000, 4, 3_000);
        let ribbon =
            manager.determine_level(atoms, chains, residues, RenderStyle::Ribbon);
        let spheres = manager
            .determine_level(atoms, chains, residues, RenderStyle::Spheres);
        let surface = manager
            .determine_level(atoms, chains, residues, RenderStyle::Surface);
        assert!(ribbon > spheres);
        assert!(spheres > surface);
    }

    #[test]
    fn slow_frames_degrade_fast_frames_improve() {
        let mut manager = LodManager::default();
        let base = manager.determine_level(30_000, 4, 3_000, RenderStyle::Sticks);

        manager.note_frame_time(Duration::from_millis(50));
        let slow = manager.determine_level(30_000, 4, 3_000, RenderStyle::Sticks);
        assert_eq!(slow, base.adjusted(-1));

        manager.note_frame_time(Duration::from_millis(10));
        let fast = manager.determine_level(30_000, 4, 3_000, RenderStyle::Sticks);
        assert_eq!(fast, base.adjusted(1));
    }

    #[test]
    fn override_pins_the_level() {
        let manager = LodManager::new(LodOptions {
            override_level: Some(QualityLevel::UltraLow),
            ..LodOptions::default()
        });
        assert_eq!(
            manager.determine_level(10, 1, 5, RenderStyle::Ribbon),
            QualityLevel::UltraLow
        );
    }

    #[test]
    fn explicit_cap_and_ratio_fold_into_settings() {
        let manager = LodManager::new(LodOptions {
            atom_cap: Some(1_000),
            sampling_ratio: 0.5,
            ..LodOptions::default()
        });
        let settings = manager.settings_for(QualityLevel::Ultra);
        assert_eq!(settings.atom_cap, Some(500));

        // Cap of zero means unlimited.
        let unlimited = LodManager::new(LodOptions {
            atom_cap: Some(0),
            ..LodOptions::default()
        });
        assert_eq!(
            unlimited.settings_for(QualityLevel::UltraLow).atom_cap,
            None
        );
    }

    #[test]
    fn stride_filter_keeps_exact_indices() {
        let items: Vec<usize> = (0..20_000).collect();
        let kept = filter_atoms_for_lod(&items, 5_000);
        assert_eq!(kept.len(), 5_000);
        for (i, &v) in kept.iter().enumerate() {
            assert_eq!(v, i * 4);
        }
    }

    #[test]
    fn stride_filter_is_idempotent() {
        let items: Vec<usize> = (0..12_345).collect();
        let once = filter_atoms_for_lod(&items, 5_000);
        let twice = filter_atoms_for_lod(&once, 5_000);
        assert_eq!(once, twice);
    }

    #[test]
    fn uncapped_filter_is_identity() {
        let items: Vec<usize> = (0..100).collect();
        assert_eq!(filter_atoms_for_lod(&items, 0), items);
        assert_eq!(filter_atoms_for_lod(&items, 100), items);
    }

    #[test]
    fn settings_scale_with_level() {
        let ultra = QualityLevel::Ultra.settings();
        let lowest = QualityLevel::UltraLow.settings();
        assert!(ultra.tube_segments > lowest.tube_segments);
        assert!(ultra.sphere_rings > lowest.sphere_rings);
        assert!(ultra.atom_cap.is_none());
        assert!(lowest.atom_cap.is_some());
    }
}
