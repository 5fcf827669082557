use serde::{Deserialize, Serialize};

/// Rendering representation for the loaded structure.
///
/// A closed sum type so style dispatch stays exhaustively checked when
/// new styles are added.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum RenderStyle {
    /// Backbone ribbon/cartoon tube.
    #[default]
    Ribbon,
    /// Per-atom instanced spheres.
    Spheres,
    /// Bond sticks (drawn via the instanced-sphere fallback path).
    Sticks,
    /// Molecular surface (drawn via the instanced-sphere fallback path).
    Surface,
}

/// Per-atom color selection for the sphere path.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// CPK element table lookup.
    #[default]
    Element,
    /// Chain palette lookup.
    Chain,
    /// One flat color for everything.
    Uniform,
    /// Secondary-structure table lookup.
    SecondaryStructure,
}
