// Presentation derivations: speed tiers, stat colors, type-effectiveness
// and move groupings. Pure functions over already-fetched payloads.

pub mod color;
pub mod effectiveness;
pub mod moves;
pub mod speed;
