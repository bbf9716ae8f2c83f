use crate::PITS;

pub const MAX_BEADS: usize = 36;

/// Bead centre as a percentage of the pit or store well.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bead {
    pub x: f64,
    pub y: f64,
}

/// Scatters up to `MAX_BEADS` beads around the well centre. The layout is a
/// pure function of `(count, seed)` so a redraw never shuffles the beads.
pub fn bead_layout(count: u64, seed: u64) -> Vec<Bead> {
    let beads = count.min(MAX_BEADS as u64);

    (0..beads)
        .map(|index| {
            let angle = (seed.wrapping_mul(31).wrapping_add(index * 17) % 360) as f64;
            let radius = (20 + seed.wrapping_mul(19).wrapping_add(index * 11) % 24) as f64 * 0.75;
            let (sin, cos) = angle.to_radians().sin_cos();

            Bead {
                x: 50.0 + cos * radius,
                y: 50.0 + sin * radius,
            }
        })
        .collect()
}

/// Pits are seeded by their 1-based label.
pub fn pit_beads(label: usize, count: u64) -> Vec<Bead> {
    debug_assert!((1..=PITS).contains(&label));
    bead_layout(count, label as u64)
}

pub fn store_beads(count: u64) -> Vec<Bead> {
    bead_layout(count, count.wrapping_add(7))
}
