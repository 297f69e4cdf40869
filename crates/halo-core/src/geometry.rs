use std::f32::consts::TAU;

use crate::constants::HALO_RING_SPACING;

/// Point buffers for the shader-animated voice halo.
///
/// `positions` holds 3 floats per point, `ring_idx` and `angles` one each.
#[derive(Clone, Debug, Default)]
pub struct HaloGeometry {
    pub positions: Vec<f32>,
    pub ring_idx: Vec<f32>,
    pub angles: Vec<f32>,
    pub count: usize,
}

/// Build `rings` concentric rings of `points_per_ring` points each.
///
/// Zero or negative counts are clamped to 1, so the result always holds at
/// least one point. Ring `r` sits at `base_radius + r * HALO_RING_SPACING`.
pub fn build_halo_geometry(rings: i32, points_per_ring: i32, base_radius: f32) -> HaloGeometry {
    let safe_rings = rings.max(1) as usize;
    let safe_ppr = points_per_ring.max(1) as usize;
    let total = safe_rings * safe_ppr;

    let mut positions = Vec::with_capacity(total * 3);
    let mut ring_idx = Vec::with_capacity(total);
    let mut angles = Vec::with_capacity(total);

    for r in 0..safe_rings {
        let radius = base_radius + r as f32 * HALO_RING_SPACING;
        for p in 0..safe_ppr {
            let t = (p as f32 / safe_ppr as f32) * TAU;
            positions.extend_from_slice(&[t.cos() * radius, t.sin() * radius, 0.0]);
            ring_idx.push(r as f32);
            angles.push(t);
        }
    }

    HaloGeometry {
        positions,
        ring_idx,
        angles,
        count: total,
    }
}

/// Interleaved halo vertex as laid out in the GPU buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HaloVertex {
    pub pos: [f32; 3],
    pub ring: f32,
    pub angle: f32,
}

impl HaloGeometry {
    pub fn interleaved(&self) -> Vec<HaloVertex> {
        self.positions
            .chunks_exact(3)
            .zip(&self.ring_idx)
            .zip(&self.angles)
            .map(|((p, ring), angle)| HaloVertex {
                pos: [p[0], p[1], p[2]],
                ring: *ring,
                angle: *angle,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_rings_step_outward() {
        let geo = build_halo_geometry(2, 4, 1.0);
        let r0 = geo.positions[0];
        let r1 = geo.positions[4 * 3];
        assert!((r0 - 1.0).abs() < 1e-6);
        assert!((r1 - (1.0 + HALO_RING_SPACING)).abs() < 1e-6);
        assert_eq!(geo.ring_idx[4], 1.0);
    }

    #[test]
    fn interleaved_matches_count() {
        let geo = build_halo_geometry(3, 10, 2.0);
        let verts = geo.interleaved();
        assert_eq!(verts.len(), geo.count);
        assert_eq!(verts[10].ring, 1.0);
        assert_eq!(std::mem::size_of::<HaloVertex>(), 20);
    }
}
