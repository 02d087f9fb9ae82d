//! Procedural construction of each archetype.
//!
//! Constructors are free functions that build an [`Entity`] part by part via
//! [`attach_mesh`]. Per-instance variation comes from an RNG keyed by the
//! planting position, so the same spot always grows the same variant.

use std::collections::hash_map::DefaultHasher;
use std::f64::consts::TAU;
use std::hash::{Hash, Hasher};

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::archetype::EntityArchetype;
use crate::fertility::FertilityContext;
use crate::render_context::RenderContext;
use crate::scene::{Entity, MeshPart, PartShape, attach_mesh};

const BARK: [f32; 3] = [0.36, 0.25, 0.16];
const PALM_BARK: [f32; 3] = [0.55, 0.45, 0.30];
const DRY_LEAF: [f32; 3] = [0.55, 0.60, 0.25];
const LUSH_LEAF: [f32; 3] = [0.16, 0.50, 0.14];
const STONE: [f32; 3] = [0.47, 0.45, 0.42];
const PETALS: [[f32; 3]; 5] = [
    [0.95, 0.30, 0.35],
    [0.98, 0.85, 0.25],
    [0.85, 0.45, 0.90],
    [0.98, 0.98, 0.95],
    [1.00, 0.55, 0.20],
];
const POLLEN: [f32; 3] = [0.98, 0.80, 0.20];

/// Everything a constructor needs to know about one planting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Planting {
    /// Ground position the entity stands on.
    pub position: DVec3,
    pub fertility: FertilityContext,
    pub target_scale: f64,
    /// Multiplier applied to every part color.
    pub tint: [f32; 3],
}

impl Planting {
    pub fn new(position: DVec3, fertility: FertilityContext, target_scale: f64) -> Self {
        Self {
            position,
            fertility,
            target_scale,
            tint: [1.0; 3],
        }
    }
}

/// Deterministic RNG keyed by a position quantized to a millimetre.
pub fn variant_rng(position: DVec3) -> ChaCha8Rng {
    let mut hasher = DefaultHasher::new();
    for component in position.to_array() {
        ((component * 1000.0).round() as i64).hash(&mut hasher);
    }
    ChaCha8Rng::seed_from_u64(hasher.finish())
}

/// Build the entity for `archetype`.
pub fn build(archetype: EntityArchetype, ctx: &mut RenderContext, planting: &Planting) -> Entity {
    match archetype {
        EntityArchetype::Tree => build_tree(ctx, planting),
        EntityArchetype::Palm => build_palm(ctx, planting),
        EntityArchetype::Bush => build_bush(ctx, planting),
        EntityArchetype::Flower => build_flower(ctx, planting),
        EntityArchetype::FlowerCluster => build_flower_cluster(ctx, planting),
        EntityArchetype::Rock => build_rock(ctx, planting),
    }
}

struct PartBuilder<'a> {
    ctx: &'a mut RenderContext,
    tint: [f32; 3],
}

impl PartBuilder<'_> {
    fn part(
        &mut self,
        shape: PartShape,
        color: [f32; 3],
        offset: DVec3,
        size: DVec3,
        rotation: (f64, f64),
        base_segments: u32,
    ) -> MeshPart {
        let rgba = [
            color[0] * self.tint[0],
            color[1] * self.tint[1],
            color[2] * self.tint[2],
            1.0,
        ];
        MeshPart {
            shape,
            material: self.ctx.materials.material(rgba),
            offset,
            size,
            rotation,
            segments: self.ctx.quality.segments(base_segments),
        }
    }
}

fn mix(a: [f32; 3], b: [f32; 3], t: f64) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0) as f32;
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn leaf_color(fertility: &FertilityContext) -> [f32; 3] {
    mix(DRY_LEAF, LUSH_LEAF, fertility.moisture)
}

pub fn build_tree(ctx: &mut RenderContext, planting: &Planting) -> Entity {
    let mut rng = variant_rng(planting.position);
    let mut entity = Entity::new(EntityArchetype::Tree, planting.position, planting.target_scale);
    let mut parts = PartBuilder {
        ctx,
        tint: planting.tint,
    };

    let trunk_height = rng.random_range(0.18..0.26);
    attach_mesh(
        &mut entity,
        parts.part(
            PartShape::Lathe {
                radius_top: 0.015,
                radius_bottom: 0.025,
            },
            BARK,
            DVec3::ZERO,
            DVec3::new(1.0, trunk_height, 1.0),
            (0.0, 0.0),
            8,
        ),
    );

    let leaves = leaf_color(&planting.fertility);
    for _ in 0..rng.random_range(2..=4) {
        let angle = rng.random_range(0.0..TAU);
        let spread = rng.random_range(0.0..0.05);
        let radius = rng.random_range(0.06..0.1);
        let offset = DVec3::new(
            angle.cos() * spread,
            trunk_height + rng.random_range(-0.02..0.04),
            angle.sin() * spread,
        );
        attach_mesh(
            &mut entity,
            parts.part(
                PartShape::Sphere,
                leaves,
                offset,
                DVec3::splat(radius),
                (0.0, 0.0),
                10,
            ),
        );
    }
    entity.transform.rotation = rng.random_range(0.0..TAU);
    entity
}

pub fn build_palm(ctx: &mut RenderContext, planting: &Planting) -> Entity {
    let mut rng = variant_rng(planting.position);
    let mut entity = Entity::new(EntityArchetype::Palm, planting.position, planting.target_scale);
    let mut parts = PartBuilder {
        ctx,
        tint: planting.tint,
    };

    // The trunk is stacked segments leaning progressively further.
    let lean_yaw = rng.random_range(0.0..TAU);
    let lean = rng.random_range(0.05..0.3);
    let segments = rng.random_range(4..=6);
    let segment_height = rng.random_range(0.05..0.07);
    let mut top = DVec3::ZERO;
    for i in 0..segments {
        let pitch = lean * (i as f64 + 1.0) / segments as f64;
        attach_mesh(
            &mut entity,
            parts.part(
                PartShape::Lathe {
                    radius_top: 0.012,
                    radius_bottom: 0.016,
                },
                PALM_BARK,
                top,
                DVec3::new(1.0, segment_height, 1.0),
                (lean_yaw, pitch),
                6,
            ),
        );
        top += DVec3::new(
            lean_yaw.cos() * pitch.sin(),
            pitch.cos(),
            lean_yaw.sin() * pitch.sin(),
        ) * segment_height;
    }

    let leaves = leaf_color(&planting.fertility);
    let fronds = rng.random_range(5..=8);
    for i in 0..fronds {
        let yaw = i as f64 / fronds as f64 * TAU + rng.random_range(-0.2..0.2);
        attach_mesh(
            &mut entity,
            parts.part(
                PartShape::Strip {
                    width: 0.03,
                    curl: rng.random_range(0.3..0.8),
                },
                leaves,
                top,
                DVec3::new(1.0, 1.0, rng.random_range(0.12..0.18)),
                (yaw, rng.random_range(0.9..1.4)),
                6,
            ),
        );
    }
    entity
}

pub fn build_bush(ctx: &mut RenderContext, planting: &Planting) -> Entity {
    let mut rng = variant_rng(planting.position);
    let mut entity = Entity::new(EntityArchetype::Bush, planting.position, planting.target_scale);
    let mut parts = PartBuilder {
        ctx,
        tint: planting.tint,
    };

    let leaves = leaf_color(&planting.fertility);
    for _ in 0..rng.random_range(2..=4) {
        let angle = rng.random_range(0.0..TAU);
        let spread = rng.random_range(0.0..0.04);
        let radius = rng.random_range(0.03..0.05);
        attach_mesh(
            &mut entity,
            parts.part(
                PartShape::Sphere,
                leaves,
                DVec3::new(angle.cos() * spread, radius * 0.6, angle.sin() * spread),
                DVec3::new(radius, radius * 0.8, radius),
                (0.0, 0.0),
                8,
            ),
        );
    }
    entity
}

/// Stem, petals and center of one flower, `offset` from the entity origin.
fn attach_flower<R: Rng + ?Sized>(
    entity: &mut Entity,
    parts: &mut PartBuilder<'_>,
    rng: &mut R,
    offset: DVec3,
    fertility: &FertilityContext,
) {
    let stem = rng.random_range(0.03..0.06);
    attach_mesh(
        entity,
        parts.part(
            PartShape::Lathe {
                radius_top: 0.002,
                radius_bottom: 0.003,
            },
            leaf_color(fertility),
            offset,
            DVec3::new(1.0, stem, 1.0),
            (0.0, 0.0),
            4,
        ),
    );

    let head = offset + DVec3::Y * stem;
    let petal_color = PETALS[rng.random_range(0..PETALS.len())];
    let petals = rng.random_range(5..=6);
    for i in 0..petals {
        attach_mesh(
            entity,
            parts.part(
                PartShape::Strip {
                    width: 0.008,
                    curl: 0.2,
                },
                petal_color,
                head,
                DVec3::new(1.0, 1.0, 0.012),
                (i as f64 / petals as f64 * TAU, 1.2),
                3,
            ),
        );
    }
    attach_mesh(
        entity,
        parts.part(
            PartShape::Sphere,
            POLLEN,
            head,
            DVec3::splat(0.005),
            (0.0, 0.0),
            6,
        ),
    );
}

pub fn build_flower(ctx: &mut RenderContext, planting: &Planting) -> Entity {
    let mut rng = variant_rng(planting.position);
    let mut entity = Entity::new(EntityArchetype::Flower, planting.position, planting.target_scale);
    let mut parts = PartBuilder {
        ctx,
        tint: planting.tint,
    };
    attach_flower(&mut entity, &mut parts, &mut rng, DVec3::ZERO, &planting.fertility);
    entity
}

pub fn build_flower_cluster(ctx: &mut RenderContext, planting: &Planting) -> Entity {
    let mut rng = variant_rng(planting.position);
    let mut entity = Entity::new(
        EntityArchetype::FlowerCluster,
        planting.position,
        planting.target_scale,
    );
    let mut parts = PartBuilder {
        ctx,
        tint: planting.tint,
    };
    for _ in 0..rng.random_range(3..=6) {
        let angle = rng.random_range(0.0..TAU);
        let spread = rng.random_range(0.01..0.05);
        let offset = DVec3::new(angle.cos() * spread, 0.0, angle.sin() * spread);
        attach_flower(&mut entity, &mut parts, &mut rng, offset, &planting.fertility);
    }
    entity
}

pub fn build_rock(ctx: &mut RenderContext, planting: &Planting) -> Entity {
    let mut rng = variant_rng(planting.position);
    let mut entity = Entity::new(EntityArchetype::Rock, planting.position, planting.target_scale);
    let mut parts = PartBuilder {
        ctx,
        tint: planting.tint,
    };
    let radius = rng.random_range(0.02..0.05);
    let shade = rng.random_range(0.85f32..1.1);
    attach_mesh(
        &mut entity,
        parts.part(
            PartShape::Icosphere {
                jitter: rng.random_range(0.1..0.3),
            },
            STONE.map(|c| c * shade),
            DVec3::new(0.0, radius * 0.3, 0.0),
            DVec3::new(radius, radius * rng.random_range(0.5..0.8), radius),
            (rng.random_range(0.0..TAU), 0.0),
            5,
        ),
    );
    entity
}
