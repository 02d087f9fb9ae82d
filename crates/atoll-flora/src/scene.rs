//! Entities and the scene that owns them.
//!
//! Every archetype is one [`Entity`] with a list of mesh parts; archetype
//! constructors differ only in which parts they attach.

use glam::DVec3;

use crate::archetype::EntityArchetype;
use crate::render_context::MaterialId;

/// Primitive a mesh part is built from. Turning these into vertex buffers
/// is left to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PartShape {
    /// Surface of revolution: trunks, stems.
    Lathe { radius_top: f64, radius_bottom: f64 },
    /// Flat ribbon: fronds, petals.
    Strip { width: f64, curl: f64 },
    Sphere,
    /// Faceted sphere with per-vertex jitter: rocks.
    Icosphere { jitter: f64 },
}

/// One renderable piece of an entity, in entity-local space.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshPart {
    pub shape: PartShape,
    pub material: MaterialId,
    /// Offset from the entity origin.
    pub offset: DVec3,
    /// Per-axis size of the part.
    pub size: DVec3,
    /// Yaw around the local up axis then pitch away from it, radians.
    pub rotation: (f64, f64),
    /// Tessellation after quality throttling.
    pub segments: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: DVec3,
    /// Yaw around +Y, radians.
    pub rotation: f64,
    pub scale: f64,
}

impl Transform {
    pub fn at(translation: DVec3) -> Self {
        Self {
            translation,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// A placed archetype.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub archetype: EntityArchetype,
    pub transform: Transform,
    /// Scale the spawn animation grows toward.
    pub target_scale: f64,
    pub parts: Vec<MeshPart>,
}

impl Entity {
    /// An entity with no parts, starting at zero scale.
    pub fn new(archetype: EntityArchetype, position: DVec3, target_scale: f64) -> Self {
        Self {
            archetype,
            transform: Transform {
                scale: 0.0,
                ..Transform::at(position)
            },
            target_scale,
            parts: Vec::new(),
        }
    }
}

/// Attach a part to `entity`.
pub fn attach_mesh(entity: &mut Entity, part: MeshPart) {
    entity.parts.push(part);
}

/// Handle to an entity owned by a [`Scene`].
///
/// Handles of removed entities never resolve again, even if the slot is
/// reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    index: u32,
    version: u32,
}

struct Slot {
    version: u32,
    entity: Option<Entity>,
}

/// Owns every spawned entity.
#[derive(Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            return EntityHandle {
                index,
                version: slot.version,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            version: 0,
            entity: Some(entity),
        });
        EntityHandle { index, version: 0 }
    }

    fn slot(&self, handle: EntityHandle) -> Option<&Slot> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.version == handle.version)
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        self.slot(handle)?.entity.as_ref()
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.version == handle.version)?
            .entity
            .as_mut()
    }

    /// Remove and return the entity behind `handle`.
    pub fn remove(&mut self, handle: EntityHandle) -> Option<Entity> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.version == handle.version)?;
        let entity = slot.entity.take()?;
        slot.version = slot.version.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(entity)
    }

    /// Remove every entity, invalidating all handles.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entity.take().is_some() {
                slot.version = slot.version.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entity.as_ref().map(|entity| {
                (
                    EntityHandle {
                        index: index as u32,
                        version: slot.version,
                    },
                    entity,
                )
            })
        })
    }
}
