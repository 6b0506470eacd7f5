// What can be collided: bodies, groups of bodies and tile layers

use super::body::Body;
use super::handle::Handle;
use super::static_body::StaticBody;
use crate::engine::tilemap::TileLayer;

pub type BodyHandle = Handle<Body>;
pub type StaticBodyHandle = Handle<StaticBody>;
pub type LayerHandle = Handle<TileLayer>;

/// Reference to either kind of body in a [`World`](super::World)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyRef {
    Dynamic(BodyHandle),
    Static(StaticBodyHandle),
}

impl From<BodyHandle> for BodyRef {
    fn from(handle: BodyHandle) -> Self {
        BodyRef::Dynamic(handle)
    }
}

impl From<StaticBodyHandle> for BodyRef {
    fn from(handle: StaticBodyHandle) -> Self {
        BodyRef::Static(handle)
    }
}

/// An ordered set of bodies collided as one object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyGroup {
    members: Vec<BodyRef>,
}

impl BodyGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_members(members: impl IntoIterator<Item = BodyRef>) -> Self {
        let mut group = Self::new();
        for member in members {
            group.add(member);
        }
        group
    }

    /// Add a member; adding twice is a no-op
    pub fn add(&mut self, member: impl Into<BodyRef>) -> &mut Self {
        let member = member.into();
        if !self.members.contains(&member) {
            self.members.push(member);
        }
        self
    }

    pub fn remove(&mut self, member: impl Into<BodyRef>) -> bool {
        let member = member.into();
        let before = self.members.len();
        self.members.retain(|m| *m != member);
        self.members.len() != before
    }

    pub fn contains(&self, member: impl Into<BodyRef>) -> bool {
        self.members.contains(&member.into())
    }

    pub fn members(&self) -> &[BodyRef] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Anything accepted by [`World::collide`](super::World::collide)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collidable {
    Body(BodyRef),
    Group(BodyGroup),
    Layer(LayerHandle),
}

impl From<BodyRef> for Collidable {
    fn from(body: BodyRef) -> Self {
        Collidable::Body(body)
    }
}

impl From<BodyHandle> for Collidable {
    fn from(handle: BodyHandle) -> Self {
        Collidable::Body(BodyRef::Dynamic(handle))
    }
}

impl From<StaticBodyHandle> for Collidable {
    fn from(handle: StaticBodyHandle) -> Self {
        Collidable::Body(BodyRef::Static(handle))
    }
}

impl From<BodyGroup> for Collidable {
    fn from(group: BodyGroup) -> Self {
        Collidable::Group(group)
    }
}

impl From<&BodyGroup> for Collidable {
    fn from(group: &BodyGroup) -> Self {
        Collidable::Group(group.clone())
    }
}

impl From<LayerHandle> for Collidable {
    fn from(handle: LayerHandle) -> Self {
        Collidable::Layer(handle)
    }
}

/// Whether a pair is physically separated or only reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollideMode {
    Collide,
    Overlap,
}

impl CollideMode {
    pub fn overlap_only(self) -> bool {
        self == CollideMode::Overlap
    }
}

/// One detected contact, passed to process and collide callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Bodies {
        a: BodyRef,
        b: BodyRef,
    },
    Tile {
        body: BodyHandle,
        layer: LayerHandle,
        tile_x: usize,
        tile_y: usize,
        index: i32,
    },
}

/// Decides whether a detected contact proceeds to separation
pub type ProcessCallback = Box<dyn FnMut(&Contact) -> bool>;

/// Notified of every contact that collided (or overlapped)
pub type ContactCallback = Box<dyn FnMut(&Contact)>;

/// Identifier of a persistent collider registered with the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub(crate) u64);

/// A pair of collidables checked automatically on every world step
pub struct Collider {
    pub(crate) id: ColliderId,
    pub name: String,
    pub active: bool,
    pub(crate) object1: Collidable,
    pub(crate) object2: Collidable,
    pub(crate) mode: CollideMode,
    pub(crate) process: Option<ProcessCallback>,
    pub(crate) on_contact: Option<ContactCallback>,
}

impl Collider {
    pub(crate) fn new(id: ColliderId, object1: Collidable, object2: Collidable, mode: CollideMode) -> Self {
        Self {
            id,
            name: String::new(),
            active: true,
            object1,
            object2,
            mode,
            process: None,
            on_contact: None,
        }
    }

    pub fn id(&self) -> ColliderId {
        self.id
    }

    pub fn mode(&self) -> CollideMode {
        self.mode
    }

    pub fn objects(&self) -> (&Collidable, &Collidable) {
        (&self.object1, &self.object2)
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self
    }

    pub fn set_active(&mut self, active: bool) -> &mut Self {
        self.active = active;
        self
    }

    pub fn set_process_callback(&mut self, callback: Option<ProcessCallback>) -> &mut Self {
        self.process = callback;
        self
    }

    pub fn set_contact_callback(&mut self, callback: Option<ContactCallback>) -> &mut Self {
        self.on_contact = callback;
        self
    }
}

impl std::fmt::Debug for Collider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collider")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("active", &self.active)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_membership_is_unique() {
        let a = BodyRef::Dynamic(Handle::new(0, 0));
        let b = BodyRef::Static(Handle::new(0, 0));

        let mut group = BodyGroup::new();
        group.add(a).add(a).add(b);
        assert_eq!(group.len(), 2);
        assert!(group.contains(b));

        assert!(group.remove(a));
        assert!(!group.remove(a));
        assert_eq!(group.members(), &[b]);
    }

    #[test]
    fn test_collidable_conversions() {
        let handle: BodyHandle = Handle::new(3, 1);
        assert_eq!(
            Collidable::from(handle),
            Collidable::Body(BodyRef::Dynamic(handle))
        );

        let group = BodyGroup::from_members([BodyRef::from(handle)]);
        assert!(matches!(Collidable::from(&group), Collidable::Group(g) if g.len() == 1));
    }
}
