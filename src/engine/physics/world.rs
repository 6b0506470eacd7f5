use log::{debug, info, trace, warn};

use super::body::{ArcadeBody, Body};
use super::broad::{BroadPhase, BruteForce, SpatialGrid};
use super::collider::{
    BodyGroup, BodyHandle, BodyRef, Collidable, CollideMode, Collider, ColliderId, Contact,
    LayerHandle, StaticBodyHandle,
};
use super::config::{ConfigError, WorldConfig};
use super::events::{PhysicsEvent, PhysicsEventQueue};
use super::faces::Faces;
use super::handle::Arena;
use super::separate::{separate_bodies, SeparationParams};
use super::static_body::StaticBody;
use super::tile::{process_tile_callbacks, separate_tile, tile_intersects_body};
use crate::core::Rect;
use crate::engine::game_loop::FixedTimestep;
use crate::engine::tilemap::TileLayer;

/// Optional user hooks for one collide/overlap pass
struct ContactHooks<'p, 'c> {
    process: Option<&'p mut dyn FnMut(&Contact) -> bool>,
    on_contact: Option<&'c mut dyn FnMut(&Contact)>,
}

impl ContactHooks<'_, '_> {
    fn none() -> Self {
        Self {
            process: None,
            on_contact: None,
        }
    }

    fn allows(&mut self, contact: &Contact) -> bool {
        match self.process.as_deref_mut() {
            Some(process) => process(contact),
            None => true,
        }
    }

    fn notify(&mut self, contact: &Contact) {
        if let Some(on_contact) = self.on_contact.as_deref_mut() {
            on_contact(contact);
        }
    }
}

/// Arcade physics world: owns bodies, static bodies and tile layers, steps
/// them and resolves the registered colliders.
pub struct World {
    config: WorldConfig,
    bodies: Arena<Body>,
    static_bodies: Arena<StaticBody>,
    layers: Arena<TileLayer>,
    colliders: Vec<Collider>,
    next_collider_id: u64,
    events: PhysicsEventQueue,
    broad_phase: Box<dyn BroadPhase>,
    timestep: FixedTimestep,
    paused: bool,
    step_count: u64,
}

impl World {
    /// Create a world from a validated config
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            warn!("Rejected world config: {}", err);
            return Err(err);
        }
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        info!(
            "Arcade world created: bounds {:?}, {} Hz, gravity {:?}",
            config.bounds, config.fps, config.gravity
        );
        Self {
            broad_phase: Self::make_broad_phase(&config),
            timestep: FixedTimestep::new(config.fps, config.time_scale, config.max_steps_per_frame),
            paused: config.paused,
            config,
            bodies: Arena::new(),
            static_bodies: Arena::new(),
            layers: Arena::new(),
            colliders: Vec::new(),
            next_collider_id: 0,
            events: PhysicsEventQueue::new(),
            step_count: 0,
        }
    }

    fn make_broad_phase(config: &WorldConfig) -> Box<dyn BroadPhase> {
        if config.use_tree {
            Box::new(SpatialGrid::new(config.tree_cell_size))
        } else {
            Box::new(BruteForce::new())
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ---- registration ------------------------------------------------------

    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = self.bodies.insert(body);
        debug!("Added body {:?}", handle);
        handle
    }

    /// Create and register a body whose owner sits at (x, y)
    pub fn create_body(&mut self, x: f32, y: f32, width: f32, height: f32) -> BodyHandle {
        self.add_body(Body::new(x, y, width, height))
    }

    /// Remove a body; colliders still naming it skip it from now on
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        let body = self.bodies.remove(handle);
        if body.is_some() {
            debug!("Removed body {:?}", handle);
        }
        body
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn add_static_body(&mut self, body: StaticBody) -> StaticBodyHandle {
        let handle = self.static_bodies.insert(body);
        debug!("Added static body {:?}", handle);
        handle
    }

    pub fn create_static_body(&mut self, x: f32, y: f32, width: f32, height: f32) -> StaticBodyHandle {
        self.add_static_body(StaticBody::new(x, y, width, height))
    }

    pub fn remove_static_body(&mut self, handle: StaticBodyHandle) -> Option<StaticBody> {
        let body = self.static_bodies.remove(handle);
        if body.is_some() {
            debug!("Removed static body {:?}", handle);
        }
        body
    }

    pub fn static_body(&self, handle: StaticBodyHandle) -> Option<&StaticBody> {
        self.static_bodies.get(handle)
    }

    pub fn static_body_mut(&mut self, handle: StaticBodyHandle) -> Option<&mut StaticBody> {
        self.static_bodies.get_mut(handle)
    }

    pub fn static_body_count(&self) -> usize {
        self.static_bodies.len()
    }

    pub fn add_layer(&mut self, layer: TileLayer) -> LayerHandle {
        debug!(
            "Added tile layer '{}' ({}x{})",
            layer.name(),
            layer.width(),
            layer.height()
        );
        self.layers.insert(layer)
    }

    pub fn remove_layer(&mut self, handle: LayerHandle) -> Option<TileLayer> {
        self.layers.remove(handle)
    }

    pub fn layer(&self, handle: LayerHandle) -> Option<&TileLayer> {
        self.layers.get(handle)
    }

    pub fn layer_mut(&mut self, handle: LayerHandle) -> Option<&mut TileLayer> {
        self.layers.get_mut(handle)
    }

    // ---- world settings ----------------------------------------------------

    pub fn bounds(&self) -> Rect {
        self.config.bounds
    }

    pub fn set_bounds(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.config.bounds = Rect::new(x, y, width, height);
        self
    }

    /// Which sides of the world bounds bodies collide with
    pub fn set_bounds_collision(&mut self, faces: Faces) -> &mut Self {
        self.config.check_collision = faces;
        self
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) -> &mut Self {
        self.config.gravity = glam::Vec2::new(x, y);
        self
    }

    /// Switch between the spatial grid and the brute-force broad-phase
    pub fn set_use_tree(&mut self, use_tree: bool) -> &mut Self {
        self.config.use_tree = use_tree;
        self.broad_phase = Self::make_broad_phase(&self.config);
        self
    }

    pub fn set_time_scale(&mut self, time_scale: f32) -> &mut Self {
        if time_scale > 0.0 {
            self.config.time_scale = time_scale;
            self.timestep.set_time_scale(time_scale);
        }
        self
    }

    // ---- pause control -----------------------------------------------------

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop stepping; `update` and `step` do nothing until resumed
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.events.push(PhysicsEvent::Pause);
            info!("Physics paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.timestep.reset();
            self.events.push(PhysicsEvent::Resume);
            info!("Physics resumed");
        }
    }

    // ---- stepping ----------------------------------------------------------

    /// Advance by a frame's elapsed seconds, returning the number of steps run.
    ///
    /// With `fixed_step` the time goes through the accumulator; otherwise a
    /// single step of the (time scaled) frame time is taken.
    pub fn update(&mut self, delta_secs: f32) -> u32 {
        if self.paused {
            return 0;
        }

        if self.config.fixed_step {
            let steps = self.timestep.accumulate(delta_secs);
            let dt = self.timestep.step_seconds();
            for _ in 0..steps {
                self.step(dt);
            }
            steps
        } else if delta_secs > 0.0 && delta_secs.is_finite() {
            self.step(delta_secs / self.config.time_scale);
            1
        } else {
            0
        }
    }

    /// Run one physics step of `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if self.paused || !(dt > 0.0) {
            return;
        }
        self.step_count += 1;

        for (_, body) in self.bodies.iter_mut() {
            if body.is_enabled() {
                body.pre_update();
            }
        }
        for (_, body) in self.static_bodies.iter_mut() {
            if body.is_enabled() {
                body.pre_update();
            }
        }

        let gravity = self.config.gravity;
        for (_, body) in self.bodies.iter_mut() {
            if body.is_enabled() {
                body.update(dt, gravity);
            }
        }
        self.apply_world_bounds();
        for (_, body) in self.bodies.iter_mut() {
            if body.is_enabled() {
                body.commit_delta();
            }
        }

        let mut colliders = std::mem::take(&mut self.colliders);
        for collider in colliders.iter_mut().filter(|c| c.active) {
            let mut hooks = ContactHooks {
                process: collider
                    .process
                    .as_mut()
                    .map(|f| f as &mut dyn FnMut(&Contact) -> bool),
                on_contact: collider
                    .on_contact
                    .as_mut()
                    .map(|f| f as &mut dyn FnMut(&Contact)),
            };
            self.collide_objects(&collider.object1, &collider.object2, collider.mode, &mut hooks);
        }
        self.colliders = colliders;

        // Separation can push a body back out through the bounds
        self.apply_world_bounds();

        for (_, body) in self.bodies.iter_mut() {
            if body.is_enabled() {
                body.post_update();
            }
        }
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    fn apply_world_bounds(&mut self) {
        let bounds = self.config.bounds;
        let check = self.config.check_collision;
        for (handle, body) in self.bodies.iter_mut() {
            if !body.is_enabled() || !body.collide_world_bounds {
                continue;
            }
            let hit = body.check_world_bounds(&bounds, check);
            if !hit.is_none() && body.on_world_bounds {
                self.events.push(PhysicsEvent::WorldBounds { body: handle, faces: hit });
            }
        }
    }

    // ---- collision API -----------------------------------------------------

    /// Separate two collidables now; returns whether anything collided
    pub fn collide(&mut self, object1: impl Into<Collidable>, object2: impl Into<Collidable>) -> bool {
        let (object1, object2) = (object1.into(), object2.into());
        self.collide_objects(&object1, &object2, CollideMode::Collide, &mut ContactHooks::none())
    }

    /// Report intersections between two collidables without moving anything
    pub fn overlap(&mut self, object1: impl Into<Collidable>, object2: impl Into<Collidable>) -> bool {
        let (object1, object2) = (object1.into(), object2.into());
        self.collide_objects(&object1, &object2, CollideMode::Overlap, &mut ContactHooks::none())
    }

    /// [`collide`](Self::collide) with a process callback that can veto
    /// contacts and a callback for every contact that collided
    pub fn collide_with(
        &mut self,
        object1: impl Into<Collidable>,
        object2: impl Into<Collidable>,
        process: Option<&mut dyn FnMut(&Contact) -> bool>,
        on_contact: Option<&mut dyn FnMut(&Contact)>,
    ) -> bool {
        let (object1, object2) = (object1.into(), object2.into());
        let mut hooks = ContactHooks { process, on_contact };
        self.collide_objects(&object1, &object2, CollideMode::Collide, &mut hooks)
    }

    pub fn overlap_with(
        &mut self,
        object1: impl Into<Collidable>,
        object2: impl Into<Collidable>,
        process: Option<&mut dyn FnMut(&Contact) -> bool>,
        on_contact: Option<&mut dyn FnMut(&Contact)>,
    ) -> bool {
        let (object1, object2) = (object1.into(), object2.into());
        let mut hooks = ContactHooks { process, on_contact };
        self.collide_objects(&object1, &object2, CollideMode::Overlap, &mut hooks)
    }

    /// Register a pair separated on every step
    pub fn add_collider(
        &mut self,
        object1: impl Into<Collidable>,
        object2: impl Into<Collidable>,
    ) -> &mut Collider {
        self.push_collider(object1.into(), object2.into(), CollideMode::Collide)
    }

    /// Register a pair checked for overlap on every step
    pub fn add_overlap(
        &mut self,
        object1: impl Into<Collidable>,
        object2: impl Into<Collidable>,
    ) -> &mut Collider {
        self.push_collider(object1.into(), object2.into(), CollideMode::Overlap)
    }

    fn push_collider(&mut self, object1: Collidable, object2: Collidable, mode: CollideMode) -> &mut Collider {
        let id = ColliderId(self.next_collider_id);
        self.next_collider_id += 1;
        debug!("Added {:?} collider {:?}", mode, id);

        let index = self.colliders.len();
        self.colliders.push(Collider::new(id, object1, object2, mode));
        &mut self.colliders[index]
    }

    pub fn remove_collider(&mut self, id: ColliderId) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|c| c.id != id);
        self.colliders.len() != before
    }

    pub fn collider_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.iter_mut().find(|c| c.id == id)
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Separate a body from specific tiles of a layer.
    ///
    /// Unlike layer collision, every side of these tiles is solid regardless
    /// of their face flags.
    pub fn collide_tiles(&mut self, body: BodyHandle, layer: LayerHandle, cells: &[(usize, usize)]) -> bool {
        self.collide_body_cells(body, layer, cells, CollideMode::Collide, false, &mut ContactHooks::none())
    }

    pub fn overlap_tiles(&mut self, body: BodyHandle, layer: LayerHandle, cells: &[(usize, usize)]) -> bool {
        self.collide_body_cells(body, layer, cells, CollideMode::Overlap, false, &mut ContactHooks::none())
    }

    // ---- queries -----------------------------------------------------------

    /// Enabled bodies whose box intersects `rect`, in handle order
    pub fn overlap_rect(&self, rect: &Rect, include_dynamic: bool, include_static: bool) -> Vec<BodyRef> {
        let mut found = Vec::new();
        if include_dynamic {
            found.extend(
                self.bodies
                    .iter()
                    .filter(|(_, b)| b.is_enabled() && b.is_valid() && b.rect().intersects(rect))
                    .map(|(h, _)| BodyRef::Dynamic(h)),
            );
        }
        if include_static {
            found.extend(
                self.static_bodies
                    .iter()
                    .filter(|(_, b)| b.is_enabled() && b.is_valid() && b.rect().intersects(rect))
                    .map(|(h, _)| BodyRef::Static(h)),
            );
        }
        found
    }

    /// Whether two live bodies' boxes currently intersect
    pub fn intersects(&self, a: impl Into<BodyRef>, b: impl Into<BodyRef>) -> bool {
        match (self.body_rect(a.into()), self.body_rect(b.into())) {
            (Some(a), Some(b)) => a.intersects(&b),
            _ => false,
        }
    }

    fn body_rect(&self, body: BodyRef) -> Option<Rect> {
        match body {
            BodyRef::Dynamic(h) => self.bodies.get(h).map(|b| b.rect()),
            BodyRef::Static(h) => self.static_bodies.get(h).map(|b| b.rect()),
        }
    }

    /// Box of a live, enabled, well-formed body; anything else sits out the broad-phase
    fn collidable_rect(&self, body: BodyRef) -> Option<Rect> {
        let (enabled, valid, rect) = match body {
            BodyRef::Dynamic(h) => {
                let b = self.bodies.get(h)?;
                (b.is_enabled(), b.is_valid(), b.rect())
            }
            BodyRef::Static(h) => {
                let b = self.static_bodies.get(h)?;
                (b.is_enabled(), b.is_valid(), b.rect())
            }
        };
        if !valid {
            trace!("Skipping malformed body {:?}", body);
            return None;
        }
        enabled.then_some(rect)
    }

    // ---- events ------------------------------------------------------------

    pub fn events(&self) -> &[PhysicsEvent] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        self.events.drain()
    }

    // ---- dispatch ----------------------------------------------------------

    fn collide_objects(
        &mut self,
        object1: &Collidable,
        object2: &Collidable,
        mode: CollideMode,
        hooks: &mut ContactHooks,
    ) -> bool {
        match (object1, object2) {
            (Collidable::Body(a), Collidable::Body(b)) => self.collide_body_body(*a, *b, mode, hooks),
            (Collidable::Body(a), Collidable::Group(group))
            | (Collidable::Group(group), Collidable::Body(a)) => {
                self.index_group(group);
                self.collide_against_index(*a, None, mode, hooks)
            }
            (Collidable::Group(g1), Collidable::Group(g2)) if g1 == g2 => {
                self.collide_group_self(g1, mode, hooks)
            }
            (Collidable::Group(g1), Collidable::Group(g2)) => {
                self.index_group(g2);
                let mut any = false;
                for &a in g1.members() {
                    any |= self.collide_against_index(a, None, mode, hooks);
                }
                any
            }
            (Collidable::Body(body), Collidable::Layer(layer))
            | (Collidable::Layer(layer), Collidable::Body(body)) => {
                self.collide_ref_layer(*body, *layer, mode, hooks)
            }
            (Collidable::Group(group), Collidable::Layer(layer))
            | (Collidable::Layer(layer), Collidable::Group(group)) => {
                let mut any = false;
                for &member in group.members() {
                    any |= self.collide_ref_layer(member, *layer, mode, hooks);
                }
                any
            }
            (Collidable::Layer(_), Collidable::Layer(_)) => {
                debug!("Ignoring layer-vs-layer collision request");
                false
            }
        }
    }

    /// Fill the broad-phase with the members of `group`
    fn index_group(&mut self, group: &BodyGroup) {
        self.broad_phase.clear();
        for &member in group.members() {
            if let Some(rect) = self.collidable_rect(member) {
                self.broad_phase.insert(member, rect);
            }
        }
    }

    /// Collide `a` with every indexed body its box touches, skipping
    /// candidates not above `after` when given
    fn collide_against_index(
        &mut self,
        a: BodyRef,
        after: Option<BodyRef>,
        mode: CollideMode,
        hooks: &mut ContactHooks,
    ) -> bool {
        let Some(rect) = self.collidable_rect(a) else {
            return false;
        };

        let mut any = false;
        for b in self.broad_phase.query(&rect) {
            if b == a || after.map_or(false, |min| b <= min) {
                continue;
            }
            any |= self.collide_body_body(a, b, mode, hooks);
        }
        any
    }

    /// Every unordered pair of a group's members, each pair once
    fn collide_group_self(&mut self, group: &BodyGroup, mode: CollideMode, hooks: &mut ContactHooks) -> bool {
        self.index_group(group);
        let mut members = group.members().to_vec();
        members.sort_unstable();

        let mut any = false;
        for a in members {
            any |= self.collide_against_index(a, Some(a), mode, hooks);
        }
        any
    }

    fn collide_body_body(&mut self, a: BodyRef, b: BodyRef, mode: CollideMode, hooks: &mut ContactHooks) -> bool {
        if a == b {
            return false;
        }

        let params = self.config.separation_params();
        let overlap_only = mode.overlap_only();
        let contact = Contact::Bodies { a, b };

        let hit = match (a, b) {
            (BodyRef::Dynamic(ha), BodyRef::Dynamic(hb)) => match self.bodies.get2_mut(ha, hb) {
                Some((body_a, body_b)) => resolve_pair(body_a, body_b, overlap_only, &params, &contact, hooks),
                None => {
                    trace!("Skipping pair with a stale body {:?} / {:?}", a, b);
                    false
                }
            },
            (BodyRef::Dynamic(ha), BodyRef::Static(hb)) => {
                match (self.bodies.get_mut(ha), self.static_bodies.get_mut(hb)) {
                    (Some(body_a), Some(body_b)) => {
                        resolve_pair(body_a, body_b, overlap_only, &params, &contact, hooks)
                    }
                    _ => false,
                }
            }
            (BodyRef::Static(ha), BodyRef::Dynamic(hb)) => {
                match (self.static_bodies.get_mut(ha), self.bodies.get_mut(hb)) {
                    (Some(body_a), Some(body_b)) => {
                        resolve_pair(body_a, body_b, overlap_only, &params, &contact, hooks)
                    }
                    _ => false,
                }
            }
            // Static bodies never move, so there is nothing to resolve
            (BodyRef::Static(_), BodyRef::Static(_)) => false,
        };

        if hit {
            hooks.notify(&contact);
            self.events.push(if overlap_only {
                PhysicsEvent::Overlap { a, b }
            } else {
                PhysicsEvent::Collide { a, b }
            });
        }
        hit
    }

    fn collide_ref_layer(
        &mut self,
        body: BodyRef,
        layer: LayerHandle,
        mode: CollideMode,
        hooks: &mut ContactHooks,
    ) -> bool {
        match body {
            BodyRef::Dynamic(handle) => self.collide_body_layer(handle, layer, mode, hooks),
            BodyRef::Static(_) => false,
        }
    }

    fn collide_body_layer(
        &mut self,
        handle: BodyHandle,
        layer_handle: LayerHandle,
        mode: CollideMode,
        hooks: &mut ContactHooks,
    ) -> bool {
        let cells = match (self.bodies.get(handle), self.layers.get(layer_handle)) {
            (Some(body), Some(layer)) => {
                if !body.is_enabled() || body.check_collision().is_none() {
                    return false;
                }
                if !body.is_valid() {
                    trace!("Skipping malformed body {:?}", handle);
                    return false;
                }
                layer.tiles_within_world_rect(&body.rect(), false)
            }
            _ => {
                trace!("Skipping stale body {:?} or layer {:?}", handle, layer_handle);
                return false;
            }
        };

        if cells.is_empty() {
            return false;
        }
        self.collide_body_cells(handle, layer_handle, &cells, mode, true, hooks)
    }

    fn collide_body_cells(
        &mut self,
        handle: BodyHandle,
        layer_handle: LayerHandle,
        cells: &[(usize, usize)],
        mode: CollideMode,
        is_layer: bool,
        hooks: &mut ContactHooks,
    ) -> bool {
        let (Some(body), Some(layer)) = (self.bodies.get_mut(handle), self.layers.get(layer_handle)) else {
            return false;
        };
        if !body.is_enabled() {
            return false;
        }

        let overlap_only = mode.overlap_only();
        let tile_bias = self.config.tile_bias;
        let mut any = false;

        for &(tile_x, tile_y) in cells {
            let Some(tile) = layer.tile_at(tile_x, tile_y) else {
                continue;
            };
            let tile_rect = layer.tile_world_rect(tile);
            if !tile_intersects_body(&tile_rect, body) {
                continue;
            }

            let contact = Contact::Tile {
                body: handle,
                layer: layer_handle,
                tile_x,
                tile_y,
                index: tile.index(),
            };
            if !hooks.allows(&contact) || !process_tile_callbacks(tile, layer, body) {
                continue;
            }
            if overlap_only {
                if !tile.collides() {
                    continue;
                }
            } else if !separate_tile(body, tile, &tile_rect, tile_bias, is_layer) {
                continue;
            }

            any = true;
            hooks.notify(&contact);
            self.events.push(if overlap_only {
                PhysicsEvent::TileOverlap {
                    body: handle,
                    layer: layer_handle,
                    tile_x,
                    tile_y,
                }
            } else {
                PhysicsEvent::TileCollide {
                    body: handle,
                    layer: layer_handle,
                    tile_x,
                    tile_y,
                }
            });
        }
        any
    }
}

impl Default for World {
    fn default() -> Self {
        Self::build(WorldConfig::default())
    }
}

/// Pair test and response shared by every body combination.
///
/// Overlap-mode pairs report any intersection; collide-mode pairs report
/// only when an axis actually separated.
fn resolve_pair<A, B>(
    a: &mut A,
    b: &mut B,
    overlap_only: bool,
    params: &SeparationParams,
    contact: &Contact,
    hooks: &mut ContactHooks,
) -> bool
where
    A: ArcadeBody + ?Sized,
    B: ArcadeBody + ?Sized,
{
    if !a.is_enabled()
        || !b.is_enabled()
        || a.check_collision().is_none()
        || b.check_collision().is_none()
    {
        return false;
    }
    let (rect_a, rect_b) = (a.rect(), b.rect());
    if !rect_a.is_valid() || !rect_b.is_valid() || !rect_a.intersects(&rect_b) {
        return false;
    }
    if !hooks.allows(contact) {
        return false;
    }

    if overlap_only {
        separate_bodies(a, b, true, params);
        return true;
    }
    separate_bodies(a, b, false, params).any()
}
