use super::actor::SweptActor;
use super::events::CollisionEvent;
use super::pool::{ResponseKey, ResponsePool};
use super::response::{CollisionResponse, CollisionType, Crush};
use super::world::CollisionWorld;
use super::{ActorKey, PlatformObjectKey};
use crate::utils::{earliest, Float, V2};
use log::{debug, trace, warn};
use std::collections::HashMap;
use std::mem;

/// Default bound on re-sweeps of one actor in one tick.
pub const MAX_RESOLVE_PASSES: usize = 4;

/// cos of the steepest contact an actor can still stand on
const SUPPORT_COS: Float = 0.7;

type Pair = (ActorKey, PlatformObjectKey);

/// Latest response per (actor, object) pair seen in one tick.
#[derive(Default)]
struct Contacts {
    order: Vec<Pair>,
    responses: HashMap<Pair, ResponseKey>,
}

impl Contacts {
    fn record(&mut self, pool: &mut ResponsePool, pair: Pair, response: CollisionResponse) {
        let key = pool.store(response);
        match self.responses.insert(pair, key) {
            Some(old) => {
                pool.recycle(old);
            }
            None => self.order.push(pair),
        }
    }

    fn release(&mut self, pool: &mut ResponsePool) {
        for (_, key) in self.responses.drain() {
            pool.recycle(key);
        }
        self.order.clear();
    }
}

/// Moves every actor of a `CollisionWorld` through one tick.
///
/// The handler keeps the contacts of the previous tick to turn this tick's
/// contacts into enter, stay and exit events. Scratch buffers are reused
/// between ticks.
#[derive(Default)]
pub struct CollisionHandler {
    pool: ResponsePool,
    current: Contacts,
    previous: Contacts,
    actors: Vec<ActorKey>,
    // this tick's responses of the actor being resolved
    tick_responses: Vec<CollisionResponse>,
    // objects that already pushed the actor being resolved
    pushed_by: Vec<PlatformObjectKey>,
    supports: Vec<(ActorKey, Option<PlatformObjectKey>)>,
    scratch: CollisionResponse,
}

impl CollisionHandler {
    pub fn new() -> CollisionHandler {
        CollisionHandler::default()
    }

    /// Runs one tick of `delta_time` seconds:
    ///
    /// 1. every enabled actor is integrated, moved along with the platform it
    ///    rides and swept against all platform objects, in registration order
    /// 2. platforms advance by their velocity
    /// 3. actors standing on moving objects are attached, riders that lost
    ///    their footing are detached
    /// 4. contacts are compared with the previous tick and queued as events
    pub fn step(&mut self, world: &mut CollisionWorld, delta_time: Float) {
        self.actors.clear();
        self.actors.extend(world.actor_order.iter());
        self.supports.clear();
        for i in 0..self.actors.len() {
            let key = self.actors[i];
            self.resolve_actor(world, key, delta_time);
        }
        world.advance_platforms(delta_time);
        self.update_attachments(world);
        self.diff_contacts(world);
    }

    /// Pairs touching during the last tick with their latest response.
    pub fn contacts(&self) -> impl Iterator<Item = (ActorKey, PlatformObjectKey, &CollisionResponse)> + '_ {
        let previous = &self.previous;
        let pool = &self.pool;
        previous.order.iter().filter_map(move |pair| {
            let response = pool.get(*previous.responses.get(pair)?)?;
            Some((pair.0, pair.1, response))
        })
    }

    fn resolve_actor(&mut self, world: &mut CollisionWorld, key: ActorKey, delta_time: Float) {
        match world.actors.get(key) {
            Some(actor) if actor.enabled => {}
            _ => return,
        }
        // the carry is swept together with the actor's own motion
        let carried = match world.carried_position(key, delta_time) {
            Some(position) => position,
            None => return,
        };
        let gravity = world.config().gravity();
        let max_passes = world.config().max_resolve_passes;
        let actor = match world.actors.get(key) {
            Some(actor) => actor,
            None => return,
        };
        let pos0 = actor.position;
        let mut velocity = actor.velocity + gravity * actor.gravity_scale * delta_time;
        let mut swept = actor.swept(pos0, carried + (velocity + actor.wind) * delta_time);
        let project = actor.project_collision;
        let zero_velocity = actor.zero_velocity_on_collision;
        let crush_angle = actor.crush_angle_threshold;
        let entity = actor.entity();

        self.tick_responses.clear();
        self.pushed_by.clear();
        let mut settled = false;
        for _ in 0..max_passes {
            let mut response = match self.earliest_hit(world, &swept, project, delta_time) {
                Some(response) => response,
                None => {
                    settled = true;
                    break;
                }
            };
            response.actor = Some(key);
            trace!(
                "actor {:?} hit {:?} at t={} normal={:?} ({:?})",
                key,
                response.platform_object,
                response.time,
                response.normal,
                response.kind
            );
            if zero_velocity {
                zero_along_normal(&mut velocity, &response.normal);
            }
            match response.kind {
                CollisionType::MovingPlatform => {
                    // the push is swept from pos0 so a wall behind the actor still stops it
                    if let Some(object) = response.platform_object {
                        self.pushed_by.push(object);
                    }
                    swept.pos1 = response.resolved_position(project);
                }
                _ => {
                    swept.pos0 = response.reposition;
                    swept.pos1 = response.resolved_position(project);
                }
            }
            if let Some(object) = response.platform_object {
                self.current.record(&mut self.pool, (key, object), response);
            }
            self.tick_responses.push(response);
        }
        if !settled {
            debug!("actor {:?} still colliding after {} passes", key, max_passes);
        }

        if let Some(actor) = world.actors.get_mut(key) {
            actor.position = swept.pos1;
            actor.velocity = velocity;
        }
        if let Some(crush) = first_crush(&self.tick_responses, crush_angle) {
            debug!("actor {:?} crushed at {} rad", key, crush.angle);
            world.push_event(CollisionEvent::Crush {
                actor: key,
                entity,
                crush,
            });
        }

        let up = world.config().up.vector();
        let support = self
            .tick_responses
            .iter()
            .rev()
            .filter(|r| r.normal.dot(&up) > SUPPORT_COS)
            .filter_map(|r| r.platform_object)
            .find(|o| world.objects.get(*o).map_or(false, |o| o.is_moving()));
        self.supports.push((key, support));
    }

    /// Earliest hit against every enabled object, objects registered first win ties.
    fn earliest_hit(
        &mut self,
        world: &CollisionWorld,
        swept: &SweptActor,
        project: bool,
        delta_time: Float,
    ) -> Option<CollisionResponse> {
        let mut best: Option<(Float, CollisionResponse)> = None;
        for key in world.object_order.iter() {
            let (object, frame) = match (world.objects.get(key), world.object_frame(key, delta_time)) {
                (Some(object), Some(frame)) if object.is_enabled() => (object, frame),
                _ => continue,
            };
            object.moving_actor_collision(&frame, swept, project, &mut self.scratch);
            if self.scratch.hit {
                self.scratch.platform_object = Some(key);
                best = earliest(best, Some((self.scratch.time, self.scratch)));
            }
            if self.pushed_by.contains(&key) {
                continue;
            }
            object.moving_platform_collision(&frame, swept, &mut self.scratch);
            if self.scratch.hit {
                self.scratch.platform_object = Some(key);
                best = earliest(best, Some((self.scratch.time, self.scratch)));
            }
        }
        best.map(|(_, response)| response)
    }

    fn update_attachments(&mut self, world: &mut CollisionWorld) {
        let up = world.config().up.vector();
        let reach = world.config().attach_probe_distance;
        for &(key, support) in &self.supports {
            let actor = match world.actors.get(key) {
                Some(actor) if actor.enabled && actor.auto_attach => actor,
                _ => continue,
            };
            let attached = actor.attached;
            let below = actor.rect().translated(&(-up * reach));
            let mask = actor.collision_mask;
            match (support, attached) {
                (Some(object), _) if attached != Some(object) => {
                    if let Err(e) = world.attach_actor(key, object) {
                        debug!("actor {:?} not attached: {}", key, e);
                    }
                }
                (None, Some(object)) => {
                    let still_standing = match (world.objects.get(object), world.object_frame(object, 0.0)) {
                        (Some(o), Some(frame)) => o.rect_overlaps(&frame.position, &below, mask),
                        _ => false,
                    };
                    if !still_standing {
                        let _ = world.detach_actor(key);
                    }
                }
                _ => {}
            }
        }
    }

    fn diff_contacts(&mut self, world: &mut CollisionWorld) {
        for pair in &self.current.order {
            let response = match self.current.responses.get(pair).and_then(|k| self.pool.get(*k)) {
                Some(response) => response,
                None => continue,
            };
            if let Some(contact) = world.contact(pair.0, pair.1, response) {
                if self.previous.responses.contains_key(pair) {
                    world.push_event(CollisionEvent::Stay(contact));
                } else {
                    world.push_event(CollisionEvent::Enter(contact));
                }
            }
        }
        for pair in &self.previous.order {
            if self.current.responses.contains_key(pair) {
                continue;
            }
            let response = match self.previous.responses.get(pair).and_then(|k| self.pool.get(*k)) {
                Some(response) => response,
                None => continue,
            };
            match world.contact(pair.0, pair.1, response) {
                Some(contact) => world.push_event(CollisionEvent::Exit(contact)),
                None => warn!("dropping exit of actor {:?} and object {:?}, one was removed", pair.0, pair.1),
            }
        }
        self.previous.release(&mut self.pool);
        mem::swap(&mut self.current, &mut self.previous);
    }
}

fn zero_along_normal(velocity: &mut V2, normal: &V2) {
    if normal.x != 0.0 {
        velocity.x = 0.0;
    }
    if normal.y != 0.0 {
        velocity.y = 0.0;
    }
}

fn first_crush(responses: &[CollisionResponse], threshold: Float) -> Option<Crush> {
    for (i, a) in responses.iter().enumerate() {
        for b in &responses[i + 1..] {
            if let Some(crush) = Crush::between(a, b, threshold) {
                return Some(crush);
            }
        }
    }
    None
}
