//! Smoke burst: a blast disc that swells and fades, then a spray of smoke
//! particles that drift up and shrink. The burst destroys itself once the
//! last particle is gone.

use bevy_ecs::prelude::*;
use log::trace;
use smallvec::SmallVec;

use crate::components::hooks::EntityHooks;
use crate::components::opacity::Opacity;
use crate::components::parts::Parts;
use crate::components::poof::{Poof, PoofParticle};
use crate::resources::surface::{Rgba, Surface};
use crate::stage::Stage;
use crate::systems::entity::{EntityConfig, base_update, destroy, place, position_of, spawn_entity};

pub const PARTICLE_COUNT: usize = 50;
const LIGHT: Rgba = Rgba::rgb(0xf0, 0xf0, 0xf0);
const SHADE: Rgba = Rgba::rgb(0xd9, 0xd9, 0xd9);
const BLAST_SIZE: f32 = 80.0;
const BLAST_GROWTH: f32 = 3.0;
const BLAST_FADE: f32 = 0.06;
/// Particles start moving once the blast reaches this share of its size.
const RELEASE_AT: f32 = 0.55;
const DRAG: f32 = 0.92;

/// Shaded disc with a lighter highlight above its centre.
fn draw_particle(surface: &mut dyn Surface, world: &World, entity: Entity) {
    let Some(p) = world.get::<PoofParticle>(entity) else {
        return;
    };
    if p.radius <= 0.0 {
        return;
    }
    surface.fill_circle(0.0, 0.0, p.radius, p.shade);
    surface.fill_circle(0.0, -0.2 * p.radius, 0.8 * p.radius, p.light);
}

fn spawn_particle(stage: &mut Stage, x: f32, y: f32, particle: PoofParticle, z_index: i32) -> Entity {
    let entity = spawn_entity(
        stage,
        EntityConfig::default()
            .with_position(x, y)
            .with_size(0.0, 0.0)
            .with_zindex(z_index)
            .with_hooks(EntityHooks::default().with_on_draw(draw_particle)),
        base_update,
    );
    stage.world.entity_mut(entity).insert(particle);
    entity
}

fn still_particle(radius: f32) -> PoofParticle {
    PoofParticle {
        radius,
        vx: 0.0,
        vy: 0.0,
        vya: 0.0,
        decay: 0.0,
        amplitude: 0.0,
        t: 0.0,
        dt: 0.0,
        light: LIGHT,
        shade: SHADE,
    }
}

pub fn spawn_poof(stage: &mut Stage, x: f32, y: f32, z_index: i32) -> Entity {
    let blast = spawn_particle(stage, x, y, still_particle(0.0), 0);

    let mut particles = SmallVec::<[Entity; 64]>::new();
    for _ in 0..PARTICLE_COUNT {
        let (px, py) = (x + stage.random(-30.0, 30.0), y + stage.random(-30.0, 30.0));
        let particle = PoofParticle {
            radius: stage.random(10.0, 30.0),
            vx: stage.random(-10.0, 10.0),
            vy: stage.random(-2.0, 5.0),
            vya: stage.random(0.1, 0.25),
            decay: stage.random(0.5, 0.65),
            t: stage.random(0.0, 2.0),
            dt: stage.random(-0.02, 0.02),
            ..still_particle(0.0)
        };
        particles.push(spawn_particle(stage, px, py, particle, z_index));
    }

    let poof = spawn_entity(
        stage,
        EntityConfig::default().with_position(x, y).with_zindex(z_index),
        update_poof,
    );
    let owned = std::iter::once(blast).chain(particles.iter().copied()).collect();
    stage.world.entity_mut(poof).insert((
        Poof {
            blast,
            blast_size: BLAST_SIZE,
            particles,
        },
        Parts(owned),
    ));
    poof
}

/// Move one particle; false once it has shrunk away.
fn step_particle(world: &mut World, entity: Entity) -> bool {
    let (Some(pos), Some(mut p)) = (position_of(world, entity), world.get::<PoofParticle>(entity).copied())
    else {
        return false;
    };
    p.t += p.dt;
    p.amplitude += 3.0 * p.dt;
    let x = pos.x + p.vx + p.amplitude * p.t.sin();
    let y = pos.y + p.vy;
    p.vx *= DRAG;
    p.vy -= p.vya;
    p.radius -= p.decay;
    place(world, entity, x, y);
    if let Some(mut stored) = world.get_mut::<PoofParticle>(entity) {
        *stored = p;
    }
    p.radius > 0.0
}

pub fn update_poof(stage: &mut Stage, entity: Entity) {
    let Some(mut poof) = stage.world.get::<Poof>(entity).cloned() else {
        return;
    };

    poof.blast_size += BLAST_GROWTH;
    let mut blast_radius = 0.0;
    if let Some(mut blast) = stage.world.get_mut::<PoofParticle>(poof.blast) {
        blast.radius += (poof.blast_size - blast.radius) / 2.0;
        blast_radius = blast.radius;
    }
    if let Some(mut opacity) = stage.world.get_mut::<Opacity>(poof.blast) {
        opacity.0 = (opacity.0 - BLAST_FADE).max(0.0);
    }

    if blast_radius > RELEASE_AT * poof.blast_size {
        let mut spent = SmallVec::<[Entity; 64]>::new();
        poof.particles.retain(|particle| {
            let alive = step_particle(&mut stage.world, *particle);
            if !alive {
                spent.push(*particle);
            }
            alive
        });
        for particle in spent {
            if let Some(mut parts) = stage.world.get_mut::<Parts>(entity) {
                parts.remove(particle);
            }
            destroy(stage, particle);
        }
    }

    let finished = poof.particles.is_empty();
    if let Some(mut stored) = stage.world.get_mut::<Poof>(entity) {
        *stored = poof;
    }
    if finished {
        trace!("poof {:?} dissipated", entity);
        destroy(stage, entity);
        return;
    }
    base_update(stage, entity);
}
