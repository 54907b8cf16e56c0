//! Headless demo: emits a handful of particles from the surface of a cube and
//! round-trips the emitter through its RON record.

use std::f32::consts::FRAC_PI_4;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_surface_emitter::prelude::*;

const PARTICLE_COUNT: u32 = 8;
const SEED: u64 = 0x5eed;

fn main() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_plugins(SurfaceEmitterPlugin)
        .add_systems(Startup, (register_meshes, emit_particles).chain());
    app.finish();
    app.cleanup();
    app.update();
}

fn register_meshes(mut library: ResMut<MeshLibrary>) {
    library.insert("crate", Mesh::from(Cuboid::from_size(Vec3::ONE)));
    info!("Registered meshes: {:?}", library.ids());
}

fn emit_particles(library: Res<MeshLibrary>, registry: Res<EmitterTypeRegistry>) {
    let emitter: ParticleEmitter = MeshParticleEmitter::new(library.find_mesh("crate")).into();
    let world = Mat4::from_scale_rotation_translation(
        Vec3::splat(2.0),
        Quat::from_rotation_y(FRAC_PI_4),
        Vec3::new(0.0, 1.0, 0.0),
    );

    let mut rng = fastrand::Rng::with_seed(SEED);
    for i in 0..PARTICLE_COUNT {
        match emitter.emit(&world, ParticleId(i), &mut rng) {
            Some(emission) => info!(
                "particle {}: position {} direction {}",
                i, emission.position, emission.direction
            ),
            None => warn!("particle {}: emitter has no surface to sample", i),
        }
    }

    let text = match emitter.to_ron() {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to serialize emitter: {}", e);
            return;
        }
    };
    info!("Serialized emitter:\n{}", text);

    match ParticleEmitter::from_ron(&text, &registry, &*library) {
        Ok(parsed) => info!(
            "Parsed {} bound to {:?}",
            parsed.class_name(),
            parsed.to_record().mesh_id
        ),
        Err(e) => warn!("Failed to parse emitter: {}", e),
    }
}
