//! Visuals - sprites mirroring the simulated world

use std::collections::BTreeSet;

use bevy::prelude::*;

use skyflap::game::state::EntityId;
use skyflap::game::world::BodyKind;

use super::{
    base_color, body_rect, tinted, world_to_screen, Backdrop, BodyLink, Ground,
    ObstacleSprite, PlayerSprite, SimScene, GROUND_COLOR, SKY_COLOR,
};

/// Z layers
const BACKDROP_Z: f32 = -100.0;
const OBSTACLE_Z: f32 = 0.0;
const GROUND_Z: f32 = 5.0;
const PLAYER_Z: f32 = 10.0;

/// Spawn the sky and the ground strip
pub fn spawn_scenery(mut commands: Commands, scene: Res<SimScene>) {
    let config = scene.0.run().config();
    let (width, height) = (config.world_width as f32, config.world_height as f32);
    let ground_y = config.ground_y as f32;

    commands.spawn((
        Sprite {
            color: SKY_COLOR,
            custom_size: Some(Vec2::new(width, height)),
            ..default()
        },
        Transform::from_translation(Vec3::new(0.0, 0.0, BACKDROP_Z)),
        Backdrop,
    ));

    let strip = height - ground_y;
    let center = world_to_screen((width / 2.0, ground_y + strip / 2.0), (width, height));
    commands.spawn((
        Sprite {
            color: GROUND_COLOR,
            custom_size: Some(Vec2::new(width, strip)),
            ..default()
        },
        Transform::from_translation(center.extend(GROUND_Z)),
        Ground,
    ));
}

/// Spawn, move and despawn sprites so they match the simulated bodies
pub fn sync_body_sprites(
    mut commands: Commands,
    scene: Res<SimScene>,
    mut sprites: Query<(Entity, &BodyLink, &mut Transform, &mut Sprite)>,
) {
    let world = scene.0.run().world();
    let size = world.size().to_floats();
    let mut unseen: BTreeSet<EntityId> = world.bodies().map(|b| b.id).collect();

    for (entity, link, mut transform, mut sprite) in sprites.iter_mut() {
        let Some(body) = world.body(link.0) else {
            commands.entity(entity).despawn_recursive();
            continue;
        };
        unseen.remove(&body.id);

        let (center, extent) = body_rect(body, size);
        transform.translation.x = center.x;
        transform.translation.y = center.y;
        transform.rotation = Quat::from_rotation_z(-(body.angle as f32).to_radians());
        sprite.color = tinted(base_color(body.kind), body.tint);
        sprite.custom_size = Some(extent);
    }

    for id in unseen {
        let Some(body) = world.body(id) else {
            continue;
        };
        let (center, extent) = body_rect(body, size);
        let sprite = Sprite {
            color: tinted(base_color(body.kind), body.tint),
            custom_size: Some(extent),
            ..default()
        };

        match body.kind {
            BodyKind::Player => {
                commands.spawn((
                    sprite,
                    Transform::from_translation(center.extend(PLAYER_Z)),
                    BodyLink(id),
                    PlayerSprite,
                    Name::new("Player"),
                ));
            }
            BodyKind::Obstacle(role) => {
                commands.spawn((
                    sprite,
                    Transform::from_translation(center.extend(OBSTACLE_Z)),
                    BodyLink(id),
                    ObstacleSprite,
                    Name::new(format!("Obstacle {:?} #{}", role, id.0)),
                ));
            }
        }
    }
}
