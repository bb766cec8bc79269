use crate::components::entity::Entity;
use crate::error::InvalidLevelConfiguration;
use crate::level::Level;
use crate::renderer::camera::ScrollCamera;
use crate::renderer::instance::{DrawInstance, DrawLayer, DrawList};

/// Build the draw list for `level` as seen through `camera`.
/// Order: blocks, active enemies, the player, items. Killed enemies are not
/// drawn.
pub fn build_draw_list(
    level: &Level,
    camera: &ScrollCamera,
    list: &mut DrawList,
) -> Result<(), InvalidLevelConfiguration> {
    list.clear();
    list.background.push_str(level.background());

    for (_, block) in level.blocks() {
        push_entity(block, DrawLayer::Blocks, camera, list)?;
    }
    list.end_layer(DrawLayer::Blocks);

    for (_, enemy) in level.enemies() {
        push_entity(enemy, DrawLayer::Enemies, camera, list)?;
    }
    list.end_layer(DrawLayer::Enemies);

    push_entity(level.player(), DrawLayer::Player, camera, list)?;
    list.end_layer(DrawLayer::Player);

    for (_, item) in level.items() {
        push_entity(item, DrawLayer::Items, camera, list)?;
    }
    list.end_layer(DrawLayer::Items);

    Ok(())
}

fn push_entity(
    entity: &Entity,
    layer: DrawLayer,
    camera: &ScrollCamera,
    list: &mut DrawList,
) -> Result<(), InvalidLevelConfiguration> {
    let frame = entity.current_frame()?;
    let screen = camera.to_screen(entity.position.as_vec2());
    let slot = list.frame_slot(&frame.path);
    list.push(DrawInstance {
        x: screen.x,
        y: screen.y,
        width: frame.width,
        height: frame.height,
        flipped: if entity.animation.flipped { 1.0 } else { 0.0 },
        layer: layer as u8 as f32,
        frame_slot: slot as f32,
        frame_index: entity.animation.frame_index as f32,
    });
    Ok(())
}
