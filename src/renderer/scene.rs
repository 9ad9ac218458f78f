//! Frame composition
//!
//! Draws a [`GameState`] back to front. Reads state only; all per-frame
//! randomness (shake jitter) was rolled by the tick.

use glam::{IVec2, Vec2};

use super::shapes::{centered, spark_polygon};
use super::{Canvas, Layer, colors};
use crate::assets::Sprite;
use crate::consts::TRANSITION_FRAMES;
use crate::sim::GameState;

/// Offsets of the one-pixel outline underlay
pub const OUTLINE_OFFSETS: [IVec2; 4] = [
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(0, 1),
    IVec2::new(0, -1),
];

/// Wipe radius grows this many pixels per frame of transition
pub const WIPE_STEP: f32 = 8.0;

pub const WIN_BANNER: &str = "You win !";

pub fn render(state: &GameState, canvas: &mut impl Canvas) {
    let view = canvas.surface_size();
    let scroll = state.level.render_scroll();
    let screen_center = view.as_vec2() / 2.0;

    canvas.begin_frame();
    canvas.draw_sprite(Layer::Backdrop, Sprite::Background, Vec2::ZERO, false);

    for cloud in &state.clouds.clouds {
        let sprite = Sprite::Cloud(cloud.variant);
        let pos = cloud.render_pos(scroll, canvas.sprite_size(sprite), view);
        canvas.draw_sprite(Layer::Backdrop, sprite, pos, false);
    }

    if state.is_won() {
        canvas.wipe(screen_center, 0.0, colors::WIPE);
        canvas.draw_text(Layer::Main, WIN_BANNER, screen_center, colors::BANNER);
        canvas.present(state.shake_offset);
        return;
    }

    draw_tilemap(state, canvas, scroll);

    for enemy in &state.level.enemies {
        let entity = &enemy.entity;
        canvas.draw_sprite(Layer::Main, entity.sprite(), entity.render_pos(scroll), entity.flip);
        let gun = canvas.sprite_size(Sprite::Gun).as_vec2();
        let pos = enemy.gun_pos(gun.x) - scroll.as_vec2();
        canvas.draw_sprite(Layer::Main, Sprite::Gun, pos, entity.flip);
    }

    if state.level.dead == 0 && state.player.is_visible() {
        let entity = &state.player.entity;
        canvas.draw_sprite(Layer::Main, entity.sprite(), entity.render_pos(scroll), entity.flip);
    }

    let shot = canvas.sprite_size(Sprite::Projectile);
    for projectile in &state.effects.projectiles {
        let pos = centered(projectile.pos - scroll.as_vec2(), shot);
        canvas.draw_sprite(Layer::Main, Sprite::Projectile, pos, false);
    }

    for spark in &state.effects.sparks {
        canvas.draw_polygon(Layer::Main, &spark_polygon(spark, scroll), colors::SPARK);
    }

    canvas.silhouette(&OUTLINE_OFFSETS, colors::SILHOUETTE);

    for particle in &state.effects.particles {
        let sprite = Sprite::Frame {
            key: particle.animation.key,
            image: particle.animation.image(),
        };
        let pos = centered(particle.pos - scroll.as_vec2(), canvas.sprite_size(sprite));
        canvas.draw_sprite(Layer::Main, sprite, pos, false);
    }

    let transition = state.level.transition;
    if transition != 0 {
        let radius = (TRANSITION_FRAMES - transition.abs()) as f32 * WIPE_STEP;
        canvas.wipe(screen_center, radius, colors::WIPE);
    }

    canvas.present(state.shake_offset);
}

/// Off-grid decorations, then the gridded tiles in view
fn draw_tilemap(state: &GameState, canvas: &mut impl Canvas, scroll: IVec2) {
    let tilemap = &state.level.tilemap;
    let offset = scroll.as_vec2();

    for tile in tilemap.offgrid_tiles() {
        let sprite = Sprite::Tile {
            kind: tile.kind,
            variant: tile.variant,
        };
        canvas.draw_sprite(Layer::Main, sprite, tile.pos - offset, false);
    }

    let view = canvas.surface_size();
    for tile in tilemap.visible_tiles(scroll, view) {
        let sprite = Sprite::Tile {
            kind: tile.kind,
            variant: tile.variant,
        };
        let pos = (tile.pos * tilemap.tile_size()).as_vec2() - offset;
        canvas.draw_sprite(Layer::Main, sprite, pos, false);
    }
}
