//! Translates simulation frames into rendering scenes.

use bomber_core::{Controller, PixelPoint, TileKind};
use bomber_rendering::{
    ActorPresentation, ArenaScene, Color, HudPresentation, Scene, VictoryScene, WallPresentation,
};
use bomber_simulation::{ArenaFrame, Frame, VictoryFrame, RESTART_PROMPT};
use bomber_world::{query, World};
use glam::Vec2;
use tracing::warn;

pub(crate) const BACKGROUND: Color = Color::from_rgb_u8(20, 20, 28);
const SOLID_WALL: Color = Color::from_rgb_u8(90, 90, 100);
const BREAKABLE_WALL: Color = Color::from_rgb_u8(150, 100, 60);
const HUMAN: Color = Color::from_rgb_u8(60, 110, 230);
const AI: Color = Color::from_rgb_u8(220, 60, 60);

/// Tile rows reserved beneath the arena for the status strip.
const HUD_ROWS: u32 = 2;

/// Size of the arena plus status strip in world pixels.
pub(crate) fn logical_size(world: &World) -> Vec2 {
    let (columns, rows) = query::tile_view(world).dimensions();
    let tile = query::rules(world).tile_size as f32;
    Vec2::new(columns as f32 * tile, (rows + HUD_ROWS) as f32 * tile)
}

/// Scene for a step result; skipped ticks show only the clear color.
pub(crate) fn from_frame(frame: Option<&Frame>) -> Scene {
    match frame {
        None => Scene::Blank,
        Some(Frame::Arena(arena)) => arena_scene(arena),
        Some(Frame::Victory(victory)) => Scene::Victory(victory_scene(victory)),
    }
}

fn arena_scene(frame: &ArenaFrame) -> Scene {
    let tile = frame.tile_size as f32;
    let mut scene = match ArenaScene::new(tile) {
        Ok(scene) => scene,
        Err(error) => {
            warn!(%error, "arena frame dropped");
            return Scene::Blank;
        }
    };

    let columns = frame.columns.max(1) as usize;
    scene.walls = frame
        .tiles
        .iter()
        .enumerate()
        .filter_map(|(index, kind)| {
            let color = match kind {
                TileKind::Empty => return None,
                TileKind::SolidWall => SOLID_WALL,
                TileKind::BreakableWall => BREAKABLE_WALL,
            };
            let origin = Vec2::new((index % columns) as f32, (index / columns) as f32) * tile;
            Some(WallPresentation::new(origin, color))
        })
        .collect();
    scene.power_ups = frame
        .power_ups
        .iter()
        .map(|power_up| to_world(power_up.pixel))
        .collect();
    scene.bombs = frame.bombs.iter().map(|bomb| to_world(bomb.pixel)).collect();
    scene.explosions = frame
        .explosions
        .iter()
        .map(|explosion| to_world(explosion.pixel))
        .collect();
    scene.actors = frame
        .actors
        .iter()
        .map(|actor| {
            let color = match actor.controller {
                Controller::Human => HUMAN,
                Controller::Ai => AI,
            };
            ActorPresentation::new(to_world(actor.pixel), color)
        })
        .collect();
    scene.hud = HudPresentation {
        origin: Vec2::new(0.0, frame.rows as f32 * tile),
        score: frame.hud.score.clone(),
        controls: frame.hud.controls.to_owned(),
        bombs: frame.hud.bombs.clone(),
    };

    Scene::Arena(scene)
}

fn victory_scene(frame: &VictoryFrame) -> VictoryScene {
    VictoryScene {
        headline: frame.headline.clone(),
        score: frame.scores.to_string(),
        prompt: frame.prompt_visible.then(|| RESTART_PROMPT.to_owned()),
    }
}

fn to_world(pixel: PixelPoint) -> Vec2 {
    Vec2::new(pixel.x as f32, pixel.y as f32)
}
