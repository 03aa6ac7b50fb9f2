#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Bomber.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the dependency is declared without its default `audio`
//! feature.

use anyhow::Result;
use bomber_core::Buttons;
use bomber_rendering::{
    ArenaScene, Color, FrameInput, Presentation, RenderingBackend, Scene, VictoryScene,
};
use glam::Vec2;
use macroquad::{
    color::WHITE,
    input::{is_key_down, is_key_pressed, KeyCode},
    shapes::{draw_circle, draw_circle_lines, draw_rectangle, draw_rectangle_lines},
    text::{draw_text, measure_text},
};
use std::time::{Duration, Instant};
use tracing::info;

const POWER_UP_COLOR: Color = Color::from_rgb_u8(60, 190, 90);
const BOMB_COLOR: Color = Color::from_rgb_u8(24, 24, 24);
const EXPLOSION_COLOR: Color = Color::from_rgb_u8(250, 150, 40);
const TEXT_COLOR: Color = Color::from_rgb_u8(235, 235, 235);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    /// `Z` or `Space` held.
    action_held: bool,
    /// `Z` or `Space` went down this frame.
    action_pressed: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            up: is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::Down),
            left: is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::Right),
            action_held: is_key_down(KeyCode::Z) || is_key_down(KeyCode::Space),
            action_pressed: is_key_pressed(KeyCode::Z) || is_key_pressed(KeyCode::Space),
        }
    }

    fn frame_input(self) -> FrameInput {
        let mut held = Buttons::empty();
        held.set(Buttons::UP, self.up);
        held.set(Buttons::DOWN, self.down);
        held.set(Buttons::LEFT, self.left);
        held.set(Buttons::RIGHT, self.right);
        held.set(Buttons::ACTION, self.action_held || self.action_pressed);

        let pressed = if self.action_pressed {
            Buttons::ACTION
        } else {
            Buttons::empty()
        };

        FrameInput::new(held, pressed)
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the averages once one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let metrics = FpsMetrics {
            per_second: frames as f32 / seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_render: self.render_accum / frames,
        };
        *self = Self::default();
        Some(metrics)
    }
}

/// Maps world pixels onto the window, preserving the aspect ratio.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Screen pixels per world pixel.
    pub scale: f32,
    /// Screen position of the world origin.
    pub offset: Vec2,
}

impl Viewport {
    /// Largest centred fit of `logical_size` inside the screen.
    #[must_use]
    pub fn fit(logical_size: Vec2, screen_width: f32, screen_height: f32) -> Self {
        if logical_size.x <= f32::EPSILON || logical_size.y <= f32::EPSILON {
            return Self {
                scale: 1.0,
                offset: Vec2::ZERO,
            };
        }

        let scale = (screen_width / logical_size.x)
            .min(screen_height / logical_size.y)
            .max(0.0);
        let screen = Vec2::new(screen_width, screen_height);
        let offset = ((screen - logical_size * scale) * 0.5).max(Vec2::ZERO);

        Self { scale, offset }
    }

    /// Converts a world position into screen coordinates.
    #[must_use]
    pub fn to_screen(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            logical_size,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960,
            window_height: 640,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let simulation_start = Instant::now();
                update_scene(frame_dt, keyboard.frame_input(), &mut scene);
                let simulation = simulation_start.elapsed();

                let viewport = Viewport::fit(
                    logical_size,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );

                let render_start = Instant::now();
                match &scene {
                    Scene::Blank => {}
                    Scene::Arena(arena) => draw_arena(arena, logical_size, &viewport),
                    Scene::Victory(victory) => draw_victory(victory, logical_size, &viewport),
                }
                let render = render_start.elapsed();

                let metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        avg_simulation,
                        avg_render,
                    }) = metrics
                    {
                        info!(
                            fps = format_args!("{per_second:.2}"),
                            sim_ms = avg_simulation.as_secs_f64() * 1_000.0,
                            render_ms = avg_render.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_arena(arena: &ArenaScene, logical_size: Vec2, viewport: &Viewport) {
    let tile = arena.tile_length * viewport.scale;

    for wall in &arena.walls {
        let corner = viewport.to_screen(wall.origin);
        draw_rectangle(corner.x, corner.y, tile, tile, to_macroquad_color(wall.color));
        draw_rectangle_lines(
            corner.x,
            corner.y,
            tile,
            tile,
            (tile * 0.08).max(1.0),
            to_macroquad_color(wall.color.lighten(0.25)),
        );
    }

    for &origin in &arena.power_ups {
        draw_power_up(arena, origin, viewport);
    }

    for &origin in &arena.bombs {
        let center = viewport.to_screen(arena.tile_center(origin));
        let radius = tile * 0.4;
        draw_circle(center.x, center.y, radius, to_macroquad_color(BOMB_COLOR));
        draw_circle_lines(
            center.x,
            center.y,
            radius,
            (tile * 0.06).max(1.0),
            to_macroquad_color(BOMB_COLOR.lighten(0.5)),
        );
    }

    for &origin in &arena.explosions {
        let corner = viewport.to_screen(origin);
        draw_rectangle(
            corner.x,
            corner.y,
            tile,
            tile,
            to_macroquad_color(EXPLOSION_COLOR),
        );
    }

    for actor in &arena.actors {
        let inset = tile * 0.1;
        let corner = viewport.to_screen(actor.origin);
        draw_rectangle(
            corner.x + inset,
            corner.y + inset,
            tile - 2.0 * inset,
            tile - 2.0 * inset,
            to_macroquad_color(actor.color),
        );
    }

    let hud = &arena.hud;
    let font_size = tile * 0.75;
    let baseline = viewport.to_screen(hud.origin) + Vec2::new(0.0, tile);
    let strip_width = logical_size.x * viewport.scale;
    draw_label(&hud.score, baseline.x, baseline.y, font_size);
    draw_centered_text(
        &hud.controls,
        baseline.x + strip_width * 0.5,
        baseline.y,
        font_size,
    );
    let bombs_width = measure_text(&hud.bombs, None, font_size as u16, 1.0).width;
    draw_label(
        &hud.bombs,
        baseline.x + strip_width - bombs_width,
        baseline.y,
        font_size,
    );
}

fn draw_power_up(arena: &ArenaScene, origin: Vec2, viewport: &Viewport) {
    let tile = arena.tile_length * viewport.scale;
    let inset = tile * 0.15;
    let corner = viewport.to_screen(origin);
    draw_rectangle(
        corner.x + inset,
        corner.y + inset,
        tile - 2.0 * inset,
        tile - 2.0 * inset,
        to_macroquad_color(POWER_UP_COLOR),
    );
    let center = viewport.to_screen(arena.tile_center(origin));
    draw_centered_text("B", center.x, center.y + tile * 0.25, tile * 0.7);
}

fn draw_victory(victory: &VictoryScene, logical_size: Vec2, viewport: &Viewport) {
    let size = logical_size * viewport.scale;
    let margin = size.min_element() * 0.1;
    draw_rectangle_lines(
        viewport.offset.x + margin,
        viewport.offset.y + margin,
        size.x - 2.0 * margin,
        size.y - 2.0 * margin,
        (margin * 0.15).max(1.0),
        WHITE,
    );

    let center_x = viewport.offset.x + size.x * 0.5;
    let line = size.y / 6.0;
    let font_size = line * 0.6;
    draw_centered_text(
        &victory.headline,
        center_x,
        viewport.offset.y + line * 2.0,
        font_size,
    );
    draw_centered_text(
        &victory.score,
        center_x,
        viewport.offset.y + line * 3.0,
        font_size,
    );
    if let Some(prompt) = &victory.prompt {
        draw_centered_text(
            prompt,
            center_x,
            viewport.offset.y + line * 4.0,
            font_size * 0.7,
        );
    }
}

fn draw_centered_text(text: &str, center_x: f32, baseline: f32, font_size: f32) {
    let dimensions = measure_text(text, None, font_size as u16, 1.0);
    draw_label(text, center_x - dimensions.width * 0.5, baseline, font_size);
}

fn draw_label(text: &str, x: f32, baseline: f32, font_size: f32) {
    let _ = draw_text(text, x, baseline, font_size, to_macroquad_color(TEXT_COLOR));
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
