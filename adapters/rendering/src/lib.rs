#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Bomber adapters.

use anyhow::Result as AnyResult;
use bomber_core::{Buttons, PadState};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Buttons held down during this frame.
    pub held: Buttons,
    /// Buttons that went down since the previous frame.
    pub pressed: Buttons,
}

impl FrameInput {
    /// Creates a new input snapshot.
    #[must_use]
    pub const fn new(held: Buttons, pressed: Buttons) -> Self {
        Self { held, pressed }
    }

    /// Converts the snapshot into the pad state consumed by the simulation.
    #[must_use]
    pub const fn pad(&self) -> PadState {
        PadState::new(self.held, self.pressed)
    }
}

/// A wall tile positioned by its top-left corner in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallPresentation {
    /// Top-left corner of the tile.
    pub origin: Vec2,
    /// Fill color of the tile.
    pub color: Color,
}

impl WallPresentation {
    /// Creates a new wall descriptor.
    #[must_use]
    pub const fn new(origin: Vec2, color: Color) -> Self {
        Self { origin, color }
    }
}

/// An actor sprite positioned by its animated top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorPresentation {
    /// Top-left corner of the actor in world pixels.
    pub origin: Vec2,
    /// Body color identifying the side.
    pub color: Color,
}

impl ActorPresentation {
    /// Creates a new actor descriptor.
    #[must_use]
    pub const fn new(origin: Vec2, color: Color) -> Self {
        Self { origin, color }
    }
}

/// Status texts drawn beneath the arena.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HudPresentation {
    /// Top-left corner of the status strip.
    pub origin: Vec2,
    /// Score pair.
    pub score: String,
    /// Controls hint.
    pub controls: String,
    /// Remaining bombs against capacity.
    pub bombs: String,
}

/// Arena contents for a running match, expressed in world pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaScene {
    /// Edge length of a tile.
    pub tile_length: f32,
    /// Solid and breakable walls.
    pub walls: Vec<WallPresentation>,
    /// Uncovered power-ups.
    pub power_ups: Vec<Vec2>,
    /// Live bombs.
    pub bombs: Vec<Vec2>,
    /// Live explosion cells.
    pub explosions: Vec<Vec2>,
    /// Actors in roster order.
    pub actors: Vec<ActorPresentation>,
    /// Status texts.
    pub hud: HudPresentation,
}

impl ArenaScene {
    /// Creates an empty arena scene with the provided tile edge length.
    pub fn new(tile_length: f32) -> Result<Self, RenderingError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            tile_length,
            walls: Vec::new(),
            power_ups: Vec::new(),
            bombs: Vec::new(),
            explosions: Vec::new(),
            actors: Vec::new(),
            hud: HudPresentation::default(),
        })
    }

    /// Center of the tile whose top-left corner is `origin`.
    #[must_use]
    pub fn tile_center(&self, origin: Vec2) -> Vec2 {
        origin + Vec2::splat(self.tile_length * 0.5)
    }
}

/// Win screen contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VictoryScene {
    /// Announcement naming the winner.
    pub headline: String,
    /// Score pair.
    pub score: String,
    /// Restart prompt, absent while it blinks off.
    pub prompt: Option<String>,
}

/// Scene description for a single frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Scene {
    /// Nothing but the clear color.
    #[default]
    Blank,
    /// Match in progress.
    Arena(ArenaScene),
    /// Match decided.
    Victory(VictoryScene),
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Size of the drawable area in world pixels, scaled to fit the window.
    pub logical_size: Vec2,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, logical_size: Vec2, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            logical_size,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Bomber scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure is invoked exactly once per
    /// presented frame with the frame delta and the sampled input, and
    /// replaces the scene before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive, finite edge length.
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(
                    f,
                    "tile_length must be positive and finite (received {tile_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
