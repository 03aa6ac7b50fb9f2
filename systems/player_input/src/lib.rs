#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates the sampled pad state into commands for the human actor.

use bomber_core::{ActorSnapshot, Buttons, Command, Direction, PadState};

const DIRECTION_BUTTONS: [(Buttons, Direction); 4] = [
    (Buttons::UP, Direction::North),
    (Buttons::DOWN, Direction::South),
    (Buttons::LEFT, Direction::West),
    (Buttons::RIGHT, Direction::East),
];

/// Pure system that maps held and pressed buttons onto actor commands.
#[derive(Debug, Default)]
pub struct PlayerInput;

impl PlayerInput {
    /// Creates a new player input system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits at most one step and one bomb drop for the actor.
    ///
    /// Nothing is emitted while the actor is still animating. The first held
    /// direction in up, down, left, right order wins; a fresh action press
    /// then drops a bomb on the cell the actor ends up on.
    pub fn handle(&mut self, actor: &ActorSnapshot, pad: PadState, out: &mut Vec<Command>) {
        if actor.moving {
            return;
        }

        if let Some(direction) = held_direction(pad) {
            out.push(Command::StepActor {
                actor: actor.id,
                direction,
            });
        }

        if pad.is_pressed(Buttons::ACTION) {
            out.push(Command::PlaceBomb { actor: actor.id });
        }
    }
}

fn held_direction(pad: PadState) -> Option<Direction> {
    DIRECTION_BUTTONS
        .into_iter()
        .find(|(button, _)| pad.is_held(*button))
        .map(|(_, direction)| direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomber_core::{ActorId, CellCoord, Controller, PixelPoint};

    fn human(moving: bool) -> ActorSnapshot {
        ActorSnapshot {
            id: ActorId::new(0),
            controller: Controller::Human,
            cell: CellCoord::new(1, 1),
            spawn: CellCoord::new(1, 1),
            pixel: PixelPoint::new(16, 16),
            moving,
            max_bombs: 1,
            active_bombs: 0,
        }
    }

    fn run(actor: &ActorSnapshot, pad: PadState) -> Vec<Command> {
        let mut commands = Vec::new();
        PlayerInput::new().handle(actor, pad, &mut commands);
        commands
    }

    #[test]
    fn idle_pad_emits_nothing() {
        assert!(run(&human(false), PadState::idle()).is_empty());
    }

    #[test]
    fn vertical_buttons_take_priority() {
        let pad = PadState::new(Buttons::RIGHT | Buttons::DOWN | Buttons::LEFT, Buttons::empty());

        assert_eq!(
            run(&human(false), pad),
            vec![Command::StepActor {
                actor: ActorId::new(0),
                direction: Direction::South,
            }]
        );
    }

    #[test]
    fn step_precedes_bomb() {
        let pad = PadState::new(Buttons::UP | Buttons::ACTION, Buttons::ACTION);

        assert_eq!(
            run(&human(false), pad),
            vec![
                Command::StepActor {
                    actor: ActorId::new(0),
                    direction: Direction::North,
                },
                Command::PlaceBomb {
                    actor: ActorId::new(0),
                },
            ]
        );
    }

    #[test]
    fn held_action_without_a_press_drops_nothing() {
        let pad = PadState::new(Buttons::ACTION, Buttons::empty());

        assert!(run(&human(false), pad).is_empty());
    }

    #[test]
    fn animating_actor_ignores_the_pad() {
        let pad = PadState::new(Buttons::LEFT, Buttons::ACTION);

        assert!(run(&human(true), pad).is_empty());
    }
}
