//! Pointer-event state machine.
//!
//! Translates raw pointer input into [`Command`]s. The machine walks
//! `Idle -> Hovering -> Dragging` and back; toggling the metric is a
//! stateless side transition available from any state. `handle` emits at
//! most one command per event, and the model owner applies each command
//! followed by exactly one redraw request.

use crate::model::{Command, DiagramModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Pointer input in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved { x: f64, y: f64 },
    Pressed(PointerButton),
    Released(PointerButton),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerState {
    Idle,
    Hovering(usize),
    Dragging(usize),
}

/// Tracks which point the pointer is over or dragging.
#[derive(Debug)]
pub struct Interaction {
    state: PointerState,
    drag_radius: f64,
}

impl Interaction {
    /// `drag_radius` is the grab distance around a point, tested with
    /// Euclidean distance regardless of the diagram metric.
    pub fn new(drag_radius: f64) -> Self {
        Self {
            state: PointerState::Idle,
            drag_radius,
        }
    }

    /// Feed one pointer event; returns the command to apply, if any.
    pub fn handle(&mut self, model: &DiagramModel, event: PointerEvent) -> Option<Command> {
        match event {
            PointerEvent::Moved { x, y } => match self.state {
                // every move sample repositions the dragged point, no
                // smoothing or interpolation
                PointerState::Dragging(index) => Some(Command::MovePoint { index, x, y }),
                PointerState::Idle | PointerState::Hovering(_) => {
                    let hit = model.nearest_within(x, y, self.drag_radius);
                    let prev = match self.state {
                        PointerState::Hovering(i) => Some(i),
                        _ => None,
                    };
                    if hit == prev {
                        return None;
                    }
                    self.state = match hit {
                        Some(i) => PointerState::Hovering(i),
                        None => PointerState::Idle,
                    };
                    Some(Command::SetHover(hit))
                }
            },
            PointerEvent::Pressed(PointerButton::Primary) => {
                if let PointerState::Hovering(i) = self.state {
                    self.state = PointerState::Dragging(i);
                }
                None
            }
            PointerEvent::Released(PointerButton::Primary) => {
                if let PointerState::Dragging(i) = self.state {
                    // the point stays hovered until the next move sample
                    // recomputes proximity
                    self.state = PointerState::Hovering(i);
                }
                None
            }
            PointerEvent::Pressed(PointerButton::Secondary) => None,
            // metric toggles on release, from any state
            PointerEvent::Released(PointerButton::Secondary) => Some(Command::ToggleMetric),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::DistanceMetric;
    use crate::point::{GeneratorPoint, Position};
    use crate::render::DRAG_RADIUS;

    fn model_with_points(positions: &[(f64, f64)]) -> DiagramModel {
        let points = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| GeneratorPoint::new(Position::new(x, y), [i as u8, 0, 0]))
            .collect();
        DiagramModel::new(points, DistanceMetric::Euclidean)
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Moved { x, y }
    }

    #[test]
    fn test_hover_drag_release_walk() {
        let mut model = model_with_points(&[(50.0, 50.0)]);
        let mut interaction = Interaction::new(DRAG_RADIUS);

        // Idle -> Hovering on entering the grab radius
        let cmd = interaction.handle(&model, moved(52.0, 50.0));
        assert_eq!(cmd, Some(Command::SetHover(Some(0))));
        model.apply(cmd.unwrap());

        // press begins the drag without touching the model
        assert_eq!(
            interaction.handle(&model, PointerEvent::Pressed(PointerButton::Primary)),
            None
        );

        // every move sample while dragging moves the point
        let cmd = interaction.handle(&model, moved(120.0, 80.0));
        assert_eq!(
            cmd,
            Some(Command::MovePoint {
                index: 0,
                x: 120.0,
                y: 80.0
            })
        );
        model.apply(cmd.unwrap());
        assert_eq!(model.points()[0].pos, Position::new(120.0, 80.0));

        // release mutates nothing
        assert_eq!(
            interaction.handle(&model, PointerEvent::Released(PointerButton::Primary)),
            None
        );

        // the pointer is still on the released point: no redundant hover
        assert_eq!(interaction.handle(&model, moved(120.0, 80.0)), None);

        // moving away clears the hover
        assert_eq!(
            interaction.handle(&model, moved(300.0, 300.0)),
            Some(Command::SetHover(None))
        );
    }

    #[test]
    fn test_hover_enters_at_exact_radius() {
        let model = model_with_points(&[(100.0, 100.0)]);
        let mut interaction = Interaction::new(DRAG_RADIUS);

        assert_eq!(
            interaction.handle(&model, moved(100.0, 100.0 + DRAG_RADIUS)),
            Some(Command::SetHover(Some(0)))
        );
    }

    #[test]
    fn test_no_command_while_idle_far_from_points() {
        let model = model_with_points(&[(50.0, 50.0)]);
        let mut interaction = Interaction::new(DRAG_RADIUS);

        assert_eq!(interaction.handle(&model, moved(200.0, 200.0)), None);
        assert_eq!(interaction.handle(&model, moved(210.0, 200.0)), None);
    }

    #[test]
    fn test_hover_moves_between_points() {
        let model = model_with_points(&[(50.0, 50.0), (200.0, 50.0)]);
        let mut interaction = Interaction::new(DRAG_RADIUS);

        assert_eq!(
            interaction.handle(&model, moved(50.0, 50.0)),
            Some(Command::SetHover(Some(0)))
        );
        assert_eq!(
            interaction.handle(&model, moved(200.0, 50.0)),
            Some(Command::SetHover(Some(1)))
        );
    }

    #[test]
    fn test_drag_is_not_stolen_by_other_points() {
        let mut model = model_with_points(&[(50.0, 50.0), (200.0, 50.0)]);
        let mut interaction = Interaction::new(DRAG_RADIUS);

        model.apply(interaction.handle(&model, moved(50.0, 50.0)).unwrap());
        interaction.handle(&model, PointerEvent::Pressed(PointerButton::Primary));

        // dragging point 0 across point 1 keeps moving point 0
        let cmd = interaction.handle(&model, moved(200.0, 50.0));
        assert_eq!(
            cmd,
            Some(Command::MovePoint {
                index: 0,
                x: 200.0,
                y: 50.0
            })
        );
    }

    #[test]
    fn test_press_away_from_points_does_not_drag() {
        let model = model_with_points(&[(50.0, 50.0)]);
        let mut interaction = Interaction::new(DRAG_RADIUS);

        interaction.handle(&model, moved(200.0, 200.0));
        interaction.handle(&model, PointerEvent::Pressed(PointerButton::Primary));

        // still idle: moves near nothing emit nothing
        assert_eq!(interaction.handle(&model, moved(220.0, 200.0)), None);
    }

    #[test]
    fn test_secondary_release_toggles_from_any_state() {
        let mut model = model_with_points(&[(50.0, 50.0)]);
        let mut interaction = Interaction::new(DRAG_RADIUS);

        // Idle
        assert_eq!(
            interaction.handle(&model, PointerEvent::Released(PointerButton::Secondary)),
            Some(Command::ToggleMetric)
        );

        // Hovering
        model.apply(interaction.handle(&model, moved(50.0, 50.0)).unwrap());
        assert_eq!(
            interaction.handle(&model, PointerEvent::Released(PointerButton::Secondary)),
            Some(Command::ToggleMetric)
        );

        // Dragging, and the drag survives the toggle
        interaction.handle(&model, PointerEvent::Pressed(PointerButton::Primary));
        assert_eq!(
            interaction.handle(&model, PointerEvent::Released(PointerButton::Secondary)),
            Some(Command::ToggleMetric)
        );
        assert!(matches!(
            interaction.handle(&model, moved(60.0, 60.0)),
            Some(Command::MovePoint { index: 0, .. })
        ));
    }

    #[test]
    fn test_secondary_press_is_inert() {
        let model = model_with_points(&[(50.0, 50.0)]);
        let mut interaction = Interaction::new(DRAG_RADIUS);

        assert_eq!(
            interaction.handle(&model, PointerEvent::Pressed(PointerButton::Secondary)),
            None
        );
    }
}
