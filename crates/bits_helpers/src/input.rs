use bevy::prelude::*;

/// Edge or level of the primary pointer (left mouse button or first touch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Pressed,
    Held,
    Released,
}

/// Primary pointer for the current frame, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// `None` while nothing is pressed
    pub phase: Option<PointerPhase>,
    /// Where the pointer is, also while hovering with a mouse
    pub world_position: Option<Vec2>,
}

impl PointerState {
    pub fn is(&self, phase: PointerPhase) -> bool {
        self.phase == Some(phase)
    }
}

pub fn pointer_just_pressed(buttons: &ButtonInput<MouseButton>, touches: &Touches) -> bool {
    buttons.just_pressed(MouseButton::Left) || touches.any_just_pressed()
}

pub fn pointer_phase(buttons: &ButtonInput<MouseButton>, touches: &Touches) -> Option<PointerPhase> {
    if pointer_just_pressed(buttons, touches) {
        Some(PointerPhase::Pressed)
    } else if buttons.just_released(MouseButton::Left)
        || touches.any_just_released()
        || touches.any_just_canceled()
    {
        Some(PointerPhase::Released)
    } else if buttons.pressed(MouseButton::Left) || touches.iter().next().is_some() {
        Some(PointerPhase::Held)
    } else {
        None
    }
}

/// Touches win over the mouse cursor; a touch that just lifted still reports
/// where it left the screen.
pub fn pointer_screen_position(touches: &Touches, window: &Window) -> Option<Vec2> {
    touches
        .iter()
        .next()
        .or_else(|| touches.iter_just_released().next())
        .or_else(|| touches.iter_just_canceled().next())
        .map(|touch| touch.position())
        .or_else(|| window.cursor_position())
}

pub fn screen_to_world(
    position: Vec2,
    cameras: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let (camera, camera_transform) = cameras.get_single().ok()?;
    camera.viewport_to_world_2d(camera_transform, position).ok()
}

pub fn read_pointer(
    buttons: &ButtonInput<MouseButton>,
    touches: &Touches,
    windows: &Query<&Window>,
    cameras: &Query<(&Camera, &GlobalTransform)>,
) -> PointerState {
    let world_position = windows
        .get_single()
        .ok()
        .and_then(|window| pointer_screen_position(touches, window))
        .and_then(|position| screen_to_world(position, cameras));

    PointerState {
        phase: pointer_phase(buttons, touches),
        world_position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_button_edges_map_to_phases() {
        let touches = Touches::default();
        let mut buttons = ButtonInput::<MouseButton>::default();
        assert_eq!(pointer_phase(&buttons, &touches), None, "idle pointer");

        buttons.press(MouseButton::Left);
        assert_eq!(
            pointer_phase(&buttons, &touches),
            Some(PointerPhase::Pressed),
            "first frame is a press"
        );

        buttons.clear();
        assert_eq!(
            pointer_phase(&buttons, &touches),
            Some(PointerPhase::Held),
            "later frames hold"
        );

        buttons.release(MouseButton::Left);
        assert_eq!(
            pointer_phase(&buttons, &touches),
            Some(PointerPhase::Released),
            "release edge"
        );
    }

    #[test]
    fn right_button_is_not_the_pointer() {
        let mut buttons = ButtonInput::<MouseButton>::default();
        buttons.press(MouseButton::Right);
        assert!(
            !pointer_just_pressed(&buttons, &Touches::default()),
            "only the primary button drives the pointer"
        );
    }
}
