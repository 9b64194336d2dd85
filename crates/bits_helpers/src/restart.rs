use bevy::prelude::*;
use bevy::state::state::FreelyMutableState;

use crate::FONT;

#[derive(Component)]
pub struct RestartButton;

/// Entities carrying this marker are removed by `cleanup_marked_entities`.
#[derive(Component)]
pub struct CleanupMarker;

pub trait Restartable: Resource {
    fn reset(&mut self);
    fn initial_state() -> Self::State;
    type State: States + FreelyMutableState;
}

/// Resets `T` and sends the game back to its initial state when a restart
/// button is pressed.
pub fn handle_restart<T: Restartable>(
    mut next_state: ResMut<NextState<T::State>>,
    mut restartable: ResMut<T>,
    interactions: Query<&Interaction, (Changed<Interaction>, With<RestartButton>)>,
) {
    if interactions
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed)
    {
        restartable.reset();
        next_state.set(T::initial_state());
    }
}

pub fn cleanup_marked_entities(mut commands: Commands, query: Query<Entity, With<CleanupMarker>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

/// Adds a labelled restart button as a child of a UI node.
pub fn spawn_restart_button(parent: &mut ChildBuilder, asset_server: &AssetServer, label: &str) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(65.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                margin: UiRect::top(Val::Px(30.0)),
                ..default()
            },
            BackgroundColor::from(Color::srgb(0.15, 0.15, 0.15)),
            RestartButton,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font: asset_server.load(FONT),
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;

    #[derive(States, Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Flow {
        #[default]
        Start,
        Over,
    }

    #[derive(Resource, Default)]
    struct Counter(u32);

    impl Restartable for Counter {
        fn reset(&mut self) {
            self.0 = 0;
        }

        fn initial_state() -> Self::State {
            Flow::Start
        }

        type State = Flow;
    }

    #[test]
    fn pressing_restart_resets_and_returns_to_start() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<Flow>()
            .insert_resource(Counter(7))
            .add_systems(Update, handle_restart::<Counter>);
        app.world_mut().resource_mut::<NextState<Flow>>().set(Flow::Over);
        app.update();

        app.world_mut().spawn((RestartButton, Interaction::Pressed));
        app.update();
        app.update();

        assert_eq!(app.world().resource::<Counter>().0, 0, "counter reset");
        assert_eq!(
            *app.world().resource::<State<Flow>>().get(),
            Flow::Start,
            "back to the initial state"
        );
    }

    #[test]
    fn cleanup_removes_marked_entities_only() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_systems(Update, cleanup_marked_entities);
        let marked = app.world_mut().spawn(CleanupMarker).id();
        let kept = app.world_mut().spawn(Transform::default()).id();
        app.update();

        assert!(app.world().get::<CleanupMarker>(marked).is_none(), "marked entity gone");
        assert!(app.world().get::<Transform>(kept).is_some(), "unmarked entity kept");
    }
}
