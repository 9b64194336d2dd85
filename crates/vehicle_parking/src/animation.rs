use bevy::prelude::*;

/// What a tween drives on its entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenKind {
    /// Sprite alpha from `start` to `end`
    Fade,
    /// Uniform scale from `start` to `end`, spinning a full turn on the way
    Shrink,
    /// Random positional shake of `start` pixels, restored on completion
    Jitter,
    /// Holds a highlight colour, then restores this one
    Flash(Color),
}

/// What happens to the entity once the tween completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnComplete {
    #[default]
    Keep,
    Despawn,
}

/// A single time-based animation record.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub kind: TweenKind,
    pub start: f32,
    pub end: f32,
    pub start_time: f32,
    pub duration: f32,
    pub on_complete: OnComplete,
    /// Jitter offset currently applied to the translation
    pub applied: Vec2,
}

impl Tween {
    pub const fn new(kind: TweenKind, start: f32, end: f32, start_time: f32, duration: f32) -> Self {
        Self {
            kind,
            start,
            end,
            start_time,
            duration,
            on_complete: OnComplete::Keep,
            applied: Vec2::ZERO,
        }
    }

    pub const fn fade(from: f32, to: f32, now: f32, duration: f32) -> Self {
        Self::new(TweenKind::Fade, from, to, now, duration)
    }

    pub const fn shrink(from: f32, now: f32, duration: f32) -> Self {
        Self::new(TweenKind::Shrink, from, 0.0, now, duration).despawning()
    }

    pub const fn jitter(intensity: f32, now: f32, duration: f32) -> Self {
        Self::new(TweenKind::Jitter, intensity, intensity, now, duration)
    }

    pub const fn flash(restore: Color, now: f32, duration: f32) -> Self {
        Self::new(TweenKind::Flash(restore), 0.0, 1.0, now, duration)
    }

    #[must_use]
    pub const fn despawning(mut self) -> Self {
        self.on_complete = OnComplete::Despawn;
        self
    }

    /// Fraction of the tween elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    pub fn value(&self, now: f32) -> f32 {
        (self.end - self.start).mul_add(self.progress(now), self.start)
    }

    pub fn finished(&self, now: f32) -> bool {
        self.progress(now) >= 1.0
    }
}

/// All running tweens of an entity.
#[derive(Component, Debug, Clone, Default)]
pub struct Tweens(pub Vec<Tween>);

impl Tweens {
    pub fn one(tween: Tween) -> Self {
        Self(vec![tween])
    }

    pub fn push(&mut self, tween: Tween) {
        self.0.push(tween);
    }
}

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, advance_tweens);
    }
}

/// Applies every running tween and drops the finished ones.
/// A finished tween marked `Despawn` removes its entity.
pub fn advance_tweens(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Tweens, &mut Transform, Option<&mut Sprite>)>,
) {
    let now = time.elapsed_secs();

    for (entity, mut tweens, mut transform, mut sprite) in &mut query {
        let mut despawn = false;

        tweens.0.retain_mut(|tween| {
            let value = tween.value(now);
            let finished = tween.finished(now);

            match tween.kind {
                TweenKind::Fade => {
                    if let Some(sprite) = sprite.as_mut() {
                        sprite.color.set_alpha(value);
                    }
                }
                TweenKind::Shrink => {
                    transform.scale = Vec3::new(value, value, 1.0);
                    let turn = 360.0_f32.to_radians() * tween.progress(now);
                    transform.rotation = Quat::from_rotation_z(turn);
                }
                TweenKind::Jitter => {
                    let offset = if finished {
                        Vec2::ZERO
                    } else {
                        random_unit_disk() * value
                    };
                    transform.translation += (offset - tween.applied).extend(0.0);
                    tween.applied = offset;
                }
                TweenKind::Flash(restore) => {
                    if finished {
                        if let Some(sprite) = sprite.as_mut() {
                            let alpha = sprite.color.alpha();
                            sprite.color = restore.with_alpha(alpha);
                        }
                    }
                }
            }

            if finished && tween.on_complete == OnComplete::Despawn {
                despawn = true;
            }
            !finished
        });

        if despawn {
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Uniform point inside the unit disk.
fn random_unit_disk() -> Vec2 {
    let angle = fastrand::f32() * core::f32::consts::TAU;
    let radius = fastrand::f32().sqrt();
    Vec2::new(angle.cos(), angle.sin()) * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_interpolates_linearly() {
        let tween = Tween::fade(0.0, 1.0, 10.0, 2.0);
        assert!(tween.value(10.0).abs() < 1e-6, "starts at the start value");
        assert!((tween.value(11.0) - 0.5).abs() < 1e-6, "halfway at half time");
        assert!((tween.value(15.0) - 1.0).abs() < 1e-6, "clamped after the end");
        assert!(!tween.finished(11.9), "still running");
        assert!(tween.finished(12.0), "done at the end time");
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let tween = Tween::fade(1.0, 0.0, 3.0, 0.0);
        assert!(tween.finished(3.0), "nothing to animate");
        assert!(tween.value(3.0).abs() < 1e-6, "jumps to the end value");
    }

    #[test]
    fn shrink_despawns_and_ends_at_zero() {
        let tween = Tween::shrink(1.2, 0.0, 0.5);
        assert_eq!(tween.on_complete, OnComplete::Despawn, "shrunk entities are removed");
        assert!((tween.value(0.25) - 0.6).abs() < 1e-6, "half size at half time");
        assert!(tween.value(0.5).abs() < 1e-6, "vanishes at the end");
    }

    #[test]
    fn finished_tweens_are_dropped_and_despawn_their_entity() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(AnimationPlugin);

        let mut tweens = Tweens::one(Tween::fade(0.0, 1.0, 0.0, 0.0));
        tweens.push(Tween::jitter(5.0, 0.0, 60.0));
        let kept = app
            .world_mut()
            .spawn((Transform::default(), Sprite::default(), tweens))
            .id();
        let removed = app
            .world_mut()
            .spawn((
                Transform::default(),
                Tweens::one(Tween::fade(1.0, 0.0, 0.0, 0.0).despawning()),
            ))
            .id();

        app.update();

        assert_eq!(
            app.world().get::<Tweens>(kept).map(|tweens| tweens.0.len()),
            Some(1),
            "only the long jitter is left"
        );
        assert!(
            app.world()
                .get::<Sprite>(kept)
                .is_some_and(|sprite| (sprite.color.alpha() - 1.0).abs() < 1e-6),
            "fade applied its end value"
        );
        assert!(app.world().get::<Tweens>(removed).is_none(), "despawned on completion");
    }

    #[test]
    fn unit_disk_samples_stay_inside() {
        for _ in 0..100 {
            assert!(random_unit_disk().length() <= 1.0 + 1e-5, "sample escaped the disk");
        }
    }
}
