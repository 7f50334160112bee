//! Particle-style effect emitters attached to projectiles.

use std::fmt;
use std::time::Duration;

use glam::Vec2;

use crate::{DrawCall, ImageHandle, RenderSink};

/// Stage of a projectile's life an emitter decorates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Burst played when the projectile is fired.
    Launch,
    /// Continuous effect trailing the projectile in flight.
    Trail,
    /// Burst played when the projectile hits something.
    Impact,
}

/// Visual effect that can be started, moved and stopped.
pub trait EffectEmitter: fmt::Debug {
    /// Begins emitting.
    fn start(&mut self);

    /// Stops emitting; the emitter dies once its output has faded.
    fn stop(&mut self);

    /// Moves the emitter to a room-space location.
    fn set_location(&mut self, location: Vec2);

    /// Advances the emitter by `elapsed`.
    fn update(&mut self, elapsed: Duration);

    /// Reports whether the emitter still produces visible output.
    fn is_alive(&self) -> bool;

    /// Draws the emitter output.
    fn draw(&self, sink: &mut dyn RenderSink);
}

/// Source of emitters for every effect stage.
pub trait EffectFactory {
    /// Creates a fresh, stopped emitter for the provided stage.
    fn emitter(&self, kind: EffectKind) -> Box<dyn EffectEmitter>;
}

/// Emitter that stays alive for a fixed time after being started.
#[derive(Clone, Debug)]
pub struct TimedEmitter {
    lifetime: Duration,
    remaining: Duration,
    active: bool,
    location: Vec2,
    sprite: Option<ImageHandle>,
}

impl TimedEmitter {
    /// Creates a stopped emitter that lives for `lifetime` once started.
    #[must_use]
    pub const fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            remaining: Duration::ZERO,
            active: false,
            location: Vec2::ZERO,
            sprite: None,
        }
    }

    /// Returns the emitter drawing `sprite` centred on its location while alive.
    #[must_use]
    pub fn with_sprite(mut self, sprite: ImageHandle) -> Self {
        self.sprite = Some(sprite);
        self
    }

    /// Current location of the emitter.
    #[must_use]
    pub const fn location(&self) -> Vec2 {
        self.location
    }
}

impl EffectEmitter for TimedEmitter {
    fn start(&mut self) {
        self.active = true;
        self.remaining = self.lifetime;
    }

    fn stop(&mut self) {
        self.active = false;
        self.remaining = Duration::ZERO;
    }

    fn set_location(&mut self, location: Vec2) {
        self.location = location;
    }

    fn update(&mut self, elapsed: Duration) {
        if !self.active {
            return;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            self.active = false;
        }
    }

    fn is_alive(&self) -> bool {
        self.active
    }

    fn draw(&self, sink: &mut dyn RenderSink) {
        let Some(sprite) = self.sprite else {
            return;
        };
        if !self.active {
            return;
        }
        let half = Vec2::new(sprite.width() as f32, sprite.height() as f32) / 2.0;
        sink.draw(DrawCall::new(sprite, self.location - half));
    }
}

/// Factory producing [`TimedEmitter`]s with per-stage lifetimes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedEffects {
    launch: Duration,
    trail: Duration,
    impact: Duration,
}

impl TimedEffects {
    /// Creates a factory with explicit lifetimes for every stage.
    #[must_use]
    pub const fn new(launch: Duration, trail: Duration, impact: Duration) -> Self {
        Self {
            launch,
            trail,
            impact,
        }
    }

    /// Lifetime handed to emitters of the provided stage.
    #[must_use]
    pub const fn lifetime(&self, kind: EffectKind) -> Duration {
        match kind {
            EffectKind::Launch => self.launch,
            EffectKind::Trail => self.trail,
            EffectKind::Impact => self.impact,
        }
    }
}

impl Default for TimedEffects {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(100),
            Duration::from_secs(3600),
            Duration::from_millis(250),
        )
    }
}

impl EffectFactory for TimedEffects {
    fn emitter(&self, kind: EffectKind) -> Box<dyn EffectEmitter> {
        Box::new(TimedEmitter::new(self.lifetime(kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitter_starts_stopped() {
        let emitter = TimedEmitter::new(Duration::from_millis(10));
        assert!(!emitter.is_alive());
    }

    #[test]
    fn emitter_dies_once_lifetime_elapses() {
        let mut emitter = TimedEmitter::new(Duration::from_millis(30));
        emitter.start();
        emitter.update(Duration::from_millis(20));
        assert!(emitter.is_alive());
        emitter.update(Duration::from_millis(20));
        assert!(!emitter.is_alive());
    }

    #[test]
    fn stop_kills_immediately_and_start_revives() {
        let mut emitter = TimedEmitter::new(Duration::from_secs(5));
        emitter.start();
        emitter.stop();
        assert!(!emitter.is_alive());
        emitter.start();
        assert!(emitter.is_alive());
    }

    #[test]
    fn factory_uses_stage_lifetimes() {
        let effects = TimedEffects::new(
            Duration::from_millis(1),
            Duration::from_millis(2),
            Duration::from_millis(3),
        );
        let mut impact = effects.emitter(EffectKind::Impact);
        impact.start();
        impact.update(Duration::from_millis(2));
        assert!(impact.is_alive());
        impact.update(Duration::from_millis(1));
        assert!(!impact.is_alive());
    }

    #[derive(Default)]
    struct CountingSink {
        draws: Vec<DrawCall>,
    }

    impl RenderSink for CountingSink {
        fn draw(&mut self, call: DrawCall) {
            self.draws.push(call);
        }

        fn draw_composite(&mut self, _pixels: &crate::ColorGrid, _position: Vec2) {}
    }

    #[test]
    fn sprite_is_centred_and_only_drawn_while_alive() {
        let sprite = ImageHandle::new(crate::AssetId::Projectile, 8, 4);
        let mut emitter = TimedEmitter::new(Duration::from_millis(5)).with_sprite(sprite);
        emitter.set_location(Vec2::new(20.0, 20.0));

        let mut sink = CountingSink::default();
        emitter.draw(&mut sink);
        assert!(sink.draws.is_empty());

        emitter.start();
        emitter.draw(&mut sink);
        assert_eq!(sink.draws.len(), 1);
        assert_eq!(sink.draws[0].position, Vec2::new(16.0, 18.0));
    }
}
