//! Headline parallax and glitch flashes.
//!
//! The headline follows the pointer with a damped parallax offset and gets
//! brighter and punchier the further it is pushed from center. Independently
//! a [`GlitchTimer`] occasionally swaps its steady green glow for a split
//! red/green/blue shadow for a moment.

use glam::{Vec2, Vec3};
use rand::Rng;
use tracing::trace;

use crate::color;
use crate::timer::{Interval, Millis, TaskId, TimerQueue};
use crate::viewport::Viewport;

/// Offset (in pixels, summed over both axes) at which filter intensity peaks.
const FULL_INTENSITY_OFFSET: f32 = 100.0;

/// Glow radii of the three shadow layers.
pub const SHADOW_BLURS: [f32; 3] = [10.0, 20.0, 40.0];

/// Maximum glitch layer displacement per axis.
const GLITCH_SPREAD: f32 = 2.0;

/// Contrast/brightness multipliers applied to the headline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filter {
    pub contrast: f32,
    pub brightness: f32,
}

impl Filter {
    pub const IDENTITY: Filter = Filter {
        contrast: 1.0,
        brightness: 1.0,
    };

    /// Filter for a parallax intensity in 0.0-1.0.
    pub fn for_intensity(intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            contrast: 1.0 + 0.5 * i,
            brightness: 1.0 + 0.3 * i,
        }
    }

    /// Apply to an RGB color.
    pub fn apply(&self, rgb: Vec3) -> Vec3 {
        let contrasted = (rgb - 0.5) * self.contrast + 0.5;
        (contrasted * self.brightness).clamp(Vec3::ZERO, Vec3::ONE)
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One text-shadow layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowLayer {
    pub offset: Vec2,
    pub blur: f32,
    pub color: Vec3,
}

/// The headline's text shadow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextShadow {
    /// Steady centered green glow.
    Baseline,
    /// Split, jittered red/green/blue layers.
    Glitch([ShadowLayer; 3]),
}

impl TextShadow {
    /// Build a random glitch shadow.
    pub fn glitch<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let colors = [color::GLITCH_RED, color::NEON_GREEN, color::GLITCH_BLUE];
        let mut jitter = || {
            Vec2::new(
                rng.gen_range(-GLITCH_SPREAD..=GLITCH_SPREAD),
                rng.gen_range(-GLITCH_SPREAD..=GLITCH_SPREAD),
            )
        };
        TextShadow::Glitch([
            ShadowLayer {
                offset: jitter(),
                blur: SHADOW_BLURS[0],
                color: colors[0],
            },
            ShadowLayer {
                offset: jitter(),
                blur: SHADOW_BLURS[1],
                color: colors[1],
            },
            ShadowLayer {
                offset: jitter(),
                blur: SHADOW_BLURS[2],
                color: colors[2],
            },
        ])
    }

    /// The layers to render for this shadow.
    pub fn layers(&self) -> [ShadowLayer; 3] {
        match self {
            TextShadow::Baseline => SHADOW_BLURS.map(|blur| ShadowLayer {
                offset: Vec2::ZERO,
                blur,
                color: color::NEON_GREEN,
            }),
            TextShadow::Glitch(layers) => *layers,
        }
    }

    pub fn is_baseline(&self) -> bool {
        matches!(self, TextShadow::Baseline)
    }
}

/// Retained style state of the headline element.
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub text: String,
    pub translation: Vec2,
    pub filter: Filter,
    pub shadow: TextShadow,
}

impl Headline {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translation: Vec2::ZERO,
            filter: Filter::IDENTITY,
            shadow: TextShadow::Baseline,
        }
    }

    /// Shift toward the pointer and set the filter from the shift size.
    pub fn apply_parallax(&mut self, pointer: Vec2, viewport: &Viewport, factor: f32) {
        let offset = (pointer - viewport.center()) * factor;
        let intensity = (offset.x.abs() + offset.y.abs()).min(FULL_INTENSITY_OFFSET)
            / FULL_INTENSITY_OFFSET;
        self.translation = offset;
        self.filter = Filter::for_intensity(intensity);
    }

    pub fn reset_translation(&mut self) {
        self.translation = Vec2::ZERO;
    }
}

/// What a [`GlitchTimer`] poll did to the headline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlitchActivity {
    pub triggered: u32,
    pub reverted: bool,
}

/// Periodic coin flips that briefly replace the headline shadow.
///
/// A trigger while a glitch is already showing re-rolls the shadow and
/// restarts the revert countdown, so the last trigger decides when the
/// baseline glow returns.
#[derive(Debug)]
pub struct GlitchTimer {
    interval: Interval,
    chance: f64,
    duration: Millis,
    revert: TimerQueue<()>,
    pending_revert: Option<TaskId>,
}

impl GlitchTimer {
    pub fn new(period: Millis, chance: f64, duration: Millis, start: Millis) -> Self {
        Self {
            interval: Interval::new(period, start),
            chance: chance.clamp(0.0, 1.0),
            duration,
            revert: TimerQueue::new(),
            pending_revert: None,
        }
    }

    /// Whether a glitch shadow is currently scheduled to revert.
    pub fn is_active(&self) -> bool {
        self.pending_revert.is_some()
    }

    /// Earliest host time at which `poll` has work to do: the next coin
    /// flip or the pending revert, whichever comes first.
    pub fn next_deadline(&self) -> Option<Millis> {
        match (self.interval.next_due(), self.revert.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Process every interval firing and revert due by `now`, in time order.
    pub fn poll<R: Rng + ?Sized>(
        &mut self,
        now: Millis,
        rng: &mut R,
        headline: &mut Headline,
    ) -> GlitchActivity {
        let mut activity = GlitchActivity::default();

        for fired_at in self.interval.elapsed(now) {
            if self.revert_due(fired_at, headline) {
                activity.reverted = true;
            }
            // One draw per firing; the glitch shows when it lands above
            // the `1 - chance` threshold.
            let roll: f64 = rng.gen();
            if roll > 1.0 - self.chance {
                self.trigger(fired_at, rng, headline);
                activity.triggered += 1;
            }
        }

        if self.revert_due(now, headline) {
            activity.reverted = true;
        }
        activity
    }

    fn trigger<R: Rng + ?Sized>(&mut self, at: Millis, rng: &mut R, headline: &mut Headline) {
        headline.shadow = TextShadow::glitch(rng);
        if let Some(previous) = self.pending_revert.take() {
            self.revert.cancel(previous);
        }
        self.pending_revert = Some(self.revert.schedule(at + self.duration, ()));
        trace!(at, "headline glitch");
    }

    fn revert_due(&mut self, now: Millis, headline: &mut Headline) -> bool {
        let mut reverted = false;
        while let Some((id, ())) = self.revert.pop_due(now) {
            if self.pending_revert == Some(id) {
                self.pending_revert = None;
            }
            if !headline.shadow.is_baseline() {
                headline.shadow = TextShadow::Baseline;
                reverted = true;
            }
        }
        reverted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parallax_offset_and_filter() {
        let vp = Viewport::new(800.0, 600.0);
        let mut h = Headline::new("HELLO");
        h.apply_parallax(Vec2::new(600.0, 300.0), &vp, 0.1);
        assert_eq!(h.translation, Vec2::new(20.0, 0.0));
        assert!((h.filter.contrast - 1.1).abs() < 1e-6);
        assert!((h.filter.brightness - 1.06).abs() < 1e-6);

        // Far corner saturates the intensity.
        h.apply_parallax(Vec2::new(1800.0, 1600.0), &vp, 0.1);
        assert_eq!(h.filter, Filter::for_intensity(1.0));

        // Center is neutral.
        h.apply_parallax(vp.center(), &vp, 0.1);
        assert_eq!(h.translation, Vec2::ZERO);
        assert_eq!(h.filter, Filter::IDENTITY);
    }

    #[test]
    fn test_filter_is_monotonic_in_intensity() {
        let mut last = Filter::for_intensity(0.0);
        for step in 1..=10 {
            let f = Filter::for_intensity(step as f32 / 10.0);
            assert!(f.contrast > last.contrast);
            assert!(f.brightness > last.brightness);
            last = f;
        }
    }

    #[test]
    fn test_reset_translation_keeps_filter() {
        let vp = Viewport::new(800.0, 600.0);
        let mut h = Headline::new("HELLO");
        h.apply_parallax(Vec2::new(0.0, 0.0), &vp, 0.1);
        let filter = h.filter;
        h.reset_translation();
        assert_eq!(h.translation, Vec2::ZERO);
        assert_eq!(h.filter, filter);
    }

    #[test]
    fn test_glitch_layers_within_spread() {
        let mut rng = StdRng::seed_from_u64(1);
        match TextShadow::glitch(&mut rng) {
            TextShadow::Glitch(layers) => {
                for (layer, blur) in layers.iter().zip(SHADOW_BLURS) {
                    assert!(layer.offset.abs().max_element() <= GLITCH_SPREAD);
                    assert_eq!(layer.blur, blur);
                }
                assert_eq!(layers[0].color, color::GLITCH_RED);
            }
            TextShadow::Baseline => panic!("expected glitch"),
        }
    }

    #[test]
    fn test_glitch_triggers_then_reverts() {
        // StepRng with max increment yields rolls close to 1.0: always trigger.
        let mut rng = StepRng::new(u64::MAX, 0);
        let mut h = Headline::new("HELLO");
        let mut timer = GlitchTimer::new(200.0, 0.2, 100.0, 0.0);

        let activity = timer.poll(200.0, &mut rng, &mut h);
        assert_eq!(activity.triggered, 1);
        assert!(!h.shadow.is_baseline());
        assert!(timer.is_active());

        let activity = timer.poll(300.0, &mut rng, &mut h);
        assert!(activity.reverted);
        assert!(h.shadow.is_baseline());
        assert!(!timer.is_active());
    }

    #[test]
    fn test_never_triggers_on_low_rolls() {
        let mut rng = StepRng::new(0, 0);
        let mut h = Headline::new("HELLO");
        let mut timer = GlitchTimer::new(200.0, 0.2, 100.0, 0.0);
        let activity = timer.poll(10_000.0, &mut rng, &mut h);
        assert_eq!(activity.triggered, 0);
        assert!(h.shadow.is_baseline());
    }

    #[test]
    fn test_quiet_period_always_ends_on_baseline() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut h = Headline::new("HELLO");
        let mut timer = GlitchTimer::new(200.0, 1.0, 100.0, 0.0);

        // Poll once per 60 fps frame for a while.
        let mut now = 0.0;
        while now < 5_000.0 {
            now += 16.0;
            timer.poll(now, &mut rng, &mut h);
        }
        // Stop the interval from firing again by turning the chance off,
        // then let the pending revert elapse.
        timer.chance = 0.0;
        timer.poll(now + 250.0, &mut rng, &mut h);
        assert!(h.shadow.is_baseline());
        assert!(!timer.is_active());
    }

    #[test]
    fn test_stalled_host_catches_up_in_order() {
        let mut rng = StepRng::new(u64::MAX, 0);
        let mut h = Headline::new("HELLO");
        let mut timer = GlitchTimer::new(200.0, 1.0, 100.0, 0.0);
        // Five firings at 200..=1000, all glitching. Earlier reverts land
        // between firings; the last glitch reverts at 1100.
        let activity = timer.poll(1_050.0, &mut rng, &mut h);
        assert_eq!(activity.triggered, 5);
        assert!(!h.shadow.is_baseline());
        timer.poll(1_100.0, &mut rng, &mut h);
        assert!(h.shadow.is_baseline());
    }

    #[test]
    fn test_retrigger_restarts_revert() {
        let mut rng = StepRng::new(u64::MAX, 0);
        let mut h = Headline::new("HELLO");
        // Glitches outlast the interval, so a second trigger lands while
        // the first is still showing.
        let mut timer = GlitchTimer::new(200.0, 1.0, 300.0, 0.0);

        assert_eq!(timer.poll(200.0, &mut rng, &mut h).triggered, 1);
        assert_eq!(timer.poll(400.0, &mut rng, &mut h).triggered, 1);
        assert!(!h.shadow.is_baseline());

        timer.chance = 0.0;

        // The first trigger's revert (500) was replaced by the second's (700).
        let activity = timer.poll(550.0, &mut rng, &mut h);
        assert!(!activity.reverted);
        assert!(!h.shadow.is_baseline());
        assert!(timer.is_active());
        assert_eq!(timer.next_deadline(), Some(600.0));

        timer.poll(650.0, &mut rng, &mut h);
        assert!(!h.shadow.is_baseline());
        assert_eq!(timer.next_deadline(), Some(700.0));

        let activity = timer.poll(700.0, &mut rng, &mut h);
        assert!(activity.reverted);
        assert!(h.shadow.is_baseline());
        assert!(!timer.is_active());
    }

    #[test]
    fn test_next_deadline_without_interval() {
        let timer = GlitchTimer::new(0.0, 1.0, 100.0, 0.0);
        assert_eq!(timer.next_deadline(), None);
        let timer = GlitchTimer::new(200.0, 1.0, 100.0, 50.0);
        assert_eq!(timer.next_deadline(), Some(250.0));
    }
}
