//! Trackball behaviour: CPI stepping and the automatic pointer layer.

use crate::keystate::{Duration, Instant};

/// The framework-owned sensor setters this crate drives.
pub trait Trackball {
    type Error;

    fn cpi(&self) -> u16;
    fn set_cpi(&mut self, cpi: u16) -> Result<(), Self::Error>;
    /// Low-CPI precision mode
    fn set_sniping(&mut self, enabled: bool) -> Result<(), Self::Error>;
    /// Ball-is-wheel mode
    fn set_drag_scroll(&mut self, enabled: bool) -> Result<(), Self::Error>;
}

/// Relative motion out of the sensor, in counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionData {
    pub dx: i16,
    pub dy: i16,
}

/// How much to change the sensor CPI by each step, and the sensor limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CpiControl {
    pub step: u16,
    pub min: u16,
    pub max: u16,
}

impl Default for CpiControl {
    fn default() -> Self {
        Self {
            step: 100,
            min: 100,
            max: 12_000,
        }
    }
}

impl CpiControl {
    /// One step up, clamped to `max`; the sensor is only written when the
    /// value actually changes.
    pub fn increase<T: Trackball>(&self, ball: &mut T) -> Result<(), T::Error> {
        let current = ball.cpi();
        let next = current.saturating_add(self.step).min(self.max);
        if next != current {
            #[cfg(feature = "defmt")]
            defmt::debug!("cpi {} -> {}", current, next);
            ball.set_cpi(next)?;
        }
        Ok(())
    }

    /// One step down, clamped to `min`.
    pub fn decrease<T: Trackball>(&self, ball: &mut T) -> Result<(), T::Error> {
        let current = ball.cpi();
        let next = if current > self.min + self.step {
            current - self.step
        } else {
            self.min
        };
        if next != current {
            #[cfg(feature = "defmt")]
            defmt::debug!("cpi {} -> {}", current, next);
            ball.set_cpi(next)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AutoPointerConfig {
    pub enabled: bool,
    /// Counts either axis must exceed in one report to engage
    pub threshold: u16,
    /// How long the layer stays on after the last qualifying motion
    pub timeout: Duration,
}

impl Default for AutoPointerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: 8,
            timeout: 1000,
        }
    }
}

/// Engages the pointer layer from trackball motion alone and times it back
/// out once the ball goes quiet.
#[derive(Debug)]
pub struct AutoPointerLayer {
    config: AutoPointerConfig,
    engaged_at: Option<Instant>,
}

impl AutoPointerLayer {
    pub fn new(config: AutoPointerConfig) -> Self {
        Self {
            config,
            engaged_at: None,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged_at.is_some()
    }

    /// Feed one motion report. Returns true when this report newly engages
    /// the layer; further qualifying motion only rewinds the timeout.
    pub fn on_motion(&mut self, motion: MotionData, now: Instant) -> bool {
        if !self.config.enabled {
            return false;
        }
        if motion.dx.unsigned_abs() <= self.config.threshold
            && motion.dy.unsigned_abs() <= self.config.threshold
        {
            return false;
        }
        let newly_engaged = self.engaged_at.is_none();
        self.engaged_at = Some(now);
        newly_engaged
    }

    /// True once the timeout has elapsed since the last qualifying motion;
    /// disarms, so it reports each expiry once.
    pub fn expired(&mut self, now: Instant) -> bool {
        match self.engaged_at {
            Some(engaged_at) if now - engaged_at >= self.config.timeout => {
                self.engaged_at = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for AutoPointerLayer {
    fn default() -> Self {
        Self::new(AutoPointerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;

    struct FakeBall {
        cpi: u16,
        writes: Vec<u16>,
    }

    impl FakeBall {
        fn at(cpi: u16) -> Self {
            Self {
                cpi,
                writes: Vec::new(),
            }
        }
    }

    impl Trackball for FakeBall {
        type Error = ();

        fn cpi(&self) -> u16 {
            self.cpi
        }

        fn set_cpi(&mut self, cpi: u16) -> Result<(), ()> {
            self.cpi = cpi;
            self.writes.push(cpi);
            Ok(())
        }

        fn set_sniping(&mut self, _enabled: bool) -> Result<(), ()> {
            Ok(())
        }

        fn set_drag_scroll(&mut self, _enabled: bool) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn increase_steps_by_step() {
        let control = CpiControl::default();
        let mut ball = FakeBall::at(800);
        control.increase(&mut ball).unwrap();
        assert_eq!(ball.writes, [900]);
    }

    #[test]
    fn increase_clamps_to_max() {
        let control = CpiControl::default();
        let mut ball = FakeBall::at(11_950);
        control.increase(&mut ball).unwrap();
        assert_eq!(ball.writes, [12_000]);

        // Already at the limit: no write at all.
        control.increase(&mut ball).unwrap();
        assert_eq!(ball.writes, [12_000]);
    }

    #[test]
    fn decrease_clamps_to_min() {
        let control = CpiControl::default();
        let mut ball = FakeBall::at(150);
        control.decrease(&mut ball).unwrap();
        assert_eq!(ball.writes, [100]);

        control.decrease(&mut ball).unwrap();
        assert_eq!(ball.writes, [100]);
    }

    #[test]
    fn decrease_steps_above_the_floor() {
        let control = CpiControl::default();
        let mut ball = FakeBall::at(800);
        control.decrease(&mut ball).unwrap();
        assert_eq!(ball.writes, [700]);
    }

    fn enabled() -> AutoPointerLayer {
        AutoPointerLayer::new(AutoPointerConfig {
            enabled: true,
            ..AutoPointerConfig::default()
        })
    }

    #[test]
    fn motion_engages_once() {
        let mut auto = enabled();
        assert!(auto.on_motion(MotionData { dx: 20, dy: 0 }, 0));
        assert!(auto.is_engaged());
        // Continued motion rewinds the timer without re-engaging.
        assert!(!auto.on_motion(MotionData { dx: 0, dy: -30 }, 500));
        assert!(!auto.expired(1400));
        assert!(auto.expired(1500));
        assert!(!auto.is_engaged());
        assert!(!auto.expired(1501));
    }

    #[test]
    fn small_motion_does_not_engage() {
        let mut auto = enabled();
        assert!(!auto.on_motion(MotionData { dx: 8, dy: -8 }, 0));
        assert!(!auto.is_engaged());
    }

    #[test]
    fn disabled_never_engages() {
        let mut auto = AutoPointerLayer::default();
        assert!(!auto.on_motion(MotionData { dx: 100, dy: 100 }, 0));
        assert!(!auto.is_engaged());
    }
}
