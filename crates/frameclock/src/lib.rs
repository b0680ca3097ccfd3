//! Frame scheduling for the spindle render loop.
//!
//! Instead of registering callbacks with a display loop, the renderer
//! *pulls* timestamps from a [`FrameClock`]. The per-frame contract stays
//! the same — one tick per refresh, non-decreasing milliseconds — while a
//! test harness can drive the loop with synthetic timestamps and no display
//! surface at all.

use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    #[error("timestamp {current} ms precedes its predecessor {previous} ms")]
    NonMonotonic { previous: f64, current: f64 },
}

/// Source of per-frame timestamps, in milliseconds.
///
/// Implementations must hand out non-decreasing timestamps, one per frame.
/// Returning `None` signals host teardown; the render loop exits and never
/// asks again.
pub trait FrameClock {
    /// Waits for the next display refresh and returns its timestamp.
    fn next_frame(&mut self) -> Option<f64>;
}

/// Wall-clock frame source.
///
/// Timestamps count milliseconds since the clock was created. An optional
/// target fps inserts a sleep so frames are spaced at least one frame budget
/// apart; an optional frame limit ends the stream, which is how the demo
/// binary gives an otherwise endless loop a natural exit.
pub struct SystemFrameClock {
    origin: Instant,
    last_tick: Option<Instant>,
    frame_budget: Option<Duration>,
    frames_left: Option<u64>,
}

impl SystemFrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the clock at `fps` frames per second. Zero or negative values
    /// mean uncapped.
    pub fn with_target_fps(mut self, fps: f32) -> Self {
        self.frame_budget = if fps > 0.0 {
            Some(Duration::from_secs_f64(1.0 / f64::from(fps)))
        } else {
            None
        };
        self
    }

    /// Ends the stream after `frames` ticks.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frames_left = Some(frames);
        self
    }
}

impl Default for SystemFrameClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            last_tick: None,
            frame_budget: None,
            frames_left: None,
        }
    }
}

impl FrameClock for SystemFrameClock {
    fn next_frame(&mut self) -> Option<f64> {
        if let Some(left) = self.frames_left.as_mut() {
            if *left == 0 {
                return None;
            }
            *left -= 1;
        }

        if let (Some(budget), Some(last)) = (self.frame_budget, self.last_tick) {
            let due = last + budget;
            let now = Instant::now();
            if due > now {
                tracing::trace!(sleep_ms = (due - now).as_millis() as u64, "pacing frame");
                std::thread::sleep(due - now);
            }
        }

        let now = Instant::now();
        self.last_tick = Some(now);
        Some(now.duration_since(self.origin).as_secs_f64() * 1000.0)
    }
}

/// Frame source that replays a prepared timestamp sequence, then ends.
///
/// Rejects scripts that run backwards so tests cannot accidentally violate
/// the monotonicity the real display loop guarantees.
#[derive(Debug)]
pub struct ScriptedFrameClock {
    timestamps: std::vec::IntoIter<f64>,
}

impl ScriptedFrameClock {
    pub fn new(timestamps: Vec<f64>) -> Result<Self, ClockError> {
        for pair in timestamps.windows(2) {
            if pair[1] < pair[0] {
                return Err(ClockError::NonMonotonic {
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        Ok(Self {
            timestamps: timestamps.into_iter(),
        })
    }
}

impl FrameClock for ScriptedFrameClock {
    fn next_frame(&mut self) -> Option<f64> {
        self.timestamps.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_clock_replays_in_order_then_ends() {
        let mut clock = ScriptedFrameClock::new(vec![0.0, 16.6, 33.3]).unwrap();
        assert_eq!(clock.next_frame(), Some(0.0));
        assert_eq!(clock.next_frame(), Some(16.6));
        assert_eq!(clock.next_frame(), Some(33.3));
        assert_eq!(clock.next_frame(), None);
    }

    #[test]
    fn scripted_clock_rejects_backwards_script() {
        let err = ScriptedFrameClock::new(vec![100.0, 50.0]).unwrap_err();
        assert!(matches!(
            err,
            ClockError::NonMonotonic {
                previous,
                current,
            } if previous == 100.0 && current == 50.0
        ));
    }

    #[test]
    fn scripted_clock_allows_repeated_timestamps() {
        let mut clock = ScriptedFrameClock::new(vec![10.0, 10.0]).unwrap();
        assert_eq!(clock.next_frame(), Some(10.0));
        assert_eq!(clock.next_frame(), Some(10.0));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemFrameClock::new();
        let first = clock.next_frame().unwrap();
        let second = clock.next_frame().unwrap();
        assert!(second >= first);
    }

    #[test]
    fn system_clock_honors_frame_limit() {
        let mut clock = SystemFrameClock::new().with_frame_limit(2);
        assert!(clock.next_frame().is_some());
        assert!(clock.next_frame().is_some());
        assert!(clock.next_frame().is_none());
    }

    #[test]
    fn system_clock_paces_to_target_fps() {
        let mut clock = SystemFrameClock::new().with_target_fps(100.0);
        let first = clock.next_frame().unwrap();
        let second = clock.next_frame().unwrap();
        assert!(second - first >= 9.0, "frames {first} and {second} too close");
    }

    #[test]
    fn zero_fps_means_uncapped() {
        let mut clock = SystemFrameClock::new().with_target_fps(0.0);
        assert!(clock.next_frame().is_some());
        assert!(clock.next_frame().is_some());
    }
}
