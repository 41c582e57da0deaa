//! Coin animation state.
//!
//! A coin is drawn edge-on while it flips: its apparent height follows
//! `max(min, r·|cos(4πt)|)` for `t` in `[0, 1)`, and it rises by
//! `sin(πt)·bounce`. Once settled it shows the face letter.

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use pileface_flip::Outcome;
use rand::Rng;

/// Frames per second of the animation.
pub const FPS: u32 = 30;

/// Length range of a flip, in frames.
pub const FLIP_FRAMES: RangeInclusive<u32> = 24..=45;

/// Length of one bounce while waiting for a result, in frames.
pub const WAIT_FRAMES: u32 = 60;

/// Smallest apparent height, as a fraction of the radius.
const MIN_HEIGHT: f64 = 0.2;

/// Peak lift, as a fraction of the radius.
const BOUNCE: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Face up, before the flip.
    Resting,
    /// Bouncing in a loop until the result is known.
    Waiting { frame: u32 },
    /// Spinning through the air.
    Flipping { frame: u32, duration: u32 },
    /// Landed on its result.
    Settled,
}

/// What to draw for a coin on the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinPose {
    /// Apparent height in rows, at most `2·radius`.
    pub height: f64,
    /// Lift above the resting line, in rows.
    pub lift: f64,
    /// Letter shown on the face; `None` while edge-on.
    pub face: Option<char>,
}

/// One animated coin.
#[derive(Debug, Clone)]
pub struct CoinSprite {
    radius: f64,
    phase: Phase,
    face: Outcome,
}

impl CoinSprite {
    /// A resting coin showing heads.
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            phase: Phase::Resting,
            face: Outcome::Heads,
        }
    }

    /// Bounce in a loop until [`CoinSprite::flip_to`] is called.
    pub fn wait(&mut self) {
        if !matches!(self.phase, Phase::Waiting { .. }) {
            self.phase = Phase::Waiting { frame: 0 };
        }
    }

    /// Start a flip of `duration` frames that lands on `outcome`.
    pub fn flip_to(&mut self, outcome: Outcome, duration: u32) {
        self.face = outcome;
        self.phase = Phase::Flipping {
            frame: 0,
            duration: duration.max(1),
        };
    }

    /// Start a flip of random length that lands on `outcome`.
    pub fn flip_randomly<R: Rng + ?Sized>(&mut self, outcome: Outcome, rng: &mut R) {
        let duration = rng.gen_range(FLIP_FRAMES);
        self.flip_to(outcome, duration);
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        self.phase = match self.phase {
            Phase::Waiting { frame } => Phase::Waiting {
                frame: (frame + 1) % WAIT_FRAMES,
            },
            Phase::Flipping { frame, duration } if frame + 1 >= duration => Phase::Settled,
            Phase::Flipping { frame, duration } => Phase::Flipping {
                frame: frame + 1,
                duration,
            },
            phase => phase,
        };
    }

    /// Skip to the landed state.
    pub fn settle(&mut self) {
        if matches!(self.phase, Phase::Flipping { .. }) {
            self.phase = Phase::Settled;
        }
    }

    /// Whether the coin is in the air.
    pub fn is_flipping(&self) -> bool {
        matches!(self.phase, Phase::Flipping { .. })
    }

    /// Whether the coin is bouncing while a result is pending.
    pub fn is_waiting(&self) -> bool {
        matches!(self.phase, Phase::Waiting { .. })
    }

    /// Whether the coin has landed.
    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Settled
    }

    /// Face the coin shows, or will land on.
    pub fn face(&self) -> Outcome {
        self.face
    }

    /// Radius in rows.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Pose for the current frame.
    pub fn pose(&self) -> CoinPose {
        let airborne = match self.phase {
            Phase::Waiting { frame } => Some((frame, WAIT_FRAMES)),
            Phase::Flipping { frame, duration } => Some((frame, duration)),
            Phase::Resting | Phase::Settled => None,
        };
        match airborne {
            Some((frame, duration)) => {
                let t = f64::from(frame) / f64::from(duration);
                let height = (self.radius * (4.0 * PI * t).cos().abs())
                    .max(self.radius * MIN_HEIGHT);
                CoinPose {
                    height,
                    lift: (PI * t).sin() * self.radius * BOUNCE,
                    face: None,
                }
            }
            None => CoinPose {
                height: 2.0 * self.radius,
                lift: 0.0,
                face: Some(self.face.letter()),
            },
        }
    }
}
