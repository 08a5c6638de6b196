//! Playback state for presenting a pattern (point by point) or a morph (frame by frame).
//!
//! The machine is pure: a tick source calls [`Playback::apply`] with
//! [`PlaybackEvent::FrameTick`] at a fixed interval, and stops ticking as soon as
//! [`Playback::is_running`] turns false.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    MorphPlaying,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackEvent {
    Play,
    Pause,
    Reset,
    FrameTick,
    MorphComplete,
}

/// Outcome of applying one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Entered(PlaybackState),
    Advanced { cursor: usize },
    Completed,
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Program {
    Pattern { total_points: usize, per_tick: usize },
    Morph { frames: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playback {
    state: PlaybackState,
    program: Program,
    cursor: usize, // points drawn, or current morph frame
}

impl Playback {
    /// Reveals `per_tick` more points of a pattern on every tick.
    pub fn for_pattern(total_points: usize, per_tick: usize) -> Self {
        Self {
            state: PlaybackState::Idle,
            program: Program::Pattern {
                total_points,
                per_tick: per_tick.max(1),
            },
            cursor: 0,
        }
    }

    /// Steps through `frames` morph frames, one per tick.
    pub fn for_morph(frames: usize) -> Self {
        Self {
            state: PlaybackState::Idle,
            program: Program::Morph { frames },
            cursor: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            PlaybackState::Playing | PlaybackState::MorphPlaying
        )
    }

    fn end(&self) -> usize {
        match self.program {
            Program::Pattern { total_points, .. } => total_points,
            Program::Morph { frames } => frames.saturating_sub(1),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.end()
    }

    /// Fraction of the program shown so far, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        match self.end() {
            0 => 1.0,
            end => self.cursor as f64 / end as f64,
        }
    }

    fn running_state(&self) -> PlaybackState {
        match self.program {
            Program::Pattern { .. } => PlaybackState::Playing,
            Program::Morph { .. } => PlaybackState::MorphPlaying,
        }
    }

    pub fn apply(&mut self, event: PlaybackEvent) -> Transition {
        use PlaybackEvent as E;
        use PlaybackState as S;

        match (self.state, event) {
            (_, E::Reset) => {
                self.cursor = 0;
                self.enter(S::Idle)
            }
            (S::Idle, E::Play) => {
                if self.is_finished() {
                    self.cursor = 0;
                }
                let running = self.running_state();
                self.enter(running)
            }
            (S::Paused, E::Play) => {
                let running = self.running_state();
                self.enter(running)
            }
            (S::Playing | S::MorphPlaying, E::Pause) => self.enter(S::Paused),
            (S::Playing, E::FrameTick) => self.tick_pattern(),
            (S::MorphPlaying, E::FrameTick) => {
                if self.is_finished() {
                    return self.apply(E::MorphComplete);
                }
                self.cursor += 1;
                Transition::Advanced {
                    cursor: self.cursor,
                }
            }
            (S::MorphPlaying | S::Paused, E::MorphComplete)
                if matches!(self.program, Program::Morph { .. }) =>
            {
                self.cursor = self.end();
                self.state = S::Idle;
                Transition::Completed
            }
            _ => Transition::Ignored,
        }
    }

    fn tick_pattern(&mut self) -> Transition {
        let Program::Pattern {
            total_points,
            per_tick,
        } = self.program
        else {
            return Transition::Ignored;
        };

        self.cursor = (self.cursor + per_tick).min(total_points);
        if self.cursor == total_points {
            self.state = PlaybackState::Idle;
            Transition::Completed
        } else {
            Transition::Advanced {
                cursor: self.cursor,
            }
        }
    }

    fn enter(&mut self, state: PlaybackState) -> Transition {
        if self.state == state {
            return Transition::Ignored;
        }
        self.state = state;
        Transition::Entered(state)
    }

    /// Cooperative driver: one `FrameTick` per item until the machine stops running.
    pub fn ticks(&mut self) -> Ticks<'_> {
        Ticks { playback: self }
    }
}

pub struct Ticks<'a> {
    playback: &'a mut Playback,
}

impl Iterator for Ticks<'_> {
    type Item = Transition;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.playback.is_running() {
            return None;
        }
        Some(self.playback.apply(PlaybackEvent::FrameTick))
    }
}
