//! Stage tables and the stage sequencer
//!
//! Three stages run strictly in order: geometric curves, physical bouncing,
//! and the final polygon chase. Durations and parameters are hand-tuned to
//! the soundtrack.

use glam::Vec2;

use super::chase::ChaseScript;
use super::phase::{self, Anchor, Motion, Origin, Path, Phase, Setup, Step, Sweep};
use super::state::{GameEvent, GameState, Polygon};
use crate::audio::MusicTrack;
use crate::consts::*;

const TOP: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, 40.0);

const fn tune(speed: f32, scale: f32) -> Motion {
    Motion::Tune { speed, scale }
}

const fn walls(h_reflect: bool, v_reflect: bool) -> Motion {
    Motion::Walls {
        h_reflect,
        v_reflect,
    }
}

const fn curve(sweep: Sweep, anchor: Anchor, path: Path) -> Motion {
    Motion::Curve {
        sweep,
        anchor,
        path,
    }
}

const fn linear(rate: f32) -> Sweep {
    Sweep::Linear { rate, offset: 0.0 }
}

const DRIFT_WIDE: Anchor = Anchor::Drift {
    radius: SCREEN_WIDTH / 3.0,
};
const DRIFT_NARROW: Anchor = Anchor::Drift {
    radius: SCREEN_WIDTH / 4.0,
};
const TRIPLE_ROSE: Path = Path::Rose {
    radius: SCREEN_WIDTH / 6.0,
    harmonic: 4.0,
};
const fn spiral(half_turn: bool) -> Path {
    Path::Spiral {
        pitch: Some(-1.8),
        half_turn,
    }
}

/// Stage 1: the ball traces curves; positions are scripted
pub const GEOMETRIC: &[Phase] = &[
    Phase::new(1, Motion::Setup(Setup::Scripted)),
    // move to center
    Phase::new(
        240,
        Motion::Ease {
            from: Origin::Fixed(Vec2::new(SCREEN_WIDTH / 2.0, 90.0)),
            to: Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
        },
    ),
    // spiral out
    Phase::new(
        712,
        curve(
            linear(22.0),
            Anchor::Screen,
            Path::Spiral {
                pitch: None,
                half_turn: false,
            },
        ),
    ),
    // 1-fold circle
    Phase::new(
        348,
        curve(
            Sweep::Ramp {
                start: 15.0,
                delta: 25.0,
            },
            Anchor::Screen,
            Path::Ellipse {
                radius: SCREEN_WIDTH / 2.0,
            },
        ),
    ),
    // 2-fold circle
    Phase::new(
        458,
        curve(
            linear(40.0),
            DRIFT_WIDE,
            Path::Ellipse {
                radius: SCREEN_WIDTH / 3.0,
            },
        ),
    ),
    // 3-fold circle
    Phase::new(433, curve(linear(40.0), DRIFT_WIDE, TRIPLE_ROSE)),
    // 3-fold circle, slowing down
    Phase::new(
        500,
        curve(
            Sweep::Ramp {
                start: 30.0,
                delta: -20.0,
            },
            DRIFT_WIDE,
            TRIPLE_ROSE,
        ),
    ),
    Phase::new(
        40,
        Motion::Approach {
            to: Vec2::new(519.0, 459.0),
            divisor: 60.0,
        },
    ),
    // circle + spiral
    Phase::new(
        1080,
        curve(
            Sweep::Linear {
                rate: 40.0,
                offset: 4.0,
            },
            DRIFT_NARROW,
            spiral(false),
        ),
    ),
    Phase::new(540, curve(Sweep::Unwind { rate: -40.0 }, DRIFT_NARROW, spiral(true))),
    // circle + spiral, counter-clockwise
    Phase::new(1080, curve(linear(-40.0), DRIFT_NARROW, spiral(false))),
    Phase::new(540, curve(Sweep::Unwind { rate: 40.0 }, DRIFT_NARROW, spiral(true))),
    Phase::new(
        120,
        Motion::Ease {
            from: Origin::PhaseStart,
            to: TOP,
        },
    ),
];

/// Stage 2: the ball bounces freely while speed, size and walls change
pub const PHYSICAL: &[Phase] = &[
    Phase::new(1, Motion::Setup(Setup::Bouncing)),
    Phase::new(360, Motion::Idle),
    Phase::new(180, tune(MUL_UP_1, 1.0)),
    Phase::new(270, Motion::Idle),
    Phase::new(180, tune(MUL_UP_1, 1.0)),
    Phase::new(360, Motion::Idle),
    Phase::new(360, tune(MUL_DOWN_1, MUL_UP_2L)),
    Phase::new(270, Motion::Idle),
    Phase::new(180, tune(1.0, MUL_DOWN_2L)),
    Phase::new(180, Motion::Idle),
    Phase::new(180, tune(1.0, MUL_DOWN_2L)),
    Phase::new(90, Motion::Idle),
    // open walls: the ball wraps
    Phase::new(360, walls(false, false)),
    Phase::new(180, tune(MUL_UP_2, 1.0)),
    Phase::new(180, Motion::Idle),
    Phase::new(180, tune(MUL_DOWN_2, MUL_UP_2L)),
    Phase::new(180, Motion::Idle),
    Phase::new(180, tune(MUL_UP_2, 1.0)),
    Phase::new(180, Motion::Idle),
    Phase::new(180, tune(MUL_DOWN_2, MUL_DOWN_2L)),
    // floor and ceiling only
    Phase::new(90, walls(false, true)),
    Phase::new(90, tune(MUL_UP_2, 1.0)),
    Phase::new(180, Motion::Idle),
    Phase::new(90, tune(MUL_UP_2, 1.0)),
    Phase::new(270, Motion::Idle),
    // alternate open axes
    Phase::new(1, walls(true, false)),
    Phase::new(359, Motion::Idle),
    Phase::new(180, walls(false, true)),
    Phase::new(180, walls(true, false)),
    Phase::new(180, walls(true, true)),
    Phase::new(180, tune(MUL_DOWN_2, 1.0)),
    Phase::new(1, Motion::Setup(Setup::Glide)),
    Phase::new(
        120,
        Motion::Ease {
            from: Origin::PhaseStart,
            to: TOP,
        },
    ),
];

/// Stage 3: the ball chases the corners of a rotating polygon
pub const FINAL: &[Phase] = &[
    Phase::new(1, Motion::Setup(Setup::Chase(Polygon::Line))),
    Phase::new(1440, Motion::Chase(ChaseScript::LineSweep)),
    Phase::new(1, Motion::Setup(Setup::RevealMarkers(Polygon::Pentagram))),
    Phase::new(540, Motion::Chase(ChaseScript::PentagramReveal)),
    Phase::new(1440, Motion::Chase(ChaseScript::PentagramSpin)),
    // big ball star
    Phase::new(1440, Motion::Chase(ChaseScript::StarSwell)),
];

/// All stages in play order
pub const STAGES: &[&[Phase]] = &[GEOMETRIC, PHYSICAL, FINAL];

/// Index of the circular-arena stage
pub const FINAL_STAGE: usize = 2;

/// Music that starts when a stage is entered mid-run
pub fn stage_music(stage: usize) -> Option<MusicTrack> {
    match stage {
        1 => Some(MusicTrack::Level2),
        2 => Some(MusicTrack::Level3),
        _ => None,
    }
}

/// What the sequencer did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The phase engine ran
    Phase(Step),
    /// A new stage was entered; nothing else happened this tick
    StageEntered(usize),
    /// The last stage ran out
    Finished,
}

/// Run one tick of the ball script
pub fn advance(state: &mut GameState, stages: &[&[Phase]]) -> Progress {
    let Some(phases) = stages.get(state.cursor.stage) else {
        return Progress::Finished;
    };
    if let Some(phase) = phases.get(state.cursor.phase) {
        return Progress::Phase(phase::step(state, phase));
    }

    state.cursor.stage += 1;
    state.cursor.phase = 0;
    state.cursor.frames = 0;
    // Finishes on the tick the last stage runs out, without an extra idle
    // tick past the end of the table
    if state.cursor.stage >= stages.len() {
        log::info!("Ball script finished");
        return Progress::Finished;
    }
    log::info!("Ball stage {} begins", state.cursor.stage);
    if let Some(track) = stage_music(state.cursor.stage) {
        state.emit(GameEvent::Music(track));
    }
    Progress::StageEntered(state.cursor.stage)
}
