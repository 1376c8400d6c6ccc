//! Declarative, time-based node mutations.
//!
//! An [`Action`] describes intent only. Running it on a node flattens the tree
//! into leaf [`RunningAction`]s that share a [`RunID`](cogkit_ids::RunID) and
//! carry their start offset inside the run; the game advances them each frame.

pub mod easing;
pub mod running;

use std::fmt;
use std::rc::Rc;

pub use easing::Easing;
pub use running::{ActionState, RunningAction, Step, StepKind};

use crate::error::{Error, Result};
use crate::game::Game;
use crate::structs::Point;

/// Callback run by a `Custom` action, with full access to the game.
pub type ActionCallback = Rc<dyn Fn(&mut Game) -> Result<()>>;

#[derive(Clone)]
pub enum ActionKind {
    Wait,
    Move { point: Point, easing: Easing },
    Scale { scale: f32, easing: Easing },
    FadeAlpha { alpha: f32, easing: Easing },
    Rotate { z_rotation: f32, easing: Easing },
    Custom(ActionCallback),
    Sequence(Vec<Action>),
    Group(Vec<Action>),
}

#[derive(Clone)]
pub struct Action {
    pub kind: ActionKind,
    pub duration_ms: f64,
    pub run_during_transition: bool,
}

impl Action {
    fn leaf(kind: ActionKind, duration_ms: f64) -> Self {
        Self {
            kind,
            duration_ms,
            run_during_transition: false,
        }
    }

    /// Does nothing for `duration_ms`.
    pub fn wait(duration_ms: f64) -> Self {
        Self::leaf(ActionKind::Wait, duration_ms)
    }

    /// Moves the node's position to `point` (parent coordinates).
    pub fn move_to(point: Point, duration_ms: f64) -> Self {
        Self::leaf(
            ActionKind::Move {
                point,
                easing: Easing::Linear,
            },
            duration_ms,
        )
    }

    pub fn scale_to(scale: f32, duration_ms: f64) -> Self {
        Self::leaf(
            ActionKind::Scale {
                scale,
                easing: Easing::Linear,
            },
            duration_ms,
        )
    }

    pub fn fade_alpha(alpha: f32, duration_ms: f64) -> Self {
        Self::leaf(
            ActionKind::FadeAlpha {
                alpha,
                easing: Easing::Linear,
            },
            duration_ms,
        )
    }

    pub fn rotate_to(z_rotation: f32, duration_ms: f64) -> Self {
        Self::leaf(
            ActionKind::Rotate {
                z_rotation,
                easing: Easing::Linear,
            },
            duration_ms,
        )
    }

    pub fn custom(callback: impl Fn(&mut Game) -> Result<()> + 'static) -> Self {
        Self::leaf(ActionKind::Custom(Rc::new(callback)), 0.0)
    }

    /// Children run one after another; duration is their sum.
    pub fn sequence(actions: Vec<Action>) -> Self {
        let duration_ms = actions.iter().map(|a| a.duration_ms).sum();
        Self::leaf(ActionKind::Sequence(actions), duration_ms)
    }

    /// Children run in parallel; duration is the longest child.
    pub fn group(actions: Vec<Action>) -> Self {
        let duration_ms = actions.iter().map(|a| a.duration_ms).fold(0.0, f64::max);
        Self::leaf(ActionKind::Group(actions), duration_ms)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        match &mut self.kind {
            ActionKind::Move { easing: e, .. }
            | ActionKind::Scale { easing: e, .. }
            | ActionKind::FadeAlpha { easing: e, .. }
            | ActionKind::Rotate { easing: e, .. } => *e = easing,
            _ => {}
        }
        self
    }

    /// Keeps advancing while the owning scene is mid-transition.
    pub fn during_transition(mut self) -> Self {
        self.run_during_transition = true;
        self
    }

    /// Rejects negative or non-finite durations anywhere in the tree.
    pub fn validate(&self) -> Result<()> {
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(Error::InvalidAction(format!(
                "duration must be a non-negative number of milliseconds, got {}",
                self.duration_ms
            )));
        }
        match &self.kind {
            ActionKind::Sequence(children) | ActionKind::Group(children) => {
                children.iter().try_for_each(Action::validate)
            }
            _ => Ok(()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ActionKind::Wait => "Wait",
            ActionKind::Move { .. } => "Move",
            ActionKind::Scale { .. } => "Scale",
            ActionKind::FadeAlpha { .. } => "FadeAlpha",
            ActionKind::Rotate { .. } => "Rotate",
            ActionKind::Custom(_) => "Custom",
            ActionKind::Sequence(_) => "Sequence",
            ActionKind::Group(_) => "Group",
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.type_name());
        s.field("duration_ms", &self.duration_ms);
        if self.run_during_transition {
            s.field("run_during_transition", &true);
        }
        if let ActionKind::Sequence(children) | ActionKind::Group(children) = &self.kind {
            s.field("children", children);
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_and_group_durations() {
        let seq = Action::sequence(vec![Action::wait(100.0), Action::wait(250.0)]);
        assert_eq!(seq.duration_ms, 350.0);
        let group = Action::group(vec![Action::wait(100.0), seq]);
        assert_eq!(group.duration_ms, 350.0);
    }

    #[test]
    fn negative_duration_is_rejected_even_when_nested() {
        let bad = Action::sequence(vec![Action::wait(10.0), Action::wait(-1.0)]);
        assert!(matches!(bad.validate(), Err(Error::InvalidAction(_))));
        assert!(Action::wait(0.0).validate().is_ok());
    }

    #[test]
    fn easing_only_applies_to_interpolating_actions() {
        let a = Action::move_to(Point::new(1.0, 1.0), 10.0).with_easing(Easing::CubicIn);
        assert!(matches!(
            a.kind,
            ActionKind::Move {
                easing: Easing::CubicIn,
                ..
            }
        ));
    }
}
