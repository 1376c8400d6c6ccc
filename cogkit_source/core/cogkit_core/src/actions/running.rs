use cogkit_ids::RunID;

use super::{Action, ActionCallback, ActionKind, Easing};
use crate::nodes::Transform;
use crate::structs::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionState {
    NotStarted,
    Running,
    Completed,
}

/// Leaf operation of a running action.
#[derive(Clone)]
pub enum StepKind {
    Wait,
    Move { to: Point, from: Option<Point> },
    Scale { to: f32, from: Option<f32> },
    FadeAlpha { to: f32, from: Option<f32> },
    Rotate { to: f32, from: Option<f32> },
    Custom(ActionCallback),
}

#[derive(Clone)]
pub struct Step {
    pub kind: StepKind,
    pub duration_ms: f64,
    pub easing: Easing,
}

/// One leaf of a flattened action tree, attached to a single node.
#[derive(Clone)]
pub struct RunningAction {
    pub run: RunID,
    pub key: Option<String>,
    pub step: Step,
    /// Start offset from the beginning of the run.
    pub offset_ms: f64,
    /// Position of this leaf in the run's execution order.
    pub order: usize,
    pub run_during_transition: bool,
    pub state: ActionState,
    /// Absolute start time, assigned the first time the leaf is evaluated.
    pub run_start_time: Option<f64>,
}

impl std::fmt::Debug for RunningAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.step.kind {
            StepKind::Wait => "Wait",
            StepKind::Move { .. } => "Move",
            StepKind::Scale { .. } => "Scale",
            StepKind::FadeAlpha { .. } => "FadeAlpha",
            StepKind::Rotate { .. } => "Rotate",
            StepKind::Custom(_) => "Custom",
        };
        f.debug_struct("RunningAction")
            .field("run", &self.run)
            .field("key", &self.key)
            .field("kind", &kind)
            .field("offset_ms", &self.offset_ms)
            .field("order", &self.order)
            .field("state", &self.state)
            .finish()
    }
}

impl RunningAction {
    /// Flattens `action` into leaves sharing one run id.
    ///
    /// Sequence children are offset by the summed durations of the children
    /// before them; group children share their parent's offset.
    pub fn flatten(action: &Action, key: Option<&str>) -> Vec<RunningAction> {
        let run = RunID::next();
        let mut out = Vec::new();
        Self::flatten_into(action, run, key, 0.0, false, &mut out);
        out
    }

    fn flatten_into(
        action: &Action,
        run: RunID,
        key: Option<&str>,
        offset_ms: f64,
        inherited_transition: bool,
        out: &mut Vec<RunningAction>,
    ) {
        let during_transition = inherited_transition || action.run_during_transition;
        let step = |kind: StepKind, easing: Easing| Step {
            kind,
            duration_ms: action.duration_ms,
            easing,
        };
        let leaf = match &action.kind {
            ActionKind::Sequence(children) => {
                let mut offset = offset_ms;
                for child in children {
                    Self::flatten_into(child, run, key, offset, during_transition, out);
                    offset += child.duration_ms;
                }
                return;
            }
            ActionKind::Group(children) => {
                for child in children {
                    Self::flatten_into(child, run, key, offset_ms, during_transition, out);
                }
                return;
            }
            ActionKind::Wait => step(StepKind::Wait, Easing::Linear),
            ActionKind::Move { point, easing } => step(
                StepKind::Move {
                    to: *point,
                    from: None,
                },
                *easing,
            ),
            ActionKind::Scale { scale, easing } => step(
                StepKind::Scale {
                    to: *scale,
                    from: None,
                },
                *easing,
            ),
            ActionKind::FadeAlpha { alpha, easing } => step(
                StepKind::FadeAlpha {
                    to: *alpha,
                    from: None,
                },
                *easing,
            ),
            ActionKind::Rotate { z_rotation, easing } => step(
                StepKind::Rotate {
                    to: *z_rotation,
                    from: None,
                },
                *easing,
            ),
            ActionKind::Custom(cb) => step(StepKind::Custom(cb.clone()), Easing::Linear),
        };
        let order = out.iter().filter(|a| a.run == run).count();
        out.push(RunningAction {
            run,
            key: key.map(str::to_string),
            step: leaf,
            offset_ms,
            order,
            run_during_transition: during_transition,
            state: ActionState::NotStarted,
            run_start_time: None,
        });
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.state == ActionState::Completed
    }

    /// Advances this leaf to time `now`, mutating `transform`.
    ///
    /// Returns the callback of a `Custom` leaf on the frame its turn arrives;
    /// the caller invokes it once the node borrow is released.
    ///
    /// Elapsed time is read from the game clock. A leaf that was skipped while
    /// its scene transitioned is not shifted, so it catches up on the first
    /// frame after the transition.
    pub fn advance(&mut self, now: f64, transform: &mut Transform) -> Option<ActionCallback> {
        if self.is_completed() {
            return None;
        }
        let start = *self.run_start_time.get_or_insert(now + self.offset_ms);
        if now < start {
            return None;
        }
        self.state = ActionState::Running;

        let duration = self.step.duration_ms;
        let elapsed = now - start;
        let progress = if duration <= 0.0 {
            1.0
        } else {
            (elapsed / duration).min(1.0) as f32
        };
        let eased = self.step.easing.apply(progress);
        let done = elapsed >= duration;

        let mut callback = None;
        match &mut self.step.kind {
            StepKind::Wait => {}
            StepKind::Move { to, from } => {
                let from = *from.get_or_insert(transform.position);
                transform.position = if done { *to } else { Point::lerp(from, *to, eased) };
            }
            StepKind::Scale { to, from } => {
                let from = *from.get_or_insert(transform.scale);
                transform.scale = if done { *to } else { from + (*to - from) * eased };
            }
            StepKind::FadeAlpha { to, from } => {
                let from = *from.get_or_insert(transform.alpha);
                transform.alpha = if done { *to } else { from + (*to - from) * eased };
            }
            StepKind::Rotate { to, from } => {
                let from = *from.get_or_insert(transform.z_rotation);
                transform.z_rotation = if done { *to } else { from + (*to - from) * eased };
            }
            StepKind::Custom(cb) => {
                callback = Some(cb.clone());
            }
        }

        if done || callback.is_some() {
            self.state = ActionState::Completed;
        }
        callback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn transform() -> Transform {
        Transform::default()
    }

    #[test]
    fn wait_completes_exactly_once_and_no_earlier() {
        let mut leaves = RunningAction::flatten(&Action::wait(500.0), None);
        let wait = &mut leaves[0];
        let mut t = transform();
        let mut completions = 0;
        let mut was_completed = false;
        for now in [1000.0, 1200.0, 1499.0, 1500.0, 1600.0, 2000.0] {
            wait.advance(now, &mut t);
            if wait.is_completed() && !was_completed {
                completions += 1;
                assert!(now >= 1500.0, "completed early at {now}");
            }
            was_completed = wait.is_completed();
        }
        assert_eq!(completions, 1);
        assert_eq!(wait.run_start_time, Some(1000.0));
    }

    #[test]
    fn start_time_is_assigned_on_first_evaluation() {
        let mut leaves = RunningAction::flatten(&Action::wait(10.0), None);
        assert_eq!(leaves[0].run_start_time, None);
        leaves[0].advance(42.0, &mut transform());
        assert_eq!(leaves[0].run_start_time, Some(42.0));
    }

    #[test]
    fn sequence_offsets_and_order() {
        let action = Action::sequence(vec![
            Action::wait(100.0),
            Action::group(vec![Action::scale_to(2.0, 50.0), Action::wait(80.0)]),
            Action::custom(|_| Ok(())),
        ]);
        let leaves = RunningAction::flatten(&action, Some("k"));
        let offsets: Vec<f64> = leaves.iter().map(|l| l.offset_ms).collect();
        assert_eq!(offsets, vec![0.0, 100.0, 100.0, 180.0]);
        let orders: Vec<usize> = leaves.iter().map(|l| l.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert!(leaves.iter().all(|l| l.run == leaves[0].run));
        assert!(leaves.iter().all(|l| l.key.as_deref() == Some("k")));
    }

    #[test]
    fn move_interpolates_from_position_at_start() {
        let mut leaves = RunningAction::flatten(&Action::move_to(Point::new(100.0, 0.0), 100.0), None);
        let mut t = transform();
        t.position = Point::new(0.0, 50.0);
        leaves[0].advance(0.0, &mut t);
        assert_eq!(t.position, Point::new(0.0, 50.0));
        leaves[0].advance(50.0, &mut t);
        assert_eq!(t.position, Point::new(50.0, 25.0));
        leaves[0].advance(150.0, &mut t);
        assert_eq!(t.position, Point::new(100.0, 0.0));
        assert!(leaves[0].is_completed());
    }

    #[test]
    fn skipped_frames_are_caught_up() {
        let mut leaves = RunningAction::flatten(&Action::move_to(Point::new(100.0, 0.0), 100.0), None);
        let mut t = transform();
        leaves[0].advance(0.0, &mut t);
        leaves[0].advance(25.0, &mut t);
        assert_eq!(t.position, Point::new(25.0, 0.0));
        // nothing evaluated between 25 and 75
        leaves[0].advance(75.0, &mut t);
        assert_eq!(t.position, Point::new(75.0, 0.0));
    }

    #[test]
    fn custom_returns_callback_once() {
        let hits = Rc::new(Cell::new(0));
        let mut leaves = RunningAction::flatten(&Action::custom(|_| Ok(())), None);
        let mut t = transform();
        if leaves[0].advance(5.0, &mut t).is_some() {
            hits.set(hits.get() + 1);
        }
        if leaves[0].advance(6.0, &mut t).is_some() {
            hits.set(hits.get() + 1);
        }
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn transition_flag_is_inherited_by_children() {
        let action = Action::sequence(vec![Action::wait(1.0), Action::wait(1.0)]).during_transition();
        let leaves = RunningAction::flatten(&action, None);
        assert!(leaves.iter().all(|l| l.run_during_transition));
    }
}
