use cogkit_core::{
    Action, Color, Composite, Error, Game, Label, NodeID, NodeOptions, Result, Shape, Size,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const COUNTDOWN_TIMER_START: &str = "CountdownTimerStart";
pub const COUNTDOWN_TIMER_TICK: &str = "CountdownTimerTick";
pub const COUNTDOWN_TIMER_COMPLETE: &str = "CountdownTimerComplete";

/// Key of the countdown's action on its node.
const COUNTDOWN_KEY: &str = "__countdownTimer";

/// Circle showing whole seconds remaining.
///
/// Call [`CountdownTimer::start`] to run it. Every tick interval it raises
/// `CountdownTimerTick` with `millisecondsRemaining`; at zero it also raises
/// `CountdownTimerComplete` and shows `zero_string`. The countdown keeps
/// running while its scene slides in or out.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CountdownTimer {
    pub milliseconds: f64,
    pub tick_interval_milliseconds: f64,
    pub font_size: f32,
    pub font_color: Color,
    pub font_name: Option<String>,
    pub zero_string: String,
    pub radius: f32,
    pub fill_color: Color,
    #[serde(skip)]
    label: NodeID,
    #[serde(skip)]
    internal: Vec<NodeID>,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self {
            milliseconds: 3000.0,
            tick_interval_milliseconds: 1000.0,
            font_size: 50.0,
            font_color: Color::WHITE,
            font_name: None,
            zero_string: "0".to_string(),
            radius: 100.0,
            fill_color: Color::ROYAL_BLUE,
            label: NodeID::nil(),
            internal: Vec::new(),
        }
    }
}

impl CountdownTimer {
    pub fn new(milliseconds: f64, tick_interval_milliseconds: f64) -> Self {
        Self {
            milliseconds,
            tick_interval_milliseconds,
            ..Self::default()
        }
    }

    fn display(&self, remaining_ms: f64) -> String {
        if remaining_ms <= 0.0 {
            self.zero_string.clone()
        } else {
            format!("{}", (remaining_ms / 1000.0).ceil() as i64)
        }
    }

    /// Starts (or restarts) the countdown on the timer node `id`.
    pub fn start(game: &mut Game, id: NodeID) -> Result<()> {
        let timer = game.composite::<Self>(id)?;
        let total = timer.milliseconds;
        let interval = timer.tick_interval_milliseconds;
        if interval <= 0.0 || total < 0.0 {
            return Err(Error::InvalidAction(format!(
                "countdown of {total} ms with tick interval {interval} ms"
            )));
        }

        let mut steps = vec![Action::custom(move |game| {
            game.emit_composite_event(
                id,
                COUNTDOWN_TIMER_START,
                json!({ "millisecondsRemaining": total }),
            )
        })];
        let mut remaining = total;
        while remaining > 0.0 {
            let step = interval.min(remaining);
            remaining -= step;
            let left = remaining;
            steps.push(Action::wait(step));
            steps.push(Action::custom(move |game| Self::tick(game, id, left)));
        }

        game.remove_action(id, COUNTDOWN_KEY)?;
        game.run_action(
            id,
            Action::sequence(steps).during_transition(),
            Some(COUNTDOWN_KEY),
        )
    }

    /// Stops the countdown where it is.
    pub fn stop(game: &mut Game, id: NodeID) -> Result<()> {
        game.remove_action(id, COUNTDOWN_KEY)
    }

    pub fn is_running(game: &Game, id: NodeID) -> bool {
        game.has_action(id, COUNTDOWN_KEY)
    }

    fn tick(game: &mut Game, id: NodeID, remaining_ms: f64) -> Result<()> {
        let timer = game.composite::<Self>(id)?;
        let (label, text) = (timer.label, timer.display(remaining_ms));
        if game.nodes.contains(label) {
            game.data_mut(label)?
                .as_label_mut()
                .ok_or(Error::WrongNodeType {
                    node: label,
                    expected: "Label",
                })?
                .text = text;
        }

        let payload = json!({ "millisecondsRemaining": remaining_ms });
        game.emit_composite_event(id, COUNTDOWN_TIMER_TICK, payload.clone())?;
        if remaining_ms <= 0.0 {
            game.emit_composite_event(id, COUNTDOWN_TIMER_COMPLETE, payload)?;
        }
        Ok(())
    }
}

impl Composite for CountdownTimer {
    fn composite_type(&self) -> &'static str {
        "CountdownTimer"
    }

    fn size(&self) -> Size {
        Size::square(self.radius * 2.0)
    }

    fn initialize(&mut self, game: &mut Game, id: NodeID) -> Result<()> {
        crate::destroy_internal(game, &mut self.internal)?;
        crate::add_internal(
            game,
            id,
            &mut self.internal,
            NodeOptions::named("__countdownTimerCircle"),
            Shape::circle(self.radius).fill(self.fill_color),
        )?;
        let mut label = Label::new(self.display(self.milliseconds))
            .font_size(self.font_size)
            .font_color(self.font_color);
        label.font_name = self.font_name.clone();
        self.label = crate::add_internal(
            game,
            id,
            &mut self.internal,
            NodeOptions::named("__countdownTimerLabel").z_position(1.0),
            label,
        )?;
        Ok(())
    }

    impl_composite_any!();
}
