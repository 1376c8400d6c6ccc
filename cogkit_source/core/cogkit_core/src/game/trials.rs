use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Game, GameState};
use crate::error::{Error, Result};
use crate::transition::Transition;
use crate::trials::{ActivityEvent, ActivityEventKind};

impl Game {
    /// Presents the first added scene (unless one is already current) and
    /// announces the activity start.
    pub fn start(&mut self) -> Result<()> {
        if self.current_scene().is_none() {
            if let Some(first) = self.scenes.first().copied() {
                self.present_scene(first, Transition::None)?;
            }
        }
        self.state = GameState::Running;
        log::debug!("game {} started", self.options.id);
        self.push_event(ActivityEventKind::ActivityStart, None);
        Ok(())
    }

    /// Ends the activity normally.
    pub fn end(&mut self) {
        self.stop_with(ActivityEventKind::ActivityEnd);
    }

    /// Ends the activity early, e.g. the participant quit.
    pub fn cancel(&mut self) {
        self.stop_with(ActivityEventKind::ActivityCancel);
    }

    fn stop_with(&mut self, kind: ActivityEventKind) {
        if self.state == GameState::Stopped {
            return;
        }
        self.state = GameState::Stopped;
        log::debug!("game {} stopped ({:?})", self.options.id, kind);
        self.push_event(kind, None);
    }

    /// Records one field of the current trial.
    pub fn add_trial_data(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.options.validate_trial_value(key, &value)?;
        self.trial.current.insert(key.to_string(), value);
        Ok(())
    }

    /// Data recorded so far for the current trial.
    pub fn current_trial_data(&self) -> &serde_json::Map<String, Value> {
        &self.trial.current
    }

    pub fn trial_index(&self) -> usize {
        self.trial.index
    }

    /// Closes the current trial: stamps it, emits it as `ActivityData` and
    /// starts a fresh record.
    pub fn trial_complete(&mut self) {
        let mut data = std::mem::take(&mut self.trial.current);
        data.insert("trial_index".to_string(), self.trial.index.into());
        data.insert(
            "activity_uuid".to_string(),
            Value::String(self.uuid.to_string()),
        );
        data.insert(
            "trial_end_iso8601_timestamp".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        self.push_event(ActivityEventKind::ActivityData, Some(Value::Object(data)));
        self.trial.index += 1;
        self.trial.reset(&self.options);
    }

    /// Overridden value of `name`, falling back to its declared default.
    pub fn get_parameter<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = match self.parameter_values.get(name) {
            Some(value) => value,
            None => {
                &self
                    .options
                    .parameters
                    .get(name)
                    .ok_or_else(|| Error::Parameter(format!("unknown parameter \"{name}\"")))?
                    .default
            }
        };
        T::deserialize(value).map_err(|e| Error::Parameter(format!("\"{name}\": {e}")))
    }

    /// Overrides declared parameters from a JSON object. Unknown names are
    /// rejected before anything is applied.
    pub fn set_parameters(&mut self, values: &Value) -> Result<()> {
        let Some(map) = values.as_object() else {
            return Err(Error::Parameter(format!("expected an object, got {values}")));
        };
        if let Some(unknown) = map.keys().find(|k| !self.options.parameters.contains_key(*k)) {
            return Err(Error::Parameter(format!(
                "unknown parameter \"{unknown}\" for game {}",
                self.options.id
            )));
        }
        for (k, v) in map {
            self.parameter_values.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    pub fn start_timer(&mut self, name: &str) {
        self.timers.start(name, self.context.now_ms);
    }

    pub fn stop_timer(&mut self, name: &str) -> Result<()> {
        self.timers.stop(name, self.context.now_ms)
    }

    pub fn restart_timer(&mut self, name: &str) {
        self.timers.restart(name, self.context.now_ms);
    }

    pub fn timer_elapsed(&self, name: &str) -> Result<f64> {
        self.timers.elapsed(name, self.context.now_ms)
    }

    fn push_event(&mut self, kind: ActivityEventKind, data: Option<Value>) {
        self.events.push(ActivityEvent {
            kind,
            activity_id: self.options.id.clone(),
            activity_uuid: self.uuid,
            timestamp: Utc::now(),
            data,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::trials::{GameOptions, ParameterSpec, TrialSchemaEntry, TrialValueType};
    use serde_json::json;

    fn options() -> GameOptions {
        let mut options = GameOptions {
            id: "symbol-search".to_string(),
            ..GameOptions::default()
        };
        options.parameters.insert(
            "number_of_trials".into(),
            ParameterSpec {
                default: json!(5),
                description: "trials per game".into(),
            },
        );
        options.trial_schema.insert(
            "correct".into(),
            TrialSchemaEntry::new(TrialValueType::Boolean, "response was correct"),
        );
        options.trial_schema.insert(
            "response_time_ms".into(),
            TrialSchemaEntry::new(TrialValueType::Number, "time to respond"),
        );
        options
    }

    #[test]
    fn lifecycle_events_are_queued_for_the_session() {
        let mut game = Game::new(options());
        let scene = game.create_scene("main", crate::structs::Color::WHITE);
        game.add_scene(scene).unwrap();
        game.start().unwrap();
        assert_eq!(game.current_scene(), Some(scene));
        assert_eq!(game.state(), GameState::Running);

        game.end();
        game.cancel();
        let kinds: Vec<_> = game.drain_events().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ActivityEventKind::ActivityStart, ActivityEventKind::ActivityEnd]
        );
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn trial_records_are_stamped_and_reset() {
        let mut game = Game::new(options());
        game.add_trial_data("correct", true).unwrap();
        game.trial_complete();
        game.add_trial_data("response_time_ms", 431.5).unwrap();
        game.trial_complete();

        let events = game.drain_events();
        assert_eq!(events.len(), 2);
        let first = events[0].data.as_ref().unwrap();
        assert_eq!(first["correct"], json!(true));
        assert_eq!(first["response_time_ms"], Value::Null);
        assert_eq!(first["trial_index"], json!(0));
        assert_eq!(first["activity_uuid"], json!(game.uuid.to_string()));
        let second = events[1].data.as_ref().unwrap();
        assert_eq!(second["correct"], Value::Null);
        assert_eq!(second["trial_index"], json!(1));
        assert_eq!(game.trial_index(), 2);
        assert!(events.iter().all(|e| e.activity_id == "symbol-search"));
    }

    #[test]
    fn trial_data_must_fit_the_schema() {
        let mut game = Game::new(options());
        assert!(matches!(
            game.add_trial_data("correct", "yes"),
            Err(Error::TrialSchema(_))
        ));
        assert!(game.add_trial_data("unknown", 1).is_err());
        assert_eq!(game.current_trial_data()["correct"], Value::Null);
    }

    #[test]
    fn parameters_fall_back_to_defaults() {
        let mut game = Game::new(options());
        assert_eq!(game.get_parameter::<u32>("number_of_trials"), Ok(5));
        game.set_parameters(&json!({ "number_of_trials": 3 })).unwrap();
        assert_eq!(game.get_parameter::<u32>("number_of_trials"), Ok(3));
        assert!(game.get_parameter::<String>("number_of_trials").is_err());
        assert!(game.get_parameter::<u32>("missing").is_err());
    }

    #[test]
    fn unknown_parameters_are_rejected_atomically() {
        let mut game = Game::new(options());
        let result = game.set_parameters(&json!({ "number_of_trials": 9, "speed": 2 }));
        assert!(matches!(result, Err(Error::Parameter(_))));
        assert_eq!(game.get_parameter::<u32>("number_of_trials"), Ok(5));
    }

    #[test]
    fn timers_follow_the_game_clock() {
        let (mut game, _scene) = game_with_scene();
        game.tick(100.0).unwrap();
        game.start_timer("rt");
        game.tick(350.0).unwrap();
        assert_eq!(game.timer_elapsed("rt"), Ok(250.0));
        game.stop_timer("rt").unwrap();
        game.tick(500.0).unwrap();
        assert_eq!(game.timer_elapsed("rt"), Ok(250.0));
        assert_eq!(
            game.timer_elapsed("other"),
            Err(Error::UnknownTimer("other".to_string()))
        );
    }
}
