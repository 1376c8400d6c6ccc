use anyhow::{Context, anyhow, bail};
use chrono::{DateTime, Utc};
use cogkit_core::{ActivityEvent, ActivityEventKind, PointerInput, Renderer};
use futures::future;
use serde::Serialize;
use uuid::Uuid;

use crate::activity::{Activity, ActivityFactory};
use crate::config::{CogkitConfig, SessionConfig};
use crate::diagnostics::DiagnosticsReporter;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    SessionStart,
    SessionEnd,
    ActivityStart,
    ActivityEnd,
    ActivityCancel,
    ActivityData,
}

impl From<ActivityEventKind> for SessionEventKind {
    fn from(kind: ActivityEventKind) -> Self {
        match kind {
            ActivityEventKind::ActivityStart => Self::ActivityStart,
            ActivityEventKind::ActivityEnd => Self::ActivityEnd,
            ActivityEventKind::ActivityCancel => Self::ActivityCancel,
            ActivityEventKind::ActivityData => Self::ActivityData,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionEvent {
    pub kind: SessionEventKind,
    pub session_uuid: Uuid,
    pub timestamp: DateTime<Utc>,
    /// The activity event this was raised from, if any.
    pub activity: Option<ActivityEvent>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Initialized,
    Running,
    Ended,
}

type SessionListener = Box<dyn FnMut(&SessionEvent)>;

/// Runs activities one after another.
///
/// Activity events are collected after every tick and re-raised as session
/// events. When the current activity ends or cancels, the session moves on
/// (or ends) according to [`SessionConfig`].
pub struct Session {
    pub uuid: Uuid,
    config: SessionConfig,
    factories: Vec<ActivityFactory>,
    activities: Vec<Box<dyn Activity>>,
    current: Option<usize>,
    /// The current activity already raised `ActivityEnd` or `ActivityCancel`.
    current_finished: bool,
    state: SessionState,
    listeners: Vec<(Option<SessionEventKind>, SessionListener)>,
    diagnostics: DiagnosticsReporter,
}

impl Session {
    /// Builds one instance per factory. Activity ids must be unique.
    pub fn new(config: &CogkitConfig, factories: Vec<ActivityFactory>) -> anyhow::Result<Self> {
        let activities = factories
            .iter()
            .map(|f| f())
            .collect::<anyhow::Result<Vec<_>>>()?;
        for (i, activity) in activities.iter().enumerate() {
            if activities[..i].iter().any(|a| a.id() == activity.id()) {
                bail!("duplicate activity id \"{}\"", activity.id());
            }
        }
        Ok(Self {
            uuid: Uuid::new_v4(),
            config: config.session.clone(),
            factories,
            activities,
            current: None,
            current_finished: false,
            state: SessionState::Created,
            listeners: Vec::new(),
            diagnostics: DiagnosticsReporter::new(config.diagnostics.clone()),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn activity_ids(&self) -> Vec<&str> {
        self.activities.iter().map(|a| a.id()).collect()
    }

    pub fn current_activity(&self) -> Option<&dyn Activity> {
        self.current.map(|i| self.activities[i].as_ref())
    }

    pub fn diagnostics(&self) -> &DiagnosticsReporter {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticsReporter {
        &mut self.diagnostics
    }

    /// Registers `listener` for events of `kind`, or for every event when `None`.
    pub fn add_event_listener(
        &mut self,
        kind: Option<SessionEventKind>,
        listener: impl FnMut(&SessionEvent) + 'static,
    ) {
        self.listeners.push((kind, Box::new(listener)));
    }

    pub fn on(&mut self, kind: SessionEventKind, listener: impl FnMut(&SessionEvent) + 'static) {
        self.add_event_listener(Some(kind), listener);
    }

    /// Loads every activity's assets. All loads run concurrently and the
    /// first failure fails the session.
    pub async fn initialize(&mut self) -> anyhow::Result<()> {
        future::try_join_all(self.activities.iter_mut().map(|activity| async move {
            let id = activity.id().to_string();
            activity
                .initialize()
                .await
                .with_context(|| format!("initializing activity {id}"))
        }))
        .await?;
        self.state = SessionState::Initialized;
        log::debug!(
            "session {}: {} activities initialized",
            self.uuid,
            self.activities.len()
        );
        Ok(())
    }

    /// Starts the first activity.
    pub fn start(&mut self) -> anyhow::Result<()> {
        if self.state != SessionState::Initialized {
            bail!("session must be initialized before it starts (state {:?})", self.state);
        }
        if self.activities.is_empty() {
            bail!("session has no activities");
        }
        self.state = SessionState::Running;
        self.emit(SessionEventKind::SessionStart, None);
        self.start_activity(0)?;
        self.process_events()
    }

    /// Advances the current activity one frame. Errors it raises go to the
    /// diagnostics reporter rather than to the caller.
    pub fn tick(&mut self, now_ms: f64) -> anyhow::Result<()> {
        if self.state != SessionState::Running {
            return Ok(());
        }
        let Some(index) = self.current else {
            return Ok(());
        };
        if !self.current_finished {
            let activity = &mut self.activities[index];
            if let Err(err) = activity.tick(now_ms) {
                let id = activity.id().to_string();
                if self.diagnostics.report(&err, Some(&id)) {
                    self.end();
                    return Ok(());
                }
            }
        }
        self.process_events()
    }

    pub fn handle_pointer(&mut self, input: PointerInput) {
        if self.state != SessionState::Running || self.current_finished {
            return;
        }
        if let Some(index) = self.current {
            self.activities[index].handle_pointer(input);
        }
    }

    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        if let Some(index) = self.current {
            self.activities[index].draw(renderer);
        }
    }

    /// Stops the current activity and starts a freshly built instance of
    /// activity `id`.
    pub fn go_to_activity(&mut self, id: &str) -> anyhow::Result<()> {
        if self.state != SessionState::Running {
            bail!("cannot go to activity {id}: session is {:?}", self.state);
        }
        let index = self
            .activities
            .iter()
            .position(|a| a.id() == id)
            .ok_or_else(|| anyhow!("no activity with id \"{id}\""))?;
        if let Some(current) = self.current {
            if !self.current_finished {
                self.stop_activity(current);
            }
        }

        let mut fresh = (self.factories[index])()?;
        pollster::block_on(fresh.initialize())
            .with_context(|| format!("initializing activity {id}"))?;
        self.activities[index] = fresh;
        self.start_activity(index)?;
        self.process_events()
    }

    /// Ends the session, stopping the current activity if it is still running.
    pub fn end(&mut self) {
        if self.state == SessionState::Ended {
            return;
        }
        if let Some(index) = self.current {
            if !self.current_finished {
                self.stop_activity(index);
            }
        }
        self.state = SessionState::Ended;
        log::debug!("session {} ended", self.uuid);
        self.emit(SessionEventKind::SessionEnd, None);
    }

    fn start_activity(&mut self, index: usize) -> anyhow::Result<()> {
        self.current = Some(index);
        self.current_finished = false;
        let activity = &mut self.activities[index];
        log::debug!("session {}: starting activity {}", self.uuid, activity.id());
        activity
            .start()
            .with_context(|| format!("starting activity {}", activity.id()))
    }

    /// Stops activity `index` and forwards what it raised without advancing.
    fn stop_activity(&mut self, index: usize) {
        self.activities[index].stop();
        self.current_finished = true;
        for event in self.activities[index].drain_events() {
            self.emit(event.kind.into(), Some(event));
        }
    }

    fn process_events(&mut self) -> anyhow::Result<()> {
        while let Some(index) = self.current {
            let events = self.activities[index].drain_events();
            if events.is_empty() {
                return Ok(());
            }
            let mut finished = false;
            for event in events {
                finished |= matches!(
                    event.kind,
                    ActivityEventKind::ActivityEnd | ActivityEventKind::ActivityCancel
                );
                self.emit(event.kind.into(), Some(event));
            }
            if finished && !self.current_finished {
                self.current_finished = true;
                self.advance_from(index)?;
            }
        }
        Ok(())
    }

    fn advance_from(&mut self, index: usize) -> anyhow::Result<()> {
        let next = index + 1;
        if next < self.activities.len() {
            if self.config.auto_go_to_next_activity {
                self.start_activity(next)?;
            }
        } else if self.config.auto_end_after_last_activity {
            self.end();
        }
        Ok(())
    }

    fn emit(&mut self, kind: SessionEventKind, activity: Option<ActivityEvent>) {
        let event = SessionEvent {
            kind,
            session_uuid: self.uuid,
            timestamp: Utc::now(),
            activity,
        };
        for (filter, listener) in self.listeners.iter_mut() {
            if filter.is_none_or(|k| k == kind) {
                listener(&event);
            }
        }
    }
}
