//! Node-scoped events and listener records.
//!
//! Listeners are stored per node as plain records and dispatched directly to
//! the target node; nothing bubbles.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use cogkit_ids::{ListenerID, NodeID};

use crate::error::Result;
use crate::game::Game;
use crate::structs::Point;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    TapDown,
    TapUp,
    TapUpAny,
    TapLeave,
    PointerDown,
    PointerUp,
    PointerMove,
    PointerLeave,
    DragStart,
    Drag,
    DragEnd,
    SceneSetup,
    SceneAppear,
    SceneDisappear,
    /// Raised by composites, e.g. `CountdownTimerTick`.
    Composite(Cow<'static, str>),
}

impl EventType {
    pub fn composite(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Composite(name.into())
    }

    pub fn is_pointer(&self) -> bool {
        !matches!(
            self,
            Self::SceneSetup | Self::SceneAppear | Self::SceneDisappear | Self::Composite(_)
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Composite(name) => f.write_str(name),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Event handed to listeners.
#[derive(Clone, Debug)]
pub struct NodeEvent {
    pub kind: EventType,
    pub target: NodeID,
    /// Pointer location in the target's local space: origin at its top-left
    /// corner, in unscaled units. Zero for non-pointer events.
    pub point: Point,
    /// Set by a listener to stop this input reaching further nodes.
    pub handled: bool,
    /// Composite payload; `Null` for primitive events.
    pub payload: serde_json::Value,
}

impl NodeEvent {
    pub fn new(kind: EventType, target: NodeID) -> Self {
        Self {
            kind,
            target,
            point: Point::ZERO,
            handled: false,
            payload: serde_json::Value::Null,
        }
    }

    pub fn at(mut self, point: Point) -> Self {
        self.point = point;
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

pub type EventCallback = Rc<dyn Fn(&mut Game, &mut NodeEvent) -> Result<()>>;

#[derive(Clone, Debug, Default)]
pub struct ListenerOptions {
    /// Drop this node's existing listeners of the same type first.
    pub replace_existing: bool,
    pub key: Option<String>,
}

impl ListenerOptions {
    pub fn replace() -> Self {
        Self {
            replace_existing: true,
            key: None,
        }
    }

    pub fn keyed(key: impl Into<String>) -> Self {
        Self {
            replace_existing: false,
            key: Some(key.into()),
        }
    }
}

#[derive(Clone)]
pub struct ListenerRecord {
    pub id: ListenerID,
    pub event_type: EventType,
    pub key: Option<String>,
    pub callback: EventCallback,
}

impl fmt::Debug for ListenerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRecord")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_event_types_compare_by_name() {
        assert_eq!(
            EventType::composite("CountdownTimerTick"),
            EventType::Composite(Cow::Owned("CountdownTimerTick".to_string()))
        );
        assert_ne!(EventType::composite("A"), EventType::composite("B"));
        assert_eq!(EventType::composite("DrawPadStrokeEnd").to_string(), "DrawPadStrokeEnd");
        assert_eq!(EventType::TapDown.to_string(), "TapDown");
    }

    #[test]
    fn pointer_classification() {
        assert!(EventType::DragEnd.is_pointer());
        assert!(!EventType::SceneAppear.is_pointer());
        assert!(!EventType::composite("X").is_pointer());
    }
}
