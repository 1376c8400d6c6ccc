use std::rc::Rc;

use cogkit_ids::{ListenerID, NodeID};
use smallvec::SmallVec;

use super::Game;
use crate::error::Result;
use crate::events::{EventCallback, EventType, ListenerOptions, ListenerRecord, NodeEvent};

impl Game {
    /// Registers `callback` for `event_type` on `id`.
    ///
    /// A second listener of the same type is allowed but logged, since it is
    /// usually an accidental double registration; pass
    /// [`ListenerOptions::replace`] to swap the existing one out instead.
    pub fn add_event_listener(
        &mut self,
        id: NodeID,
        event_type: EventType,
        callback: impl Fn(&mut Game, &mut NodeEvent) -> Result<()> + 'static,
        options: ListenerOptions,
    ) -> Result<ListenerID> {
        let node = self.node_mut(id)?;
        if options.replace_existing {
            node.listeners.retain(|l| l.event_type != event_type);
        } else if node.listeners.iter().any(|l| l.event_type == event_type) {
            log::warn!(
                "node {} ({}) already has a {} listener; adding another. \
                 Use replace_existing if the old one should go",
                node.name().unwrap_or("<unnamed>"),
                id,
                event_type
            );
        }
        let listener = ListenerID::next();
        node.listeners.push(ListenerRecord {
            id: listener,
            event_type,
            key: options.key,
            callback: Rc::new(callback),
        });
        Ok(listener)
    }

    pub fn on(
        &mut self,
        id: NodeID,
        event_type: EventType,
        callback: impl Fn(&mut Game, &mut NodeEvent) -> Result<()> + 'static,
    ) -> Result<ListenerID> {
        self.add_event_listener(id, event_type, callback, ListenerOptions::default())
    }

    pub fn remove_event_listener(&mut self, id: NodeID, listener: ListenerID) -> Result<()> {
        self.node_mut(id)?.listeners.retain(|l| l.id != listener);
        Ok(())
    }

    /// Removes listeners registered with `key`.
    pub fn remove_event_listeners_by_key(&mut self, id: NodeID, key: &str) -> Result<()> {
        self.node_mut(id)?
            .listeners
            .retain(|l| l.key.as_deref() != Some(key));
        Ok(())
    }

    /// Calls every listener on `event.target` registered for `event.kind`.
    ///
    /// Callbacks are copied out first so listeners may freely add or remove
    /// listeners, including on this node.
    pub fn dispatch_event(&mut self, event: &mut NodeEvent) -> Result<()> {
        let Some(node) = self.nodes.get(event.target) else {
            return Ok(());
        };
        let call_list: SmallVec<[EventCallback; 4]> = node
            .listeners
            .iter()
            .filter(|l| l.event_type == event.kind)
            .map(|l| l.callback.clone())
            .collect();
        for callback in call_list {
            callback(self, event)?;
        }
        Ok(())
    }

    /// Raises a composite event on `id` carrying `payload`.
    pub fn emit_composite_event(
        &mut self,
        id: NodeID,
        name: &'static str,
        payload: serde_json::Value,
    ) -> Result<()> {
        let mut event = NodeEvent::new(EventType::composite(name), id).with_payload(payload);
        self.dispatch_event(&mut event)
    }
}
