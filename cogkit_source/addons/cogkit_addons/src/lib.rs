//! Composite widgets built from cogkit primitives.
//!
//! Each widget owns a handful of internal nodes that it rebuilds whenever its
//! node is marked for initialization, and reports what happened through
//! composite events (`CountdownTimerTick`, `DrawPadStrokeEnd`, ...).

use cogkit_core::{Game, NodeID, Result};

macro_rules! impl_composite_any {
    () => {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

pub mod button;
pub mod countdown_timer;
pub mod draw_pad;
pub mod grid;
pub mod locale_picker;

pub use button::Button;
pub use countdown_timer::CountdownTimer;
pub use draw_pad::DrawPad;
pub use grid::Grid;
pub use locale_picker::LocalePicker;

/// Destroys the internal nodes a composite built on its last initialization.
pub(crate) fn destroy_internal(game: &mut Game, internal: &mut Vec<NodeID>) -> Result<()> {
    for id in internal.drain(..) {
        if game.nodes.contains(id) {
            game.destroy_node(id)?;
        }
    }
    Ok(())
}

/// Creates `data` under `parent` and records it as internal.
pub(crate) fn add_internal(
    game: &mut Game,
    parent: NodeID,
    internal: &mut Vec<NodeID>,
    options: cogkit_core::NodeOptions,
    data: impl Into<cogkit_core::NodeData>,
) -> Result<NodeID> {
    let id = game.create_node(options, data)?;
    game.add_child(parent, id)?;
    internal.push(id);
    Ok(id)
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::cell::RefCell;
    use std::rc::Rc;

    use cogkit_core::{Color, EventType, Game, GameOptions, NodeID, Transition};
    use serde_json::Value;

    pub fn game_with_scene() -> (Game, NodeID) {
        let mut game = Game::new(GameOptions::default());
        let scene = game.create_scene("main", Color::WHITE);
        game.add_scene(scene).unwrap();
        game.present_scene(scene, Transition::None).unwrap();
        (game, scene)
    }

    /// Collects the payloads of composite event `name` raised on `id`.
    pub fn record(game: &mut Game, id: NodeID, name: &'static str) -> Rc<RefCell<Vec<Value>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        game.on(id, EventType::composite(name), move |_, event| {
            sink.borrow_mut().push(event.payload.clone());
            Ok(())
        })
        .unwrap();
        seen
    }
}
