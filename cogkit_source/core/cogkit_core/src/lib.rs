pub mod actions;
pub mod assets;
pub mod context;
pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod layout;
mod node_arena;
pub mod nodes;
pub mod plugin;
pub mod render;
pub mod structs;
pub mod timer;
pub mod transition;
pub mod trials;

pub use actions::{Action, Easing};
pub use assets::{AssetSource, AssetStore, InMemoryAsset, LoadedAsset};
pub use context::FrameContext;
pub use error::{Error, Result};
pub use events::{EventType, ListenerOptions, NodeEvent};
pub use game::{Game, GameState};
pub use input::{PointerInput, PointerKind};
pub use layout::{Constraints, Layout};
pub use node_arena::NodeArena;
pub use nodes::*;
pub use plugin::Plugin;
pub use render::{CommandRecorder, DrawCommand, Renderer};
pub use structs::*;
pub use transition::{SceneState, SlideDirection, Transition};
pub use trials::{ActivityEvent, ActivityEventKind, GameOptions};

pub use cogkit_ids::{ListenerID, NodeID, RunID};
