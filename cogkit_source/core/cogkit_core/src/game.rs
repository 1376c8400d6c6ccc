//! The game: owns the node arena, the scenes and the frame loop.
//!
//! `impl Game` is split by concern across the `game/` modules.

mod actions;
mod composites;
mod draw;
mod events;
mod pointer;
mod scenes;
mod trials;
mod tree;
mod update;

use std::collections::VecDeque;

use cogkit_ids::NodeID;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::assets::{AssetSource, AssetStore};
use crate::context::FrameContext;
use crate::error::{Error, Result};
use crate::input::PointerInput;
use crate::node_arena::NodeArena;
use crate::nodes::Node;
use crate::plugin::Plugin;
use crate::render::DrawCommand;
use crate::structs::Size;
use crate::timer::Timers;
use crate::trials::{ActivityEvent, GameOptions, TrialState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Created,
    Initialized,
    Running,
    Stopped,
}

pub struct Game {
    pub nodes: NodeArena,
    pub options: GameOptions,
    pub uuid: Uuid,
    pub context: FrameContext,
    pub timers: Timers,
    pub assets: AssetStore,
    state: GameState,
    asset_sources: Vec<Box<dyn AssetSource>>,
    /// Scenes added to this game, in insertion order.
    scenes: Vec<NodeID>,
    current_scene: NodeID,
    /// Scene sliding out while a transition runs.
    outgoing_scene: NodeID,
    input_queue: VecDeque<PointerInput>,
    plugins: Vec<Box<dyn Plugin>>,
    trial: TrialState,
    parameter_values: Map<String, Value>,
    events: Vec<ActivityEvent>,
    draw_commands: Vec<DrawCommand>,
}

impl Game {
    pub fn new(options: GameOptions) -> Self {
        let mut trial = TrialState::default();
        trial.reset(&options);
        Self {
            nodes: NodeArena::new(),
            options,
            uuid: cogkit_ids::new_uuid(),
            context: FrameContext::default(),
            timers: Timers::new(),
            assets: AssetStore::default(),
            state: GameState::Created,
            asset_sources: Vec::new(),
            scenes: Vec::new(),
            current_scene: NodeID::nil(),
            outgoing_scene: NodeID::nil(),
            input_queue: VecDeque::new(),
            plugins: Vec::new(),
            trial,
            parameter_values: Map::new(),
            events: Vec::new(),
            draw_commands: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.options.id
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.options.width, self.options.height)
    }

    pub fn add_asset_source(&mut self, source: Box<dyn AssetSource>) {
        self.asset_sources.push(source);
    }

    pub fn add_plugin(&mut self, plugin: Box<dyn Plugin>) {
        log::debug!("game {}: plugin {} added", self.options.id, plugin.name());
        self.plugins.push(plugin);
    }

    /// Loads every registered asset source. The frame loop must not start
    /// before this resolves.
    pub async fn initialize(&mut self) -> Result<()> {
        let loaded = AssetStore::load_all(&self.asset_sources).await?;
        log::debug!(
            "game {}: {} asset(s) loaded",
            self.options.id,
            loaded.len()
        );
        self.assets.merge(loaded);
        self.state = GameState::Initialized;
        Ok(())
    }

    pub fn node(&self, id: NodeID) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::MissingNode(id))
    }

    pub fn node_mut(&mut self, id: NodeID) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::MissingNode(id))
    }

    /// One frame: queued input, plugin hooks and the update pass.
    pub fn tick(&mut self, now_ms: f64) -> Result<()> {
        while let Some(input) = self.input_queue.pop_front() {
            self.handle_pointer(input)?;
        }

        let mut plugins = std::mem::take(&mut self.plugins);
        let result = self.run_plugins(&mut plugins, now_ms);
        // plugins added from inside a hook land after the existing ones
        plugins.append(&mut self.plugins);
        self.plugins = plugins;
        result
    }

    fn run_plugins(&mut self, plugins: &mut [Box<dyn Plugin>], now_ms: f64) -> Result<()> {
        let mut ctx = self.context;
        ctx.advance(now_ms);
        for plugin in plugins.iter_mut() {
            plugin.before_update(self, ctx)?;
        }
        self.update(now_ms)?;
        let ctx = self.context;
        for plugin in plugins.iter_mut() {
            plugin.after_update(self, ctx)?;
        }
        Ok(())
    }

    /// Queues input to be applied at the start of the next tick.
    pub fn queue_pointer(&mut self, input: PointerInput) {
        self.input_queue.push_back(input);
    }

    /// Game events not yet collected by the session.
    pub fn drain_events(&mut self) -> Vec<ActivityEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::nodes::{NodeOptions, Scene, Shape};
    use crate::structs::Color;
    use crate::transition::Transition;

    /// Game with one presented 400x800 scene.
    pub fn game_with_scene() -> (Game, NodeID) {
        let mut game = Game::new(GameOptions::default());
        let scene = game.create_scene("main", Color::WHITE);
        game.add_scene(scene).unwrap();
        game.present_scene(scene, Transition::None).unwrap();
        (game, scene)
    }

    pub fn rect(game: &mut Game, options: NodeOptions, w: f32, h: f32) -> NodeID {
        game.create_node(options, Shape::rectangle(Size::new(w, h)))
            .unwrap()
    }

    pub fn scene_data(game: &Game, scene: NodeID) -> &Scene {
        game.node(scene).unwrap().data.as_scene().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::nodes::NodeOptions;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Plugin for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn before_update(&mut self, game: &mut Game, ctx: FrameContext) -> Result<()> {
            let count = game.nodes.len();
            self.log
                .borrow_mut()
                .push(format!("before {} {}", ctx.now_ms, count));
            Ok(())
        }

        fn after_update(&mut self, _game: &mut Game, ctx: FrameContext) -> Result<()> {
            self.log.borrow_mut().push(format!("after {}", ctx.now_ms));
            Ok(())
        }
    }

    #[test]
    fn plugins_wrap_the_update_pass() {
        let (mut game, _scene) = game_with_scene();
        let log = Rc::new(RefCell::new(Vec::new()));
        game.add_plugin(Box::new(Probe { log: log.clone() }));
        game.tick(10.0).unwrap();
        game.tick(26.0).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["before 10 1", "after 10", "before 26 1", "after 26"]
        );
        assert_eq!(game.context.delta_ms, 16.0);
    }

    #[test]
    fn initialize_loads_assets_and_sizes_sprites() {
        use crate::assets::InMemoryAsset;
        use crate::nodes::Sprite;

        let (mut game, scene) = game_with_scene();
        game.add_asset_source(Box::new(InMemoryAsset::image(
            "star.png",
            Size::new(32.0, 16.0),
        )));
        pollster::block_on(game.initialize()).unwrap();
        assert_eq!(game.state(), GameState::Initialized);

        let sprite = game
            .create_node(NodeOptions::named("star"), Sprite::new("star.png"))
            .unwrap();
        game.add_child(scene, sprite).unwrap();
        game.tick(0.0).unwrap();
        assert_eq!(game.node(sprite).unwrap().size, Size::new(32.0, 16.0));
    }

    #[test]
    fn stale_ids_report_missing_nodes() {
        let (mut game, scene) = game_with_scene();
        let node = rect(&mut game, NodeOptions::default(), 1.0, 1.0);
        game.add_child(scene, node).unwrap();
        game.destroy_node(node).unwrap();
        assert!(matches!(game.node(node), Err(Error::MissingNode(_))));
        assert!(game.node(scene).unwrap().children.is_empty());
    }
}
