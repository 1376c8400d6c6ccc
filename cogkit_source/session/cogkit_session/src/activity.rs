use cogkit_core::{ActivityEvent, Game, PointerInput, Renderer};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

/// A unit the session can sequence: a game, a survey, ...
pub trait Activity {
    fn id(&self) -> &str;
    fn uuid(&self) -> Uuid;
    fn name(&self) -> &str;

    /// Loads everything the activity needs before its first frame.
    fn initialize(&mut self) -> LocalBoxFuture<'_, anyhow::Result<()>>;
    fn start(&mut self) -> anyhow::Result<()>;
    /// Stops the activity early.
    fn stop(&mut self);
    fn tick(&mut self, now_ms: f64) -> anyhow::Result<()>;
    fn handle_pointer(&mut self, input: PointerInput);
    fn draw(&mut self, renderer: &mut dyn Renderer);
    /// Lifecycle and trial events raised since the last call.
    fn drain_events(&mut self) -> Vec<ActivityEvent>;
}

/// Builds a fresh activity instance.
pub type ActivityFactory = Box<dyn Fn() -> anyhow::Result<Box<dyn Activity>>>;

impl Activity for Game {
    fn id(&self) -> &str {
        Game::id(self)
    }

    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn name(&self) -> &str {
        Game::name(self)
    }

    fn initialize(&mut self) -> LocalBoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move { Ok(Game::initialize(self).await?) })
    }

    fn start(&mut self) -> anyhow::Result<()> {
        Ok(Game::start(self)?)
    }

    fn stop(&mut self) {
        self.cancel();
    }

    fn tick(&mut self, now_ms: f64) -> anyhow::Result<()> {
        Ok(Game::tick(self, now_ms)?)
    }

    fn handle_pointer(&mut self, input: PointerInput) {
        self.queue_pointer(input);
    }

    fn draw(&mut self, renderer: &mut dyn Renderer) {
        Game::draw(self, renderer);
    }

    fn drain_events(&mut self) -> Vec<ActivityEvent> {
        Game::drain_events(self)
    }
}
