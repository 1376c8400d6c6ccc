use crate::context::FrameContext;
use crate::error::Result;
use crate::game::Game;

/// Hooks run around each update pass, e.g. a physics step.
pub trait Plugin {
    fn name(&self) -> &str;

    fn before_update(&mut self, _game: &mut Game, _ctx: FrameContext) -> Result<()> {
        Ok(())
    }

    fn after_update(&mut self, _game: &mut Game, _ctx: FrameContext) -> Result<()> {
        Ok(())
    }
}
