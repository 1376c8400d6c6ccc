use std::any::Any;
use std::fmt;

use cogkit_ids::NodeID;

use super::NodeKind;
use crate::error::Result;
use crate::game::Game;
use crate::structs::Size;

/// A reusable widget that builds its own sub-tree of primitive nodes.
///
/// `initialize` runs during the update pass whenever the owning node is
/// marked as needing initialization. While it runs, the composite is taken
/// out of its node, so it must reach its own state through `self` rather
/// than through the game.
pub trait Composite: Any {
    fn composite_type(&self) -> &'static str;

    fn size(&self) -> Size;

    fn initialize(&mut self, game: &mut Game, id: NodeID) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Holds a composite; empty only while the composite is checked out.
pub struct CompositeSlot(pub(crate) Option<Box<dyn Composite>>);

impl CompositeSlot {
    pub fn new(composite: impl Composite) -> Self {
        Self(Some(Box::new(composite)))
    }

    pub fn get(&self) -> Option<&dyn Composite> {
        self.0.as_deref()
    }

    pub(crate) fn take(&mut self) -> Option<Box<dyn Composite>> {
        self.0.take()
    }

    pub(crate) fn restore(&mut self, composite: Box<dyn Composite>) {
        self.0 = Some(composite);
    }
}

impl fmt::Debug for CompositeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(c) => write!(f, "CompositeSlot({})", c.composite_type()),
            None => f.write_str("CompositeSlot(<checked out>)"),
        }
    }
}

impl NodeKind for CompositeSlot {
    fn type_name(&self) -> &'static str {
        self.0.as_ref().map_or("Composite", |c| c.composite_type())
    }

    fn intrinsic_size(&self) -> Option<Size> {
        self.0.as_ref().map(|c| c.size())
    }
}
