use cogkit_ids::NodeID;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the scene graph, layout, action and game layers.
///
/// Structural and constraint errors mean the caller built the scene graph
/// incorrectly; there is no recovery path beyond fixing the construction code.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("node {0} does not exist (stale or never created)")]
    MissingNode(NodeID),

    #[error("cannot add node {0} as a child of itself or of one of its descendants")]
    SelfParenting(NodeID),

    #[error("node {0} is a scene and cannot be added as a child")]
    SceneAsChild(NodeID),

    #[error("parent {parent} already has a child named \"{name}\"")]
    DuplicateName { parent: NodeID, name: String },

    #[error("node {child} already has parent {existing}; remove it first")]
    AlreadyParented { child: NodeID, existing: NodeID },

    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeID, child: NodeID },

    #[error("no descendant named \"{0}\"")]
    DescendantNotFound(String),

    #[error("layout constraint of node {node} refers to \"{target}\", which was not found in its scene")]
    ConstraintTargetNotFound { node: NodeID, target: String },

    #[error("sibling layout constraints under parent {parent} form a cycle")]
    ConstraintCycle { parent: NodeID },

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("node {0} is not a scene")]
    NotAScene(NodeID),

    #[error("scene \"{0}\" was not added to this game")]
    SceneNotFound(String),

    #[error("node {node} is not a {expected}")]
    WrongNodeType { node: NodeID, expected: &'static str },

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("draw pad {0} has no drawing path")]
    MissingDrawPath(NodeID),

    #[error("cell ({row}, {column}) is outside the grid")]
    OutOfGrid { row: usize, column: usize },

    #[error("timer \"{0}\" does not exist")]
    UnknownTimer(String),

    #[error("trial data error: {0}")]
    TrialSchema(String),

    #[error("parameter error: {0}")]
    Parameter(String),

    #[error("asset error: {0}")]
    Asset(String),
}
