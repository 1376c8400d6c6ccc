//! Constraint-based relative layout.
//!
//! A node with constraints ignores its `position` and is placed relative to
//! edges of siblings (by id or by name) or of its scene. Each axis takes one
//! constraint (used directly) or two (interpolated by the axis bias).

use cogkit_ids::NodeID;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintType {
    TopToTopOf,
    TopToBottomOf,
    BottomToTopOf,
    BottomToBottomOf,
    StartToStartOf,
    StartToEndOf,
    EndToEndOf,
    EndToStartOf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Which edge of the target a constraint attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetEdge {
    Min,
    Max,
}

impl ConstraintType {
    pub fn axis(self) -> Axis {
        match self {
            Self::TopToTopOf | Self::TopToBottomOf | Self::BottomToTopOf | Self::BottomToBottomOf => {
                Axis::Vertical
            }
            _ => Axis::Horizontal,
        }
    }

    pub fn target_edge(self) -> TargetEdge {
        match self {
            Self::TopToTopOf | Self::BottomToTopOf | Self::StartToStartOf | Self::EndToStartOf => {
                TargetEdge::Min
            }
            _ => TargetEdge::Max,
        }
    }

    /// True when the constrained edge of this node is its top or start edge.
    pub fn constrains_min_edge(self) -> bool {
        matches!(
            self,
            Self::TopToTopOf | Self::TopToBottomOf | Self::StartToStartOf | Self::StartToEndOf
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ConstraintTarget {
    Node(NodeID),
    Name(String),
}

impl From<NodeID> for ConstraintTarget {
    fn from(id: NodeID) -> Self {
        Self::Node(id)
    }
}

impl From<&str> for ConstraintTarget {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ConstraintTarget {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Constraint set in declaration order. Order matters: with two constraints
/// on one axis the first is "bias 0" and the second is "bias 1".
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Constraints {
    #[serde(flatten)]
    pub entries: IndexMap<ConstraintType, ConstraintTarget>,
    pub horizontal_bias: Option<f32>,
    pub vertical_bias: Option<f32>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ty: ConstraintType, target: impl Into<ConstraintTarget>) -> Self {
        self.entries.insert(ty, target.into());
        self
    }

    pub fn top_to_top_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.with(ConstraintType::TopToTopOf, target)
    }
    pub fn top_to_bottom_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.with(ConstraintType::TopToBottomOf, target)
    }
    pub fn bottom_to_top_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.with(ConstraintType::BottomToTopOf, target)
    }
    pub fn bottom_to_bottom_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.with(ConstraintType::BottomToBottomOf, target)
    }
    pub fn start_to_start_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.with(ConstraintType::StartToStartOf, target)
    }
    pub fn start_to_end_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.with(ConstraintType::StartToEndOf, target)
    }
    pub fn end_to_end_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.with(ConstraintType::EndToEndOf, target)
    }
    pub fn end_to_start_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.with(ConstraintType::EndToStartOf, target)
    }

    pub fn vertical_bias(mut self, bias: f32) -> Self {
        self.vertical_bias = Some(bias);
        self
    }

    pub fn horizontal_bias(mut self, bias: f32) -> Self {
        self.horizontal_bias = Some(bias);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bias(&self, axis: Axis) -> f32 {
        let bias = match axis {
            Axis::Vertical => self.vertical_bias,
            Axis::Horizontal => self.horizontal_bias,
        };
        bias.unwrap_or(0.5).clamp(0.0, 1.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub constraints: Option<Constraints>,
    #[serde(default)]
    pub margin_top: f32,
    #[serde(default)]
    pub margin_bottom: f32,
    #[serde(default)]
    pub margin_start: f32,
    #[serde(default)]
    pub margin_end: f32,
}

impl Layout {
    pub fn constrained(constraints: Constraints) -> Self {
        Self {
            constraints: Some(constraints),
            ..Self::default()
        }
    }

    pub fn margins(mut self, top: f32, bottom: f32, start: f32, end: f32) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self.margin_start = start;
        self.margin_end = end;
        self
    }

    pub fn has_constraints(&self) -> bool {
        self.constraints.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Margin applied to the edge constrained by `ty`.
    pub fn margin_for(&self, ty: ConstraintType) -> f32 {
        match ty {
            ConstraintType::TopToTopOf | ConstraintType::TopToBottomOf => self.margin_top,
            ConstraintType::BottomToTopOf | ConstraintType::BottomToBottomOf => self.margin_bottom,
            ConstraintType::StartToStartOf | ConstraintType::StartToEndOf => self.margin_start,
            ConstraintType::EndToEndOf | ConstraintType::EndToStartOf => self.margin_end,
        }
    }
}

/// Geometry of a resolved constraint target, in absolute coordinates.
#[derive(Clone, Copy, Debug)]
pub struct TargetGeometry {
    pub position: f32,
    pub extent: f32,
    pub is_scene: bool,
}

/// Candidate center coordinate on one axis for a single constraint.
///
/// Scenes are anchored at their top-left corner, so their far edge is a full
/// extent away; every other node is centered on its position.
pub fn candidate(ty: ConstraintType, target: TargetGeometry, own_extent: f32, margin: f32) -> f32 {
    let (min_edge, max_edge) = if target.is_scene {
        (target.position, target.position + target.extent)
    } else {
        (
            target.position - target.extent / 2.0,
            target.position + target.extent / 2.0,
        )
    };
    let edge = match ty.target_edge() {
        TargetEdge::Min => min_edge,
        TargetEdge::Max => max_edge,
    };
    if ty.constrains_min_edge() {
        edge + own_extent / 2.0 + margin
    } else {
        edge - own_extent / 2.0 - margin
    }
}

/// Combines per-constraint candidates: one is used as is, two are blended by
/// `bias` starting from the smaller value. Anything else is unresolved.
pub fn resolve_axis(candidates: &[f32], bias: f32) -> Option<f32> {
    match candidates {
        [single] => Some(*single),
        [a, b] => {
            let lo = a.min(*b);
            Some(lo + bias * (a - b).abs())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(extent: f32) -> TargetGeometry {
        TargetGeometry {
            position: 0.0,
            extent,
            is_scene: true,
        }
    }

    #[test]
    fn top_to_top_of_scene_places_center_half_height_down() {
        let y = candidate(ConstraintType::TopToTopOf, scene(800.0), 100.0, 10.0);
        assert_eq!(y, 60.0);
    }

    #[test]
    fn bottom_to_bottom_of_scene_uses_full_extent() {
        let y = candidate(ConstraintType::BottomToBottomOf, scene(800.0), 100.0, 0.0);
        assert_eq!(y, 750.0);
    }

    #[test]
    fn top_to_bottom_of_sibling_uses_half_extent() {
        let sibling = TargetGeometry {
            position: 200.0,
            extent: 50.0,
            is_scene: false,
        };
        let y = candidate(ConstraintType::TopToBottomOf, sibling, 20.0, 5.0);
        assert_eq!(y, 200.0 + 25.0 + 10.0 + 5.0);
    }

    #[test]
    fn resolve_axis_bias() {
        assert_eq!(resolve_axis(&[300.0], 0.9), Some(300.0));
        assert_eq!(resolve_axis(&[600.0, 200.0], 0.25), Some(300.0));
        assert_eq!(resolve_axis(&[200.0, 600.0], 0.5), Some(400.0));
        assert_eq!(resolve_axis(&[], 0.5), None);
        assert_eq!(resolve_axis(&[1.0, 2.0, 3.0], 0.5), None);
    }

    #[test]
    fn constraints_keep_declaration_order() {
        let c = Constraints::new()
            .bottom_to_bottom_of("footer")
            .top_to_top_of("header");
        let order: Vec<_> = c.entries.keys().copied().collect();
        assert_eq!(
            order,
            vec![ConstraintType::BottomToBottomOf, ConstraintType::TopToTopOf]
        );
    }
}
