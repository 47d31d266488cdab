//! The degree's requirement tree.
//!
//! A fixed two-level hierarchy: top-level requirement groups, some of which
//! carry an ordered list of sub-requirements. Child bounds are independent of
//! their parent's bounds and need not sum to them.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Credits required for graduation.
pub const TOTAL_CREDITS: u32 = 120;

/// Requirement carrying the mandatory seminar and project components.
pub const SEMINAR_PROJECT_ID: &str = "A3";

/// Requirement carrying the mandatory thesis.
pub const THESIS_ID: &str = "A4";

/// A node in the requirement tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementNode {
    /// Unique identifier, matched against a course's group (or sub-group).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Minimum credits.
    pub min: u32,
    /// Maximum credits.
    pub max: u32,
    /// Marks `min == max`; evaluated with the same rules as any other node.
    #[serde(default)]
    pub exact: bool,
    /// Sub-requirements, one level deep.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RequirementNode>,
}

impl RequirementNode {
    pub fn new(id: &str, label: &str, min: u32, max: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            min,
            max,
            exact: false,
            children: Vec::new(),
        }
    }

    pub fn exact(id: &str, label: &str, credits: u32) -> Self {
        Self {
            exact: true,
            ..Self::new(id, label, credits, credits)
        }
    }

    pub fn with_children(mut self, children: Vec<RequirementNode>) -> Self {
        self.children = children;
        self
    }
}

/// The program's requirement tree, in declaration order.
pub fn degree_rules() -> &'static [RequirementNode] {
    static RULES: OnceLock<Vec<RequirementNode>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            RequirementNode::new("A1", "Software System Science", 30, 69).with_children(vec![
                RequirementNode::new("S1", "Theory", 6, 30),
                RequirementNode::new("S2", "Systems", 6, 30),
                RequirementNode::new("S3", "Software", 6, 30),
            ]),
            RequirementNode::new("A2", "Domain-specific", 0, 39),
            RequirementNode::exact(SEMINAR_PROJECT_ID, "Seminar & Project", 9),
            RequirementNode::exact(THESIS_ID, "Thesis", 30),
            RequirementNode::new("A5", "International Experience", 12, 27),
        ]
    })
}
