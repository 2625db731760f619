//! Branching fractal trees.
//!
//! A tree is grown from a [`BranchConfig`]: a trunk of a given length
//! and heading, and a list of [`BranchRule`]s that each spawn one child
//! branch at the tip of every branch, turned and scaled relative to its
//! parent. Growth uses an explicit stack, so depth is bounded only by
//! the config and not by the call stack.

use crate::types::NodeId;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

#[derive(Debug)]
pub struct TreeNode {
    pub pos: Vec2,
    /// Depth of the branch ending at this node; the root is 0 and has
    /// no branch.
    pub depth: u32,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// How a child branch relates to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchRule {
    /// Heading change in radians, counter-clockwise.
    pub turn: f32,
    /// Length multiplier.
    pub scale: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    pub root: Vec2,
    pub heading: f32,
    pub length: f32,
    pub max_depth: u32,
    /// Branches shorter than this are not grown.
    pub min_length: f32,
    pub rules: Vec<BranchRule>,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self::binary()
    }
}

impl BranchConfig {
    /// Two children at ±30°, each 70% of the parent.
    pub fn binary() -> Self {
        Self {
            root: Vec2::new(0.0, -3.0),
            heading: FRAC_PI_2,
            length: 2.0,
            max_depth: 6,
            min_length: 0.1,
            rules: vec![
                BranchRule {
                    turn: PI / 6.0,
                    scale: 0.7,
                },
                BranchRule {
                    turn: -PI / 6.0,
                    scale: 0.7,
                },
            ],
        }
    }

    /// Left, right and a near-straight middle child with uneven scales.
    pub fn ternary() -> Self {
        Self {
            root: Vec2::new(0.0, -3.2),
            heading: FRAC_PI_2,
            length: 2.2,
            max_depth: 7,
            min_length: 0.08,
            rules: vec![
                BranchRule {
                    turn: PI / 5.0,
                    scale: 0.65,
                },
                BranchRule {
                    turn: -PI / 5.0,
                    scale: 0.68,
                },
                BranchRule {
                    turn: PI / 20.0,
                    scale: 0.6,
                },
            ],
        }
    }

    /// Upper bound on the branches [`Tree::grow`] can create: one per
    /// rule path of length `0..=max_depth`. Saturates at `u64::MAX`.
    pub fn max_branches(&self) -> u64 {
        let fanout = self.rules.len() as u64;
        let mut level: u64 = 1;
        let mut total: u64 = 1;
        for _ in 0..self.max_depth {
            level = level.saturating_mul(fanout);
            total = total.saturating_add(level);
        }
        total
    }
}

/// A drawn branch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    pub depth: u32,
}

impl TreeNode {
    pub fn new_root(pos: Vec2) -> Self {
        Self {
            pos,
            depth: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn new_child(pos: Vec2, depth: u32, parent: NodeId) -> Self {
        Self {
            pos,
            depth,
            parent: Some(parent),
            children: Vec::new(),
        }
    }
}

impl Tree {
    pub fn new(root_pos: Vec2) -> Self {
        Self {
            nodes: vec![TreeNode::new_root(root_pos)],
        }
    }

    pub fn add_child(&mut self, parent: NodeId, pos: Vec2, depth: u32) -> NodeId {
        let id: usize = self.nodes.len();
        self.nodes.push(TreeNode::new_child(pos, depth, parent));
        self.nodes[parent].children.push(id);
        id
    }

    /// Grows a full tree from `cfg`.
    ///
    /// The trunk has depth 0. A branch at depth `d` is skipped when
    /// `d > max_depth` or its length is below `min_length`; otherwise it
    /// is added, and while `d < max_depth` one child per rule is queued.
    /// Nodes are created in depth-first order, children in rule order.
    pub fn grow(cfg: &BranchConfig) -> Self {
        let mut tree = Tree::new(cfg.root);

        // (parent node, heading, length, depth)
        let mut stack: Vec<(NodeId, f32, f32, u32)> = vec![(0, cfg.heading, cfg.length, 0)];
        while let Some((parent, heading, length, depth)) = stack.pop() {
            if depth > cfg.max_depth || length < cfg.min_length {
                continue;
            }
            let start = tree.nodes[parent].pos;
            let end = start + Vec2::from_angle(heading) * length;
            let id = tree.add_child(parent, end, depth);

            if depth < cfg.max_depth {
                for rule in cfg.rules.iter().rev() {
                    let next = length * rule.scale;
                    stack.push((id, heading + rule.turn, next, depth + 1));
                }
            }
        }
        tree
    }

    /// One segment per parent/child edge, in node order.
    pub fn segments(&self) -> Vec<Segment> {
        self.nodes
            .iter()
            .filter_map(|n| {
                n.parent.map(|p| Segment {
                    start: self.nodes[p].pos,
                    end: n.pos,
                    depth: n.depth,
                })
            })
            .collect()
    }

    /// Deepest branch depth in the tree.
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}
