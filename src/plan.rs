//! # Rebase Plan
//!
//! Flattens a [`Forest`] into the linear sequence of rebase instructions the
//! executor works through.
//!
//! The plan is a pre-order traversal: every branch appears after its parent
//! and before its own descendants. Each step names the parent branch to
//! rebase onto (or `None` for a top-level branch, which is only recorded as
//! a baseline) and the branch being rebased.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{BranchNode, Forest};

/// One instruction of the rebase plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebasePlanStep {
    /// Branch to rebase onto, or `None` for a top-level branch.
    pub parent: Option<String>,
    /// Branch being rebased.
    pub child: String,
}

impl RebasePlanStep {
    /// A baseline step for a top-level branch.
    pub fn root(child: impl Into<String>) -> Self {
        Self {
            parent: None,
            child: child.into(),
        }
    }

    /// A step rebasing `child` onto `parent`.
    pub fn onto(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: Some(parent.into()),
            child: child.into(),
        }
    }

    /// Returns true if this step only records a baseline revision.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl fmt::Display for RebasePlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "rebase {} onto {}", self.child, parent),
            None => write!(f, "record {}", self.child),
        }
    }
}

/// Builds the rebase plan for a forest.
pub fn rebase_plan(forest: &Forest) -> Vec<RebasePlanStep> {
    let mut plan = Vec::with_capacity(forest.branch_count());
    for root in forest.roots() {
        collect_steps(None, root, &mut plan);
    }
    plan
}

fn collect_steps(parent: Option<&str>, node: &BranchNode, plan: &mut Vec<RebasePlanStep>) {
    plan.push(RebasePlanStep {
        parent: parent.map(str::to_string),
        child: node.name.clone(),
    });
    for child in &node.children {
        collect_steps(Some(&node.name), child, plan);
    }
}

/// Returns every branch named in the forest, in plan order.
pub fn all_branch_names(forest: &Forest) -> Vec<String> {
    rebase_plan(forest)
        .into_iter()
        .map(|step| step.child)
        .collect()
}
