//! # Branch Tree Configuration
//!
//! This module defines the in-memory representation of the `.gitrebranch`
//! file and the parser that builds it. The file describes a forest of
//! branches using indentation, one branch per line:
//!
//! ```text
//! develop
//!     feature-a
//!         feature-a-sub
//!     feature-b
//! ```
//!
//! ## Grammar
//!
//! - Blank lines are ignored and trailing whitespace is stripped.
//! - Each remaining line is optional indentation (spaces or tabs, one column
//!   each) followed by a single branch name without whitespace.
//! - The indent unit is taken from the first indented line. Every indented
//!   line after that must use a multiple of it.
//! - A line may stay at the depth of the previous line (sibling), go exactly
//!   one level deeper (child of the previous line), or return to any
//!   shallower level (sibling of that ancestor).
//!
//! ## Key Components
//!
//! - **`BranchNode`**: One branch with its ordered children.
//! - **`Forest`**: The ordered list of top-level branches. Its `Display`
//!   implementation renders the tree back with four spaces per level, which
//!   is what `--dry-run` prints.
//! - **`parse` / `from_file`**: Entry points for parsing.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::error::{Error, Result};

static LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\t ]*)(\S+)$").expect("line pattern is valid"));

/// Indentation used when rendering a forest.
const RENDER_INDENT: &str = "    ";

/// A single branch in the configuration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchNode {
    /// The branch name as written in the configuration.
    pub name: String,
    /// 1-based line number where the branch is declared.
    pub line: usize,
    /// Branches that are rebased onto this one, in declaration order.
    pub children: Vec<BranchNode>,
}

impl BranchNode {
    /// Creates a node without children.
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
            children: Vec::new(),
        }
    }

    /// Appends a child branch.
    pub fn add_child(&mut self, child: BranchNode) {
        self.children.push(child);
    }

    fn render(&self, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}{}", RENDER_INDENT.repeat(depth), self.name)?;
        for child in &self.children {
            child.render(depth + 1, f)?;
        }
        Ok(())
    }
}

/// The parsed configuration: an ordered list of independent branch trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    roots: Vec<BranchNode>,
}

impl Forest {
    /// Creates a forest from top-level nodes.
    pub fn new(roots: Vec<BranchNode>) -> Self {
        Self { roots }
    }

    /// Top-level branches in declaration order.
    pub fn roots(&self) -> &[BranchNode] {
        &self.roots
    }

    /// Returns true if the configuration declares no branches.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of branches in the forest.
    pub fn branch_count(&self) -> usize {
        fn count(node: &BranchNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }
}

impl fmt::Display for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for root in &self.roots {
            root.render(0, f)?;
        }
        Ok(())
    }
}

/// Reads and parses a configuration file.
pub fn from_file(path: &Path) -> Result<Forest> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };
    let forest = parse(&content)?;
    debug!(
        "loaded {} branches from {}",
        forest.branch_count(),
        path.display()
    );
    Ok(forest)
}

/// Parses configuration text into a forest.
///
/// Nodes are kept on an ownership stack where `stack[d]` is the open node
/// at depth `d`. A new line at depth `d` first closes every open node at
/// depth `d` or deeper, moving each into its parent (or into the forest at
/// depth 0), and then opens itself.
pub fn parse(content: &str) -> Result<Forest> {
    let mut roots = Vec::new();
    let mut stack: Vec<BranchNode> = Vec::new();
    let mut declared: HashMap<String, usize> = HashMap::new();
    let mut indent_unit = None;

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim_end();
        if trimmed.is_empty() {
            continue;
        }

        let captures = LINE_PATTERN
            .captures(trimmed)
            .ok_or_else(|| Error::MalformedLine {
                line,
                content: trimmed.to_string(),
            })?;
        let indent = captures[1].len();
        let name = &captures[2];

        let depth = depth_for(indent, &mut indent_unit, line)?;
        if depth > stack.len() {
            return Err(Error::InvalidNesting { line, depth });
        }

        if let Some(first_line) = declared.insert(name.to_string(), line) {
            return Err(Error::DuplicateBranch {
                branch: name.to_string(),
                line,
                first_line,
            });
        }

        close_to_depth(&mut stack, &mut roots, depth);
        stack.push(BranchNode::new(name, line));
    }

    close_to_depth(&mut stack, &mut roots, 0);
    Ok(Forest::new(roots))
}

/// Converts an indentation width into a nesting depth, establishing the
/// indent unit on the first indented line.
fn depth_for(indent: usize, unit: &mut Option<usize>, line: usize) -> Result<usize> {
    if indent == 0 {
        return Ok(0);
    }
    let unit = *unit.get_or_insert(indent);
    if indent % unit != 0 {
        return Err(Error::MalformedIndentation { line, indent, unit });
    }
    Ok(indent / unit)
}

fn close_to_depth(stack: &mut Vec<BranchNode>, roots: &mut Vec<BranchNode>, depth: usize) {
    while stack.len() > depth {
        let Some(node) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some(parent) => parent.add_child(node),
            None => roots.push(node),
        }
    }
}
