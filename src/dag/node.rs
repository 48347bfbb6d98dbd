// src/dag/node.rs

use std::borrow::Borrow;
use std::fmt;

/// Separator between the recipe and task halves of a node identifier.
pub const SEPARATOR: char = '.';

/// Identifier of one task of one recipe, e.g. `busybox.do_compile`.
///
/// Kept as the opaque string the build tool emitted; use [`NodeId::split`]
/// to get at the halves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Join a recipe and a task into `recipe.task`.
    pub fn from_parts(recipe: &str, task: &str) -> Self {
        Self(format!("{recipe}{SEPARATOR}{task}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn split(&self) -> TaskNode {
        TaskNode::from_id(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node identifier split into its recipe and task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskNode {
    pub recipe: String,
    pub task: String,
}

impl TaskNode {
    /// Split at the first separator. An identifier without one is all
    /// recipe, with an empty task.
    pub fn from_id(id: &str) -> Self {
        let (recipe, task) = id.split_once(SEPARATOR).unwrap_or((id, ""));
        Self {
            recipe: recipe.to_string(),
            task: task.to_string(),
        }
    }
}

impl fmt::Display for TaskNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.recipe, SEPARATOR, self.task)
    }
}
