//! Enclosing-context tracking for recursive parsing.
//!
//! The stack is an immutable value threaded through each recursive
//! call. Pushing returns a new stack and never mutates shared state, so
//! concurrent builds for different files need no synchronization.

use std::fmt;

/// What kind of construct opened the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Namespace,
    Proc,
}

/// One enclosing namespace or procedure context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub name: String,
}

impl Frame {
    #[must_use]
    pub fn namespace(name: &str) -> Self {
        Self {
            kind: FrameKind::Namespace,
            name: name.to_string(),
        }
    }

    #[must_use]
    pub fn proc(name: &str) -> Self {
        Self {
            kind: FrameKind::Proc,
            name: name.to_string(),
        }
    }
}

/// Ordered set of enclosing contexts, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    /// The top-level scope.
    #[must_use]
    pub const fn root() -> Self {
        Self { frames: Vec::new() }
    }

    /// A new stack with `frame` pushed; `self` is untouched.
    #[must_use]
    pub fn push(&self, frame: Frame) -> Self {
        let mut frames = self.frames.clone();
        frames.push(frame);
        Self { frames }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.frames.is_empty()
    }

    /// Qualified path of the current scope, `::` at top level.
    #[must_use]
    pub fn qualified(&self) -> String {
        if self.frames.is_empty() {
            return "::".to_string();
        }
        let mut out = String::new();
        for frame in &self.frames {
            out.push_str("::");
            out.push_str(&frame.name);
        }
        out
    }
}

impl fmt::Display for ScopeStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}
