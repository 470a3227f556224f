//! Syntax module for Folio templates
//!
//! A template is parsed into a tree of [`Stage`] nodes. Each nesting level
//! (the top level, a list body, a condition, a branch) is its own [`Stages`]
//! sequence, and property parents are indices into that same sequence.

use std::fmt;
use std::ops::Index;

use serde::Serialize;

use crate::errors::{ErrorKind, SourceContext};

pub mod parser;

/// Represents a span in the source text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Index of a stage within its own [`Stages`] sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct StageId(pub usize);

/// One node of the template tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    /// Literal output text.
    Html { content: String, span: Span },
    /// A property access. `parent` is set for the `sub` in `name.sub`.
    Property {
        name: String,
        parent: Option<StageId>,
        span: Span,
    },
    /// `name-> it { body }`: iterate the collection named by `parent`.
    List {
        iterator: String,
        parent: StageId,
        body: Stages,
        span: Span,
    },
    /// `if cond { … } else { … }`. Only the last condition stage is tested.
    Conditional {
        condition: Stages,
        if_true: Stages,
        if_false: Stages,
        span: Span,
    },
}

impl Stage {
    pub fn span(&self) -> Span {
        match self {
            Stage::Html { span, .. }
            | Stage::Property { span, .. }
            | Stage::List { span, .. }
            | Stage::Conditional { span, .. } => *span,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::Html { .. } => "html",
            Stage::Property { .. } => "property",
            Stage::List { .. } => "list",
            Stage::Conditional { .. } => "conditional",
        }
    }

    pub fn is_property(&self) -> bool {
        matches!(self, Stage::Property { .. })
    }
}

/// An append-only sequence of sibling stages.
///
/// Parent references can only point backwards at a `Property` already in the
/// sequence, so every chain terminates and no cycle can be built.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Stages(Vec<Stage>);

impl Stages {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a stage after checking its parent reference.
    pub fn push(&mut self, stage: Stage) -> Result<StageId, ErrorKind> {
        let parent = match &stage {
            Stage::Property { parent, .. } => *parent,
            Stage::List { parent, .. } => Some(*parent),
            Stage::Html { .. } | Stage::Conditional { .. } => None,
        };
        if let Some(parent) = parent {
            match self.get(parent) {
                Some(target) if target.is_property() => {}
                _ => return Err(ErrorKind::InvalidParent),
            }
        }
        self.0.push(stage);
        Ok(StageId(self.0.len() - 1))
    }

    pub fn get(&self, id: StageId) -> Option<&Stage> {
        self.0.get(id.0)
    }

    pub fn last(&self) -> Option<&Stage> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stage> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name of the property at `id`, if it is one.
    pub fn property_name(&self, id: StageId) -> Option<&str> {
        match self.get(id)? {
            Stage::Property { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl Index<StageId> for Stages {
    type Output = Stage;

    fn index(&self, id: StageId) -> &Stage {
        &self.0[id.0]
    }
}

impl<'a> IntoIterator for &'a Stages {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A parsed template: its stage tree plus the text it came from, kept for
/// pointing render errors back into the source.
#[derive(Debug, Clone)]
pub struct Template {
    pub source: SourceContext,
    pub stages: Stages,
}

impl Template {
    pub fn name(&self) -> &str {
        &self.source.name
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stages(f, &self.stages, 0)
    }
}

fn write_stages(f: &mut fmt::Formatter<'_>, stages: &Stages, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    for stage in stages {
        match stage {
            Stage::Html { content, .. } => writeln!(f, "{indent}html {content:?}")?,
            Stage::Property { name, parent, .. } => match parent.and_then(|p| stages.property_name(p)) {
                Some(parent) => writeln!(f, "{indent}property {name} (parent: {parent})")?,
                None => writeln!(f, "{indent}property {name}")?,
            },
            Stage::List {
                iterator,
                parent,
                body,
                ..
            } => {
                let source = stages.property_name(*parent).unwrap_or("?");
                writeln!(f, "{indent}list {source} -> {iterator}")?;
                write_stages(f, body, depth + 1)?;
            }
            Stage::Conditional {
                condition,
                if_true,
                if_false,
                ..
            } => {
                writeln!(f, "{indent}conditional")?;
                writeln!(f, "{indent}  condition")?;
                write_stages(f, condition, depth + 2)?;
                writeln!(f, "{indent}  true")?;
                write_stages(f, if_true, depth + 2)?;
                if !if_false.is_empty() {
                    writeln!(f, "{indent}  false")?;
                    write_stages(f, if_false, depth + 2)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(name: &str, parent: Option<StageId>) -> Stage {
        Stage::Property {
            name: name.into(),
            parent,
            span: Span::default(),
        }
    }

    #[test]
    fn test_push_accepts_backward_property_parent() {
        let mut stages = Stages::new();
        let root = stages.push(property("p", None)).unwrap();
        let child = stages.push(property("name", Some(root))).unwrap();
        assert_eq!(child, StageId(1));
        assert_eq!(stages.property_name(root), Some("p"));
    }

    #[test]
    fn test_push_rejects_dangling_parent() {
        let mut stages = Stages::new();
        assert_eq!(
            stages.push(property("name", Some(StageId(0)))),
            Err(ErrorKind::InvalidParent)
        );
        assert!(stages.is_empty());
    }

    #[test]
    fn test_push_rejects_non_property_parent() {
        let mut stages = Stages::new();
        let html = stages
            .push(Stage::Html {
                content: "x".into(),
                span: Span::default(),
            })
            .unwrap();
        let list = Stage::List {
            iterator: "it".into(),
            parent: html,
            body: Stages::new(),
            span: Span::default(),
        };
        assert_eq!(stages.push(list), Err(ErrorKind::InvalidParent));
    }
}
