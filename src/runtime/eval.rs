//! The generator: walks a stage tree against a portfolio and renders text.

use crate::errors::{to_source_span, ErrorKind, ErrorReporting, FolioError, PhaseContext};
use crate::portfolio::{Persona, Portfolio};
use crate::runtime::{registry, Scopes, Variable};
use crate::syntax::{Span, Stage, Stages, Template};

/// Render `template` for the home page (`selected == None`) or for the page
/// of the persona at index `selected`.
///
/// The first failure aborts the render; no partial output is returned.
pub fn render(template: &Template, portfolio: &Portfolio, selected: Option<usize>) -> Result<String, FolioError> {
    let mut generator = Generator::new(template, portfolio, selected);
    generator.fill(&template.stages)?;
    tracing::debug!(
        template = template.name(),
        page = ?selected,
        bytes = generator.output.len(),
        "rendered page"
    );
    Ok(generator.output)
}

/// State of one render pass. Each pass owns its scopes and output buffer;
/// the template and portfolio are only borrowed.
pub struct Generator<'a> {
    portfolio: &'a Portfolio,
    selected: Option<usize>,
    scopes: Scopes<'a>,
    output: String,
    ctx: PhaseContext<'a>,
}

impl<'a> Generator<'a> {
    pub fn new(template: &'a Template, portfolio: &'a Portfolio, selected: Option<usize>) -> Self {
        Self {
            portfolio,
            selected,
            scopes: Scopes::new(),
            output: String::with_capacity(template.source.content.len()),
            ctx: PhaseContext::new(&template.source, "render"),
        }
    }

    /// Render a stage sequence in order, stopping at the first error.
    pub fn fill(&mut self, stages: &'a Stages) -> Result<(), FolioError> {
        for stage in stages {
            match stage {
                Stage::Html { content, .. } => self.output.push_str(content),
                Stage::Property { .. } => {
                    if let Some(text) = self.resolve(stages, stage)?.as_output() {
                        self.output.push_str(text);
                    }
                }
                Stage::List {
                    iterator,
                    parent,
                    body,
                    span,
                } => {
                    let source = stages
                        .get(*parent)
                        .ok_or_else(|| self.error(ErrorKind::InvalidParent, *span))?;
                    let collection = self.resolve(stages, source)?;
                    self.iterate(iterator, collection, body, *span)?;
                }
                Stage::Conditional {
                    condition,
                    if_true,
                    if_false,
                    span,
                } => {
                    let value = match condition.last() {
                        Some(last) => self.resolve(condition, last)?,
                        None => Variable::None,
                    };
                    match value.as_condition() {
                        Some(true) => self.fill(if_true)?,
                        Some(false) => self.fill(if_false)?,
                        None => {
                            return Err(self
                                .error(ErrorKind::NotACondition, *span)
                                .with_help(format!("the condition is {}, not a boolean", value.type_name())))
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Run `body` once per element of `collection`, with `iterator` bound in
    /// a fresh scope that is dropped again afterwards.
    fn iterate(&mut self, iterator: &str, collection: Variable<'a>, body: &'a Stages, span: Span) -> Result<(), FolioError> {
        let elements: Vec<Variable<'a>> = match collection {
            Variable::StringList(items) => items.iter().map(|s| Variable::String(s)).collect(),
            Variable::PersonaList(items) => items
                .iter()
                .enumerate()
                .map(|(index, data)| Variable::Persona {
                    data,
                    selected: self.selected == Some(index),
                })
                .collect(),
            Variable::ProjectList(items) => items.iter().map(Variable::Project).collect(),
            Variable::LinkList(items) => items.iter().map(Variable::Link).collect(),
            other => {
                return Err(self
                    .error(ErrorKind::NotAList, span)
                    .with_help(format!("the property is {}", other.type_name())))
            }
        };

        for element in elements {
            self.scopes.push(iterator, element);
            let result = self.fill(body);
            self.scopes.pop();
            result?;
        }
        Ok(())
    }

    /// Resolve a property stage. Resolving a child resolves its parent
    /// chain first; only the stage itself is ever rendered by the caller.
    fn resolve(&self, stages: &'a Stages, stage: &'a Stage) -> Result<Variable<'a>, FolioError> {
        let Stage::Property { name, parent, span } = stage else {
            return Err(self
                .error(ErrorKind::InvalidParent, stage.span())
                .with_help(format!("found a {} stage", stage.type_name())));
        };
        let Some(parent) = parent else {
            return self.resolve_root(name, *span);
        };
        let parent_stage = stages
            .get(*parent)
            .ok_or_else(|| self.error(ErrorKind::InvalidParent, *span))?;
        let parent_value = self.resolve(stages, parent_stage)?;
        registry::field(parent_value, name).map_err(|kind| {
            let help = parent_value
                .record_name()
                .map(|record| format!("{record} properties: {}", registry::field_names(record).join(", ")));
            let error = self.error(kind, *span);
            match help {
                Some(help) => error.with_help(help),
                None => error,
            }
        })
    }

    /// Bare names: loop variables first, then root collections, then the
    /// fields of the innermost persona in scope or of the page's persona.
    fn resolve_root(&self, name: &str, span: Span) -> Result<Variable<'a>, FolioError> {
        if let Some(value) = self.scopes.get(name) {
            return Ok(value);
        }
        if let Some(value) = registry::root_value(self.portfolio, name) {
            return Ok(value);
        }
        let receiver = self
            .scopes
            .innermost_persona()
            .or_else(|| self.page_persona().map(|persona| (persona, true)));
        if let Some(value) = receiver.and_then(|(persona, selected)| registry::persona_field(persona, selected, name)) {
            return Ok(value);
        }

        let mut known = registry::field_names("root");
        if receiver.is_some() {
            known.extend(registry::field_names("persona"));
        }
        Err(self
            .ctx
            .unknown_property(name, to_source_span(span))
            .with_help(format!("available here: {}", known.join(", "))))
    }

    fn page_persona(&self) -> Option<&'a Persona> {
        self.selected.and_then(|index| self.portfolio.personas.get(index))
    }

    fn error(&self, kind: ErrorKind, span: Span) -> FolioError {
        self.ctx.report(kind, to_source_span(span))
    }
}
