//! Folio Template Parser
//!
//! Single-pass recursive descent over the template text. Text outside
//! `<$ … >` becomes `Html` stages; directives become `Property`, `List` and
//! `Conditional` stages. Each recursive call is told which byte ends its block
//! (`}` for nested blocks, nothing for the top level). The first error stops
//! parsing and no partial tree is returned.

use crate::errors::{to_source_span, ErrorKind, ErrorReporting, FolioError, PhaseContext, SourceContext};
use crate::syntax::{Span, Stage, StageId, Stages, Template};

const DIRECTIVE_OPEN: &str = "<$";

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse a template into its stage tree.
pub fn parse(source: SourceContext) -> Result<Template, FolioError> {
    let stages = {
        let ctx = PhaseContext::new(&source, "template");
        let mut parser = TemplateParser::new(&source.content, ctx);
        parser.parse_template()?
    };
    Ok(Template { source, stages })
}

/// Parse template text that did not come from a file.
pub fn parse_str(text: &str) -> Result<Template, FolioError> {
    parse(SourceContext::inline(text))
}

// ============================================================================
// PARSER STATE
// ============================================================================

struct TemplateParser<'s> {
    text: &'s str,
    bytes: &'s [u8],
    pos: usize,
    ctx: PhaseContext<'s>,
}

impl<'s> TemplateParser<'s> {
    fn new(text: &'s str, ctx: PhaseContext<'s>) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            ctx,
        }
    }

    fn parse_template(&mut self) -> Result<Stages, FolioError> {
        let stages = self.fill_stages(None)?;
        tracing::trace!(template = %self.ctx.source.name, stages = stages.len(), "parsed template");
        Ok(stages)
    }

    // ------------------------------------------------------------------
    // Text and blocks
    // ------------------------------------------------------------------

    /// Parse stages until `end` (left unconsumed) or end of input.
    ///
    /// Inside a block the whitespace right after `{` and right before `}` is
    /// dropped; top-level text is kept verbatim.
    fn fill_stages(&mut self, end: Option<u8>) -> Result<Stages, FolioError> {
        let mut stages = Stages::new();
        if end.is_some() {
            self.skip_ws();
        }

        loop {
            let start = self.pos;
            while let Some(byte) = self.peek() {
                if Some(byte) == end || self.at_directive() {
                    break;
                }
                self.pos += 1;
            }

            let mut text = &self.text[start..self.pos];
            if end.is_some() && end == self.peek() {
                text = text.trim_end();
            }
            if !text.is_empty() {
                self.push(
                    &mut stages,
                    Stage::Html {
                        content: text.to_string(),
                        span: Span::new(start, start + text.len()),
                    },
                )?;
            }

            match self.peek() {
                None => return Ok(stages),
                Some(byte) if Some(byte) == end => return Ok(stages),
                Some(_) => {
                    let open = self.pos;
                    self.pos += DIRECTIVE_OPEN.len();
                    self.parse_directive(open, &mut stages)?;
                }
            }
        }
    }

    /// Parse a `{ … }` block; the cursor must be on `{`.
    fn parse_block(&mut self) -> Result<Stages, FolioError> {
        let open = self.pos;
        self.pos += 1;
        let body = self.fill_stages(Some(b'}'))?;
        if !self.eat(b'}') {
            return Err(self.error(ErrorKind::UnclosedBlock, Span::new(open, self.text.len())));
        }
        Ok(body)
    }

    // ------------------------------------------------------------------
    // Directives
    // ------------------------------------------------------------------

    /// Parse the inside of `<$ … >`; the cursor is just past `<$`.
    fn parse_directive(&mut self, open: usize, stages: &mut Stages) -> Result<(), FolioError> {
        let mut items = 0usize;
        let mut last_property: Option<StageId> = None;

        loop {
            self.skip_ws();
            let here = self.pos;
            match self.peek() {
                None => {
                    return Err(self.error(
                        ErrorKind::UnterminatedDirective,
                        Span::new(open, self.text.len()),
                    ))
                }
                Some(b'>') => {
                    self.pos += 1;
                    if items == 0 {
                        return Err(self.error(ErrorKind::EmptyDirective, Span::new(open, self.pos)));
                    }
                    return Ok(());
                }
                Some(b'-') if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    let Some(parent) = last_property else {
                        return Err(self.error(ErrorKind::MisplacedArrow, Span::new(here, self.pos)));
                    };
                    let list = self.parse_list(parent, here)?;
                    self.push(stages, list)?;
                    last_property = None;
                }
                Some(b'.') => {
                    self.pos += 1;
                    let Some(parent) = last_property else {
                        return Err(self.error(ErrorKind::MisplacedDot, Span::new(here, self.pos)));
                    };
                    let id = self.parse_child_property(parent, stages)?;
                    last_property = Some(id);
                }
                Some(byte) if is_ident_start(byte) => {
                    let (name, span) = self.identifier().unwrap_or_default();
                    if name == "if" {
                        let conditional = self.parse_conditional(here, open)?;
                        self.push(stages, conditional)?;
                        last_property = None;
                    } else {
                        let id = self.push(
                            stages,
                            Stage::Property {
                                name,
                                parent: None,
                                span,
                            },
                        )?;
                        last_property = Some(id);
                    }
                }
                Some(_) => return Err(self.unexpected_character()),
            }
            items += 1;
        }
    }

    /// `.name` after a property; the cursor is just past the dot.
    fn parse_child_property(&mut self, parent: StageId, stages: &mut Stages) -> Result<StageId, FolioError> {
        let Some((name, span)) = self.identifier() else {
            return Err(self.missing_identifier("'.'"));
        };
        self.push(
            stages,
            Stage::Property {
                name,
                parent: Some(parent),
                span,
            },
        )
    }

    /// `-> it { body }`; the cursor is just past the arrow.
    fn parse_list(&mut self, parent: StageId, start: usize) -> Result<Stage, FolioError> {
        let Some((iterator, _)) = self.identifier() else {
            return Err(self.missing_identifier("'->' in list tag"));
        };
        self.skip_ws();
        if self.peek() != Some(b'{') {
            return Err(self.missing_block("list tag"));
        }
        let body = self.parse_block()?;
        Ok(Stage::List {
            iterator,
            parent,
            body,
            span: Span::new(start, self.pos),
        })
    }

    /// `if cond { … } [else { … }]`; the cursor is just past `if`.
    fn parse_conditional(&mut self, start: usize, open: usize) -> Result<Stage, FolioError> {
        let condition = self.parse_condition(open)?;
        if condition.is_empty() {
            return Err(self.error(ErrorKind::MissingCondition, Span::new(start, self.pos)));
        }
        let if_true = self.parse_block()?;

        let mut if_false = Stages::new();
        self.skip_ws();
        let else_start = self.pos;
        if let Some((keyword, span)) = self.identifier() {
            if keyword != "else" {
                return Err(self
                    .error(ErrorKind::UnexpectedCharacter { found: keyword_head(&keyword) }, span)
                    .with_help("only `else { … }` may follow the block of an if tag"));
            }
            self.skip_ws();
            if self.peek() != Some(b'{') {
                return Err(self.missing_block("else tag"));
            }
            if_false = self.parse_block()?;
        } else {
            self.pos = else_start;
        }

        self.skip_ws();
        if self.peek() != Some(b'>') {
            let construct = "if tag".to_string();
            return Err(match self.peek() {
                None => self.error(ErrorKind::UnterminatedDirective, Span::new(open, self.text.len())),
                Some(_) => self.error(ErrorKind::MissingDirectiveEnd { construct }, Span::new(self.pos, self.pos + 1)),
            });
        }

        Ok(Stage::Conditional {
            condition,
            if_true,
            if_false,
            span: Span::new(start, self.pos),
        })
    }

    /// A property chain up to (not including) the `{` of the true branch.
    fn parse_condition(&mut self, open: usize) -> Result<Stages, FolioError> {
        let mut condition = Stages::new();
        let mut last_property: Option<StageId> = None;

        loop {
            self.skip_ws();
            let here = self.pos;
            match self.peek() {
                Some(b'{') => return Ok(condition),
                None => {
                    return Err(self.error(
                        ErrorKind::UnterminatedDirective,
                        Span::new(open, self.text.len()),
                    ))
                }
                Some(b'>') if condition.is_empty() => {
                    return Err(self.error(ErrorKind::MissingCondition, Span::new(here, here + 1)))
                }
                Some(b'>') => return Err(self.missing_block("if tag")),
                Some(b'.') => {
                    self.pos += 1;
                    let Some(parent) = last_property else {
                        return Err(self.error(ErrorKind::MisplacedDot, Span::new(here, self.pos)));
                    };
                    last_property = Some(self.parse_child_property(parent, &mut condition)?);
                }
                Some(byte) if is_ident_start(byte) => {
                    let (name, span) = self.identifier().unwrap_or_default();
                    let id = self.push(
                        &mut condition,
                        Stage::Property {
                            name,
                            parent: None,
                            span,
                        },
                    )?;
                    last_property = Some(id);
                }
                Some(_) => return Err(self.unexpected_character()),
            }
        }
    }

    // ------------------------------------------------------------------
    // Lexing helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_directive(&self) -> bool {
        self.bytes[self.pos..].starts_with(DIRECTIVE_OPEN.as_bytes())
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// Reads an identifier after optional whitespace.
    fn identifier(&mut self) -> Option<(String, Span)> {
        self.skip_ws();
        let start = self.pos;
        if !self.peek().is_some_and(is_ident_start) {
            return None;
        }
        while self.peek().is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        Some((self.text[start..self.pos].to_string(), Span::new(start, self.pos)))
    }

    // ------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------

    fn push(&self, stages: &mut Stages, stage: Stage) -> Result<StageId, FolioError> {
        let span = stage.span();
        stages.push(stage).map_err(|kind| self.error(kind, span))
    }

    fn error(&self, kind: ErrorKind, span: Span) -> FolioError {
        self.ctx.report(kind, to_source_span(span))
    }

    fn missing_identifier(&self, after: &str) -> FolioError {
        self.error(
            ErrorKind::MissingIdentifier { after: after.into() },
            Span::new(self.pos, self.pos),
        )
    }

    fn missing_block(&self, construct: &str) -> FolioError {
        self.error(
            ErrorKind::MissingBlock {
                construct: construct.into(),
            },
            Span::new(self.pos, self.pos),
        )
    }

    fn unexpected_character(&self) -> FolioError {
        let found = self.text[self.pos..].chars().next().unwrap_or('\0');
        self.error(
            ErrorKind::UnexpectedCharacter { found },
            Span::new(self.pos, self.pos + found.len_utf8()),
        )
    }
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn keyword_head(word: &str) -> char {
    word.chars().next().unwrap_or('\0')
}
