//! Portfolio file parser
//!
//! The pest grammar only checks shape; attribute names, value types and the
//! required settings are checked while building the [`Portfolio`].

use std::path::PathBuf;

use pest::{
    error::{Error, InputLocation},
    iterators::Pair,
    Parser,
};
use pest_derive::Parser;

use crate::errors::{ErrorKind, ErrorReporting, FolioError, PhaseContext, SourceContext};
use crate::portfolio::{Link, Persona, Portfolio, Project};

#[derive(Parser)]
#[grammar = "portfolio/grammar.pest"]
struct PortfolioParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse a portfolio file. Paths are returned exactly as written.
pub fn parse(source: &SourceContext) -> Result<Portfolio, FolioError> {
    let ctx = PhaseContext::new(source, "portfolio");
    let mut pairs = PortfolioParser::parse(Rule::portfolio, &source.content)
        .map_err(|e| convert_parse_error(e, &ctx))?;

    let mut builder = PortfolioBuilder::new(&ctx);
    if let Some(program) = pairs.next() {
        for statement in program.into_inner().filter(|p| p.as_rule() == Rule::statement) {
            builder.statement(statement)?;
        }
    }
    builder.finish(source.content.len())
}

// ============================================================================
// BUILDER
// ============================================================================

struct PortfolioBuilder<'a> {
    ctx: &'a PhaseContext<'a>,
    home_template: Option<PathBuf>,
    page_template: Option<PathBuf>,
    outdir: Option<PathBuf>,
    personas: Vec<Persona>,
    links: Vec<Link>,
}

impl<'a> PortfolioBuilder<'a> {
    fn new(ctx: &'a PhaseContext<'a>) -> Self {
        Self {
            ctx,
            home_template: None,
            page_template: None,
            outdir: None,
            personas: Vec::new(),
            links: Vec::new(),
        }
    }

    fn statement(&mut self, pair: Pair<Rule>) -> Result<(), FolioError> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let (Some(keyword), Some(value)) = (inner.next(), inner.next()) else {
            return Err(self.ctx.malformed("incomplete statement", span_of(span)));
        };
        let object = inner.next();
        let text = string_content(&value);

        match keyword.as_str() {
            setting @ ("home_template" | "page_template" | "outdir") => {
                if let Some(object) = object {
                    return Err(self.ctx.malformed(
                        format!("'${setting}' only takes a string"),
                        span_of(object.as_span()),
                    ));
                }
                let slot = match setting {
                    "home_template" => &mut self.home_template,
                    "page_template" => &mut self.page_template,
                    _ => &mut self.outdir,
                };
                if slot.is_some() {
                    return Err(self.ctx.report(
                        ErrorKind::DuplicateSetting {
                            setting: setting.into(),
                        },
                        span_of(span),
                    ));
                }
                *slot = Some(PathBuf::from(text));
            }
            "persona" => {
                let persona = self.persona(text, object)?;
                let page = persona.page_file_name();
                if self.personas.iter().any(|p| p.page_file_name() == page) {
                    return Err(self.ctx.report(
                        ErrorKind::DuplicatePersona {
                            name: persona.name,
                            page,
                        },
                        span_of(value.as_span()),
                    ));
                }
                self.personas.push(persona);
            }
            "link" => {
                let link = self.link(text, object)?;
                self.links.push(link);
            }
            other => {
                return Err(self.ctx.report(
                    ErrorKind::UnknownSetting {
                        setting: other.into(),
                    },
                    span_of(keyword.as_span()),
                ))
            }
        }
        Ok(())
    }

    fn persona(&self, name: String, object: Option<Pair<Rule>>) -> Result<Persona, FolioError> {
        let mut persona = Persona::new(name);
        for (attribute, value) in attributes(object) {
            match attribute.as_str() {
                "color" => persona.color = Some(self.expect_string(value)?),
                "image" => persona.image = Some(self.expect_string(value)?),
                "icon" => persona.icon = Some(self.expect_string(value)?),
                "blurb" | "blerb" => persona.blurb = Some(self.expect_string(value)?),
                "abilities" => persona.abilities = self.expect_strings(value)?,
                "projects" => {
                    persona.projects = self
                        .expect_objects(value)?
                        .into_iter()
                        .map(|object| self.project(object))
                        .collect::<Result<_, _>>()?;
                }
                _ => return Err(self.unknown_attribute("persona", &attribute)),
            }
        }
        Ok(persona)
    }

    fn project(&self, object: Pair<Rule>) -> Result<Project, FolioError> {
        let mut project = Project::default();
        for (attribute, value) in attributes(Some(object)) {
            match attribute.as_str() {
                "name" => project.name = Some(self.expect_string(value)?),
                "date" => project.date = Some(self.expect_string(value)?),
                "link" => project.link = Some(self.expect_string(value)?),
                "desc" | "description" => project.description = Some(self.expect_string(value)?),
                "skills" => project.skills = self.expect_strings(value)?,
                "images" => project.images = self.expect_strings(value)?,
                _ => return Err(self.unknown_attribute("project", &attribute)),
            }
        }
        Ok(project)
    }

    fn link(&self, name: String, object: Option<Pair<Rule>>) -> Result<Link, FolioError> {
        let mut link = Link::new(name);
        for (attribute, value) in attributes(object) {
            match attribute.as_str() {
                "link" => link.link = Some(self.expect_string(value)?),
                "icon" => link.icon = Some(self.expect_string(value)?),
                "color" => link.color = Some(self.expect_string(value)?),
                _ => return Err(self.unknown_attribute("link", &attribute)),
            }
        }
        Ok(link)
    }

    fn finish(self, end: usize) -> Result<Portfolio, FolioError> {
        let missing = |setting: &str| {
            self.ctx.report(
                ErrorKind::MissingSetting {
                    setting: setting.into(),
                },
                (end..end).into(),
            )
        };
        let home_template = self.home_template.clone().ok_or_else(|| missing("home_template"))?;
        let page_template = self.page_template.clone().ok_or_else(|| missing("page_template"))?;
        let outdir = self.outdir.clone().ok_or_else(|| missing("outdir"))?;
        Ok(Portfolio {
            home_template,
            page_template,
            outdir,
            personas: self.personas,
            links: self.links,
        })
    }

    // ------------------------------------------------------------------
    // Value checks
    // ------------------------------------------------------------------

    fn expect_string(&self, value: Pair<Rule>) -> Result<String, FolioError> {
        match value.as_rule() {
            Rule::string => Ok(string_content(&value)),
            _ => Err(self.ctx.malformed("expected a string", span_of(value.as_span()))),
        }
    }

    fn expect_strings(&self, value: Pair<Rule>) -> Result<Vec<String>, FolioError> {
        if value.as_rule() != Rule::array {
            return Err(self.ctx.malformed("expected an array of strings", span_of(value.as_span())));
        }
        value.into_inner().map(|item| self.expect_string(item)).collect()
    }

    fn expect_objects<'i>(&self, value: Pair<'i, Rule>) -> Result<Vec<Pair<'i, Rule>>, FolioError> {
        if value.as_rule() != Rule::array {
            return Err(self.ctx.malformed("expected an array of objects", span_of(value.as_span())));
        }
        value
            .into_inner()
            .map(|item| match item.as_rule() {
                Rule::object => Ok(item),
                _ => Err(self.ctx.malformed("expected an object", span_of(item.as_span()))),
            })
            .collect()
    }

    fn unknown_attribute(&self, object: &str, attribute: &Pair<Rule>) -> FolioError {
        self.ctx.report(
            ErrorKind::UnknownAttribute {
                object: object.into(),
                attribute: attribute.as_str().into(),
            },
            span_of(attribute.as_span()),
        )
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// `(name, value)` pairs of an object's attributes, in source order.
fn attributes(object: Option<Pair<Rule>>) -> Vec<(Pair<Rule>, Pair<Rule>)> {
    let Some(object) = object else {
        return Vec::new();
    };
    object
        .into_inner()
        .filter_map(|attribute| {
            let mut inner = attribute.into_inner();
            Some((inner.next()?, inner.next()?))
        })
        .collect()
}

fn string_content(pair: &Pair<Rule>) -> String {
    pair.clone()
        .into_inner()
        .next()
        .map(|inner| inner.as_str().to_string())
        .unwrap_or_default()
}

fn span_of(span: pest::Span) -> miette::SourceSpan {
    (span.start()..span.end()).into()
}

fn convert_parse_error(error: Error<Rule>, ctx: &PhaseContext) -> FolioError {
    let span = match error.location {
        InputLocation::Pos(pos) => pos..pos,
        InputLocation::Span((start, end)) => start..end,
    };
    let error = error.renamed_rules(|rule| {
        match rule {
            Rule::EOI => "end of file",
            Rule::statement => "'$' statement",
            Rule::attribute => "attribute",
            Rule::ident => "identifier",
            Rule::string => "string",
            Rule::array => "array",
            Rule::object => "object",
            _ => "token",
        }
        .to_string()
    });
    ctx.malformed(error.variant.message().into_owned(), span.into())
        .with_help("statements look like `$persona \"Name\" { color: \"#fff\"; }`")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
        // settings
        $home_template "home.html"
        $page_template `page.html`
        $outdir "out"

        /* first persona */
        $persona "Developer" {
            color: "#123456";
            blerb: "Writes code.";
            abilities: ["Rust", "C",];
            projects: [
                { name: "folio"; date: "2024"; desc: "A generator"; skills: ["rust"]; },
                { name: "other"; }
            ];
        }

        $link "GitHub" { link: "https://github.com"; icon: "gh.svg"; }
    "##;

    fn parse_text(text: &str) -> Result<Portfolio, FolioError> {
        parse(&SourceContext::from_file("portfolio.txt", text))
    }

    #[test]
    fn test_parse_sample() {
        let portfolio = parse_text(SAMPLE).unwrap();
        assert_eq!(portfolio.home_template, PathBuf::from("home.html"));
        assert_eq!(portfolio.page_template, PathBuf::from("page.html"));
        assert_eq!(portfolio.outdir, PathBuf::from("out"));
        assert_eq!(portfolio.personas.len(), 1);
        let dev = &portfolio.personas[0];
        assert_eq!(dev.blurb.as_deref(), Some("Writes code."));
        assert_eq!(dev.abilities, vec!["Rust", "C"]);
        assert_eq!(dev.projects.len(), 2);
        assert_eq!(dev.projects[0].description.as_deref(), Some("A generator"));
        assert_eq!(dev.projects[1].skills.len(), 0);
        assert_eq!(portfolio.links[0].icon.as_deref(), Some("gh.svg"));
    }

    #[test]
    fn test_missing_setting() {
        let err = parse_text(r#"$home_template "h" $page_template "p""#).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::MissingSetting {
                setting: "outdir".into()
            }
        );
    }

    #[test]
    fn test_duplicate_setting() {
        let err = parse_text(r#"$outdir "a" $outdir "b""#).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DuplicateSetting { .. }));
    }

    #[test]
    fn test_personas_sharing_a_page_are_rejected() {
        let settings = r#"$home_template "h" $page_template "p" $outdir "o" "#;
        let err = parse_text(&format!(r#"{settings} $persona "Dev" $persona "Dev""#)).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::DuplicatePersona {
                name: "Dev".into(),
                page: "Dev.html".into()
            }
        );
        assert_eq!(err.diagnostic_info.error_code, "folio::portfolio::duplicate_persona");

        let err = parse_text(&format!(r#"{settings} $persona "a/b" $persona "a_b""#)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DuplicatePersona { .. }));
    }

    #[test]
    fn test_unknown_attribute() {
        let err = parse_text(r#"$persona "X" { height: "2m"; }"#).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnknownAttribute {
                object: "persona".into(),
                attribute: "height".into()
            }
        );
    }

    #[test]
    fn test_wrong_value_type() {
        let err = parse_text(r#"$persona "X" { abilities: "all"; }"#).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedConfig { .. }));
    }

    #[test]
    fn test_syntax_errors_are_config_errors() {
        for text in [
            r#"$persona "X" { color: "red" }"#,
            r#"$outdir "unterminated"#,
            "/* never closed",
            r#"$persona "X" { abilities: ["a", "b"; }"#,
        ] {
            let err = parse_text(text).unwrap_err();
            assert_eq!(err.category(), crate::errors::ErrorCategory::Config, "{text}");
        }
    }
}
