use crate::portfolio::{Link, Persona, Project};

/// A value produced while rendering. Borrows from the portfolio, so
/// variables are cheap to copy into scopes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Variable<'a> {
    #[default]
    None,
    Bool(bool),
    String(&'a str),
    /// A persona, plus whether it is the persona whose page is being rendered.
    Persona {
        data: &'a Persona,
        selected: bool,
    },
    Project(&'a Project),
    Link(&'a Link),
    StringList(&'a [String]),
    PersonaList(&'a [Persona]),
    ProjectList(&'a [Project]),
    LinkList(&'a [Link]),
}

impl<'a> Variable<'a> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Variable::None => "nothing",
            Variable::Bool(_) => "a boolean",
            Variable::String(_) => "a string",
            Variable::Persona { .. } => "a persona",
            Variable::Project(_) => "a project",
            Variable::Link(_) => "a link",
            Variable::StringList(_) => "a list of strings",
            Variable::PersonaList(_) => "a list of personas",
            Variable::ProjectList(_) => "a list of projects",
            Variable::LinkList(_) => "a list of links",
        }
    }

    /// The record kind name used in field lookup errors.
    pub fn record_name(&self) -> Option<&'static str> {
        match self {
            Variable::Persona { .. } => Some("persona"),
            Variable::Project(_) => Some("project"),
            Variable::Link(_) => Some("link"),
            _ => None,
        }
    }

    /// Text appended to the output when a property resolves to this value.
    pub fn as_output(&self) -> Option<&'a str> {
        match self {
            Variable::String(s) => Some(*s),
            _ => None,
        }
    }

    /// The value of an `if` condition. `None` counts as false; anything
    /// other than a boolean is not a condition.
    pub fn as_condition(&self) -> Option<bool> {
        match self {
            Variable::Bool(b) => Some(*b),
            Variable::None => Some(false),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Variable::None)
    }
}

impl<'a> From<Option<&'a str>> for Variable<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Variable::None, Variable::String)
    }
}

impl<'a> From<&'a Option<String>> for Variable<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Variable::from(value.as_deref())
    }
}
