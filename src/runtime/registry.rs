//! Property tables for every record kind.
//!
//! Each table is built once and maps a property name to an accessor, so
//! adding a field means adding one row.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::errors::ErrorKind;
use crate::portfolio::{Link, Persona, Portfolio, Project};
use crate::runtime::Variable;

type RootField = for<'a> fn(&'a Portfolio) -> Variable<'a>;
type PersonaField = for<'a> fn(&'a Persona, bool) -> Variable<'a>;
type ProjectField = for<'a> fn(&'a Project) -> Variable<'a>;
type LinkField = for<'a> fn(&'a Link) -> Variable<'a>;

static ROOT_FIELDS: Lazy<HashMap<&'static str, RootField>> = Lazy::new(|| {
    let fields: [(&'static str, RootField); 2] = [
        ("personas", |p| Variable::PersonaList(&p.personas)),
        ("links", |p| Variable::LinkList(&p.links)),
    ];
    HashMap::from(fields)
});

static PERSONA_FIELDS: Lazy<HashMap<&'static str, PersonaField>> = Lazy::new(|| {
    let fields: [(&'static str, PersonaField); 8] = [
        ("name", |p, _| Variable::String(&p.name)),
        ("color", |p, _| Variable::from(&p.color)),
        ("image", |p, _| Variable::from(&p.image)),
        ("icon", |p, _| Variable::from(&p.icon)),
        ("blurb", |p, _| Variable::from(&p.blurb)),
        ("abilities", |p, _| Variable::StringList(&p.abilities)),
        ("projects", |p, _| Variable::ProjectList(&p.projects)),
        ("selected", |_, selected| Variable::Bool(selected)),
    ];
    HashMap::from(fields)
});

static PROJECT_FIELDS: Lazy<HashMap<&'static str, ProjectField>> = Lazy::new(|| {
    let fields: [(&'static str, ProjectField); 6] = [
        ("name", |p| Variable::from(&p.name)),
        ("date", |p| Variable::from(&p.date)),
        ("link", |p| Variable::from(&p.link)),
        ("description", |p| Variable::from(&p.description)),
        ("skills", |p| Variable::StringList(&p.skills)),
        ("images", |p| Variable::StringList(&p.images)),
    ];
    HashMap::from(fields)
});

static LINK_FIELDS: Lazy<HashMap<&'static str, LinkField>> = Lazy::new(|| {
    let fields: [(&'static str, LinkField); 4] = [
        ("name", |l| Variable::String(&l.name)),
        ("link", |l| Variable::from(&l.link)),
        ("icon", |l| Variable::from(&l.icon)),
        ("color", |l| Variable::from(&l.color)),
    ];
    HashMap::from(fields)
});

/// Root-level collections available in every template.
pub fn root_value<'a>(portfolio: &'a Portfolio, name: &str) -> Option<Variable<'a>> {
    ROOT_FIELDS.get(name).map(|field| field(portfolio))
}

pub fn persona_field<'a>(persona: &'a Persona, selected: bool, name: &str) -> Option<Variable<'a>> {
    PERSONA_FIELDS.get(name).map(|field| field(persona, selected))
}

/// Resolve `name` as a property of `parent`.
pub fn field<'a>(parent: Variable<'a>, name: &str) -> Result<Variable<'a>, ErrorKind> {
    let found = match parent {
        Variable::Persona { data, selected } => persona_field(data, selected, name),
        Variable::Project(project) => PROJECT_FIELDS.get(name).map(|field| field(project)),
        Variable::Link(link) => LINK_FIELDS.get(name).map(|field| field(link)),
        other => {
            return Err(ErrorKind::NotARecord {
                name: name.into(),
                parent: other.type_name().into(),
            })
        }
    };
    found.ok_or_else(|| ErrorKind::UnknownField {
        record: parent.record_name().unwrap_or("value").into(),
        name: name.into(),
    })
}

/// Sorted property names of a record kind (`"root"`, `"persona"`, `"project"`, `"link"`).
pub fn field_names(record: &str) -> Vec<&'static str> {
    let mut names: Vec<_> = match record {
        "root" => ROOT_FIELDS.keys().copied().collect(),
        "persona" => PERSONA_FIELDS.keys().copied().collect(),
        "project" => PROJECT_FIELDS.keys().copied().collect(),
        "link" => LINK_FIELDS.keys().copied().collect(),
        _ => Vec::new(),
    };
    names.sort_unstable();
    names
}
