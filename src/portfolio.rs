//! The portfolio data graph that templates are rendered against.
//!
//! Produced by [`parser::parse`] from a portfolio file and consumed read-only
//! by the generator.

use std::path::{Path, PathBuf};

use serde::Serialize;

pub mod parser;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Portfolio {
    pub home_template: PathBuf,
    pub page_template: PathBuf,
    pub outdir: PathBuf,
    pub personas: Vec<Persona>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Persona {
    pub name: String,
    pub color: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub blurb: Option<String>,
    pub abilities: Vec<String>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Project {
    pub name: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub skills: Vec<String>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Link {
    pub name: String,
    pub link: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl Portfolio {
    /// Resolves the template paths and output directory against `base`,
    /// leaving absolute paths untouched.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        for path in [&mut self.home_template, &mut self.page_template, &mut self.outdir] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    pub fn persona(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.name == name)
    }
}

impl Persona {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// File name of this persona's page inside the output directory.
    pub fn page_file_name(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{stem}.html")
    }
}

impl Project {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl Link {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
