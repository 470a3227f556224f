//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use folio::{FolioError, Link, Persona, Portfolio, Project};
use tempfile::TempDir;

/// Three personas with projects and abilities, and two links.
pub fn sample_portfolio() -> Portfolio {
    let developer = Persona {
        color: Some("#123456".into()),
        blurb: Some("Writes code.".into()),
        abilities: vec!["Rust".into(), "C".into()],
        projects: vec![
            Project {
                date: Some("2024".into()),
                skills: vec!["rust".into(), "pest".into()],
                ..Project::named("folio")
            },
            Project::named("kiln"),
        ],
        ..Persona::new("Developer")
    };
    let artist = Persona {
        abilities: vec!["Ink".into()],
        projects: vec![Project::named("sketchbook")],
        ..Persona::new("Artist")
    };
    let writer = Persona::new("Writer");

    Portfolio {
        home_template: PathBuf::from("home.html"),
        page_template: PathBuf::from("page.html"),
        outdir: PathBuf::from("out"),
        personas: vec![developer, artist, writer],
        links: vec![
            Link {
                link: Some("https://github.com".into()),
                ..Link::new("GitHub")
            },
            Link::new("Mail"),
        ],
    }
}

pub fn render_text(text: &str, portfolio: &Portfolio, selected: Option<usize>) -> Result<String, FolioError> {
    let template = folio::parse(folio::SourceContext::inline(text))?;
    folio::render(&template, portfolio, selected)
}

/// A portfolio file and its two templates laid out in a scratch directory.
pub struct Site {
    pub dir: TempDir,
    pub portfolio: PathBuf,
}

impl Site {
    pub fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn read(&self, page: &str) -> String {
        fs::read_to_string(self.out().join(page)).unwrap()
    }
}

pub fn write_site(home: &str, page: &str, personas: &[&str]) -> Site {
    let dir = tempfile::tempdir().unwrap();
    let mut config = String::from(
        "$home_template \"templates/home.html\"\n$page_template \"templates/page.html\"\n$outdir \"out\"\n",
    );
    for name in personas {
        config.push_str(&format!("$persona \"{name}\" {{ color: \"red\"; abilities: [\"a\", \"b\"]; }}\n"));
    }
    config.push_str("$link \"GitHub\" { link: \"https://github.com\"; }\n");

    fs::create_dir(dir.path().join("templates")).unwrap();
    fs::write(dir.path().join("templates/home.html"), home).unwrap();
    fs::write(dir.path().join("templates/page.html"), page).unwrap();
    let portfolio = dir.path().join("portfolio.txt");
    fs::write(&portfolio, config).unwrap();

    Site { dir, portfolio }
}
