//! Handles all user-facing output for the CLI.
//!
//! Paths and summaries go to stdout, coloured when the terminal supports it;
//! diagnostics go to stderr through miette.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::portfolio::Portfolio;

/// Prints one line per page, prefixed with a coloured verb.
pub fn print_pages(verb: &str, pages: &[PathBuf]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for page in pages {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        let _ = write!(stdout, "{verb:>8}");
        let _ = stdout.reset();
        let _ = writeln!(stdout, " {}", page.display());
    }
}

/// Prints the final line of a build or check.
pub fn print_summary(pages: usize, failures: usize) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if failures == 0 { Color::Green } else { Color::Red };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(stdout, "{pages} page(s), {failures} failure(s)");
    let _ = stdout.reset();
}

/// Human-readable overview of a portfolio.
pub fn print_portfolio(portfolio: &Portfolio) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = writeln!(stdout, "Home template: {}", portfolio.home_template.display());
    let _ = writeln!(stdout, "Page template: {}", portfolio.page_template.display());
    let _ = writeln!(stdout, "Output directory: {}", portfolio.outdir.display());

    for persona in &portfolio.personas {
        let _ = writeln!(stdout);
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
        let _ = writeln!(stdout, "{}", persona.name);
        let _ = stdout.reset();
        if let Some(color) = &persona.color {
            let _ = writeln!(stdout, "  color: {color}");
        }
        if let Some(blurb) = &persona.blurb {
            let _ = writeln!(stdout, "  blurb: {blurb}");
        }
        if !persona.abilities.is_empty() {
            let _ = writeln!(stdout, "  abilities: {}", persona.abilities.join(", "));
        }
        for project in &persona.projects {
            let name = project.name.as_deref().unwrap_or("(unnamed)");
            match &project.date {
                Some(date) => {
                    let _ = writeln!(stdout, "  project: {name} ({date})");
                }
                None => {
                    let _ = writeln!(stdout, "  project: {name}");
                }
            }
        }
    }

    if !portfolio.links.is_empty() {
        let _ = writeln!(stdout);
        for link in &portfolio.links {
            let _ = writeln!(stdout, "link: {} {}", link.name, link.link.as_deref().unwrap_or(""));
        }
    }
}

/// Pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    println!("{text}");
    Ok(())
}
