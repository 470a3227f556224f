//! Site generation: loads the portfolio and templates, renders the home page
//! and one page per persona, and writes them into the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::errors::{FolioError, SourceContext};
use crate::portfolio::{parser, Portfolio};
use crate::runtime::render;
use crate::syntax::{self, Template};

const HOME_PAGE: &str = "index.html";

// ============================================================================
// OPTIONS AND REPORT
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Overrides the portfolio's `$outdir`.
    pub outdir: Option<PathBuf>,
    /// Render everything but write nothing.
    pub dry_run: bool,
    /// Render persona pages on the rayon thread pool.
    pub parallel: bool,
}

/// Outcome of a build. The home page and the persona pages are independent
/// groups: a failure in one group does not stop the other.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Pages written, or that would have been written in a dry run.
    pub pages: Vec<PathBuf>,
    pub failures: Vec<FolioError>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Load a portfolio file. Relative paths inside it are resolved against the
/// directory containing the file.
pub fn load_portfolio(path: &Path) -> Result<Portfolio, FolioError> {
    let source = read_source(path, "could not read portfolio")?;
    let portfolio = parser::parse(&source)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    tracing::info!(
        portfolio = %path.display(),
        personas = portfolio.personas.len(),
        links = portfolio.links.len(),
        "loaded portfolio"
    );
    Ok(portfolio.resolve_paths(base))
}

pub fn load_template(path: &Path) -> Result<Template, FolioError> {
    let source = read_source(path, "could not read template")?;
    syntax::parser::parse(source)
}

fn read_source(path: &Path, action: &str) -> Result<SourceContext, FolioError> {
    let content = fs::read_to_string(path).map_err(|e| FolioError::io(action, path, &e))?;
    Ok(SourceContext::from_file(path.display().to_string(), content))
}

// ============================================================================
// BUILDING
// ============================================================================

/// Generate every page of the site.
pub fn build_site(portfolio: &Portfolio, options: &BuildOptions) -> BuildReport {
    let outdir = options.outdir.as_deref().unwrap_or(portfolio.outdir.as_path());
    let mut report = BuildReport::default();

    if !options.dry_run {
        if let Err(e) = fs::create_dir_all(outdir) {
            report
                .failures
                .push(FolioError::io("could not create output directory", outdir, &e));
            return report;
        }
    }

    match build_home(portfolio, outdir, options) {
        Ok(path) => report.pages.push(path),
        Err(e) => {
            tracing::warn!(template = %portfolio.home_template.display(), "home page failed");
            report.failures.push(e);
        }
    }

    if let Err(e) = build_persona_pages(portfolio, outdir, options, &mut report.pages) {
        tracing::warn!(template = %portfolio.page_template.display(), "persona pages failed");
        report.failures.push(e);
    }

    report
}

fn build_home(portfolio: &Portfolio, outdir: &Path, options: &BuildOptions) -> Result<PathBuf, FolioError> {
    let template = load_template(&portfolio.home_template)?;
    let page = render(&template, portfolio, None)?;
    emit(&outdir.join(HOME_PAGE), &page, options)
}

/// Render the page template once per persona. Pages are written in portfolio
/// order up to the first failure.
fn build_persona_pages(
    portfolio: &Portfolio,
    outdir: &Path,
    options: &BuildOptions,
    pages: &mut Vec<PathBuf>,
) -> Result<(), FolioError> {
    if portfolio.personas.is_empty() {
        tracing::debug!("no personas, skipping persona pages");
        return Ok(());
    }

    let template = load_template(&portfolio.page_template)?;
    let render_one = |index: usize| render(&template, portfolio, Some(index));
    let rendered: Vec<Result<String, FolioError>> = if options.parallel {
        (0..portfolio.personas.len()).into_par_iter().map(render_one).collect()
    } else {
        (0..portfolio.personas.len()).map(render_one).collect()
    };

    for (persona, page) in portfolio.personas.iter().zip(rendered) {
        let page = page?;
        pages.push(emit(&outdir.join(persona.page_file_name()), &page, options)?);
    }
    Ok(())
}

fn emit(path: &Path, page: &str, options: &BuildOptions) -> Result<PathBuf, FolioError> {
    if options.dry_run {
        tracing::debug!(page = %path.display(), "dry run, not writing");
    } else {
        fs::write(path, page).map_err(|e| FolioError::io("could not write page", path, &e))?;
        tracing::info!(page = %path.display(), bytes = page.len(), "wrote page");
    }
    Ok(path.to_path_buf())
}
