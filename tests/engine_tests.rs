mod common;

use std::fs;

use folio::engine::{build_site, load_portfolio, BuildOptions};
use folio::ErrorKind;

use common::write_site;

const HOME: &str = "<ul><$ personas-> p { <li><$ p.name></li> }></ul>";
const PAGE: &str = "<h1><$ name></h1><$ personas-> p { <$ if p.selected { * } else { - }> }>";

#[test]
fn builds_home_and_persona_pages() {
    let site = write_site(HOME, PAGE, &["Developer", "Artist"]);
    let portfolio = load_portfolio(&site.portfolio).unwrap();
    let report = build_site(&portfolio, &BuildOptions::default());

    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(report.pages.len(), 3);
    assert_eq!(site.read("index.html"), "<ul><li>Developer</li><li>Artist</li></ul>");
    assert_eq!(site.read("Developer.html"), "<h1>Developer</h1>*-");
    assert_eq!(site.read("Artist.html"), "<h1>Artist</h1>-*");
}

#[test]
fn paths_resolve_against_the_portfolio_directory() {
    let site = write_site(HOME, PAGE, &["Developer"]);
    let portfolio = load_portfolio(&site.portfolio).unwrap();
    assert_eq!(portfolio.outdir, site.out());
    assert!(portfolio.home_template.ends_with("templates/home.html"));
}

#[test]
fn parallel_and_sequential_builds_agree() {
    let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
    let site = write_site(HOME, PAGE, &names);
    let portfolio = load_portfolio(&site.portfolio).unwrap();

    build_site(&portfolio, &BuildOptions::default());
    let sequential: Vec<String> = names.iter().map(|n| site.read(&format!("{n}.html"))).collect();

    let report = build_site(
        &portfolio,
        &BuildOptions {
            parallel: true,
            ..BuildOptions::default()
        },
    );
    assert!(report.is_success());
    let parallel: Vec<String> = names.iter().map(|n| site.read(&format!("{n}.html"))).collect();
    assert_eq!(sequential, parallel);
}

#[test]
fn dry_run_writes_nothing() {
    let site = write_site(HOME, PAGE, &["Developer"]);
    let portfolio = load_portfolio(&site.portfolio).unwrap();
    let report = build_site(
        &portfolio,
        &BuildOptions {
            dry_run: true,
            ..BuildOptions::default()
        },
    );
    assert!(report.is_success());
    assert_eq!(report.pages.len(), 2);
    assert!(!site.out().exists());
}

#[test]
fn outdir_override() {
    let site = write_site(HOME, PAGE, &["Developer"]);
    let portfolio = load_portfolio(&site.portfolio).unwrap();
    let elsewhere = site.dir.path().join("public");
    let report = build_site(
        &portfolio,
        &BuildOptions {
            outdir: Some(elsewhere.clone()),
            ..BuildOptions::default()
        },
    );
    assert!(report.is_success());
    assert!(elsewhere.join("index.html").exists());
    assert!(!site.out().exists());
}

#[test]
fn home_failure_does_not_stop_persona_pages() {
    let site = write_site("<$ nosuchfield>", PAGE, &["Developer"]);
    let portfolio = load_portfolio(&site.portfolio).unwrap();
    let report = build_site(&portfolio, &BuildOptions::default());

    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].kind, ErrorKind::UnknownProperty { .. }));
    assert!(!site.out().join("index.html").exists());
    assert_eq!(site.read("Developer.html"), "<h1>Developer</h1>*");
}

#[test]
fn persona_failure_does_not_stop_home_page() {
    let site = write_site(HOME, "<$ if name { x }>", &["Developer"]);
    let portfolio = load_portfolio(&site.portfolio).unwrap();
    let report = build_site(&portfolio, &BuildOptions::default());

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, ErrorKind::NotACondition);
    assert!(site.out().join("index.html").exists());
    assert!(!site.out().join("Developer.html").exists());
}

#[test]
fn missing_template_is_an_io_error() {
    let site = write_site(HOME, PAGE, &["Developer"]);
    fs::remove_file(site.dir.path().join("templates/page.html")).unwrap();
    let portfolio = load_portfolio(&site.portfolio).unwrap();
    let report = build_site(&portfolio, &BuildOptions::default());

    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].kind, ErrorKind::Io { .. }));
    assert_eq!(report.pages.len(), 1);
}

#[test]
fn missing_portfolio_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_portfolio(&dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Io { .. }));
    assert!(err.to_string().starts_with("I/O error"));
}
