mod common;

use folio::{ErrorKind, Persona, Portfolio};

use common::{render_text, sample_portfolio};

#[test]
fn persona_list_renders_every_name_in_order() {
    for count in [0, 1, 5] {
        let portfolio = Portfolio {
            personas: (0..count).map(|i| Persona::new(format!("P{i}"))).collect(),
            ..Portfolio::default()
        };
        let expected: String = (0..count).map(|i| format!("P{i}")).collect();
        assert_eq!(
            render_text("<$ personas-> p { <$p.name> } >", &portfolio, None).unwrap(),
            expected
        );
    }
}

#[test]
fn selection_flag_marks_only_the_page_persona() {
    let portfolio = sample_portfolio();
    for selected in 0..portfolio.personas.len() {
        let out = render_text(
            r#"<$ personas-> p { <$ if selected { "Y" } else { "N" }> }>"#,
            &portfolio,
            Some(selected),
        )
        .unwrap();
        let marks: Vec<&str> = out.split('"').filter(|s| !s.is_empty()).collect();
        assert_eq!(marks.len(), portfolio.personas.len());
        for (index, mark) in marks.iter().enumerate() {
            assert_eq!(*mark, if index == selected { "Y" } else { "N" });
        }
    }
}

#[test]
fn selection_flag_through_loop_variable() {
    let portfolio = sample_portfolio();
    let out = render_text("<$ personas-> p { <$ if p.selected { [<$ p.name>] }> }>", &portfolio, Some(1)).unwrap();
    assert_eq!(out, "[Artist]");
}

#[test]
fn home_page_selects_nobody() {
    let portfolio = sample_portfolio();
    let out = render_text("<$ personas-> p { <$ if p.selected { x } else { o }> }>", &portfolio, None).unwrap();
    assert_eq!(out, "ooo");
}

#[test]
fn project_name_is_not_persona_name() {
    let portfolio = sample_portfolio();
    let out = render_text("<$ projects-> p { <$ p.name>; }>", &portfolio, Some(0)).unwrap();
    assert_eq!(out, "folio;kiln;");
}

#[test]
fn nested_loops_shadow_and_restore() {
    let portfolio = sample_portfolio();
    let template = "<$ personas-> p { <$ p.projects-> p { <$ p.name> }>/<$ p.name>| }>";
    let out = render_text(template, &portfolio, None).unwrap();
    assert_eq!(out, "folio kiln/Developer|sketchbook/Artist|/Writer|".replace(' ', ""));
}

#[test]
fn string_lists_iterate() {
    let portfolio = sample_portfolio();
    let out = render_text("<$ abilities-> a { (<$ a>) }>", &portfolio, Some(0)).unwrap();
    assert_eq!(out, "(Rust)(C)");
}

#[test]
fn links_are_available_everywhere() {
    let portfolio = sample_portfolio();
    let template = "<$ links-> l { <$ l.name>=<$ l.link>; }>";
    assert_eq!(
        render_text(template, &portfolio, None).unwrap(),
        "GitHub=https://github.com;Mail=;"
    );
    assert_eq!(
        render_text(template, &portfolio, Some(2)).unwrap(),
        render_text(template, &portfolio, None).unwrap()
    );
}

#[test]
fn unset_fields_render_nothing_and_are_false() {
    let portfolio = sample_portfolio();
    let out = render_text("[<$ blurb>]<$ if blurb { has } else { none }>", &portfolio, Some(2)).unwrap();
    assert_eq!(out, "[]none");
}

#[test]
fn unknown_property_fails_without_output() {
    let portfolio = sample_portfolio();
    let err = render_text("before <$ nosuchfield> after", &portfolio, None).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnknownProperty {
            name: "nosuchfield".into()
        }
    );
    assert!(!err.to_string().is_empty());
    assert!(err.diagnostic_info.help.is_some());
}

#[test]
fn persona_fields_are_unknown_on_the_home_page() {
    let portfolio = sample_portfolio();
    let err = render_text("<$ name>", &portfolio, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownProperty { name: "name".into() });
    assert_eq!(render_text("<$ name>", &portfolio, Some(0)).unwrap(), "Developer");
}

#[test]
fn unknown_field_names_the_record() {
    let portfolio = sample_portfolio();
    let err = render_text("<$ projects-> p { <$ p.colour> }>", &portfolio, Some(0)).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnknownField {
            record: "project".into(),
            name: "colour".into()
        }
    );
}

#[test]
fn field_of_a_string_is_not_a_record() {
    let portfolio = sample_portfolio();
    let err = render_text("<$ name.length>", &portfolio, Some(0)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotARecord { .. }));
}

#[test]
fn iterating_a_string_is_not_a_list() {
    let portfolio = sample_portfolio();
    let err = render_text("<$ name-> c { x }>", &portfolio, Some(0)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotAList);
    assert_eq!(err.kind.to_string(), "given property can't be used as a list");
}

#[test]
fn non_boolean_condition_is_rejected() {
    let portfolio = sample_portfolio();
    let err = render_text("<$ if personas { x }>", &portfolio, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotACondition);
    assert_eq!(err.diagnostic_info.error_code, "folio::render::not_a_condition");
}

#[test]
fn multibyte_text_renders_unchanged() {
    let portfolio = sample_portfolio();
    let out = render_text("<p>héllo ✓</p><$ personas-> p { café·<$ p.name>· }>日本", &portfolio, None).unwrap();
    assert_eq!(out, "<p>héllo ✓</p>café·Developer·café·Artist·café·Writer·日本");
}
