use depsolve_core::requirement::{Relation, Requirement, RequirementDecl};

#[test]
fn parse_combined_exact() {
    let req = Requirement::parse("kotlinx-coroutines@=1.8.0").unwrap();
    assert_eq!(req.name, "kotlinx-coroutines");
    assert_eq!(req.relation, Relation::Exact);
    assert_eq!(req.version.to_string(), "1.8.0");
}

#[test]
fn parse_split_parts() {
    let req = Requirement::from_parts("lib", "=2.0.0").unwrap();
    assert_eq!(req.relation, Relation::Exact);

    let req = Requirement::from_parts("lib", "2.0.0").unwrap();
    assert_eq!(req.relation, Relation::AtLeast);
}

#[test]
fn whitespace_is_tolerated() {
    let req = Requirement::from_parts(" lib ", " =2.0.0 ").unwrap();
    assert_eq!(req.to_string(), "lib@=2.0.0");
}

#[test]
fn decl_short_form_from_toml() {
    #[derive(serde::Deserialize)]
    struct Doc {
        requires: Vec<RequirementDecl>,
    }

    let doc: Doc = toml::from_str(r#"requires = ["a@=1.0.0", "b@2.1.0"]"#).unwrap();
    let reqs: Vec<Requirement> = doc
        .requires
        .iter()
        .map(|d| d.to_requirement().unwrap())
        .collect();
    assert_eq!(reqs[0].to_string(), "a@=1.0.0");
    assert_eq!(reqs[1].to_string(), "b@2.1.0");
}

#[test]
fn decl_detailed_form_matches_short_form() {
    #[derive(serde::Deserialize)]
    struct Doc {
        requires: Vec<RequirementDecl>,
    }

    let doc: Doc = toml::from_str(
        r#"
requires = [
    "a@=1.0.0",
    { name = "a", version = "1.0.0", exact = true },
    { name = "b", version = "2.0.0" },
]
"#,
    )
    .unwrap();

    let short = doc.requires[0].to_requirement().unwrap();
    let detailed = doc.requires[1].to_requirement().unwrap();
    assert_eq!(short, detailed);

    let floor = doc.requires[2].to_requirement().unwrap();
    assert_eq!(floor.relation, Relation::AtLeast);
}
