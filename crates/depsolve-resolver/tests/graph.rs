use depsolve_core::version::{parse_version, Version};
use depsolve_resolver::graph::SolutionGraph;
use depsolve_resolver::resolver::{ResolveOptions, Resolver};
use depsolve_resolver::unit::UnitVersion;

fn version(s: &str) -> Version {
    parse_version(s).unwrap()
}

fn unit(name: &str, ver: &str, ecv: &str) -> UnitVersion {
    UnitVersion::new(name, version(ver), version(ecv))
}

fn resolved_sample() -> SolutionGraph {
    let mut resolver = Resolver::new();
    let pin_c = resolver.get_constraint("c", "=1.5.0").unwrap();
    let floor_d = resolver.get_constraint("d", "1.0.0").unwrap();

    let mut app = unit("app", "0.1.0", "0.1.0");
    app.add_dependency("b").unwrap();
    resolver.add_unit_version(app);

    let mut b = unit("b", "2.0.0", "2.0.0");
    b.add_dependency("c").unwrap();
    b.add_dependency("d").unwrap();
    b.add_constraint(pin_c).unwrap();
    b.add_constraint(floor_d).unwrap();
    resolver.add_unit_version(b);

    resolver.add_unit_version(unit("c", "1.5.0", "1.0.0"));
    resolver.add_unit_version(unit("d", "1.2.0", "1.0.0"));

    let choices = resolver
        .resolve(&["app"], &[], &[], &ResolveOptions::default())
        .unwrap();
    SolutionGraph::from_choices(&choices)
}

#[test]
fn every_choice_is_a_node() {
    let graph = resolved_sample();
    assert_eq!(graph.len(), 4);
    for name in ["app", "b", "c", "d"] {
        assert!(graph.find(name).is_some(), "missing {name}");
    }
}

#[test]
fn the_requested_package_is_the_root() {
    let graph = resolved_sample();
    let roots = graph.roots();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].name, "app");
}

#[test]
fn paths_follow_the_dependency_edges() {
    let graph = resolved_sample();
    let path = graph.find_path("d").unwrap();
    let names: Vec<&str> = path.iter().map(|uv| uv.name.as_str()).collect();
    assert_eq!(names, ["app", "b", "d"]);
}

#[test]
fn tree_renders_every_choice_and_marks_pins() {
    let graph = resolved_sample();
    let tree = graph.render_tree();
    for key in ["app@0.1.0", "b@2.0.0", "c@1.5.0", "d@1.2.0"] {
        assert!(tree.contains(key), "tree missing {key}:\n{tree}");
    }
    assert!(tree.contains("c@1.5.0 (pinned)"));
    assert!(!tree.contains("d@1.2.0 (pinned)"));
}

#[test]
fn dependents_answer_reverse_queries() {
    let graph = resolved_sample();
    let dependents = graph.dependents_of("c");
    assert_eq!(dependents.len(), 1);
    assert_eq!(dependents[0].name, "b");
    assert!(graph.dependents_of("app").is_empty());
}
