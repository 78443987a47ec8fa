use super::*;
use semver::Version;

fn lines() -> VersionLines {
    VersionLines::from_iter([("mainline", "1.25.*"), ("stable", "1.26.*")])
}

fn available() -> Vec<String> {
    ["1.25.0", "1.25.3", "1.26.1"].iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_empty_request_uses_mainline() {
    let lines = lines();
    let resolver = VersionResolver::new(&lines);

    let dep = resolver.resolve("nginx", "", &available()).unwrap();
    assert_eq!(dep.name, "nginx");
    assert_eq!(dep.version, "1.25.3");

    let via_alias = resolver.resolve("nginx", "mainline", &available()).unwrap();
    assert_eq!(dep, via_alias);
}

#[test]
fn test_alias_request_uses_bound_constraint() {
    let lines = lines();
    let resolver = VersionResolver::new(&lines);

    let dep = resolver.resolve("nginx", "stable", &available()).unwrap();
    assert_eq!(dep.version, "1.26.1");
    assert!(resolver.is_stable_line(&dep.version));
}

#[test]
fn test_missing_mainline_is_an_error() {
    let lines = VersionLines::from_iter([("stable", "1.26.*")]);
    let resolver = VersionResolver::new(&lines);

    let err = resolver.resolve("nginx", "", &available()).unwrap_err();
    assert_eq!(err, ResolutionError::NoMainlineAlias);
}

#[test]
fn test_alias_substitution_is_not_recursive() {
    // "legacy" points at the name of another alias, which is not a constraint
    let lines = VersionLines::from_iter([("mainline", "1.25.*"), ("legacy", "mainline")]);
    let resolver = VersionResolver::new(&lines);

    let err = resolver.resolve("nginx", "legacy", &available()).unwrap_err();
    assert!(matches!(err, ResolutionError::InvalidConstraint { constraint, .. } if constraint == "mainline"));
}

#[test]
fn test_literal_constraints() {
    let lines = lines();
    let resolver = VersionResolver::new(&lines);

    assert_eq!(resolver.resolve("nginx", "1.25.0", &available()).unwrap().version, "1.25.0");
    assert_eq!(resolver.resolve("nginx", "1.25.x", &available()).unwrap().version, "1.25.3");
    assert_eq!(resolver.resolve("nginx", "1.25", &available()).unwrap().version, "1.25.3");
    assert_eq!(resolver.resolve("nginx", ">=1.25.1", &available()).unwrap().version, "1.26.1");
    assert_eq!(
        resolver.resolve("nginx", "1.24.* || 1.25.0", &available()).unwrap().version,
        "1.25.0"
    );
}

#[test]
fn test_no_matching_version_lists_diagnostics() {
    let lines = VersionLines::from_iter([
        ("stable", "1.26.*"),
        ("mainline", "1.25.*"),
        ("", "9.9.*"),
    ]);
    let resolver = VersionResolver::new(&lines);

    let err = resolver.resolve("nginx", "1.27.*", &available()).unwrap_err();
    match &err {
        ResolutionError::NoMatchingVersion {
            dependency,
            constraint,
            aliases,
            constraints,
            versions,
            ..
        } => {
            assert_eq!(dependency, "nginx");
            assert_eq!(constraint, "1.27.*");
            assert_eq!(aliases, &["mainline", "stable"]);
            assert_eq!(constraints, &["1.25.*", "1.26.*"]);
            assert_eq!(versions, &available());
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(
        err.available_listing().unwrap(),
        vec!["mainline", "stable", "1.25.*", "1.26.*", "1.25.0", "1.25.3", "1.26.1"]
    );
    assert_eq!(resolver.available_versions(&available()), err.available_listing().unwrap());
}

#[test]
fn test_empty_available_set_never_fabricates() {
    let lines = lines();
    let resolver = VersionResolver::new(&lines);

    let err = resolver.resolve("nginx", "", &[]).unwrap_err();
    assert!(matches!(err, ResolutionError::NoMatchingVersion { .. }));
}

#[test]
fn test_unparseable_available_versions_are_skipped() {
    let lines = lines();
    let resolver = VersionResolver::new(&lines);
    let available = vec!["latest".to_string(), "1.25.1".to_string()];

    assert_eq!(resolver.resolve("nginx", "", &available).unwrap().version, "1.25.1");
}

#[test]
fn test_is_stable_line_independent_of_selection() {
    let lines = lines();
    let resolver = VersionResolver::new(&lines);

    assert!(resolver.is_stable_line("1.26.0"));
    assert!(resolver.is_stable_line("1.26.99"));
    assert!(!resolver.is_stable_line("1.25.3"));
    assert!(!resolver.is_stable_line("not-a-version"));

    let no_stable = VersionLines::from_iter([("mainline", "1.25.*")]);
    assert!(!VersionResolver::new(&no_stable).is_stable_line("1.26.1"));
}

#[test]
fn test_empty_alias_key_is_ignored() {
    let lines = VersionLines::from_iter([("", "1.25.*")]);
    assert!(lines.get("").is_none());
    assert!(lines.is_empty());
    assert!(lines.aliases().is_empty());
}

#[test]
fn test_constraint_parsing() {
    let exact = VersionConstraint::parse("1.25.3").unwrap();
    assert!(exact.matches(&Version::new(1, 25, 3)));
    assert!(!exact.matches(&Version::new(1, 25, 4)));

    let partial = VersionConstraint::parse("1.25").unwrap();
    assert!(partial.matches(&Version::new(1, 25, 9)));
    assert!(!partial.matches(&Version::new(1, 26, 0)));

    let range = VersionConstraint::parse(">=1.24, <1.26").unwrap();
    assert!(range.matches(&Version::new(1, 25, 0)));
    assert!(!range.matches(&Version::new(1, 26, 0)));

    assert!(VersionConstraint::parse("").is_err());
    assert!(VersionConstraint::parse("1.25,").is_err());
    assert!(VersionConstraint::parse(">=").is_err());
    assert!(VersionConstraint::parse("1.24 <").is_err());
    assert!(VersionConstraint::parse("not a version").is_err());
}

#[test]
fn test_whitespace_separated_comparators() {
    let available: Vec<String> =
        ["1.23.4", "1.24.0", "1.25.3", "1.26.1"].iter().map(ToString::to_string).collect();

    for constraint in [">= 1.24 < 1.26", ">=1.24 <1.26", ">= 1.24, < 1.26", ">=1.24 , <1.26"] {
        let parsed = VersionConstraint::parse(constraint).unwrap();
        assert_eq!(parsed.highest_match(&available), Some("1.25.3"), "constraint '{constraint}'");
        assert!(!parsed.matches(&Version::new(1, 23, 4)), "constraint '{constraint}'");
    }

    // Bare versions keep their manifest meaning inside a list
    let parsed = VersionConstraint::parse(">= 1.24 1.25").unwrap();
    assert_eq!(parsed.highest_match(&available), Some("1.25.3"));

    let alternatives = VersionConstraint::parse("< 1.24 || >= 1.26").unwrap();
    assert_eq!(alternatives.highest_match(&available), Some("1.26.1"));
    assert!(!alternatives.matches(&Version::new(1, 25, 3)));
}

#[test]
fn test_version_lines_yaml() {
    let yaml = "mainline: 1.25.x\nstable: 1.26.x\n";
    let lines: VersionLines = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(lines.get("mainline"), Some("1.25.x"));
    assert_eq!(lines.len(), 2);
}
