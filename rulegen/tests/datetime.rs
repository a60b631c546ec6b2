use pretty_assertions::assert_eq;
use rulegen::datetime::{self, DateTimeParser, Rule};
use rulegen::{Parser, Registry};

/// Rule names and matched text, with names spelled the way the rule list
/// spells them.
fn derived(rule: Rule, input: &str) -> Option<Vec<(String, &str)>> {
    let toks = DateTimeParser::parse(rule, input).ok()?;
    Some(
        toks.iter()
            .map(|t| (format!("{:?}", t.rule()).replace('_', "-"), t.as_str()))
            .collect(),
    )
}

fn declared<'a>(registry: &Registry, rule: &str, input: &'a str) -> Option<Vec<(String, &'a str)>> {
    let state = registry.parse(rule, input).ok()?;
    Some(
        state
            .tokens()
            .iter()
            .map(|t| (registry.rule_name(t.rule()).unwrap().to_owned(), t.as_str()))
            .collect(),
    )
}

#[test]
fn derived_matches_declared() {
    let registry = datetime::registry().unwrap();
    let tests = vec![
        (Rule::date_time, "date-time", "1985-04-12T23:20:50.52Z"),
        (Rule::date_time, "date-time", "1996-12-19T16:39:57-08:00"),
        (Rule::date_time, "date-time", "1996-12-19T16:39:57"),
        (Rule::full_date, "full-date", "2021-01-31 and more"),
        (Rule::partial_time, "partial-time", "10:00:00."),
        (Rule::offset, "offset", "+0100"),
        (Rule::digit, "digit", "x"),
    ];

    for (rule, name, input) in tests {
        assert_eq!(
            derived(rule, input),
            declared(&registry, name, input),
            "{} on {:?}",
            name,
            input
        );
    }
}

#[test]
fn registry_declares_every_rule() {
    let registry = datetime::registry().unwrap();
    assert_eq!(registry.len(), 14);
    assert!(registry.unresolved().is_empty());
    assert_eq!(registry.rule_name(rulegen::RuleId(0)), Some("date-time"));
}

#[test]
fn failure_position() {
    let err = DateTimeParser::parse(Rule::date_time, "1985-04-12T23:2").unwrap_err();
    assert_eq!(err.to_string(), "parsing failed, furthest position 15");

    let registry = datetime::registry().unwrap();
    assert_eq!(
        registry.parse("date-time", "1985-04-12T23:2").unwrap_err(),
        rulegen::Error::ParseFailure {
            rule: "date-time".into(),
            position: 15,
        }
    );
}
