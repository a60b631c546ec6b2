//! Rule bodies that exercise how the reduction settles precedence between
//! operators that aren't bracketed in the source.

use abnf::{compile, CompileError, Construct};

fn rendered(body: &str) -> String {
    compile(body)
        .unwrap_or_else(|e| panic!("compile {:?}: {}", body, e))
        .to_string()
}

#[test]
fn bodies_render_back() {
    let tests = vec![
        (r#""foo""#, r#""foo""#),
        ("foo", "foo"),
        ("[foo]", "[foo]"),
        ("foo baz", "foo baz"),
        ("[foo baz]", "[foo baz]"),
        ("foo / bar", "foo / bar"),
        ("foo / bar / baz", "foo / bar / baz"),
        ("foo / bar baz", "foo / bar baz"),
        ("foo bar / baz", "foo bar / baz"),
        ("(foo bar) / baz", "(foo bar) / baz"),
        ("foo ( bar / baz )", "foo (bar / baz)"),
        ("(elem (foo / bar) elem)", "(elem (foo / bar) elem)"),
        (r#""foo" "bar"; foo followed by bar"#, r#""foo" "bar" ; foo followed by bar"#),
        ("*( \",\" item )", "*(\",\" item)"),
        ("1*3DIGIT", "1*3DIGIT"),
    ];

    for (body, expected) in tests {
        assert_eq!(rendered(body), expected, "body: {}", body);
    }
}

#[test]
fn rendering_is_stable() {
    for body in &[
        "a / b c / [d] 2*e",
        r#"%i"select" *(ws field) [";"]"#,
        "(a / b) (c / d) / e",
    ] {
        let once = rendered(body);
        assert_eq!(rendered(&once), once);
    }
}

#[test]
fn compiles_are_independent() {
    // Placeholder numbering starts over for every rule, so the same body
    // always yields the same tree.
    let a = compile("x y / z").unwrap();
    let _ = compile("p q r s t").unwrap();
    let b = compile("x y / z").unwrap();
    assert_eq!(a, b);
}

#[test]
fn unreducible_fragment_is_named() {
    let err = compile("foo } bar").unwrap_err();
    assert_eq!(err, CompileError::DoesNotParse("foo } bar".into()));
    assert_eq!(err.to_string(), "does not parse: 'foo } bar'");
}

#[test]
fn comment_has_no_structure() {
    let plain = compile(r#""foo""#).unwrap();
    match compile(r#""foo" ; a comment"#).unwrap() {
        Construct::Comment(inner, text) => {
            assert_eq!(*inner, plain);
            assert_eq!(text, "a comment");
        }
        other => panic!("expected comment, got {:?}", other),
    }
}
