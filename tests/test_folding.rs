//! Folding over realistic, partly broken Avi sources.

use avi::ide::{FoldKind, FoldRange, folding_ranges};
use rstest::rstest;

fn spans(text: &str) -> Vec<(u32, u32, Option<FoldKind>)> {
    folding_ranges(text)
        .into_iter()
        .map(|FoldRange { start_line, end_line, kind }| (start_line, end_line, kind))
        .collect()
}

#[test]
fn test_skill_file() {
    let source = r#"/*
 * Greets the user.
 */
fn greet(name) {
    if name == "" {
        say(locale("hello"))
    } else {
        say(`Hello, {name}!
Nice to see you.`)
    }
}

settings := { volume: 3 }
"#;

    assert_eq!(
        spans(source),
        vec![
            (0, 2, Some(FoldKind::Comment)),
            (3, 9, None),
            (4, 5, None),
            (6, 8, None),
        ]
    );
}

#[rstest]
#[case::stray_quote("fn f() {\n  s := \"oops\n}\n", vec![(0, 1, None)])]
#[case::brace_in_line_comment("fn f() { // }\n  g()\n}\n", vec![(0, 1, None)])]
#[case::escaped_quote("fn f() {\n  s := \"a\\\"}\"\n}\n", vec![(0, 1, None)])]
#[case::unterminated_template("fn f() {\n  s := `{\n}\n", vec![])]
#[case::extra_closers("}\nfn f() {\n  g()\n}\n}\n", vec![(1, 2, None)])]
#[case::closer_stays_visible("fn f() {\n}\n", vec![])]
fn test_error_tolerance(#[case] text: &str, #[case] expected: Vec<(u32, u32, Option<FoldKind>)>) {
    assert_eq!(spans(text), expected);
}
