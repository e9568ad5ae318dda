use super::*;
use pretty_assertions::assert_eq;

fn parse_ok(src: &str) -> Vec<Node> {
    match parse_template(src) {
        Ok(nodes) => nodes,
        Err(err) => panic!("parse failed for {src:?}: {err}"),
    }
}

#[test]
fn literal_text_passes_through() {
    assert_eq!(
        parse_ok("type T struct{}"),
        vec![Node::Text("type T struct{}".to_string())]
    );
}

#[test]
fn dollar_escape() {
    assert_eq!(
        parse_ok("cost: $$5 and $$(not an action)"),
        vec![Node::Text("cost: $5 and $(not an action)".to_string())]
    );
}

#[test]
fn substitution_action() {
    assert_eq!(
        parse_ok("type $(name) struct{}"),
        vec![
            Node::Text("type ".to_string()),
            Node::Expr {
                head: "name".to_string(),
                args: vec![],
                offset: 5,
            },
            Node::Text(" struct{}".to_string()),
        ]
    );
}

#[test]
fn call_with_path_and_literal_args() {
    assert_eq!(
        parse_ok("$(doc field.comment \"fallback\")"),
        vec![Node::Expr {
            head: "doc".to_string(),
            args: vec![
                Arg::Path("field.comment".to_string()),
                Arg::Lit("fallback".to_string()),
            ],
            offset: 0,
        }]
    );
}

#[test]
fn quoted_arg_may_contain_closing_paren() {
    assert_eq!(
        parse_ok(r#"$(doc ") closes nothing")"#),
        vec![Node::Expr {
            head: "doc".to_string(),
            args: vec![Arg::Lit(") closes nothing".to_string())],
            offset: 0,
        }]
    );
}

#[test]
fn if_else_end() {
    assert_eq!(
        parse_ok("$(if opt)A$(else)B$(end)"),
        vec![Node::If {
            cond: "opt".to_string(),
            then: vec![Node::Text("A".to_string())],
            otherwise: vec![Node::Text("B".to_string())],
        }]
    );
}

#[test]
fn if_without_else() {
    assert_eq!(
        parse_ok("$(if opt)A$(end)"),
        vec![Node::If {
            cond: "opt".to_string(),
            then: vec![Node::Text("A".to_string())],
            otherwise: vec![],
        }]
    );
}

#[test]
fn nested_blocks() {
    assert_eq!(
        parse_ok("$(each fields)$(if name)$(name)$(end)$(end)"),
        vec![Node::Each {
            path: "fields".to_string(),
            body: vec![Node::If {
                cond: "name".to_string(),
                then: vec![Node::Expr {
                    head: "name".to_string(),
                    args: vec![],
                    offset: 24,
                }],
                otherwise: vec![],
            }],
        }]
    );
}

#[test]
fn unclosed_action_is_a_syntax_error() {
    assert!(matches!(
        parse_template("$(name"),
        Err(TemplateError::Syntax { offset: 0, .. })
    ));
}

#[test]
fn unclosed_block_is_a_syntax_error() {
    assert!(matches!(
        parse_template("$(if x)body"),
        Err(TemplateError::Syntax { .. })
    ));
}

#[test]
fn stray_end_is_a_syntax_error() {
    assert!(matches!(
        parse_template("$(end)"),
        Err(TemplateError::Syntax { .. })
    ));
}

#[test]
fn stray_else_is_a_syntax_error() {
    assert!(matches!(
        parse_template("$(else)"),
        Err(TemplateError::Syntax { .. })
    ));
}

#[test]
fn duplicate_else_is_a_syntax_error() {
    assert!(matches!(
        parse_template("$(if x)a$(else)b$(else)c$(end)"),
        Err(TemplateError::Syntax { .. })
    ));
}

#[test]
fn empty_action_is_a_syntax_error() {
    assert!(matches!(
        parse_template("$()"),
        Err(TemplateError::Syntax { .. })
    ));
}

#[test]
fn if_requires_exactly_one_argument() {
    assert!(matches!(
        parse_template("$(if a b)x$(end)"),
        Err(TemplateError::Syntax { .. })
    ));
}
