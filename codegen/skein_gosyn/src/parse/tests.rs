use super::*;
use pretty_assertions::assert_eq;

fn parse_ok(src: &str) -> Vec<Declaration> {
    match parse_fragment(src) {
        Ok(decls) => decls,
        Err(err) => panic!("parse failed for {src:?}: {err}"),
    }
}

fn only(src: &str) -> Declaration {
    let mut decls = parse_ok(src);
    assert_eq!(decls.len(), 1, "expected one declaration in {src:?}");
    decls.remove(0)
}

#[test]
fn type_declaration() {
    let decl = only("type Color struct {\n\tR, G, B uint8\n}");
    assert_eq!(decl.kind, DeclKind::Type);
    assert_eq!(decl.keys.as_slice(), [CollisionKey::plain("Color")]);
    assert!(decl.text.starts_with("type Color struct"));
    assert!(decl.text.ends_with('}'));
}

#[test]
fn type_group_splits_into_declarations() {
    let decls = parse_ok("type (\n\tA int\n\tB = string\n)");
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].text, "type A int");
    assert_eq!(decls[1].text, "type B = string");
    assert_eq!(decls[1].keys.as_slice(), [CollisionKey::plain("B")]);
}

#[test]
fn free_function() {
    let decl = only("func Encode(c Color) []byte {\n\treturn nil\n}");
    assert_eq!(decl.kind, DeclKind::Func);
    assert_eq!(decl.keys.as_slice(), [CollisionKey::plain("Encode")]);
}

#[test]
fn method_key_includes_receiver() {
    let decl = only("func (c *Color) Encode() []byte { return nil }");
    assert_eq!(decl.kind, DeclKind::Method);
    assert_eq!(
        decl.keys.as_slice(),
        [CollisionKey::method("Color", "Encode")]
    );
}

#[test]
fn generic_receiver_strips_type_parameters() {
    let decl = only("func (s *Set[T]) Len() int { return 0 }");
    assert_eq!(decl.keys.as_slice(), [CollisionKey::method("Set", "Len")]);
}

#[test]
fn const_group_is_one_declaration_with_all_keys() {
    let decl = only("const (\n\tRed = iota\n\tGreen\n\tBlue\n)");
    assert_eq!(decl.kind, DeclKind::Const);
    assert_eq!(
        decl.keys.as_slice(),
        [
            CollisionKey::plain("Red"),
            CollisionKey::plain("Green"),
            CollisionKey::plain("Blue"),
        ]
    );
    assert!(decl.text.starts_with("const ("));
    assert!(decl.text.ends_with(')'));
}

#[test]
fn var_with_multiple_names() {
    let decl = only("var a, b = 1, 2");
    assert_eq!(decl.kind, DeclKind::Var);
    assert_eq!(
        decl.keys.as_slice(),
        [CollisionKey::plain("a"), CollisionKey::plain("b")]
    );
}

#[test]
fn blank_identifier_declares_no_key() {
    let decl = only("var _ = register()");
    assert!(decl.keys.is_empty());
}

#[test]
fn single_import() {
    let decl = only("import \"fmt\"");
    assert_eq!(decl.kind, DeclKind::Import);
    assert_eq!(decl.imports, vec![ImportSpec::plain("fmt")]);
    assert!(decl.keys.is_empty());
}

#[test]
fn import_group_with_aliases() {
    let decl = only("import (\n\t\"fmt\"\n\tcolor2 \"x/color\"\n\t_ \"y/driver\"\n)");
    assert_eq!(
        decl.imports,
        vec![
            ImportSpec::plain("fmt"),
            ImportSpec::aliased("x/color", "color2"),
            ImportSpec::aliased("y/driver", "_"),
        ]
    );
}

#[test]
fn dot_import() {
    let decl = only("import . \"math\"");
    assert_eq!(decl.imports, vec![ImportSpec::aliased("math", ".")]);
}

#[test]
fn multiple_declarations_in_order() {
    let decls = parse_ok("type T struct{}\n\nfunc F() {}\n\nconst C = 1");
    let kinds: Vec<DeclKind> = decls.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DeclKind::Type, DeclKind::Func, DeclKind::Const]);
}

#[test]
fn leading_comment_attaches_to_declaration() {
    let decls = parse_ok("// Color is an RGB triple.\n// It is compact.\ntype Color struct{}");
    assert!(decls[0].text.starts_with("// Color is an RGB triple."));
}

#[test]
fn blank_line_detaches_comment() {
    let decls = parse_ok("// stray remark\n\ntype Color struct{}");
    assert!(decls[0].text.starts_with("type Color"));
}

#[test]
fn multiline_function_bodies_do_not_split() {
    let decl = only("func F() {\n\tx := map[string]int{\n\t\t\"a\": 1,\n\t}\n\t_ = x\n}");
    assert_eq!(decl.keys.as_slice(), [CollisionKey::plain("F")]);
}

#[test]
fn braces_inside_strings_are_ignored() {
    let decl = only("var tmpl = \"{}}{\"");
    assert_eq!(decl.keys.as_slice(), [CollisionKey::plain("tmpl")]);
}

#[test]
fn statement_at_top_level_is_unsupported() {
    let Err(err) = parse_fragment("x := 1") else {
        panic!("expected rejection");
    };
    assert!(matches!(err, CompileError::Unsupported { ref construct, .. } if construct == "x"));
}

#[test]
fn package_clause_is_unsupported() {
    let Err(err) = parse_fragment("package color") else {
        panic!("expected rejection");
    };
    assert!(
        matches!(err, CompileError::Unsupported { ref construct, .. } if construct == "package")
    );
}

#[test]
fn unbalanced_fragment_is_a_syntax_error() {
    let Err(err) = parse_fragment("func F() {") else {
        panic!("expected rejection");
    };
    assert!(matches!(err, CompileError::Syntax { .. }));
}

#[test]
fn error_carries_fragment_verbatim() {
    let src = "func F() {";
    let Err(err) = parse_fragment(src) else {
        panic!("expected rejection");
    };
    assert_eq!(err.fragment(), src);
}

#[test]
fn empty_fragment_yields_no_declarations() {
    assert_eq!(parse_ok(""), vec![]);
    assert_eq!(parse_ok("\n\n// just a comment\n"), vec![]);
}

#[test]
fn semicolon_separated_declarations() {
    let decls = parse_ok("const A = 1; const B = 2");
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[1].keys.as_slice(), [CollisionKey::plain("B")]);
}
