use super::*;
use pretty_assertions::assert_eq;

use skein_ir::ModulePath;

fn generator() -> Generator {
    Generator::new(GeneratorConfig::new("color", "example.org/gen/color"))
}

fn declare_ok(gen: &mut Generator, template: &str) {
    let ctx = Value::map([]);
    if let Err(err) = gen.declare(template, &ctx) {
        panic!("declare failed for {template:?}: {err}");
    }
}

fn written(gen: &mut Generator) -> String {
    let mut sink: Vec<u8> = Vec::new();
    if let Err(err) = gen.write(&mut sink) {
        panic!("write failed: {err}");
    }
    match String::from_utf8(sink) {
        Ok(text) => text,
        Err(_) => panic!("sink holds invalid utf-8"),
    }
}

#[test]
fn admits_declarations_into_pending_buffer() {
    let mut gen = generator();
    declare_ok(&mut gen, "type T struct{}");
    declare_ok(&mut gen, "func F() {}");
    assert_eq!(gen.pending_len(), 2);
}

#[test]
fn import_directives_merge_instead_of_buffering() {
    let mut gen = generator();
    declare_ok(&mut gen, "import \"fmt\"");
    assert_eq!(gen.pending_len(), 0);
    let out = written(&mut gen);
    assert!(out.contains("import (\n\t\"fmt\"\n)"));
}

#[test]
fn strict_conflict_is_an_error() {
    let mut gen = generator();
    declare_ok(&mut gen, "func F() {}");
    let err = gen.declare("func F() {}", &Value::map([]));
    assert!(matches!(err, Err(EmitError::Conflict { key }) if key == "F"));
    assert_eq!(gen.pending_len(), 1);
}

#[test]
fn lenient_conflict_is_a_silent_skip() {
    let mut gen = generator();
    declare_ok(&mut gen, "func F() {}");
    let ctx = Value::map([]);
    assert!(gen.ensure_declared("func F() {}", &ctx).is_ok());
    assert_eq!(gen.pending_len(), 1);
}

#[test]
fn failed_strict_declare_rolls_back_the_whole_call() {
    let mut gen = generator();
    declare_ok(&mut gen, "func Taken() {}");

    // First declaration is new, second collides: the call fails and the
    // first name must be released again.
    let err = gen.declare("func Fresh() {}\n\nfunc Taken() {}", &Value::map([]));
    assert!(matches!(err, Err(EmitError::Conflict { .. })));
    assert_eq!(gen.pending_len(), 1);

    declare_ok(&mut gen, "func Fresh() {}");
    assert_eq!(gen.pending_len(), 2);
}

#[test]
fn lenient_skip_releases_partial_keys_of_the_skipped_declaration() {
    let mut gen = generator();
    declare_ok(&mut gen, "var b = 1");

    // `a` reserves, `b` collides, so the whole var spec is skipped and
    // `a` must remain free.
    let ctx = Value::map([]);
    assert!(gen.ensure_declared("var a, b = 1, 2", &ctx).is_ok());
    assert_eq!(gen.pending_len(), 1);
    declare_ok(&mut gen, "var a = 3");
}

#[test]
fn methods_on_distinct_receivers_coexist() {
    let mut gen = generator();
    declare_ok(&mut gen, "func (a A) Reset() {}");
    declare_ok(&mut gen, "func (b B) Reset() {}");
    let err = gen.declare("func (a A) Reset() {}", &Value::map([]));
    assert!(matches!(err, Err(EmitError::Conflict { key }) if key == "A.Reset"));
}

#[test]
fn template_errors_abort_the_call() {
    let mut gen = generator();
    let err = gen.declare("$(missing)", &Value::map([]));
    assert!(matches!(err, Err(EmitError::Template(_))));
    assert_eq!(gen.pending_len(), 0);
}

#[test]
fn compile_errors_abort_the_call() {
    let mut gen = generator();
    let err = gen.declare("not a declaration", &Value::map([]));
    assert!(matches!(err, Err(EmitError::Compile(_))));
    assert_eq!(gen.pending_len(), 0);
}

#[test]
fn sink_failure_propagates_and_preserves_state() {
    struct FailSink;
    impl io::Write for FailSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let mut gen = generator();
    declare_ok(&mut gen, "type T struct{}");
    let err = gen.write(&mut FailSink);
    assert!(matches!(err, Err(EmitError::Sink(_))));
    // The pending buffer survives for the caller's retry.
    assert_eq!(gen.pending_len(), 1);
}

#[test]
fn mangle_type_is_exposed_directly() {
    let mut gen = generator();
    let ty = TypeRef::new("x/color", "RGBA");
    let name = gen.mangle_type(&ty);
    assert_eq!(name, gen.mangle_type(&ty));
    // The mangled name occupies the package namespace.
    let err = gen.declare(&format!("func {name}() {{}}"), &Value::map([]));
    assert!(matches!(err, Err(EmitError::Conflict { .. })));
}

#[test]
fn custom_banner_and_package_name() {
    let config = GeneratorConfig::new("geom", "example.org/gen/geom")
        .with_banner("// Code generated by geomgen. DO NOT EDIT.");
    let mut gen = Generator::new(config);
    assert_eq!(gen.package_name(), "geom");
    let out = written(&mut gen);
    assert!(out.starts_with("// Code generated by geomgen. DO NOT EDIT.\n\npackage geom\n"));
}

#[test]
fn forgettable_set_is_configurable() {
    let config = GeneratorConfig::new("color", "x/color")
        .with_forgettable(vec!["register".to_string()]);
    let mut gen = Generator::new(config);
    declare_ok(&mut gen, "func register() {}");
    declare_ok(&mut gen, "func init() {}");
    let _ = written(&mut gen);

    // `register` was forgotten at the flush; `init` was not.
    declare_ok(&mut gen, "func register() {}");
    let err = gen.declare("func init() {}", &Value::map([]));
    assert!(matches!(err, Err(EmitError::Conflict { .. })));
}

#[test]
fn modules_path_compare_for_registry() {
    // Guard against accidental path/name confusion in config wiring.
    let gen = generator();
    assert_eq!(gen.state.module(), &ModulePath::new("example.org/gen/color"));
}
