//! Built-in template function bindings.
//!
//! Assembled once per generator. Every binding receives [`EmitState`]
//! explicitly; none captures anything. The external helper generators
//! (wire encoding, equality, serialization expression builders) are
//! merged into the same table via [`crate::Generator::register_helper`].

use skein_ir::{TypeRef, Value};
use skein_template::{FuncTable, TemplateError};

use crate::state::EmitState;

const DOC_WIDTH: usize = 77;

pub(crate) fn builtin_table() -> FuncTable<EmitState> {
    let mut funcs = FuncTable::new();

    // Qualified reference to a type, auto-importing its defining module
    // when it is not the package being generated.
    funcs.bind("typeref", |state: &mut EmitState, args: &[Value]| {
        let ty = descriptor("typeref", args, state)?;
        Ok(state.qualified_name(&ty))
    });

    // Same resolution for a constant reference.
    funcs.bind("constref", |state: &mut EmitState, args: &[Value]| {
        let ty = descriptor("constref", args, state)?;
        Ok(state.qualified_name(&ty))
    });

    // Import a module by path, yielding its local alias.
    funcs.bind("import", |state: &mut EmitState, args: &[Value]| {
        let path = scalar_arg("import", args)?;
        Ok(state.import(&path.as_str().into()))
    });

    // Stable synthetic helper name for a type.
    funcs.bind("mangle", |state: &mut EmitState, args: &[Value]| {
        let ty = descriptor("mangle", args, state)?;
        Ok(state.mangle(&ty))
    });

    funcs.bind("pascal", |_: &mut EmitState, args: &[Value]| {
        Ok(to_pascal(&scalar_arg("pascal", args)?))
    });

    funcs.bind("camel", |_: &mut EmitState, args: &[Value]| {
        Ok(to_camel(&scalar_arg("camel", args)?))
    });

    // Documentation text → line-comment block.
    funcs.bind("doc", |_: &mut EmitState, args: &[Value]| {
        Ok(doc_block(&scalar_arg("doc", args)?))
    });

    // Fresh local variable name, scoped to this render.
    funcs.bind("fresh", |state: &mut EmitState, args: &[Value]| {
        Ok(state.fresh(&scalar_arg("fresh", args)?))
    });

    funcs
}

/// A `{name, module}` or `{name, file}` descriptor map argument.
fn descriptor(
    func: &str,
    args: &[Value],
    state: &EmitState,
) -> Result<TypeRef, TemplateError> {
    let Some(map @ Value::Map(_)) = args.first() else {
        return Err(TemplateError::apply(func, "expected a descriptor map"));
    };
    let Some(name) = map.get("name").and_then(Value::as_str) else {
        return Err(TemplateError::apply(func, "descriptor is missing `name`"));
    };
    if let Some(module) = map.get("module").and_then(Value::as_str) {
        return Ok(TypeRef::new(module, name));
    }
    if let Some(file) = map.get("file").and_then(Value::as_str) {
        let module = state.resolve_module(file).ok_or_else(|| {
            TemplateError::apply(func, format!("no module known for schema file `{file}`"))
        })?;
        return Ok(TypeRef::new(module, name));
    }
    Err(TemplateError::apply(
        func,
        "descriptor needs a `module` or `file` key",
    ))
}

fn scalar_arg(func: &str, args: &[Value]) -> Result<String, TemplateError> {
    args.first()
        .and_then(Value::scalar)
        .ok_or_else(|| TemplateError::apply(func, "expected a scalar argument"))
}

fn to_pascal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split(|c: char| c == '_' || c == '-' || c == ' ' || c == '.') {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn to_camel(s: &str) -> String {
    let pascal = to_pascal(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => pascal,
    }
}

/// Wrap documentation text into a `// ` comment block.
fn doc_block(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push("//".to_string());
            continue;
        }
        let mut line = String::from("//");
        for word in paragraph.split_whitespace() {
            if line.len() + 1 + word.len() > DOC_WIDTH && line.len() > 2 {
                lines.push(std::mem::replace(&mut line, String::from("//")));
            }
            line.push(' ');
            line.push_str(word);
        }
        lines.push(line);
    }
    lines.join("\n")
}
