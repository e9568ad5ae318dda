//! Node tree → rendered text.

use rustc_hash::FxHashMap;

use skein_ir::Value;

use crate::error::TemplateError;
use crate::parse::{parse_template, Arg, Node};

/// A template function bound to the generation state.
///
/// The state arrives as an explicit first argument; the table is built
/// from closures when the generator is constructed, never through runtime
/// inspection of what a function "wants".
pub type BoundFn<S> = Box<dyn Fn(&mut S, &[Value]) -> Result<String, TemplateError>>;

/// Named template functions available to `$(fn …)` actions.
pub struct FuncTable<S> {
    funcs: FxHashMap<String, BoundFn<S>>,
}

impl<S> FuncTable<S> {
    /// Create an empty table.
    pub fn new() -> Self {
        FuncTable {
            funcs: FxHashMap::default(),
        }
    }

    /// Bind `name` to `f`, replacing any previous binding of that name.
    pub fn bind(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut S, &[Value]) -> Result<String, TemplateError> + 'static,
    ) {
        self.funcs.insert(name.into(), Box::new(f));
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<&BoundFn<S>> {
        self.funcs.get(name)
    }
}

impl<S> Default for FuncTable<S> {
    fn default() -> Self {
        FuncTable::new()
    }
}

/// Expand `source` against `ctx`, resolving function actions through
/// `funcs` with `state` threaded into every call.
///
/// On error nothing is returned: a failed render produces no partial
/// output. Persistent generation state changes only through the invoked
/// functions themselves (an import registered while resolving a type name,
/// a fresh variable reserved, …).
pub fn render<S>(
    source: &str,
    ctx: &Value,
    funcs: &FuncTable<S>,
    state: &mut S,
) -> Result<String, TemplateError> {
    let nodes = parse_template(source)?;
    let mut out = String::with_capacity(source.len());
    render_nodes(&nodes, ctx, funcs, state, &mut out)?;
    Ok(out)
}

fn render_nodes<S>(
    nodes: &[Node],
    ctx: &Value,
    funcs: &FuncTable<S>,
    state: &mut S,
    out: &mut String,
) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Expr { head, args, .. } => {
                if let Some(f) = funcs.get(head) {
                    let values = resolve_args(args, ctx)?;
                    out.push_str(&f(state, &values)?);
                } else if args.is_empty() {
                    let value = ctx
                        .lookup(head)
                        .ok_or_else(|| TemplateError::MissingField { path: head.clone() })?;
                    let scalar = value
                        .scalar()
                        .ok_or_else(|| TemplateError::NotScalar { path: head.clone() })?;
                    out.push_str(&scalar);
                } else {
                    return Err(TemplateError::UnknownFunction { name: head.clone() });
                }
            }
            Node::If {
                cond,
                then,
                otherwise,
            } => {
                // An absent field is simply false, so optional data needs
                // no presence marker alongside it.
                let truthy = ctx.lookup(cond).is_some_and(Value::is_truthy);
                let branch = if truthy { then } else { otherwise };
                render_nodes(branch, ctx, funcs, state, out)?;
            }
            Node::Each { path, body } => {
                let value = ctx
                    .lookup(path)
                    .ok_or_else(|| TemplateError::MissingField { path: path.clone() })?;
                match value {
                    Value::List(items) => {
                        for item in items {
                            render_nodes(body, item, funcs, state, out)?;
                        }
                    }
                    Value::Null => {}
                    _ => {
                        return Err(TemplateError::NotList { path: path.clone() });
                    }
                }
            }
        }
    }
    Ok(())
}

fn resolve_args(args: &[Arg], ctx: &Value) -> Result<Vec<Value>, TemplateError> {
    args.iter()
        .map(|arg| match arg {
            Arg::Path(path) => ctx
                .lookup(path)
                .cloned()
                .ok_or_else(|| TemplateError::MissingField { path: path.clone() }),
            Arg::Lit(lit) => Ok(Value::Str(lit.clone())),
        })
        .collect()
}
