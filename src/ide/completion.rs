//! Completion: config keys, scope names, the current file's functions and
//! globals, then the language built-ins.

use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::base::{LineCol, TextRange, TextSize};
use crate::config::{Builtin, BuiltinKind, BuiltinTable, ConfigIndex};
use crate::hir::{
    Document, Scope, declared_variables, enclosing_scopes, function_signatures,
    resolve_argument_position_in, scopes_in,
};
use crate::syntax::ScanMap;

/// Separates a function's base name from its mandatory argument names.
const MANDATORY_ARGS_SEPARATOR: &str = "__";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    Function,
    Variable,
    Value,
    Keyword,
    Type,
}

impl From<BuiltinKind> for CompletionKind {
    fn from(kind: BuiltinKind) -> Self {
        match kind {
            BuiltinKind::Keyword => CompletionKind::Keyword,
            BuiltinKind::Type => CompletionKind::Type,
            BuiltinKind::Value => CompletionKind::Value,
            BuiltinKind::Function => CompletionKind::Function,
        }
    }
}

/// A completion item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: SmolStr,
    pub kind: CompletionKind,
    pub detail: Option<String>,
    pub documentation: Option<String>,
    /// Text to insert instead of the label.
    pub insert_text: Option<String>,
    /// Whether `insert_text` uses `${n:placeholder}` tab stops.
    pub is_snippet: bool,
}

impl CompletionItem {
    fn new(label: impl Into<SmolStr>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
            is_snippet: false,
        }
    }
}

/// Completions at `pos`: config keys first, then enclosing scope names,
/// then this file's functions and global variables, then the built-ins.
pub fn completions(
    index: &ConfigIndex,
    builtins: &BuiltinTable,
    doc: &Document,
    pos: LineCol,
) -> Vec<CompletionItem> {
    let text = doc.text();
    let map = ScanMap::new(text);
    let offset = doc.offset(pos);
    let scopes = scopes_in(text, &map);

    let mut items = config_completions(index, text, &map, offset);
    items.extend(scope_completions(&scopes, offset));
    items.extend(file_completions(text, &map, &scopes));
    items.extend(builtin_completions(builtins));
    items
}

/// Keys of the first binding whose argument slot holds the cursor.
///
/// Each key is inserted quoted unless the user already typed a quote.
pub fn config_completions(
    index: &ConfigIndex,
    text: &str,
    map: &ScanMap,
    offset: TextSize,
) -> Vec<CompletionItem> {
    for binding in index.bindings().iter() {
        let Some(pos) = resolve_argument_position_in(text, map, offset, &binding.function) else {
            continue;
        };
        if pos.index != binding.argument {
            continue;
        }

        let detail = format!("From {}", binding.path.display());
        return index
            .entry(binding)
            .keys()
            .iter()
            .map(|key| CompletionItem {
                detail: Some(detail.clone()),
                insert_text: (!pos.is_quoted_literal).then(|| format!("\"{key}\"")),
                ..CompletionItem::new(key.clone(), CompletionKind::Value)
            })
            .collect();
    }
    Vec::new()
}

/// Parameters and locals of every scope around `offset`, innermost first.
pub fn scope_completions(scopes: &[Scope], offset: TextSize) -> Vec<CompletionItem> {
    let names: IndexSet<&SmolStr> = enclosing_scopes(scopes, offset)
        .into_iter()
        .flat_map(Scope::names)
        .collect();

    names
        .into_iter()
        .map(|name| CompletionItem::new(name.clone(), CompletionKind::Variable))
        .collect()
}

/// Functions declared in the file, then variables declared outside every
/// function body.
pub fn file_completions(text: &str, map: &ScanMap, scopes: &[Scope]) -> Vec<CompletionItem> {
    let mut seen = IndexSet::new();
    let mut items = Vec::new();

    for sig in function_signatures(text, map) {
        let (label, mandatory) = split_mandatory_args(&sig.name);
        if !seen.insert((CompletionKind::Function, SmolStr::new(label))) {
            continue;
        }
        items.push(CompletionItem {
            insert_text: Some(make_snippet(label, &mandatory, &sig.params)),
            is_snippet: true,
            ..CompletionItem::new(label, CompletionKind::Function)
        });
    }

    let whole = TextRange::up_to(map.len());
    for (at, name) in declared_variables(text, map, whole) {
        if scopes.iter().any(|scope| scope.contains(at)) {
            continue;
        }
        if seen.insert((CompletionKind::Variable, name.clone())) {
            items.push(CompletionItem::new(name, CompletionKind::Variable));
        }
    }

    items
}

/// Every entry of `builtins`, in table order.
///
/// A function is labelled by its base name and, when it has mandatory
/// arguments or a signature, inserted as a call snippet. Other entries keep
/// their label and their own snippet, if any.
pub fn builtin_completions(builtins: &BuiltinTable) -> Vec<CompletionItem> {
    builtins.iter().map(builtin_item).collect()
}

fn builtin_item(builtin: &Builtin) -> CompletionItem {
    let kind = CompletionKind::from(builtin.kind);
    let base = CompletionItem {
        detail: builtin.detail.clone(),
        documentation: builtin.documentation.clone(),
        ..CompletionItem::new(builtin.label.clone(), kind)
    };

    if builtin.kind != BuiltinKind::Function {
        return CompletionItem {
            insert_text: builtin.snippet.clone(),
            is_snippet: builtin.snippet.is_some(),
            ..base
        };
    }

    let (label, mandatory) = split_mandatory_args(&builtin.label);
    let snippet = (!mandatory.is_empty() || builtin.detail.is_some()).then(|| {
        let params = builtin.detail.as_deref().map(signature_params).unwrap_or_default();
        make_snippet(label, &mandatory, &params)
    });
    CompletionItem {
        label: SmolStr::new(label),
        is_snippet: snippet.is_some(),
        insert_text: snippet,
        ..base
    }
}

/// Parameter names of a signature such as `(mut a: int, b) -> str`.
pub fn signature_params(signature: &str) -> Vec<SmolStr> {
    let Some((_, rest)) = signature.split_once('(') else {
        return Vec::new();
    };
    let inside = rest.split(')').next().unwrap_or_default();

    inside
        .split(',')
        .map(|param| {
            let param = param.trim();
            let param = param.strip_prefix("mut ").unwrap_or(param);
            param.split(':').next().unwrap_or_default().trim()
        })
        .filter(|name| !name.is_empty())
        .map(SmolStr::new)
        .collect()
}

/// Split `name__a_b` into `name` and its mandatory arguments `[a, b]`.
pub fn split_mandatory_args(name: &str) -> (&str, Vec<&str>) {
    match name.split_once(MANDATORY_ARGS_SEPARATOR) {
        Some((base, rest)) => {
            let args = rest
                .split(MANDATORY_ARGS_SEPARATOR)
                .next()
                .unwrap_or_default()
                .split('_')
                .filter(|arg| !arg.is_empty())
                .collect();
            (base, args)
        }
        None => (name, Vec::new()),
    }
}

/// Call snippet for a function.
///
/// Mandatory arguments are listed when there are any, each defaulting to the
/// parameter in the same position; otherwise every parameter is listed.
pub fn make_snippet(label: &str, mandatory: &[&str], params: &[SmolStr]) -> String {
    let args: Vec<(&str, &str)> = if mandatory.is_empty() {
        let mut unique: IndexSet<&str> = IndexSet::new();
        unique.extend(params.iter().map(SmolStr::as_str));
        unique.into_iter().map(|p| (p, p)).collect()
    } else {
        mandatory
            .iter()
            .enumerate()
            .map(|(i, &arg)| (arg, params.get(i).map_or(arg, SmolStr::as_str)))
            .collect()
    };

    let placeholders: Vec<String> = args
        .iter()
        .enumerate()
        .map(|(i, (name, default))| format!("{name}: ${{{}:{default}}}", i + 1))
        .collect();
    format!("{label}({})", placeholders.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("greet", "greet", &[])]
    #[case("greet__name", "greet", &["name"])]
    #[case("send__to_body", "send", &["to", "body"])]
    #[case("odd__", "odd", &[])]
    fn test_split_mandatory_args(#[case] name: &str, #[case] base: &str, #[case] args: &[&str]) {
        assert_eq!(split_mandatory_args(name), (base, args.to_vec()));
    }

    #[test]
    fn test_make_snippet() {
        let params = [SmolStr::new("who"), SmolStr::new("loud")];

        assert_eq!(make_snippet("greet", &[], &[]), "greet()");
        assert_eq!(
            make_snippet("greet", &[], &params),
            "greet(who: ${1:who}, loud: ${2:loud})"
        );
        assert_eq!(make_snippet("greet", &["name"], &params), "greet(name: ${1:who})");
        assert_eq!(make_snippet("send", &["to", "body"], &[]), "send(to: ${1:to}, body: ${2:body})");
    }

    #[rstest]
    #[case("(var)", &["var"])]
    #[case("(message: str) -> f64", &["message"])]
    #[case("(var: bool, msg) -> sec[bool]", &["var", "msg"])]
    #[case("(mut list: [any], x)", &["list", "x"])]
    #[case("() -> str", &[])]
    #[case("str", &[])]
    fn test_signature_params(#[case] signature: &str, #[case] expected: &[&str]) {
        let params = signature_params(signature);
        assert_eq!(params.iter().map(SmolStr::as_str).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_builtin_completions() {
        let builtins = BuiltinTable::new()
            .with(Builtin::new("if", BuiltinKind::Keyword).snippet("if (${1:condition}) {\n\t$0\n}"))
            .with(Builtin::new("bool", BuiltinKind::Type).documentation("Boolean type"))
            .with(Builtin::new("read_number", BuiltinKind::Function).detail("(message: str) -> f64"))
            .with(Builtin::new("send__to", BuiltinKind::Function))
            .with(Builtin::new("debug", BuiltinKind::Function));

        let items = builtin_completions(&builtins);
        assert_eq!(labels(&items), vec!["if", "bool", "read_number", "send", "debug"]);

        assert_eq!(items[0].kind, CompletionKind::Keyword);
        assert!(items[0].is_snippet);
        assert_eq!(items[1].kind, CompletionKind::Type);
        assert_eq!(items[1].documentation.as_deref(), Some("Boolean type"));
        assert_eq!(items[1].insert_text, None);

        assert_eq!(items[2].insert_text.as_deref(), Some("read_number(message: ${1:message})"));
        assert_eq!(items[2].detail.as_deref(), Some("(message: str) -> f64"));
        assert_eq!(items[3].insert_text.as_deref(), Some("send(to: ${1:to})"));
        assert_eq!(items[4].insert_text, None);
        assert!(!items[4].is_snippet);
    }

    fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_scope_completions_innermost_first() {
        let text = "fn outer(a) {\n  b := 1\n  f := fn inner(c) {\n    a := 2\n    \n  }\n}";
        let scopes = scopes_in(text, &ScanMap::new(text));
        let cursor = TextSize::from(text.find("    \n").unwrap() as u32 + 4);

        let items = scope_completions(&scopes, cursor);
        assert_eq!(labels(&items), vec!["c", "a", "b", "f"]);
        assert!(items.iter().all(|i| i.kind == CompletionKind::Variable));
    }

    #[test]
    fn test_file_completions() {
        let text = "limit := 3\nfn greet__name(who) {\n  inner := 1\n}\nlimit := 4\nfn ping() {}\ndone := true";
        let map = ScanMap::new(text);
        let scopes = scopes_in(text, &map);

        let items = file_completions(text, &map, &scopes);
        assert_eq!(labels(&items), vec!["greet", "ping", "limit", "done"]);

        let greet = &items[0];
        assert_eq!(greet.kind, CompletionKind::Function);
        assert_eq!(greet.insert_text.as_deref(), Some("greet(name: ${1:who})"));
        assert!(greet.is_snippet);
        assert_eq!(items[1].insert_text.as_deref(), Some("ping()"));
    }
}
