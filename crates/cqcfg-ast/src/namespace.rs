//! Resolution of the local name bound to the SDK package in one Go file

use ast_grep_core::source::StrDoc;
use ast_grep_core::Node;
use ast_grep_language::Go;
use tracing::debug;

pub(crate) type GoNode<'r> = Node<'r, StrDoc<Go>>;

/// Local alias of the SDK import in one file
///
/// Returns `None` when the file does not import the SDK, or imports it as `.`
/// or `_` (neither form yields `<alias>.<member>` selectors).
pub fn resolve_alias(root: &GoNode<'_>, sdk_path: &str, default_alias: &str) -> Option<String> {
    for spec in import_specs(root) {
        let Some(path) = spec.field("path") else {
            continue;
        };
        if unquote(&path.text()) != sdk_path {
            continue;
        }

        let alias = match spec.field("name") {
            Some(name) => name.text().to_string(),
            None => default_alias.to_string(),
        };

        if alias == "." || alias == "_" {
            debug!("SDK imported as `{}`, no selectors to resolve", alias);
            return None;
        }
        return Some(alias);
    }
    None
}

fn import_specs<'r>(root: &GoNode<'r>) -> Vec<GoNode<'r>> {
    let mut specs = Vec::new();
    for decl in root.children().filter(|n| n.kind() == "import_declaration") {
        for child in decl.children() {
            match child.kind().as_ref() {
                "import_spec" => specs.push(child),
                "import_spec_list" => {
                    specs.extend(child.children().filter(|n| n.kind() == "import_spec"));
                }
                _ => {}
            }
        }
    }
    specs
}

/// Strip the delimiters of a Go string literal (`"..."` or `` `...` ``)
pub(crate) fn unquote(literal: &str) -> &str {
    literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| {
            literal
                .strip_prefix('`')
                .and_then(|s| s.strip_suffix('`'))
        })
        .unwrap_or(literal)
}
