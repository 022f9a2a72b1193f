//! Pattern scanner for a single Go source file
//!
//! Every node of the tree is classified as one of:
//! - a comment (reported whether or not the SDK is imported)
//! - an assignment whose first target is `<alias>.<field>`
//! - any other `<alias>.<field>` reference (call sites, values, types)
//!
//! The left-hand selector of a recognized assignment is not reported again as
//! a reference. Repeated references are reported once per occurrence.

use ast_grep_core::AstGrep;
use ast_grep_language::Go;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::errors::ScanError;
use crate::namespace::{resolve_alias, unquote, GoNode};

/// Right-hand side of a recognized SDK assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedExpr {
    /// Source text of the expression as written
    pub text: Arc<str>,
    /// Literal contents when the expression is a Go string literal
    pub string_literal: Option<Arc<str>>,
}

/// Receiver for scanner findings
pub trait ScanVisitor {
    fn on_marker_comment(&mut self, text: &str);
    fn on_call(&mut self, member: &str);
    fn on_assign(&mut self, field: &str, rhs: &AssignedExpr);
}

/// One classified finding, in traversal order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Comment(Arc<str>),
    Call(Arc<str>),
    Assign { field: Arc<str>, rhs: AssignedExpr },
}

/// All findings for one file
#[derive(Debug, Clone)]
pub struct FileScan {
    pub path: PathBuf,
    /// Local SDK alias, `None` when the file does not import the SDK
    pub alias: Option<String>,
    pub events: Vec<ScanEvent>,
}

impl FileScan {
    /// Feed the recorded findings to `visitor` in their original order
    pub fn replay(&self, visitor: &mut impl ScanVisitor) {
        for event in &self.events {
            match event {
                ScanEvent::Comment(text) => visitor.on_marker_comment(text),
                ScanEvent::Call(member) => visitor.on_call(member),
                ScanEvent::Assign { field, rhs } => visitor.on_assign(field, rhs),
            }
        }
    }
}

impl ScanVisitor for Vec<ScanEvent> {
    fn on_marker_comment(&mut self, text: &str) {
        self.push(ScanEvent::Comment(Arc::from(text)));
    }

    fn on_call(&mut self, member: &str) {
        self.push(ScanEvent::Call(Arc::from(member)));
    }

    fn on_assign(&mut self, field: &str, rhs: &AssignedExpr) {
        self.push(ScanEvent::Assign {
            field: Arc::from(field),
            rhs: rhs.clone(),
        });
    }
}

/// Shape of a node relevant to the manifest
enum SourceNode<'r> {
    Comment(String),
    Assignment {
        target: Range<usize>,
        field: String,
        rhs: GoNode<'r>,
    },
    Reference(String),
}

/// Parse `content` and record every finding
pub fn scan_file(
    path: &Path,
    content: &str,
    sdk_path: &str,
    default_alias: &str,
) -> Result<FileScan, ScanError> {
    let sg = AstGrep::new(content, Go);
    let root = sg.root();

    if let Some(offset) = first_syntax_error(&root) {
        return Err(ScanError::Syntax {
            path: path.to_path_buf(),
            line: line_of(content, offset),
        });
    }

    let alias = resolve_alias(&root, sdk_path, default_alias);
    debug!("{:?}: SDK alias {:?}", path, alias);

    let mut events = Vec::new();
    visit(&root, alias.as_deref(), None, &mut events);

    Ok(FileScan {
        path: path.to_path_buf(),
        alias,
        events,
    })
}

/// Walk `node` and its descendants, reporting findings to `visitor`
///
/// `claimed` is the byte range of an assignment target already reported via
/// `on_assign`.
pub(crate) fn visit(
    node: &GoNode<'_>,
    alias: Option<&str>,
    claimed: Option<&Range<usize>>,
    visitor: &mut impl ScanVisitor,
) {
    let mut claim = None;
    match classify(node, alias) {
        Some(SourceNode::Comment(text)) => visitor.on_marker_comment(&text),
        Some(SourceNode::Assignment { target, field, rhs }) => {
            visitor.on_assign(&field, &assigned_expr(&rhs));
            claim = Some(target);
        }
        Some(SourceNode::Reference(member)) => {
            if claimed != Some(&node.range()) {
                visitor.on_call(&member);
            }
        }
        None => {}
    }

    let claimed = claim.as_ref().or(claimed);
    for child in node.children() {
        visit(&child, alias, claimed, visitor);
    }
}

fn classify<'r>(node: &GoNode<'r>, alias: Option<&str>) -> Option<SourceNode<'r>> {
    let kind = node.kind();
    if kind == "comment" {
        return Some(SourceNode::Comment(node.text().to_string()));
    }

    let alias = alias?;
    match kind.as_ref() {
        "assignment_statement" => {
            let target = first_named(&node.field("left")?)?;
            let field = sdk_member(&target, alias)?;
            let rhs = first_named(&node.field("right")?)?;
            Some(SourceNode::Assignment {
                target: target.range(),
                field,
                rhs,
            })
        }
        "selector_expression" | "qualified_type" => {
            sdk_member(node, alias).map(SourceNode::Reference)
        }
        _ => None,
    }
}

/// Member name when `node` is `<alias>.<member>`
fn sdk_member(node: &GoNode<'_>, alias: &str) -> Option<String> {
    let (qualifier, member) = match node.kind().as_ref() {
        "selector_expression" => {
            let operand = node.field("operand")?;
            if operand.kind() != "identifier" {
                return None;
            }
            (operand, node.field("field")?)
        }
        "qualified_type" => (node.field("package")?, node.field("name")?),
        _ => return None,
    };

    if qualifier.text() == alias {
        Some(member.text().to_string())
    } else {
        None
    }
}

fn first_named<'r>(list: &GoNode<'r>) -> Option<GoNode<'r>> {
    if list.kind() != "expression_list" {
        return Some(list.clone());
    }
    list.children().find(|child| child.is_named() && child.kind() != "comment")
}

fn assigned_expr(rhs: &GoNode<'_>) -> AssignedExpr {
    let text = rhs.text();
    let string_literal = match rhs.kind().as_ref() {
        "interpreted_string_literal" | "raw_string_literal" => Some(Arc::from(unquote(&text))),
        _ => None,
    };
    AssignedExpr {
        text: Arc::from(text.as_ref()),
        string_literal,
    }
}

/// Byte offset of the first ERROR or MISSING node, if the parse failed
fn first_syntax_error(root: &GoNode<'_>) -> Option<usize> {
    if !root.get_ts_node().has_error() {
        return None;
    }
    Some(find_broken_node(root).unwrap_or(root.range().start))
}

fn find_broken_node(node: &GoNode<'_>) -> Option<usize> {
    if node.is_error() || node.get_ts_node().is_missing() {
        return Some(node.range().start);
    }
    node.children().find_map(|child| find_broken_node(&child))
}

/// 1-based line number of a byte offset
fn line_of(content: &str, offset: usize) -> usize {
    content
        .as_bytes()
        .iter()
        .take(offset)
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}
