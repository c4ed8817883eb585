use std::collections::HashMap;
use std::path::Path;

use tree_sitter::{Language, Node, Parser, Query, QueryCursor, StreamingIterator, Tree};

use crate::error::{Result, TestDocError};
use crate::models::{AnnotationRef, SourceMethod};

const HEADER_QUERY_SRC: &str = r"
    (package_declaration) @package
    (import_declaration) @import
";

const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

/// Extracts method declarations of one class from Java source.
pub struct JavaSourceParser {
    language: Language,
    header_query: Query,
    /// Reject sources with syntax errors.
    strict: bool,
}

impl Default for JavaSourceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaSourceParser {
    #[must_use]
    pub fn new() -> Self {
        let language: Language = tree_sitter_java::LANGUAGE.into();
        let header_query =
            Query::new(&language, HEADER_QUERY_SRC).expect("Java header query must compile");
        Self {
            language,
            header_query,
            strict: true,
        }
    }

    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn make_parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| TestDocError::Parse {
                path: String::new(),
                detail: format!("failed to set Java language: {e}"),
            })?;
        Ok(parser)
    }

    /// Read `path` and return the methods declared by `class_name`.
    ///
    /// Bytes that are not UTF-8 (Latin-1 comments and the like) are replaced
    /// rather than rejected.
    pub fn load_class(&self, path: &Path, class_name: &str) -> Result<Vec<SourceMethod>> {
        let bytes = std::fs::read(path)?;
        let source = String::from_utf8_lossy(&bytes);
        self.extract(&source, class_name, &path.to_string_lossy())
    }

    /// Return the methods declared directly by `class_name` (a binary name
    /// such as `com.acme.Outer$Inner`) in `source`.
    pub fn parse_class(&self, source: &str, class_name: &str) -> Result<Vec<SourceMethod>> {
        self.extract(source, class_name, "<memory>")
    }

    fn extract(&self, source: &str, class_name: &str, label: &str) -> Result<Vec<SourceMethod>> {
        let mut parser = self.make_parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| TestDocError::Parse {
            path: label.to_string(),
            detail: "tree-sitter parse returned None".into(),
        })?;
        let root = tree.root_node();

        if root.has_error() {
            let lines = find_error_lines(root);
            if self.strict {
                return Err(TestDocError::Parse {
                    path: label.to_string(),
                    detail: format!("syntax errors at lines {lines:?}"),
                });
            }
            tracing::warn!(path = label, ?lines, "continuing past syntax errors");
        }

        let source_bytes = source.as_bytes();
        let imports = self.read_imports(&tree, source_bytes);

        let (package, simple) = class_name.rsplit_once('.').unwrap_or(("", class_name));
        let not_declared = || TestDocError::ClassNotInSource {
            class: class_name.to_string(),
            path: label.to_string(),
        };
        if imports.package != package {
            return Err(not_declared());
        }
        let names: Vec<&str> = simple.split('$').collect();
        let class_node = find_type(root, &names, source_bytes).ok_or_else(not_declared)?;

        Ok(members(class_node)
            .filter(|n| n.kind() == "method_declaration")
            .filter_map(|n| to_source_method(n, source, &imports))
            .collect())
    }

    fn read_imports(&self, tree: &Tree, source_bytes: &[u8]) -> Imports {
        let mut imports = Imports::default();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.header_query, tree.root_node(), source_bytes);

        while let Some(m) = matches.next() {
            for cap in m.captures {
                let cap_name = &self.header_query.capture_names()[cap.index as usize];
                match *cap_name {
                    "package" => {
                        if let Some(name) = children(cap.node)
                            .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
                        {
                            imports.package = node_text(name, source_bytes).to_string();
                        }
                    }
                    "import" => imports.add(node_text(cap.node, source_bytes)),
                    _ => {}
                }
            }
        }
        imports
    }
}

/// Package and type imports of one compilation unit.
#[derive(Debug, Default)]
struct Imports {
    package: String,
    /// Simple name -> fully-qualified name.
    single: HashMap<String, String>,
    /// Packages imported on demand (`import a.b.*;`).
    on_demand: Vec<String>,
}

impl Imports {
    fn add(&mut self, declaration: &str) {
        let body = declaration
            .trim()
            .trim_start_matches("import")
            .trim()
            .trim_end_matches(';')
            .trim();
        // Static imports bring members, never annotation types.
        if body.starts_with("static") && body[6..].starts_with(char::is_whitespace) {
            return;
        }
        let path: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        if let Some(package) = path.strip_suffix(".*") {
            self.on_demand.push(package.to_string());
        } else if let Some((_, simple)) = path.rsplit_once('.') {
            self.single.insert(simple.to_string(), path.clone());
        }
    }

    fn qualify(&self, name: &str) -> String {
        if self.package.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.package)
        }
    }

    /// Fully-qualified candidates for an annotation name as written.
    fn resolve(&self, written: &str) -> Vec<String> {
        let mut candidates = Vec::new();
        if let Some((head, tail)) = written.split_once('.') {
            match self.single.get(head) {
                Some(fqn) => candidates.push(format!("{fqn}.{tail}")),
                None => {
                    candidates.push(written.to_string());
                    candidates.push(self.qualify(written));
                }
            }
        } else if let Some(fqn) = self.single.get(written) {
            candidates.push(fqn.clone());
        } else {
            candidates.extend(self.on_demand.iter().map(|p| format!("{p}.{written}")));
            candidates.push(self.qualify(written));
            candidates.push(format!("java.lang.{written}"));
        }
        let mut seen = std::collections::HashSet::new();
        candidates.retain(|c| seen.insert(c.clone()));
        candidates
    }
}

fn children<'t>(node: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    (0..node.child_count()).filter_map(move |i| node.child(i as u32))
}

fn node_text<'s>(node: Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

fn declared_name<'s>(node: Node, source: &'s [u8]) -> Option<&'s str> {
    node.child_by_field_name("name")
        .map(|n| node_text(n, source))
}

/// Members of a type declaration's body; enum constants' trailing
/// declarations are flattened in.
fn members<'t>(declaration: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    declaration
        .child_by_field_name("body")
        .into_iter()
        .flat_map(children)
        .flat_map(|n| {
            let nested: Vec<Node<'t>> = if n.kind() == "enum_body_declarations" {
                children(n).collect()
            } else {
                vec![n]
            };
            nested
        })
}

/// Walk `names` (outermost first) down through nested type declarations.
fn find_type<'t>(root: Node<'t>, names: &[&str], source: &[u8]) -> Option<Node<'t>> {
    let (first, rest) = names.split_first()?;
    let mut found = children(root).find(|n| is_type_named(*n, first, source))?;
    for name in rest {
        found = members(found).find(|n| is_type_named(*n, name, source))?;
    }
    Some(found)
}

fn is_type_named(node: Node, name: &str, source: &[u8]) -> bool {
    TYPE_DECLARATION_KINDS.contains(&node.kind()) && declared_name(node, source) == Some(name)
}

fn to_source_method(node: Node, source: &str, imports: &Imports) -> Option<SourceMethod> {
    let bytes = source.as_bytes();
    let name = declared_name(node, bytes)?.to_string();

    let annotations = children(node)
        .filter(|c| c.kind() == "modifiers")
        .flat_map(children)
        .filter(|c| matches!(c.kind(), "marker_annotation" | "annotation"))
        .filter_map(|a| a.child_by_field_name("name"))
        .map(|n| {
            let written = node_text(n, bytes).to_string();
            AnnotationRef {
                candidates: imports.resolve(&written),
                written,
            }
        })
        .collect();

    let comments = leading_comments(node);
    let span_start = comments.first().map_or(node.start_byte(), Node::start_byte);
    let doc_comment = if comments.is_empty() {
        None
    } else {
        Some(
            comments
                .iter()
                .map(|c| node_text(*c, bytes))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    };

    let body = node
        .child_by_field_name("body")
        .map(|b| block_inner(node_text(b, bytes)));

    Some(SourceMethod {
        name,
        annotations,
        text: source[span_start..node.end_byte()].to_string(),
        body,
        doc_comment,
        start_line: node.start_position().row as u32 + 1,
        end_line: node.end_position().row as u32 + 1,
    })
}

/// Comments directly above `node` with no blank line in between, in source
/// order. A comment trailing code on its line ends the run.
fn leading_comments(node: Node) -> Vec<Node> {
    let mut comments = Vec::new();
    let mut next_row = node.start_position().row;
    let mut prev = node.prev_sibling();
    while let Some(p) = prev {
        if !matches!(p.kind(), "line_comment" | "block_comment")
            || p.end_position().row + 1 < next_row
            || !starts_row(p)
        {
            break;
        }
        next_row = p.start_position().row;
        comments.push(p);
        prev = p.prev_sibling();
    }
    comments.reverse();
    comments
}

/// No sibling token precedes `node` on its first row.
fn starts_row(node: Node) -> bool {
    !matches!(
        node.prev_sibling(),
        Some(prev) if prev.end_position().row == node.start_position().row
    )
}

fn block_inner(block: &str) -> String {
    let inner = block
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(block);
    let inner = inner.trim_end();
    if inner.contains('\n') {
        inner
            .trim_start_matches(|c| c == '\r' || c == '\n')
            .to_string()
    } else {
        inner.trim().to_string()
    }
}

/// 1-based line numbers of all ERROR or MISSING nodes.
fn find_error_lines(root: Node) -> Vec<u32> {
    let mut errors = Vec::new();
    let mut cursor = root.walk();

    fn visit(cursor: &mut tree_sitter::TreeCursor, errors: &mut Vec<u32>) {
        loop {
            let node = cursor.node();
            if node.is_error() || node.is_missing() {
                let line = node.start_position().row as u32 + 1;
                if !errors.contains(&line) {
                    errors.push(line);
                }
            }
            if cursor.goto_first_child() {
                visit(cursor, errors);
                cursor.goto_parent();
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    visit(&mut cursor, &mut errors);
    errors.sort_unstable();
    errors
}
