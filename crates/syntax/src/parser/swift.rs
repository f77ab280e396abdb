//! Swift 声明解析 - 使用 tree-sitter 提取类型声明及继承子句

use super::{DeclarationParser, ParseError, Result};
use crate::types::{DeclKind, EntryPart, InheritanceEntry, TypeDecl};
use tree_sitter::{Node, Parser};

const DECLARATION_KINDS: &[&str] = &["class_declaration", "protocol_declaration"];

/// Swift 解析器
///
/// tree-sitter 的 `Parser` 不是 `Sync`, 每次解析新建一个, 解析器本身可在线程间共享.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwiftParser;

impl SwiftParser {
    pub fn new() -> Self {
        Self
    }

    fn create_parser() -> Result<Parser> {
        let mut parser = Parser::new();
        let language = tree_sitter_swift::language();
        parser
            .set_language(&language)
            .map_err(|e| ParseError::Language(e.to_string()))?;
        Ok(parser)
    }

    /// 后序遍历: 内层声明先于外层
    fn visit_node(node: Node, content: &str, decls: &mut Vec<TypeDecl>) {
        for child in node.children(&mut node.walk()) {
            Self::visit_node(child, content, decls);
        }

        if DECLARATION_KINDS.contains(&node.kind()) {
            if let Some(decl) = Self::extract_decl(node, content) {
                decls.push(decl);
            }
        }
    }

    fn extract_decl(node: Node, content: &str) -> Option<TypeDecl> {
        let name = node
            .child_by_field_name("name")
            .or_else(|| {
                node.children(&mut node.walk())
                    .find(|c| c.kind() == "type_identifier")
            })
            .map(|c| content[c.byte_range()].to_string())?;

        let kind = if node.kind() == "protocol_declaration" {
            DeclKind::Protocol
        } else {
            node.child_by_field_name("declaration_kind")
                .and_then(|k| DeclKind::from_keyword(k.kind()))
                .or_else(|| {
                    node.children(&mut node.walk())
                        .find_map(|c| DeclKind::from_keyword(c.kind()))
                })
                .unwrap_or(DeclKind::Class)
        };

        let inherited = node
            .children(&mut node.walk())
            .filter(|c| c.kind() == "inheritance_specifier")
            .filter_map(|spec| Self::extract_entry(spec, content))
            .collect();

        Some(TypeDecl {
            name,
            kind,
            line: node.start_position().row as u32 + 1,
            inherited,
        })
    }

    /// `inheritance_specifier` -> 继承项
    fn extract_entry(spec: Node, content: &str) -> Option<InheritanceEntry> {
        let inherited = spec
            .child_by_field_name("inherits_from")
            .or_else(|| spec.named_child(0))?;

        let text = content[inherited.byte_range()].to_string();

        let parts = if inherited.kind() == "user_type" {
            inherited
                .children(&mut inherited.walk())
                .filter(|c| !c.is_extra())
                .map(|c| Self::entry_part(c, content))
                .collect()
        } else {
            vec![EntryPart::Other(inherited.kind().to_string())]
        };

        Some(InheritanceEntry::new(text, parts))
    }

    fn entry_part(node: Node, content: &str) -> EntryPart {
        match node.kind() {
            "type_identifier" => EntryPart::Name(content[node.byte_range()].to_string()),
            "type_arguments" => {
                let args = node
                    .named_children(&mut node.walk())
                    .filter(|c| !c.is_extra())
                    .map(|c| content[c.byte_range()].to_string())
                    .collect();
                EntryPart::GenericArguments(args)
            }
            other => EntryPart::Other(other.to_string()),
        }
    }

    /// 收集所有 ERROR / MISSING 节点
    fn collect_errors<'t>(node: Node<'t>, errors: &mut Vec<Node<'t>>) {
        if node.is_error() || node.is_missing() {
            errors.push(node);
        }
        if !node.has_error() {
            return;
        }
        for child in node.children(&mut node.walk()) {
            Self::collect_errors(child, errors);
        }
    }

    /// 错误节点是否落在某个类型声明内部
    fn inside_declaration(node: Node) -> bool {
        let mut current = node.parent();
        while let Some(parent) = current {
            if DECLARATION_KINDS.contains(&parent.kind()) {
                return true;
            }
            current = parent.parent();
        }
        false
    }
}

impl DeclarationParser for SwiftParser {
    fn parse_source(&self, source: &str) -> Result<Vec<TypeDecl>> {
        let mut parser = Self::create_parser()?;

        let tree = parser
            .parse(source.as_bytes(), None)
            .ok_or(ParseError::NoTree)?;
        let root = tree.root_node();

        let mut decls = Vec::new();
        Self::visit_node(root, source, &mut decls);

        // 声明之外的错误 (例如 grammar 不认识的 `#Preview { ... }`) 不影响已提取的声明;
        // 落在声明内部, 或整个文件没有任何声明时, 整个文件失败
        let mut errors = Vec::new();
        Self::collect_errors(root, &mut errors);

        for error in &errors {
            let pos = error.start_position();
            if decls.is_empty() || Self::inside_declaration(*error) {
                return Err(ParseError::Syntax {
                    line: pos.row as u32 + 1,
                    column: pos.column as u32 + 1,
                });
            }
            tracing::debug!(
                "Ignoring syntax error outside declarations at {}:{}",
                pos.row + 1,
                pos.column + 1
            );
        }

        Ok(decls)
    }
}
