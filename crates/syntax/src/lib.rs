//! syntax - Swift 源码解析
//!
//! 源文件枚举 + 类型声明 / 继承子句提取 (tree-sitter)

mod parser;
mod sources;
mod types;

pub use parser::{DeclarationParser, ParseError, SwiftParser};
pub use sources::{ScanError, SourceScanner};
pub use types::{DeclKind, EntryPart, InheritanceEntry, SourceFile, TypeDecl};
