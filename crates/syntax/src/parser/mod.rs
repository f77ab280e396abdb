mod swift;

pub use swift::SwiftParser;

use crate::types::TypeDecl;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Language error: {0}")]
    Language(String),
    #[error("Parser produced no tree")]
    NoTree,
    #[error("Syntax error at {line}:{column}")]
    Syntax { line: u32, column: u32 },
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// 声明解析器 trait
///
/// 对一个文件给出其中所有类型声明及继承子句. 并发模式下会在多个
/// worker 线程间共享, 因此要求 `Send + Sync`.
pub trait DeclarationParser: Send + Sync {
    /// 解析源码文本
    fn parse_source(&self, source: &str) -> Result<Vec<TypeDecl>>;

    /// 读取并解析文件
    fn parse_file(&self, path: &Path) -> Result<Vec<TypeDecl>> {
        let content = fs::read_to_string(path)?;
        self.parse_source(&content)
    }
}
