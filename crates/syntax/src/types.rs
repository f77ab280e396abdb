use serde::Serialize;
use std::path::PathBuf;

/// 待扫描的源文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// 完整路径
    pub path: PathBuf,
    /// 相对扫描根目录的名字 ("Models/User.swift")
    pub name: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// 声明种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Class,
    Struct,
    Enum,
    Actor,
    Extension,
    Protocol,
}

impl DeclKind {
    /// 从 `declaration_kind` 关键字解析
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(Self::Class),
            "struct" => Some(Self::Struct),
            "enum" => Some(Self::Enum),
            "actor" => Some(Self::Actor),
            "extension" => Some(Self::Extension),
            "protocol" => Some(Self::Protocol),
            _ => None,
        }
    }
}

/// 类型声明 - 名字 + 继承子句
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDecl {
    pub name: String,
    pub kind: DeclKind,
    /// 声明所在行 (1-based)
    pub line: u32,
    pub inherited: Vec<InheritanceEntry>,
}

/// 继承子句中的一项, 例如 `Bar<Baz, Qux>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InheritanceEntry {
    /// 源码原文
    pub text: String,
    /// 结构化子节点
    pub parts: Vec<EntryPart>,
}

impl InheritanceEntry {
    pub fn new(text: impl Into<String>, parts: Vec<EntryPart>) -> Self {
        Self {
            text: text.into(),
            parts,
        }
    }

    /// 普通类型名 (无泛型参数)
    pub fn named(name: &str) -> Self {
        Self::new(name, vec![EntryPart::Name(name.to_string())])
    }

    /// 泛型特化 `name<args..>`
    pub fn generic(name: &str, args: &[&str]) -> Self {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        Self::new(
            format!("{}<{}>", name, args.join(", ")),
            vec![
                EntryPart::Name(name.to_string()),
                EntryPart::GenericArguments(args),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EntryPart {
    /// 类型名 token
    Name(String),
    /// 泛型参数子句, 每个参数的原文
    GenericArguments(Vec<String>),
    /// 其他语法节点 (按 kind 记录)
    Other(String),
}

impl EntryPart {
    /// 语法节点种类, 用于错误信息
    pub fn kind(&self) -> &str {
        match self {
            EntryPart::Name(_) => "type_identifier",
            EntryPart::GenericArguments(_) => "type_arguments",
            EntryPart::Other(kind) => kind,
        }
    }
}
