use crate::graph::Graph;
use syntax::{EntryPart, InheritanceEntry};
use thiserror::Error;

/// 继承项结构异常
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("inheritance entry has no children")]
    Empty,
    #[error("first child is `{0}`, expected a type name")]
    NotAName(String),
    #[error("second child is `{0}`, expected a generic argument clause")]
    UnexpectedClause(String),
}

/// 提取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// 拆解泛型特化: `Foo: Bar<Baz>` -> `Foo -> Bar<Baz>`, `Bar<Baz> -> Bar`, `Bar<Baz> -> Baz`
    #[default]
    Decompose,
    /// 原文直连, 不识别泛型
    Verbatim,
}

/// 继承项归一化
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    strategy: Strategy,
}

impl Normalizer {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// 把 `class_name` 的一个继承项写入图
    ///
    /// 结构异常时不写入任何边.
    pub fn apply(
        &self,
        class_name: &str,
        entry: &InheritanceEntry,
        graph: &mut Graph,
    ) -> Result<(), ShapeError> {
        match self.strategy {
            Strategy::Decompose => Self::decompose(class_name, entry, graph),
            Strategy::Verbatim => {
                graph.add_edge(class_name, &Self::collapse_text(&entry.text));
                Ok(())
            }
        }
    }

    fn decompose(
        class_name: &str,
        entry: &InheritanceEntry,
        graph: &mut Graph,
    ) -> Result<(), ShapeError> {
        let mut parts = entry.parts.iter();

        let type_name = match parts.next() {
            None => return Err(ShapeError::Empty),
            Some(EntryPart::Name(name)) => name,
            Some(other) => return Err(ShapeError::NotAName(other.kind().to_string())),
        };

        match parts.next() {
            None => graph.add_edge(class_name, type_name),
            Some(EntryPart::GenericArguments(args)) => {
                let specialized = Self::specialized_name(type_name, args);

                graph.add_edge(&specialized, type_name);
                graph.add_edges(&specialized, args);
                graph.add_edge(class_name, &specialized);
            }
            Some(other) => return Err(ShapeError::UnexpectedClause(other.kind().to_string())),
        }

        Ok(())
    }

    /// `Bar` + `[Baz, Qux]` -> `Bar<Baz, Qux>`
    #[doc(hidden)]
    pub fn specialized_name(type_name: &str, args: &[String]) -> String {
        format!("{}<{}>", type_name, args.join(", "))
    }

    /// 换行折叠为单个空格, 去掉首尾空白
    #[doc(hidden)]
    pub fn collapse_text(text: &str) -> String {
        text.split(['\n', '\r'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
