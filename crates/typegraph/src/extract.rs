//! 逐文件提取

use crate::graph::TypeInfos;
use crate::normalize::{Normalizer, ShapeError};
use std::path::Path;
use syntax::{DeclarationParser, ParseError, TypeDecl};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Malformed inheritance entry `{entry}` on `{type_name}`: {source}")]
    Malformed {
        type_name: String,
        entry: String,
        #[source]
        source: ShapeError,
    },
}

impl ExtractError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, ExtractError::Malformed { .. })
    }
}

/// 单文件结果
pub type FileResult = std::result::Result<TypeInfos, ExtractError>;

/// 解析文件并构建该文件的类型图
pub fn extract_file<P: DeclarationParser + ?Sized>(
    parser: &P,
    normalizer: &Normalizer,
    path: &Path,
) -> FileResult {
    let decls = parser.parse_file(path)?;
    build_infos(&decls, normalizer)
}

/// 解析源码文本并构建类型图
pub fn extract_source<P: DeclarationParser + ?Sized>(
    parser: &P,
    normalizer: &Normalizer,
    source: &str,
) -> FileResult {
    let decls = parser.parse_source(source)?;
    build_infos(&decls, normalizer)
}

fn build_infos(decls: &[TypeDecl], normalizer: &Normalizer) -> FileResult {
    let mut infos = TypeInfos::new();

    for decl in decls {
        tracing::trace!(
            "{:?} {} (line {}): {} inherited",
            decl.kind,
            decl.name,
            decl.line,
            decl.inherited.len()
        );
        for entry in &decl.inherited {
            normalizer
                .apply(&decl.name, entry, &mut infos.classes_to_inherited_types)
                .map_err(|source| ExtractError::Malformed {
                    type_name: decl.name.clone(),
                    entry: entry.text.clone(),
                    source,
                })?;
        }
    }

    Ok(infos)
}
