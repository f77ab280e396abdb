//! 源文件枚举

use crate::types::SourceFile;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 默认跳过的构建目录
const SKIP_DIRS: &[&str] = &[".build", "Build", "DerivedData", "Pods"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// 递归收集指定后缀的源文件
pub struct SourceScanner {
    root: PathBuf,
    extension: String,
    skip_dirs: Vec<String>,
}

impl SourceScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "swift".to_string(),
            skip_dirs: SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_skip_dirs(mut self, dirs: &[&str]) -> Self {
        self.skip_dirs = dirs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 扫描根目录, 结果按相对路径排序
    pub fn scan(&self) -> Result<Vec<SourceFile>> {
        // 根目录不可读是错误, 不是空结果; 根目录本身可以是符号链接
        let metadata = fs::metadata(&self.root).map_err(|source| ScanError::Io {
            path: self.root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        self.collect(&self.root, &mut files)?;
        files.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!("Found {} .{} files under {}", files.len(), self.extension, self.root.display());
        Ok(files)
    }

    /// 不进入符号链接指向的目录; 指向文件的链接照常收集
    fn collect(&self, dir: &Path, files: &mut Vec<SourceFile>) -> Result<()> {
        if dir != self.root
            && dir
                .file_name()
                .map(|n| self.skip_dirs.iter().any(|s| n == s.as_str()))
                .unwrap_or(false)
        {
            return Ok(());
        }

        let entries = fs::read_dir(dir).map_err(|source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| ScanError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|source| ScanError::Io {
                path: path.clone(),
                source,
            })?;

            if file_type.is_dir() {
                self.collect(&path, files)?;
            } else if (file_type.is_file() || (file_type.is_symlink() && path.is_file()))
                && path
                    .extension()
                    .map(|e| e == self.extension.as_str())
                    .unwrap_or(false)
            {
                let name = Self::relative_name(&self.root, &path);
                files.push(SourceFile::new(path, name));
            }
        }

        Ok(())
    }

    /// 相对根目录的名字, 统一使用 `/` 分隔
    #[doc(hidden)]
    pub fn relative_name(root: &Path, path: &Path) -> String {
        let relative = path.strip_prefix(root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
