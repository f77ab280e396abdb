//! 分发 / 汇总 - 逐文件提取后合并为一张图

use crate::extract::{extract_file, ExtractError, FileResult};
use crate::graph::Graph;
use crate::normalize::Normalizer;
use std::collections::BTreeMap;
use std::sync::Arc;
use syntax::{DeclarationParser, SourceFile};
use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};

#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("{file}: {source}")]
    Malformed {
        file: String,
        #[source]
        source: ExtractError,
    },
    #[error("Worker lost: expected {expected} results, received {received}")]
    WorkerLost { expected: usize, received: usize },
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;

/// 文件名 -> 提取结果
pub type FileResults = BTreeMap<String, FileResult>;

/// 分发方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// 调用方任务上逐个处理
    #[default]
    Sequential,
    /// 有界 worker 池并行处理, 结果经 channel 回到协调任务
    Concurrent { workers: usize },
}

impl Dispatch {
    /// 按 CPU 数确定 worker 数量
    pub fn concurrent() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Dispatch::Concurrent { workers }
    }

    /// 对每个文件执行 `work`, 每个结果交给 `collect`
    ///
    /// 返回时所有结果都已收集. `collect` 只在调用方任务上执行.
    pub async fn dispatch<T, F, C>(&self, files: Vec<SourceFile>, work: F, mut collect: C) -> Result<()>
    where
        T: Send + 'static,
        F: Fn(&SourceFile) -> T + Send + Sync + 'static,
        C: FnMut(SourceFile, T),
    {
        match *self {
            Dispatch::Sequential => {
                for file in files {
                    let result = work(&file);
                    collect(file, result);
                }
                Ok(())
            }
            Dispatch::Concurrent { workers } => {
                let expected = files.len();
                let work = Arc::new(work);
                let semaphore = Arc::new(Semaphore::new(workers.max(1)));
                let (tx, mut rx) = mpsc::unbounded_channel();

                // 生产者: 拿到许可才提交到 blocking 池
                tokio::spawn(async move {
                    for file in files {
                        let permit = match Arc::clone(&semaphore).acquire_owned().await {
                            Ok(p) => p,
                            Err(_) => break,
                        };
                        let work = Arc::clone(&work);
                        let tx = tx.clone();
                        tokio::task::spawn_blocking(move || {
                            let result = work(&file);
                            drop(permit);
                            let _ = tx.send((file, result));
                        });
                    }
                });

                // 计数屏障: 收齐 expected 个结果, 或所有发送端都已退出
                let mut outstanding = expected;
                while outstanding > 0 {
                    match rx.recv().await {
                        Some((file, result)) => {
                            collect(file, result);
                            outstanding -= 1;
                        }
                        None => break,
                    }
                }

                if outstanding > 0 {
                    return Err(CoordinatorError::WorkerLost {
                        expected,
                        received: expected - outstanding,
                    });
                }
                Ok(())
            }
        }
    }
}

/// 汇总协调器
pub struct MergeCoordinator<P> {
    parser: Arc<P>,
    normalizer: Normalizer,
    dispatch: Dispatch,
    strict: bool,
}

impl<P: DeclarationParser + 'static> MergeCoordinator<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser: Arc::new(parser),
            normalizer: Normalizer::default(),
            dispatch: Dispatch::default(),
            strict: false,
        }
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// 继承项结构异常时终止整个运行, 而不是只跳过该文件
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// 分发并收集所有文件的结果
    pub async fn collect(&self, files: Vec<SourceFile>) -> Result<FileResults> {
        tracing::info!("Extracting {} files ({:?})", files.len(), self.dispatch);

        let parser = Arc::clone(&self.parser);
        let normalizer = self.normalizer;
        let mut results = FileResults::new();

        self.dispatch
            .dispatch(
                files,
                move |file| extract_file(parser.as_ref(), &normalizer, &file.path),
                |file, result| {
                    match &result {
                        Ok(infos) => tracing::debug!(
                            "{}: {} edges",
                            file.name,
                            infos.classes_to_inherited_types.edge_count()
                        ),
                        Err(e) if e.is_malformed() => tracing::warn!("Skipping {}: {}", file.name, e),
                        Err(e) => tracing::debug!("Skipping {}: {}", file.name, e),
                    }
                    results.insert(file.name, result);
                },
            )
            .await?;

        Ok(results)
    }

    /// 收集全部结果后合并, 以合并后的图调用一次 `end`
    pub async fn run<R, E>(&self, files: Vec<SourceFile>, end: E) -> Result<R>
    where
        E: FnOnce(Graph) -> R,
    {
        let mut results = self.collect(files).await?;

        if self.strict {
            let malformed = results
                .iter()
                .find(|(_, r)| matches!(r, Err(e) if e.is_malformed()))
                .map(|(name, _)| name.clone());

            if let Some(file) = malformed {
                if let Some(Err(source)) = results.remove(&file) {
                    return Err(CoordinatorError::Malformed { file, source });
                }
            }
        }

        let combined = Self::merge_results(&results);
        tracing::info!(
            "Combined graph: {} nodes, {} edges",
            combined.node_count(),
            combined.edge_count()
        );

        Ok(end(combined))
    }

    /// 构建合并后的图
    pub async fn build_graph(&self, files: Vec<SourceFile>) -> Result<Graph> {
        self.run(files, |graph| graph).await
    }

    /// 合并所有成功结果, 失败的直接跳过
    pub fn merge_results(results: &FileResults) -> Graph {
        let mut combined = Graph::new();

        for result in results.values() {
            if let Ok(infos) = result {
                combined.merge_with(&infos.classes_to_inherited_types);
            }
        }

        combined
    }
}
