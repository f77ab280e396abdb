//! typegraph - 类型继承图
//!
//! 继承项归一化、逐文件提取、并发汇总合并、HTML 可视化

mod coordinator;
mod extract;
mod graph;
mod html;
mod normalize;

pub use coordinator::{CoordinatorError, Dispatch, FileResults, MergeCoordinator};
pub use extract::{extract_file, extract_source, ExtractError, FileResult};
pub use graph::{Graph, TypeInfos};
pub use html::{split_label, HtmlGenerator};
pub use normalize::{Normalizer, ShapeError, Strategy};
