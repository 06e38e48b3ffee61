//! Ingestion 错误类型

use std::path::PathBuf;

use contracts::ContractError;
use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 输入文件读取失败
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        /// 文件路径
        path: PathBuf,
        /// 底层 IO 错误
        #[source]
        source: std::io::Error,
    },

    /// CSV 结构错误
    #[error("{message}")]
    Csv {
        /// 错误消息
        message: String,
        #[source]
        source: csv::Error,
    },

    /// 未找到时间/速度列
    #[error("Could not auto-find Time/Speed columns in CSV.")]
    MissingColumns {
        /// 表头
        headers: Vec<String>,
    },

    /// 未找到记录块
    #[error("No <{record}> entries found.")]
    NoRecords {
        /// 记录标签
        record: String,
    },

    /// 第一个记录块中没有字段标签
    #[error("Could not find tags in <{record}>.")]
    NoTags {
        /// 记录标签
        record: String,
    },

    /// 缺少时间/速度标签
    #[error("XML file must contain <{time}> and <{speed}> tags with data.")]
    MissingTags {
        /// 时间标签
        time: String,
        /// 速度标签
        speed: String,
    },

    /// 标签名无法构造匹配模式
    #[error("invalid tag pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// 解析结果不满足 RawSeries 约束
    #[error(transparent)]
    Series(#[from] ContractError),
}

impl IngestionError {
    /// 创建读取错误
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// 映射到流水线错误分类
///
/// 读取失败 → `Read`；其余结构问题 → `StructuralParse`，`input` 标明来源。
pub fn into_contract_error(err: IngestionError, input: &str) -> ContractError {
    match err {
        IngestionError::Read { path, source } => {
            ContractError::read(path.display().to_string(), source)
        }
        IngestionError::Series(inner) => inner,
        other => ContractError::structural_parse(input, other.to_string()),
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
