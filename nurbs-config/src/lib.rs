use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// 指定配置文件路径的环境变量。
pub const CONFIG_ENV_VAR: &str = "NURBS_OBJ_CONFIG";

/// 编解码配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub writer: WriterConfig,
}

impl CodecConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 自动发现配置文件：优先读取环境变量 `NURBS_OBJ_CONFIG`，否则寻找 `./config/nurbs-obj.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        let cwd = env::current_dir().map_err(|source| ConfigError::Context {
            message: "获取当前工作目录失败".to_string(),
            source,
        })?;
        Self::discover_from(env::var_os(CONFIG_ENV_VAR), &cwd)
    }

    fn discover_from(env_path: Option<OsString>, base_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = env_path {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = base_dir.join("config").join("nurbs-obj.toml");
        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 写出 OBJ 文本时的格式选项。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WriterConfig {
    /// 固定小数位数；缺省时输出可精确回读的最短表示。
    #[serde(default)]
    pub precision: Option<usize>,
    /// 索引/节点列表每行最多写出的数值个数，超出后使用 `\` 续行；0 表示不折行。
    #[serde(default)]
    pub values_per_line: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}
