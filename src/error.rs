use std::fmt;

use crate::infrastructure::StoreError;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 配置错误
    Config(ConfigError),
    /// 外部存储错误
    Store(StoreError),
    /// 题目目录错误
    Catalog(CatalogError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Store(e) => write!(f, "存储错误: {}", e),
            AppError::Catalog(e) => write!(f, "目录错误: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Store(e) => Some(e),
            AppError::Catalog(e) => Some(e),
        }
    }
}

/// 配置错误
///
/// 启动时即致命，终端用户无法恢复
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 必需的环境变量不存在或为空
    MissingVar { var_name: String },
    /// 环境变量解析失败
    InvalidVar {
        var_name: String,
        value: String,
        expected: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar { var_name } => {
                write!(f, "缺少必需的环境变量 {}", var_name)
            }
            ConfigError::InvalidVar {
                var_name,
                value,
                expected,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 不是合法的 {}",
                    var_name, value, expected
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// 题目目录错误
#[derive(Debug)]
pub enum CatalogError {
    /// 目录文件读取或解析失败
    LoadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::LoadFailed { path, source } => {
                write!(f, "加载目录文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::LoadFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::Catalog(err)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建缺少环境变量错误
    pub fn missing_var(var_name: impl Into<String>) -> Self {
        AppError::Config(ConfigError::MissingVar {
            var_name: var_name.into(),
        })
    }

    /// 创建目录加载错误
    pub fn catalog_load_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Catalog(CatalogError::LoadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_variable() {
        let err = AppError::missing_var("GOOGLE_SHEETS_ID");
        assert!(err.to_string().contains("GOOGLE_SHEETS_ID"));
    }

    #[test]
    fn catalog_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AppError::catalog_load_failed("games.toml", io);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("games.toml"));
    }

    #[test]
    fn store_error_converts_with_source() {
        let err: AppError = StoreError::Auth {
            reason: "invalid_grant".into(),
        }
        .into();
        assert!(err.to_string().starts_with("存储错误"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
