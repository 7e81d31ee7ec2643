use crate::error::ConfigError;

/// 存储后端类型
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// 远程电子表格
    Sheets,
    /// 进程内存储（本地调试用）
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sheets" => Some(StoreBackend::Sheets),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP 监听地址
    pub bind_addr: String,
    /// 存储后端
    pub store_backend: StoreBackend,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 提交失败记录文件
    pub failure_log_file: String,
    /// 游戏列表 TOML 文件（可选）
    pub games_catalog_path: Option<String>,
    // --- 电子表格配置 ---
    pub sheets_id: Option<String>,
    pub client_email: Option<String>,
    pub private_key: Option<String>,
    pub responses_sheet_title: String,
    pub sheets_api_base_url: String,
    pub oauth_token_url: String,
    // --- 辅助读取接口 ---
    pub aux_sheet_id: Option<String>,
    pub aux_range: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            store_backend: StoreBackend::Sheets,
            verbose_logging: false,
            failure_log_file: "failed_submissions.txt".to_string(),
            games_catalog_path: None,
            sheets_id: None,
            client_email: None,
            private_key: None,
            responses_sheet_title: "Survey Responses".to_string(),
            sheets_api_base_url: "https://sheets.googleapis.com".to_string(),
            oauth_token_url: "https://oauth2.googleapis.com/token".to_string(),
            aux_sheet_id: None,
            aux_range: "Sheet1!A1:E10".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量读取配置，缺省值见 `Default`
    ///
    /// 只有无法解析的值才会报错；必需项是否存在由 [`Config::validate`] 检查
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let store_backend = match non_empty("STORE_BACKEND") {
            Some(raw) => StoreBackend::parse(&raw).ok_or_else(|| ConfigError::InvalidVar {
                var_name: "STORE_BACKEND".to_string(),
                value: raw.clone(),
                expected: "sheets | memory".to_string(),
            })?,
            None => default.store_backend,
        };

        let verbose_logging = match non_empty("VERBOSE_LOGGING") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
                var_name: "VERBOSE_LOGGING".to_string(),
                value: raw.clone(),
                expected: "bool".to_string(),
            })?,
            None => default.verbose_logging,
        };

        Ok(Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or(default.bind_addr),
            store_backend,
            verbose_logging,
            failure_log_file: non_empty("FAILURE_LOG_FILE").unwrap_or(default.failure_log_file),
            games_catalog_path: non_empty("GAMES_CATALOG_PATH"),
            sheets_id: non_empty("GOOGLE_SHEETS_ID"),
            client_email: non_empty("GOOGLE_SHEETS_CLIENT_EMAIL"),
            private_key: non_empty("GOOGLE_SHEETS_PRIVATE_KEY").map(|k| normalize_private_key(&k)),
            responses_sheet_title: non_empty("RESPONSES_SHEET_TITLE")
                .unwrap_or(default.responses_sheet_title),
            sheets_api_base_url: non_empty("SHEETS_API_BASE_URL")
                .unwrap_or(default.sheets_api_base_url),
            oauth_token_url: non_empty("OAUTH_TOKEN_URL").unwrap_or(default.oauth_token_url),
            aux_sheet_id: non_empty("AUX_SHEET_ID"),
            aux_range: non_empty("AUX_RANGE").unwrap_or(default.aux_range),
        })
    }

    /// 检查持久化路径所需的三项密钥
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_backend == StoreBackend::Memory {
            return Ok(());
        }
        let required = [
            ("GOOGLE_SHEETS_ID", &self.sheets_id),
            ("GOOGLE_SHEETS_CLIENT_EMAIL", &self.client_email),
            ("GOOGLE_SHEETS_PRIVATE_KEY", &self.private_key),
        ];
        for (var_name, value) in required {
            if value.is_none() {
                return Err(ConfigError::MissingVar {
                    var_name: var_name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// 环境变量里的私钥通常把换行写成字面量 `\n`
fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
