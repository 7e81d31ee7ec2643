//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, StoreBackend};

/// 初始化日志
///
/// 优先使用 `RUST_LOG`；未设置时默认 info，详细模式为 debug。
/// 重复调用不会报错（测试中可能多次初始化）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// 密钥只显示是否已配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 玩家问卷服务");
    info!("🌐 监听地址: {}", config.bind_addr);
    match config.store_backend {
        StoreBackend::Sheets => info!(
            "📄 存储后端: 远程表格 (ID: {}, 工作表: {})",
            if config.sheets_id.is_some() { "已配置" } else { "未配置" },
            config.responses_sheet_title
        ),
        StoreBackend::Memory => info!("📄 存储后端: 进程内存储"),
    }
    info!("📝 失败记录文件: {}", config.failure_log_file);
    if let Some(path) = &config.games_catalog_path {
        info!("🎮 游戏列表文件: {}", path);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
