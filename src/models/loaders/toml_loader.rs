use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

use crate::error::{AppError, AppResult};
use crate::models::catalog::Catalog;

/// 游戏列表文件格式
///
/// ```toml
/// games = ["Valorant", "Minecraft"]
/// ```
#[derive(Debug, Deserialize)]
struct GamesFile {
    games: Vec<String>,
}

#[derive(Debug, Error)]
enum GamesFileError {
    #[error("TOML 格式错误: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("游戏列表为空")]
    Empty,
}

/// 从 TOML 文件加载游戏列表
pub async fn load_games_from_toml(toml_file_path: &Path) -> AppResult<Vec<String>> {
    let path = toml_file_path.display().to_string();
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::catalog_load_failed(&path, e))?;

    parse_games(&content).map_err(|e| AppError::catalog_load_failed(&path, e))
}

fn parse_games(content: &str) -> Result<Vec<String>, GamesFileError> {
    let file: GamesFile = toml::from_str(content)?;
    let games: Vec<String> = file
        .games
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();

    if games.is_empty() {
        return Err(GamesFileError::Empty);
    }
    Ok(games)
}

/// 构建问卷目录：配置了游戏列表文件就用文件，否则或加载失败时使用内置列表
pub async fn load_catalog(games_path: Option<&str>) -> Catalog {
    let Some(path) = games_path else {
        return Catalog::default();
    };

    match load_games_from_toml(Path::new(path)).await {
        Ok(games) => {
            tracing::info!("✓ 已加载 {} 个游戏选项: {}", games.len(), path);
            Catalog::with_games(games)
        }
        Err(e) => {
            tracing::warn!("⚠️ 加载游戏列表失败，使用内置列表: {}", e);
            Catalog::default()
        }
    }
}
