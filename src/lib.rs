//! # Gamer Survey
//!
//! 一个多页面玩家问卷服务：逐页收集答案，每页作为一行追加到远程表格
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源（HTTP 客户端、服务账号凭证），只暴露能力
//! - `ResponseStore` / `RangeReader` - 追加记录与读取区域的 trait
//! - `SheetsStore` - 远程表格实现；`InMemoryStore` - 进程内实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心页面顺序
//! - `select_follow_ups` - 根据年龄选择追问题目
//! - `validate_answers` - 必填项与邮箱格式检查
//! - `SectionSubmitter` - 提交一个分区
//! - `FailureLog` - 写失败记录文件
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个页面"的完整处理流程
//! - `ScreenCtx` - 上下文封装（页面 + 邮箱）
//! - `ScreenController` - 编辑中 → 提交中 → 已前进
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，管理资源
//! - `orchestrator/routes` - HTTP 路由，每个请求处理一个页面
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, StoreBackend};
pub use error::{AppError, AppResult};
pub use infrastructure::{InMemoryStore, RangeReader, ResponseStore, SheetsStore, StoreError};
pub use models::{AnswerBundle, AnswerValue, CacheKey, RespondentContext, Screen, SectionRecord};
pub use orchestrator::{router, App, AppState};
pub use services::{select_follow_ups, SectionSubmitter, SubmitError};
pub use workflow::{FlowError, ScreenController, ScreenCtx, ScreenState, SubmitOutcome};
