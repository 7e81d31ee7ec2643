//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责资源组装和对外的 HTTP 服务，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 根据配置创建存储后端（远程表格 / 进程内）
//! - 加载题目目录
//! - 组装分区提交服务和失败记录文件
//! - 绑定监听地址
//!
//! ### `routes` - HTTP 路由
//! - 欢迎页、页面表单、页面提交、辅助读取、健康检查
//! - 把流程错误和提交失败转换为状态码
//!
//! ### `inflight` - 提交中标记
//! - 同一邮箱同一页面的并发提交只放行一个
//!
//! ## 层次关系
//!
//! ```text
//! app (持有 HTTP 客户端与存储)
//!     ↓
//! routes (每个请求一个页面)
//!     ↓
//! workflow::ScreenController (单个页面的状态机)
//!     ↓
//! services (能力层：selector / validation / submitter / failure_log)
//!     ↓
//! infrastructure (基础设施：ResponseStore / RangeReader)
//! ```

pub mod app;
pub mod inflight;
pub mod routes;

// 重新导出主要类型
pub use app::App;
pub use inflight::{InFlightGuard, InFlightTicket};
pub use routes::{router, AppState};
