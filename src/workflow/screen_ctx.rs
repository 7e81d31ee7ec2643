//! 页面处理上下文
//!
//! 封装"谁正在提交哪个页面"这一信息，只用于日志

use std::fmt::Display;

use crate::models::{RespondentContext, Screen};

/// 页面处理上下文
#[derive(Debug, Clone)]
pub struct ScreenCtx {
    /// 当前页面
    pub screen: Screen,

    /// 答卷人邮箱；第一个页面提交前为空
    pub email: String,
}

impl ScreenCtx {
    pub fn new(screen: Screen, context: &RespondentContext) -> Self {
        Self {
            screen,
            email: context.email_or_default().to_string(),
        }
    }
}

impl Display for ScreenCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let email = if self.email.is_empty() {
            "-"
        } else {
            self.email.as_str()
        };
        write!(
            f,
            "[页面 {} 第{}/{}步 邮箱#{}]",
            self.screen,
            self.screen.step(),
            Screen::TOTAL_STEPS,
            email
        )
    }
}
