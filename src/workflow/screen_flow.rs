//! 页面处理流程 - 流程层
//!
//! 每个页面是一个只有两个状态的状态机：编辑中 / 提交中，
//! 成功后进入终止的"已前进"状态
//!
//! ```text
//! Editing --begin_submit--> Submitting --失败--> Editing（保留答案与错误信息）
//!                                      --成功--> Advanced(next)
//! ```

use thiserror::Error;
use tracing::{info, warn};

use crate::models::{
    AnswerBundle, AnswerValue, CacheKey, Catalog, RespondentContext, Screen, ScreenForm,
    SectionRecord,
};
use crate::services::{
    select_follow_ups_raw, validate_answers, FieldIssue, SectionSubmitter, SubmitError,
};
use crate::workflow::screen_ctx::ScreenCtx;

/// 页面状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Editing,
    Submitting,
    Advanced(Screen),
}

/// 流程错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// 已有提交在进行中
    #[error("页面 {0} 已有提交在进行中")]
    AlreadySubmitting(Screen),

    /// 页面已经前进，不能再次提交
    #[error("页面 {0} 已完成")]
    AlreadyAdvanced(Screen),

    /// 终止页没有表单
    #[error("页面 {0} 没有可提交的表单")]
    NotSubmittable(Screen),

    /// 必填项未填写或格式错误
    #[error("页面 {screen} 有 {} 个字段未通过校验", issues.len())]
    Invalid {
        screen: Screen,
        issues: Vec<FieldIssue>,
    },
}

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 已保存并前进到下一个页面
    Advanced { next: Screen, timestamp: String },
    /// 保存失败，回到编辑状态
    Failed { message: String, retryable: bool },
}

/// 根据上下文生成页面表单；`demographics-l2` 的题目由追问选择器决定
pub fn form_for(catalog: &Catalog, screen: Screen, context: &RespondentContext) -> ScreenForm {
    match catalog.static_form(screen) {
        Some(form) => form,
        None => {
            let follow_ups =
                select_follow_ups_raw(context.age_or_default(), context.gender_or_default());
            ScreenForm::new(screen, &follow_ups.title, follow_ups.questions)
        }
    }
}

/// 页面控制器
///
/// 持有本页面的表单状态，离开页面即丢弃
#[derive(Debug, Clone)]
pub struct ScreenController {
    form: ScreenForm,
    answers: AnswerBundle,
    state: ScreenState,
    last_error: Option<String>,
}

impl ScreenController {
    /// 进入页面：生成表单，答案从空开始
    pub fn mount(catalog: &Catalog, screen: Screen, context: &RespondentContext) -> Self {
        Self {
            form: form_for(catalog, screen, context),
            answers: AnswerBundle::new(),
            state: ScreenState::Editing,
            last_error: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.form.screen
    }

    pub fn form(&self) -> &ScreenForm {
        &self.form
    }

    pub fn answers(&self) -> &AnswerBundle {
        &self.answers
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 提交按钮在提交中或已前进时不可用
    pub fn can_submit(&self) -> bool {
        self.state == ScreenState::Editing && !self.screen().is_terminal()
    }

    /// 编辑字段；只有编辑状态下有效
    pub fn set_answer(&mut self, field: &str, value: impl Into<AnswerValue>) -> bool {
        if self.state != ScreenState::Editing {
            return false;
        }
        self.answers.set(field, value);
        true
    }

    /// 整体替换答案（HTTP 请求一次性带上所有字段）
    pub fn replace_answers(&mut self, answers: AnswerBundle) -> bool {
        if self.state != ScreenState::Editing {
            return false;
        }
        self.answers = answers;
        true
    }

    /// 编辑中 → 提交中
    pub fn begin_submit(&mut self) -> Result<(), FlowError> {
        let screen = self.screen();
        match self.state {
            ScreenState::Submitting => return Err(FlowError::AlreadySubmitting(screen)),
            ScreenState::Advanced(_) => return Err(FlowError::AlreadyAdvanced(screen)),
            ScreenState::Editing => {}
        }
        if screen.is_terminal() {
            return Err(FlowError::NotSubmittable(screen));
        }

        let issues = validate_answers(&self.form.questions, &self.answers);
        if !issues.is_empty() {
            return Err(FlowError::Invalid { screen, issues });
        }

        self.state = ScreenState::Submitting;
        self.last_error = None;
        Ok(())
    }

    /// 提交失败：回到编辑状态，答案保持不变
    pub fn fail_submit(&mut self, message: impl Into<String>) {
        if self.state == ScreenState::Submitting {
            self.state = ScreenState::Editing;
            self.last_error = Some(message.into());
        }
    }

    /// 提交成功：先写上下文，再前进到下一个页面
    pub fn complete_submit(&mut self, context: &mut RespondentContext) -> Option<Screen> {
        if self.state != ScreenState::Submitting {
            return None;
        }
        self.write_cached_fields(context);
        let next = self.screen().next()?;
        self.state = ScreenState::Advanced(next);
        Some(next)
    }

    /// 结束一次提交：失败回到编辑状态，成功写上下文并前进
    ///
    /// 持久化错误在这里被转换为一条展示文字，不会继续向上传播
    pub fn finish_submit(
        &mut self,
        result: Result<SectionRecord, SubmitError>,
        context: &mut RespondentContext,
    ) -> Result<SubmitOutcome, FlowError> {
        let ctx = ScreenCtx::new(self.screen(), context);
        match result {
            Ok(record) => {
                let next = self
                    .complete_submit(context)
                    .ok_or(FlowError::AlreadyAdvanced(ctx.screen))?;
                info!("{} ✓ 已前进到 {}", ctx, next);
                Ok(SubmitOutcome::Advanced {
                    next,
                    timestamp: record.timestamp,
                })
            }
            Err(e) => {
                warn!("{} ⚠️ 提交失败，保留表单: {}", ctx, e);
                let message = e.user_message().to_string();
                self.fail_submit(message.clone());
                Ok(SubmitOutcome::Failed {
                    message,
                    retryable: e.is_retryable(),
                })
            }
        }
    }

    /// 完整的提交周期
    pub async fn submit(
        &mut self,
        submitter: &SectionSubmitter,
        context: &mut RespondentContext,
    ) -> Result<SubmitOutcome, FlowError> {
        self.begin_submit()?;

        let screen = self.screen();
        let Some(section) = screen.section_label() else {
            self.fail_submit("This screen has nothing to submit.");
            return Err(FlowError::NotSubmittable(screen));
        };
        let email = self.submission_email(context);

        let result = submitter.submit_section(&email, section, &self.answers).await;
        self.finish_submit(result, context)
    }

    /// 第一个页面本身收集邮箱，其余页面从上下文读取
    pub fn submission_email(&self, context: &RespondentContext) -> String {
        if self.screen() == Screen::Demographics {
            if let Some(email) = self.answers.text("email") {
                return email.trim().to_string();
            }
        }
        context.email_or_default().to_string()
    }

    fn write_cached_fields(&self, context: &mut RespondentContext) {
        if self.screen() != Screen::Demographics {
            return;
        }
        for key in CacheKey::ALL {
            if let Some(value) = self.answers.text(key.as_str()) {
                context.set(key, value.trim());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{InMemoryStore, StoreError};
    use std::sync::Arc;

    fn mount(screen: Screen, context: &RespondentContext) -> ScreenController {
        ScreenController::mount(&Catalog::default(), screen, context)
    }

    fn fill_demographics(controller: &mut ScreenController) {
        controller.set_answer("ign", "Foo");
        controller.set_answer("email", "a@b.com");
        controller.set_answer("age", "25-34");
        controller.set_answer("gender", "female");
        controller.set_answer("city", "Pune");
    }

    #[test]
    fn follow_up_form_uses_context_defaults() {
        let form = form_for(
            &Catalog::default(),
            Screen::DemographicsL2,
            &RespondentContext::new(),
        );
        let ids: Vec<_> = form.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, ["grade", "parentControl"]);
        assert_eq!(form.title, "Demographics L2");
        assert_eq!(form.step, 2);
    }

    #[test]
    fn invalid_form_stays_in_editing() {
        let mut controller = mount(Screen::Demographics, &RespondentContext::new());
        let err = controller.begin_submit().unwrap_err();
        assert!(matches!(err, FlowError::Invalid { .. }));
        assert_eq!(controller.state(), ScreenState::Editing);
    }

    #[test]
    fn second_begin_while_submitting_is_rejected() {
        let mut controller = mount(Screen::GamingLevel2, &RespondentContext::new());
        controller.begin_submit().unwrap();
        assert!(!controller.can_submit());
        assert_eq!(
            controller.begin_submit(),
            Err(FlowError::AlreadySubmitting(Screen::GamingLevel2))
        );
        assert!(!controller.set_answer("playFrequency", "daily"));
    }

    #[test]
    fn complete_screen_cannot_submit() {
        let mut controller = mount(Screen::Complete, &RespondentContext::new());
        assert!(!controller.can_submit());
        assert_eq!(
            controller.begin_submit(),
            Err(FlowError::NotSubmittable(Screen::Complete))
        );
    }

    #[tokio::test]
    async fn success_writes_context_then_advances() {
        let store = Arc::new(InMemoryStore::new("Survey Responses"));
        let submitter = SectionSubmitter::new(store.clone());
        let mut context = RespondentContext::new();
        let mut controller = mount(Screen::Demographics, &context);
        fill_demographics(&mut controller);

        let outcome = controller.submit(&submitter, &mut context).await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Advanced {
                next: Screen::DemographicsL2,
                ..
            }
        ));
        assert_eq!(controller.state(), ScreenState::Advanced(Screen::DemographicsL2));
        assert_eq!(context.email_or_default(), "a@b.com");
        assert_eq!(context.age_or_default(), "25-34");
        assert_eq!(context.gender_or_default(), "female");

        let next = mount(Screen::DemographicsL2, &context);
        let ids: Vec<_> = next.form().questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, ["occupation", "maritalStatus"]);
        assert_eq!(store.records()[0].email, "a@b.com");
    }

    #[tokio::test]
    async fn failure_keeps_answers_and_allows_retry() {
        let store = Arc::new(InMemoryStore::new("Survey Responses"));
        store.fail_next_append(StoreError::Transport {
            endpoint: "/append".into(),
            reason: "timeout".into(),
        });
        let submitter = SectionSubmitter::new(store.clone());
        let mut context = RespondentContext::new();
        let mut controller = mount(Screen::Demographics, &context);
        fill_demographics(&mut controller);
        let before = controller.answers().clone();

        let outcome = controller.submit(&submitter, &mut context).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Failed { retryable: true, .. }));
        assert_eq!(controller.state(), ScreenState::Editing);
        assert_eq!(controller.answers(), &before);
        assert!(controller.last_error().is_some());
        assert_eq!(context, RespondentContext::new());

        let retry = controller.submit(&submitter, &mut context).await.unwrap();
        assert!(matches!(retry, SubmitOutcome::Advanced { .. }));
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn later_screens_use_cached_email() {
        let store = Arc::new(InMemoryStore::new("Survey Responses"));
        let submitter = SectionSubmitter::new(store.clone());
        let mut context = RespondentContext::new();
        context.set(CacheKey::Email, "a@b.com");

        let mut controller = mount(Screen::GamingFamily, &context);
        let outcome = controller.submit(&submitter, &mut context).await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Advanced {
                next: Screen::Complete,
                ..
            }
        ));
        let record = &store.records()[0];
        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.section, "Gaming Family");
    }
}
