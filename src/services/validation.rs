//! 表单校验 - 业务能力层
//!
//! 必填项检查与邮箱格式检查，对应浏览器端 `required` 与 `type="email"` 的行为。
//! 排序题另外检查位置数、选项归属和是否重复

use regex::Regex;
use std::sync::OnceLock;

use crate::models::catalog::remaining_rank_options;
use crate::models::{AnswerBundle, InputKind, QuestionDescriptor};

/// 单个字段的校验问题
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    // 与浏览器 type="email" 的宽松规则一致：local@domain，domain 不含空白
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$")
            .expect("email regex is valid")
    })
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value.trim())
}

/// 按题目描述校验答案，返回全部问题；空列表表示通过
pub fn validate_answers(questions: &[QuestionDescriptor], answers: &AnswerBundle) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    for q in questions {
        let answer = answers.get(&q.id);
        let blank = answer.map_or(true, |a| a.is_blank());

        if q.required && blank {
            issues.push(FieldIssue::new(&q.id, "Please fill out this field."));
            continue;
        }
        let Some(answer) = answer else {
            continue;
        };

        if q.kind.is_single_value() && answer.as_text().is_none() {
            issues.push(FieldIssue::new(&q.id, "Expected a single value."));
            continue;
        }

        match q.kind {
            InputKind::Email if !blank => {
                if !answer.as_text().is_some_and(is_valid_email) {
                    issues.push(FieldIssue::new(&q.id, "Please enter a valid email address."));
                }
            }
            InputKind::Ranked { .. } | InputKind::Checkbox if answer.as_list().is_none() => {
                issues.push(FieldIssue::new(&q.id, "Expected a list of values."));
            }
            InputKind::Ranked { slots, distinct } => {
                if let Some(list) = answer.as_list() {
                    if let Some(issue) = check_ranking(q, list, slots, distinct) {
                        issues.push(issue);
                    }
                }
            }
            _ => {}
        }
    }

    issues
}

/// 排序题：位置数不超过 slots，每个位置只能从剩余选项里选
///
/// 空字符串表示该位置未填
fn check_ranking(
    q: &QuestionDescriptor,
    list: &[String],
    slots: usize,
    distinct: bool,
) -> Option<FieldIssue> {
    if list.len() > slots {
        return Some(FieldIssue::new(
            &q.id,
            format!("Please rank at most {} options.", slots),
        ));
    }
    // 没有选项的排序题不限制取值
    if q.options.is_empty() {
        return None;
    }

    let values: Vec<&str> = q.options.iter().map(|o| o.value.as_str()).collect();
    let mut chosen: Vec<String> = Vec::with_capacity(list.len());
    for entry in list.iter().filter(|e| !e.is_empty()) {
        let allowed = if distinct {
            remaining_rank_options(&values, &chosen)
        } else {
            remaining_rank_options(&values, &[])
        };
        if !allowed.contains(&entry.as_str()) {
            let message = if values.contains(&entry.as_str()) {
                "Each option can only be ranked once."
            } else {
                "Please choose one of the listed options."
            };
            return Some(FieldIssue::new(&q.id, message));
        }
        chosen.push(entry.clone());
    }
    None
}
