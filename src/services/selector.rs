//! 追问题目选择 - 业务能力层
//!
//! 根据之前回答的年龄段决定 `demographics-l2` 页面显示哪些题目。纯函数，无副作用

use serde::Serialize;

use crate::models::{AgeBracket, Gender, InputKind, QuestionDescriptor};

/// 追问页面标题
pub const FOLLOW_UP_TITLE: &str = "Demographics L2";

pub const GRADE_OPTIONS: [&str; 8] = ["6th", "7th", "8th", "9th", "10th", "11th", "12th", "Other"];

pub const PARENT_CONTROL_OPTIONS: [&str; 3] = [
    "Yes, strictly",
    "Yes, but flexible",
    "No, I decide my own gaming schedule",
];

pub const OCCUPATION_OPTIONS: [&str; 9] = [
    "College Student",
    "Software Engineer",
    "Designer/Marketer",
    "Content Creator",
    "Doctor/Lawyer",
    "Product Manager",
    "Founder/Director",
    "Self Employed",
    "Other",
];

pub const MARITAL_STATUS_OPTIONS: [&str; 5] = [
    "Single",
    "In a Relationship",
    "Married",
    "Married with Kids",
    "It's complicated",
];

/// 追问题目集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUpSet {
    pub title: String,
    pub questions: Vec<QuestionDescriptor>,
}

impl FollowUpSet {
    pub fn question_ids(&self) -> Vec<&str> {
        self.questions.iter().map(|q| q.id.as_str()).collect()
    }
}

/// 选择追问题目
///
/// - 未成年：年级 + 家长管控两题，忽略性别
/// - 其他（含不认识的年龄值）：职业；25-34 与 35+ 追加婚姻状况
///
/// `gender` 目前不参与分支，保留参数以便以后按性别追问
pub fn select_follow_ups(age: &AgeBracket, _gender: &Gender) -> FollowUpSet {
    let questions = if age.is_under_18() {
        vec![
            QuestionDescriptor::plain_choices(
                "grade",
                "What grade/class are you in?",
                InputKind::Dropdown,
                &GRADE_OPTIONS,
            ),
            QuestionDescriptor::plain_choices(
                "parentControl",
                "Do your parents control your gaming time?",
                InputKind::Radio,
                &PARENT_CONTROL_OPTIONS,
            ),
        ]
    } else {
        let mut questions = vec![QuestionDescriptor::plain_choices(
            "occupation",
            "What do you do when you're not gaming? (Education/Occupation)",
            InputKind::Dropdown,
            &OCCUPATION_OPTIONS,
        )];
        if age.asks_marital_status() {
            questions.push(QuestionDescriptor::plain_choices(
                "maritalStatus",
                "What is your Marital Status?",
                InputKind::Radio,
                &MARITAL_STATUS_OPTIONS,
            ));
        }
        questions
    };

    FollowUpSet {
        title: FOLLOW_UP_TITLE.to_string(),
        questions,
    }
}

/// 直接用原始字符串选择（读取上下文后的常见用法）
pub fn select_follow_ups_raw(age: &str, gender: &str) -> FollowUpSet {
    select_follow_ups(&AgeBracket::parse(age), &Gender::parse(gender))
}
