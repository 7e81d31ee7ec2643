use serde::{Deserialize, Serialize};

/// 输入控件类型
///
/// 序列化时以 `type` 字段区分，例如 `{"type": "dropdown"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputKind {
    /// 下拉单选
    Dropdown,
    /// 单选按钮
    Radio,
    /// 多选框
    Checkbox,
    /// 自由文本
    Text,
    /// 邮箱输入
    Email,
    /// 排序选择：`slots` 个位置，`distinct` 表示各位置不可重复
    Ranked { slots: usize, distinct: bool },
}

impl InputKind {
    /// 单值题（下拉、单选、文本、邮箱）
    pub fn is_single_value(self) -> bool {
        matches!(
            self,
            InputKind::Dropdown | InputKind::Radio | InputKind::Text | InputKind::Email
        )
    }
}

/// 选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// 提交时使用的值
    pub value: String,
    /// 展示给用户的文字
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// 值与展示文字相同的选项
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            label: text,
        }
    }
}

/// 题目描述（目录构建后不可变）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDescriptor {
    pub id: String,
    pub question: String,
    #[serde(flatten)]
    pub kind: InputKind,
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl QuestionDescriptor {
    pub fn new(id: &str, question: &str, kind: InputKind, options: Vec<ChoiceOption>) -> Self {
        Self {
            id: id.to_string(),
            question: question.to_string(),
            kind,
            options,
            required: false,
            placeholder: None,
        }
    }

    /// 自由文本题
    pub fn text(id: &str, question: &str) -> Self {
        Self::new(id, question, InputKind::Text, Vec::new())
    }

    /// 选项值与文字相同的选择题
    pub fn plain_choices(id: &str, question: &str, kind: InputKind, options: &[&str]) -> Self {
        Self::new(
            id,
            question,
            kind,
            options.iter().map(|o| ChoiceOption::plain(*o)).collect(),
        )
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    /// 选项值列表（保持目录顺序）
    pub fn option_values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }
}
