use serde::{Deserialize, Serialize};
use std::fmt;

/// 问卷的七个页面，按固定线性顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Demographics,
    #[serde(rename = "demographics-l2")]
    DemographicsL2,
    GamingPreferences,
    #[serde(rename = "gaming-level-2")]
    GamingLevel2,
    GamingLifestyle,
    GamingFamily,
    Complete,
}

impl Screen {
    /// 页面总数（进度条分母）
    pub const TOTAL_STEPS: usize = 7;

    pub const ALL: [Screen; 7] = [
        Screen::Demographics,
        Screen::DemographicsL2,
        Screen::GamingPreferences,
        Screen::GamingLevel2,
        Screen::GamingLifestyle,
        Screen::GamingFamily,
        Screen::Complete,
    ];

    /// 第一个页面
    pub fn first() -> Self {
        Screen::Demographics
    }

    /// URL 中使用的标识
    pub fn slug(self) -> &'static str {
        match self {
            Screen::Demographics => "demographics",
            Screen::DemographicsL2 => "demographics-l2",
            Screen::GamingPreferences => "gaming-preferences",
            Screen::GamingLevel2 => "gaming-level-2",
            Screen::GamingLifestyle => "gaming-lifestyle",
            Screen::GamingFamily => "gaming-family",
            Screen::Complete => "complete",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }

    /// 写入表格 Section 列的标签；终止页没有提交
    pub fn section_label(self) -> Option<&'static str> {
        match self {
            Screen::Demographics => Some("Demographics"),
            Screen::DemographicsL2 => Some("Demographics L2"),
            Screen::GamingPreferences => Some("Gaming Preferences"),
            Screen::GamingLevel2 => Some("Gaming Level 2"),
            Screen::GamingLifestyle => Some("Gaming Lifestyle"),
            Screen::GamingFamily => Some("Gaming Family"),
            Screen::Complete => None,
        }
    }

    /// 从 1 开始的步骤序号
    pub fn step(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .map(|i| i + 1)
            .unwrap_or(Self::TOTAL_STEPS)
    }

    /// 下一个页面；终止页返回 None
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.step()).copied()
    }

    pub fn is_terminal(self) -> bool {
        self == Screen::Complete
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_linear_and_ends_at_complete() {
        let mut screen = Screen::first();
        let mut visited = vec![screen];
        while let Some(next) = screen.next() {
            visited.push(next);
            screen = next;
        }
        assert_eq!(visited, Screen::ALL.to_vec());
        assert!(screen.is_terminal());
    }

    #[test]
    fn slugs_round_trip_and_match_serde() {
        for screen in Screen::ALL {
            assert_eq!(Screen::from_slug(screen.slug()), Some(screen));
            let json = serde_json::to_string(&screen).unwrap();
            assert_eq!(json, format!("\"{}\"", screen.slug()));
        }
        assert_eq!(Screen::from_slug("gaming-level2"), None);
    }

    #[test]
    fn steps_follow_progress_bar_numbering() {
        assert_eq!(Screen::Demographics.step(), 1);
        assert_eq!(Screen::DemographicsL2.step(), 2);
        assert_eq!(Screen::GamingLifestyle.step(), 5);
        assert_eq!(Screen::Complete.step(), 7);
        assert_eq!(Screen::Complete.section_label(), None);
    }
}
