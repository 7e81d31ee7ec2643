//! 题目目录
//!
//! 各页面的静态题目与选项。`demographics-l2` 的题目由
//! [`crate::services::selector`] 根据年龄段动态选择，不在此处定义

use serde::Serialize;

use crate::models::question::{ChoiceOption, InputKind, QuestionDescriptor};
use crate::models::screen::Screen;

/// 排序题"装备特性"的候选项
pub const GEAR_FEATURE_OPTIONS: [&str; 5] =
    ["Performance", "Aesthetics", "Durability", "Price", "Brand"];

/// 内置游戏列表，可被 TOML 文件覆盖
pub const DEFAULT_GAMES: [&str; 20] = [
    "Apex Legends",
    "Among Us",
    "Battlegrounds Mobile India",
    "Call of Duty: Warzone",
    "Counter-Strike 2",
    "Cyberpunk 2077",
    "Dota 2",
    "Elden Ring",
    "EA Sports FC",
    "Fortnite",
    "Free Fire",
    "Genshin Impact",
    "God of War Ragnarök",
    "Grand Theft Auto V",
    "League of Legends",
    "Minecraft",
    "Red Dead Redemption 2",
    "Rocket League",
    "The Legend of Zelda: Tears of the Kingdom",
    "Valorant",
];

/// 一个页面的表单描述
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenForm {
    pub screen: Screen,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub step: usize,
    pub total_steps: usize,
    pub questions: Vec<QuestionDescriptor>,
}

impl ScreenForm {
    pub fn new(screen: Screen, title: &str, questions: Vec<QuestionDescriptor>) -> Self {
        Self {
            screen,
            title: title.to_string(),
            subtitle: None,
            step: screen.step(),
            total_steps: Screen::TOTAL_STEPS,
            questions,
        }
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    pub fn question(&self, id: &str) -> Option<&QuestionDescriptor> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// 问卷目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    games: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_games(DEFAULT_GAMES.iter().map(|g| g.to_string()).collect())
    }
}

impl Catalog {
    pub fn with_games(games: Vec<String>) -> Self {
        Self { games }
    }

    pub fn games(&self) -> &[String] {
        &self.games
    }

    /// 静态页面的表单；`demographics-l2` 返回 None（需要动态选择）
    pub fn static_form(&self, screen: Screen) -> Option<ScreenForm> {
        match screen {
            Screen::Demographics => Some(demographics()),
            Screen::DemographicsL2 => None,
            Screen::GamingPreferences => Some(self.gaming_preferences()),
            Screen::GamingLevel2 => Some(gaming_level_2()),
            Screen::GamingLifestyle => Some(gaming_lifestyle()),
            Screen::GamingFamily => Some(ScreenForm::new(screen, "Gaming Family", Vec::new())),
            Screen::Complete => Some(
                ScreenForm::new(screen, "Thank You!", Vec::new())
                    .with_subtitle("GG! Your responses have been recorded."),
            ),
        }
    }

    fn gaming_preferences(&self) -> ScreenForm {
        let questions = vec![
            QuestionDescriptor::plain_choices(
                "platforms",
                "What platforms do you game on?",
                InputKind::Checkbox,
                &["PC", "Mobile", "Console"],
            ),
            QuestionDescriptor::new(
                "favoriteGames",
                "Top 3 Favorite Games",
                InputKind::Ranked {
                    slots: 3,
                    distinct: false,
                },
                self.games.iter().map(|g| ChoiceOption::plain(g.as_str())).collect(),
            ),
            QuestionDescriptor::text(
                "nextExcitedGame",
                "Which upcoming game are you most excited about?",
            ),
            QuestionDescriptor::new(
                "spendMoney",
                "How much money do you spend on gaming per month?",
                InputKind::Radio,
                vec![
                    ChoiceOption::new("0-50", "$0 - $50"),
                    ChoiceOption::new("51-100", "$51 - $100"),
                    ChoiceOption::new("101-200", "$101 - $200"),
                    ChoiceOption::new("200+", "$200+"),
                ],
            ),
            QuestionDescriptor::new(
                "upgradeFrequency",
                "How often do you upgrade your gaming setup?",
                InputKind::Dropdown,
                vec![
                    ChoiceOption::new("every6months", "Every 6 months"),
                    ChoiceOption::new("yearly", "Yearly"),
                    ChoiceOption::new("every2years", "Every 2 years"),
                    ChoiceOption::new("rarely", "Rarely"),
                ],
            ),
            QuestionDescriptor::new(
                "purchaseLocation",
                "Where do you usually purchase gaming gear?",
                InputKind::Dropdown,
                vec![
                    ChoiceOption::new("onlineRetailers", "Online Retailers (Amazon, Newegg, etc.)"),
                    ChoiceOption::new("physicalStores", "Physical Stores"),
                    ChoiceOption::new("brandWebsites", "Brand Websites"),
                    ChoiceOption::new("gamingEvents", "Gaming Events/Conventions"),
                ],
            ),
            QuestionDescriptor::new(
                "familiarWithKreo",
                "Are you familiar with Kreo?",
                InputKind::Radio,
                yes_no(),
            ),
            QuestionDescriptor::new(
                "setupSpending",
                "How much have you spent on your current gaming setup?",
                InputKind::Dropdown,
                vec![
                    ChoiceOption::new("0-500", "$0 - $500"),
                    ChoiceOption::new("501-1000", "$501 - $1000"),
                    ChoiceOption::new("1001-2000", "$1001 - $2000"),
                    ChoiceOption::new("2000+", "$2000+"),
                ],
            ),
            QuestionDescriptor::plain_choices(
                "gearFeatures",
                "Rank these features in order of importance when buying gaming gear (1 being most important)",
                InputKind::Ranked {
                    slots: GEAR_FEATURE_OPTIONS.len(),
                    distinct: true,
                },
                &GEAR_FEATURE_OPTIONS,
            ),
        ];
        ScreenForm::new(
            Screen::GamingPreferences,
            "Gaming Preferences & Setup",
            questions,
        )
    }
}

/// 排序题第 n 个位置可选的选项：去掉前面位置已选的，保持目录顺序
pub fn remaining_rank_options<'a>(options: &'a [&'a str], chosen_before: &[String]) -> Vec<&'a str> {
    options
        .iter()
        .copied()
        .filter(|o| !chosen_before.iter().any(|c| c == o))
        .collect()
}

fn yes_no() -> Vec<ChoiceOption> {
    vec![ChoiceOption::new("yes", "Yes"), ChoiceOption::new("no", "No")]
}

fn yes_no_interested() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::new("yes", "Yes"),
        ChoiceOption::new("no", "No"),
        ChoiceOption::new("interested", "No, but I'm interested"),
    ]
}

fn demographics() -> ScreenForm {
    let questions = vec![
        QuestionDescriptor::text("ign", "In-Game Name (IGN)").required(),
        QuestionDescriptor::new("email", "Email", InputKind::Email, Vec::new()).required(),
        QuestionDescriptor::new(
            "age",
            "Age",
            InputKind::Radio,
            vec![
                ChoiceOption::new("under18", "Under 18"),
                ChoiceOption::plain("18-24"),
                ChoiceOption::plain("25-34"),
                ChoiceOption::plain("35+"),
            ],
        )
        .required(),
        QuestionDescriptor::new(
            "gender",
            "Gender",
            InputKind::Radio,
            vec![
                ChoiceOption::new("male", "Male"),
                ChoiceOption::new("female", "Female"),
                ChoiceOption::new("other", "Other"),
            ],
        )
        .required(),
        QuestionDescriptor::text("city", "City").required(),
    ];
    ScreenForm::new(Screen::Demographics, "Basic Demographics", questions)
        .with_subtitle("Who's the Player Behind the Screen?")
}

fn gaming_level_2() -> ScreenForm {
    let questions = vec![
        QuestionDescriptor::new(
            "startedGaming",
            "When did you start gaming?",
            InputKind::Dropdown,
            vec![
                ChoiceOption::new("childhood", "Childhood (Before 13)"),
                ChoiceOption::new("teenage", "Teenage Years (13-19)"),
                ChoiceOption::new("youngAdult", "Young Adult (20-25)"),
                ChoiceOption::new("adult", "Adult (26+)"),
            ],
        ),
        QuestionDescriptor::new(
            "playFrequency",
            "How often do you play games?",
            InputKind::Radio,
            vec![
                ChoiceOption::new("daily", "Daily"),
                ChoiceOption::new("weekly", "A few times a week"),
                ChoiceOption::new("monthly", "A few times a month"),
                ChoiceOption::new("rarely", "Rarely"),
            ],
        ),
        QuestionDescriptor::new(
            "gamePreference",
            "Do you prefer single-player or multiplayer games?",
            InputKind::Radio,
            vec![
                ChoiceOption::new("singleplayer", "Single-player"),
                ChoiceOption::new("multiplayer", "Multiplayer"),
                ChoiceOption::new("both", "Both equally"),
            ],
        ),
        QuestionDescriptor::new(
            "gamePurchase",
            "How do you usually purchase games?",
            InputKind::Dropdown,
            vec![
                ChoiceOption::new("digital", "Digital Download"),
                ChoiceOption::new("physical", "Physical Copy"),
                ChoiceOption::new("subscription", "Game Subscription Service"),
                ChoiceOption::new("mix", "Mix of Methods"),
            ],
        ),
        QuestionDescriptor::new(
            "modifiedControllers",
            "Have you ever used modified controllers or keyboards?",
            InputKind::Radio,
            yes_no_interested(),
        ),
    ];
    ScreenForm::new(Screen::GamingLevel2, "Gaming Level 2", questions)
}

fn gaming_lifestyle() -> ScreenForm {
    let questions = vec![
        QuestionDescriptor::plain_choices(
            "otherInterests",
            "What other interests do you have besides gaming?",
            InputKind::Checkbox,
            &[
                "Anime",
                "Esports",
                "Streaming",
                "Fitness",
                "Technology",
                "Music",
                "Cosplay",
                "Collectibles",
                "Board Games",
                "Fantasy Sports",
                "Coding",
                "Movies",
                "TV Shows",
                "Fashion",
                "Travel",
                "Photography",
            ],
        ),
        QuestionDescriptor::text("customPeripherals", "Do you use any custom peripherals?")
            .with_placeholder("e.g., custom keyboard, mouse, controller"),
        QuestionDescriptor::text("guiltyGamingFood", "What's your guilty pleasure gaming food?")
            .with_placeholder("e.g., chips, energy drinks, pizza"),
        QuestionDescriptor::new(
            "gamingContentTime",
            "How much time do you spend watching gaming content?",
            InputKind::Dropdown,
            vec![
                ChoiceOption::new("0-1", "0-1 hour per day"),
                ChoiceOption::new("1-3", "1-3 hours per day"),
                ChoiceOption::new("3-5", "3-5 hours per day"),
                ChoiceOption::new("5+", "5+ hours per day"),
            ],
        ),
        QuestionDescriptor::text("favoriteCreator", "Who's your favorite gaming content creator?")
            .with_placeholder("e.g., PewDiePie, Ninja, Pokimane"),
        QuestionDescriptor::text("esportsTournament", "What's your favorite esports tournament?")
            .with_placeholder("e.g., The International, League of Legends World Championship"),
        QuestionDescriptor::new(
            "createContent",
            "Do you create gaming content?",
            InputKind::Radio,
            yes_no_interested(),
        ),
        QuestionDescriptor::plain_choices(
            "streamingPlatforms",
            "Which streaming platforms do you use?",
            InputKind::Checkbox,
            &["Twitch", "YouTube", "Facebook Gaming", "TikTok"],
        ),
        QuestionDescriptor::new(
            "inGamePurchases",
            "How often do you make in-game purchases?",
            InputKind::Dropdown,
            vec![
                ChoiceOption::new("never", "Never"),
                ChoiceOption::new("rarely", "Rarely"),
                ChoiceOption::new("sometimes", "Sometimes"),
                ChoiceOption::new("often", "Often"),
                ChoiceOption::new("veryOften", "Very Often"),
            ],
        ),
        QuestionDescriptor::new(
            "merchandisePurchases",
            "Do you buy gaming merchandise?",
            InputKind::Radio,
            vec![
                ChoiceOption::new("yes", "Yes"),
                ChoiceOption::new("no", "No"),
                ChoiceOption::new("sometimes", "Sometimes"),
            ],
        ),
        QuestionDescriptor::new(
            "collectGamingItems",
            "Do you collect gaming-related items?",
            InputKind::Radio,
            yes_no_interested(),
        ),
    ];
    ScreenForm::new(Screen::GamingLifestyle, "Gaming Lifestyle & Habits", questions)
}
