use serde::{Deserialize, Serialize};
use std::fmt;

/// 年龄段
///
/// 取值范围是开放的：不认识的值保留原文，在分支判断中按"非未成年"处理
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgeBracket {
    Under18,
    From18To24,
    From25To34,
    From35Up,
    Unrecognized(String),
}

impl AgeBracket {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "under18" => AgeBracket::Under18,
            "18-24" => AgeBracket::From18To24,
            "25-34" => AgeBracket::From25To34,
            "35+" => AgeBracket::From35Up,
            other => AgeBracket::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AgeBracket::Under18 => "under18",
            AgeBracket::From18To24 => "18-24",
            AgeBracket::From25To34 => "25-34",
            AgeBracket::From35Up => "35+",
            AgeBracket::Unrecognized(raw) => raw,
        }
    }

    pub fn is_under_18(&self) -> bool {
        matches!(self, AgeBracket::Under18)
    }

    /// 25-34 与 35+ 需要回答婚姻状况
    pub fn asks_marital_status(&self) -> bool {
        matches!(self, AgeBracket::From25To34 | AgeBracket::From35Up)
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AgeBracket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgeBracket {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(AgeBracket::parse(&raw))
    }
}

/// 性别，同样保留不认识的原始值
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
    Unrecognized(String),
}

impl Gender {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "male" => Gender::Male,
            "female" => Gender::Female,
            "other" => Gender::Other,
            other => Gender::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
