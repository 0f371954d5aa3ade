use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 固定的四个事业部
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Division {
    #[serde(rename = "Dry Goods")]
    DryGoods,
    #[serde(rename = "Frozen Goods")]
    FrozenGoods,
    #[serde(rename = "Industrial")]
    Industrial,
    #[serde(rename = "Mama Pina's")]
    MamaPinas,
}

impl Division {
    pub const ALL: [Division; 4] = [
        Division::DryGoods,
        Division::FrozenGoods,
        Division::Industrial,
        Division::MamaPinas,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Division::DryGoods => "Dry Goods",
            Division::FrozenGoods => "Frozen Goods",
            Division::Industrial => "Industrial",
            Division::MamaPinas => "Mama Pina's",
        }
    }

    /// 把 division 表里的名称映射到固定事业部 (大小写不敏感的关键字包含)
    pub fn from_record_name(name: &str) -> Option<Division> {
        let upper = name.to_uppercase();
        if upper.contains("MAMA PINA") {
            Some(Division::MamaPinas)
        } else if upper.contains("FROZEN") {
            Some(Division::FrozenGoods)
        } else if upper.contains("INDUSTRIAL") {
            Some(Division::Industrial)
        } else if upper.contains("DRY") {
            Some(Division::DryGoods)
        } else {
            None
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDivision(pub String);

impl fmt::Display for UnknownDivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown division `{}`", self.0)
    }
}

impl std::error::Error for UnknownDivision {}

/// 查询参数: 展示名或 slug，如 "Frozen Goods" / "frozen-goods" / "mama_pinas"
impl FromStr for Division {
    type Err = UnknownDivision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "drygoods" | "dry" => Ok(Division::DryGoods),
            "frozengoods" | "frozen" => Ok(Division::FrozenGoods),
            "industrial" => Ok(Division::Industrial),
            "mamapinas" | "mamapina" => Ok(Division::MamaPinas),
            _ => Err(UnknownDivision(s.to_string())),
        }
    }
}
