//! 事业部分类器
//!
//! 按固定顺序逐条匹配，命中即返回:
//! 品牌名/商品名 -> 分区名 -> 供应商名 -> FROZEN/HOTDOG 启发式 -> Dry Goods。
//! 全部是大小写不敏感的子串包含，宽松匹配带来的误判是已知行为，不要收紧。

use crate::models::Division;

/// 品牌关键字 (也用于匹配商品名)
pub const BRAND_RULES: &[(Division, &[&str])] = &[
    (Division::MamaPinas, &["MAMA PINA"]),
    (
        Division::Industrial,
        &["FIESTA", "EMBORG", "ARLA", "ANCHOR", "MAGNOLIA GOLD", "BUTTERCUP", "QUEENSLAND"],
    ),
    (
        Division::FrozenGoods,
        &["PUREFOODS", "VIRGINIA", "MEKENI", "BIBBO", "HOLIDAY", "CDO", "MONTEREY"],
    ),
    (
        Division::DryGoods,
        &["LUCKY ME", "NESCAFE", "BEAR BRAND", "MAGGI", "DEL MONTE", "CENTURY", "ARGENTINA", "KOPIKO"],
    ),
];

/// 分区关键字
pub const SECTION_RULES: &[(Division, &[&str])] = &[
    (Division::MamaPinas, &["MAMA PINA"]),
    (Division::Industrial, &["INDUSTRIAL", "FOOD SERVICE", "HORECA", "BAKERY"]),
    (Division::FrozenGoods, &["FROZEN", "CHILLED", "PROCESSED MEAT"]),
    (Division::DryGoods, &["GROCERY", "DRY GOODS", "BEVERAGE", "CANNED", "NOODLES", "SNACKS"]),
];

/// 供应商名关键字
pub const SUPPLIER_RULES: &[(&str, Division)] = &[
    ("MAMA PINA", Division::MamaPinas),
    ("FONTERRA", Division::Industrial),
    ("ARLA FOODS", Division::Industrial),
    ("FOOD SERVICE", Division::Industrial),
    ("SAN MIGUEL FOODS", Division::FrozenGoods),
    ("FOODSPHERE", Division::FrozenGoods),
    ("COLD STORAGE", Division::FrozenGoods),
    ("MONDE NISSIN", Division::DryGoods),
    ("NESTLE", Division::DryGoods),
    ("UNIVERSAL ROBINA", Division::DryGoods),
];

/// 分类所需的商品信息 (名称已解析)
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductProfile<'a> {
    pub name: Option<&'a str>,
    pub brand: Option<&'a str>,
    pub section: Option<&'a str>,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn upper(value: Option<&str>) -> String {
    value.map(str::to_uppercase).unwrap_or_default()
}

/// 按规则顺序分类，永远返回一个事业部
pub fn classify(profile: &ProductProfile<'_>, supplier_name: Option<&str>) -> Division {
    let brand = upper(profile.brand);
    let name = upper(profile.name);
    let section = upper(profile.section);

    // 1. 品牌名 / 商品名
    for (division, keywords) in BRAND_RULES {
        if contains_any(&brand, keywords) || contains_any(&name, keywords) {
            return *division;
        }
    }

    // 2. 分区名
    for (division, keywords) in SECTION_RULES {
        if contains_any(&section, keywords) {
            return *division;
        }
    }

    // 3. 供应商名
    let supplier = upper(supplier_name);
    if !supplier.is_empty() {
        if let Some((_, division)) = SUPPLIER_RULES
            .iter()
            .find(|(keyword, _)| supplier.contains(keyword))
        {
            return *division;
        }
    }

    // 4. 启发式
    if section.contains("FROZEN") || name.contains("HOTDOG") {
        return Division::FrozenGoods;
    }

    Division::DryGoods
}
