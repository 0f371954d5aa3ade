use bigdecimal::{BigDecimal, Signed, Zero};

/// 保留两位小数，分位四舍五入 (远离零)
pub fn round_cents(value: &BigDecimal) -> BigDecimal {
    // with_scale 向零截断
    let truncated = value.with_scale(2);
    let remainder = (value - &truncated).abs();
    let half_cent = BigDecimal::new(5.into(), 3);
    if remainder >= half_cent {
        let cent = BigDecimal::new(1.into(), 2);
        if value.is_negative() {
            truncated - cent
        } else {
            truncated + cent
        }
    } else {
        truncated
    }
}

/// 输出用: 四舍五入后转 f64 (走字符串，避免 10^-n 乘法误差)
pub fn to_currency(value: &BigDecimal) -> f64 {
    round_cents(value).to_string().parse().unwrap_or(0.0)
}

pub fn to_plain(value: &BigDecimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}

/// 百分比: numerator / denominator × 100，分母 <= 0 时为 0
pub fn percent_of(numerator: &BigDecimal, denominator: &BigDecimal) -> f64 {
    if *denominator <= BigDecimal::zero() {
        return 0.0;
    }
    let ratio = numerator * &BigDecimal::from(100) / denominator;
    let value = to_currency(&ratio);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
