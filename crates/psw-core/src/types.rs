//! Common types used throughout PSW

use uuid::Uuid;

use crate::traits::Id;

/// Generate a fresh entity id
pub fn generate_id() -> Id {
    Uuid::new_v4().simple().to_string()
}

/// Format a currency amount the way the review screens display it
/// (`$12,345`, no cents, negative amounts as `-$1,200`).
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Format a ratio (0.385) as a percentage with one decimal (`38.5%`)
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Format a number without a trailing `.0` when it is whole
/// (`20`, `-20`, `12.5`)
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", (value * 100.0).round() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(23200.0), "$23,200");
        assert_eq!(format_currency(1234567.4), "$1,234,567");
        assert_eq!(format_currency(-1200.0), "-$1,200");
        assert_eq!(format_currency(999.6), "$1,000");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.385), "38.5%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(20.0), "20");
        assert_eq!(format_number(-20.0), "-20");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(1.0 / 3.0), "0.33");
    }
}
