use super::workbook::Cell;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Display form of a person or company name: invisible characters removed, whitespace collapsed.
pub(crate) fn clean_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Unit numbers compare as digit strings without leading zeros, so `"012"`, `12.0` and
/// `"Truck 12"` all become `"12"`. Values with no digits, or with more than one digit run such as
/// `"12-2"`, keep their cleaned text, uppercased.
pub fn normalize_unit(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    if cleaned.is_empty() {
        return None;
    }

    let numeric = cleaned
        .strip_suffix(".0")
        .or_else(|| cleaned.strip_suffix(".00"))
        .unwrap_or(&cleaned);
    let mut runs = numeric
        .split(|ch: char| !ch.is_ascii_digit())
        .filter(|run| !run.is_empty());
    let (Some(digits), None) = (runs.next(), runs.next()) else {
        return Some(cleaned.to_ascii_uppercase());
    };

    let trimmed = digits.trim_start_matches('0');
    Some(if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    })
}

pub(crate) fn unit_from_cell(cell: &Cell) -> Option<String> {
    normalize_unit(&cell.as_text())
}

/// Parses a money or quantity cell. Currency symbols, thousands separators and surrounding
/// whitespace are ignored; accounting-style parentheses mean a negative value.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let cleaned: String = body
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    Some(if negative { -value } else { value })
}

pub(crate) fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Owner cells sometimes hold account numbers or "Last, First" fragments rather than a name.
pub(crate) fn is_generic_owner_name(name: &str) -> bool {
    name.chars().any(|ch| ch.is_ascii_digit() || ch == ',')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_numbers_collapse_to_digits() {
        for raw in ["012", "12", "12.0", "Truck 12", " 12 "] {
            assert_eq!(normalize_unit(raw).as_deref(), Some("12"), "{raw}");
        }
        assert_eq!(normalize_unit("000").as_deref(), Some("0"));
        assert_eq!(normalize_unit("122").as_deref(), Some("122"));
        assert_eq!(normalize_unit("12-2").as_deref(), Some("12-2"));
        assert_eq!(normalize_unit("12.5").as_deref(), Some("12.5"));
        assert_eq!(normalize_unit("t12-a").as_deref(), Some("T12-A"));
        assert_eq!(normalize_unit("spare").as_deref(), Some("SPARE"));
        assert_eq!(normalize_unit("   "), None);
    }

    #[test]
    fn amounts_accept_currency_formatting() {
        assert_eq!(parse_amount("$1,250.50"), Some(Decimal::new(125050, 2)));
        assert_eq!(parse_amount("(45.10)"), Some(Decimal::new(-4510, 2)));
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn names_normalize_for_comparison() {
        assert_eq!(normalize_name("\u{feff}Maria   GOMEZ "), "maria gomez");
        assert!(is_generic_owner_name("Smith, J"));
        assert!(is_generic_owner_name("Owner 2"));
        assert!(!is_generic_owner_name("Maria Gomez"));
    }
}
