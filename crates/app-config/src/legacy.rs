// In crates/app-config/src/legacy.rs

//! Normalisation of legacy parameter spellings.
//!
//! Older parameter sets write fields as `<NAME>_<CamelCase>` (for example
//! `AC_SignalOpenLevel`) and call the stop fields "price limit". Both forms
//! are folded onto the current snake_case field names before a table is
//! deserialized.

use toml::Table;

const ALIASES: &[(&str, &str)] = &[
    ("signal_open_filter_method", "signal_open_filter"),
    ("signal_open_boost_method", "signal_open_boost"),
    ("price_limit_method", "price_stop_method"),
    ("price_limit_level", "price_stop_level"),
];

/// Maps one key of the `name` table onto its current field name.
pub fn normalize_key(name: &str, key: &str) -> String {
    let field = match key.strip_prefix(name).and_then(|rest| rest.strip_prefix('_')) {
        Some(camel) => to_snake_case(camel),
        None => key.to_string(),
    };
    ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == field)
        .map(|(_, current)| current.to_string())
        .unwrap_or(field)
}

/// Rewrites every key of `table`. Two spellings of the same field in one
/// table are rejected.
pub fn normalize_table(name: &str, table: Table) -> Result<Table, String> {
    let mut normalized = Table::new();
    let mut spelled_as: Vec<(String, String)> = Vec::new();

    for (key, value) in table {
        let field = normalize_key(name, &key);
        if let Some((_, first)) = spelled_as.iter().find(|(f, _)| *f == field) {
            return Err(format!("`{first}` and `{key}` both set `{field}`"));
        }
        spelled_as.push((field.clone(), key));
        normalized.insert(field, value);
    }
    Ok(normalized)
}

fn to_snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for (i, ch) in camel.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_camel_case_becomes_snake_case() {
        assert_eq!(normalize_key("AC", "AC_SignalOpenLevel"), "signal_open_level");
        assert_eq!(normalize_key("AC", "AC_MaxSpread"), "max_spread");
        assert_eq!(normalize_key("AC", "AC_Shift"), "shift");
    }

    #[test]
    fn method_aliases_are_folded() {
        assert_eq!(normalize_key("AC", "AC_SignalOpenFilterMethod"), "signal_open_filter");
        assert_eq!(normalize_key("AC", "AC_SignalOpenBoostMethod"), "signal_open_boost");
        assert_eq!(normalize_key("AC", "AC_PriceLimitMethod"), "price_stop_method");
        assert_eq!(normalize_key("AC", "price_limit_level"), "price_stop_level");
    }

    #[test]
    fn current_names_pass_through() {
        assert_eq!(normalize_key("AC", "signal_close_level"), "signal_close_level");
        // Another indicator's prefix is left alone.
        assert_eq!(normalize_key("AC", "AO_Shift"), "AO_Shift");
    }

    #[test]
    fn two_spellings_of_one_field_are_rejected() {
        let table: Table = toml::from_str("AC_SignalOpenLevel = 1\nsignal_open_level = 1").unwrap();
        let err = normalize_table("AC", table).unwrap_err();
        assert!(err.contains("signal_open_level"));
        assert!(err.contains("AC_SignalOpenLevel"));
    }
}
