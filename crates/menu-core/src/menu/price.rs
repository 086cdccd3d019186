//! Whole-unit currency formatting for menu prices.

/// Formats `value` rounded to whole units with locale grouping and a currency
/// symbol: `format_price(12500.0, "COP", "es-CO")` → `"$ 12.500"`.
///
/// Locales whose language is `es`, `pt`, `de`, `it`, `fr` or `nl` group with
/// `.`; everything else groups with `,`.
pub fn format_price(value: f64, currency: &str, locale: &str) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits, group_separator(locale));
    format!("{sign}{} {grouped}", currency_symbol(currency))
}

/// `format_price` with the menu defaults (`COP`, `es-CO`).
pub fn format_price_default(value: f64) -> String {
    format_price(value, "COP", "es-CO")
}

fn currency_symbol(currency: &str) -> &str {
    match currency.to_ascii_uppercase().as_str() {
        "COP" | "USD" | "MXN" | "ARS" | "CLP" => "$",
        "EUR" => "€",
        "GBP" => "£",
        _ => currency,
    }
}

fn group_separator(locale: &str) -> char {
    let lang = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match lang.as_str() {
        "es" | "pt" | "de" | "it" | "fr" | "nl" => '.',
        _ => ',',
    }
}

fn group_thousands(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}
