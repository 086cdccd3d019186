//! Slug normalization for menu identifiers.

/// Normalizes free-form input into the identifier grammar `[a-z0-9-]*`.
///
/// - Trims surrounding whitespace and lowercases
/// - Folds common Latin diacritics (`é` → `e`, `ñ` → `n`, `ß` → `ss`)
/// - Replaces each whitespace run with a single `-`
/// - Drops every remaining character outside `[a-z0-9-]`
///
/// `"G Lounge"` → `"g-lounge"`, `"Café Central"` → `"cafe-central"`.
/// The result may be empty (e.g. all-punctuation input).
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;

    for c in raw.trim().chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        for lower in c.to_lowercase() {
            match fold(lower) {
                Some(folded) => out.push_str(folded),
                None if is_slug_char(lower) => out.push(lower),
                None => {}
            }
        }
    }
    out
}

/// True if `s` is non-empty and made only of `[a-z0-9-]`.
pub fn is_slug(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_slug_char)
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

fn fold(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ł' | 'ľ' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ß' => "ss",
        'ś' | 'š' | 'ş' => "s",
        'ť' | 'ţ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}
