use unicode_normalization::UnicodeNormalization;

/// Articles, prepositions, filler verbs and generic nouns that never
/// identify a procedure on their own.
const STOP_WORDS: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "de", "del", "para", "por", "con", "en", "que", "como",
    "donde", "cual", "cuando", "necesito", "quiero", "puedo", "hacer", "tramite", "servicio",
    "informacion", "sobre", "dame", "busco", "me", "mi", "tu", "su", "hay", "tiene", "esta",
    "esa", "ese", "estos", "estas",
];

/// Tokens of this many characters or fewer are dropped.
const MIN_KEYWORD_LEN: usize = 2;

/// Lowercase, strip accents and replace anything outside `[a-z0-9]` and
/// whitespace with a space, then trim.
///
/// ```
/// use tramites_search::search::normalize::normalize_text;
///
/// assert_eq!(normalize_text("Trámite: ¡Licencia!"), "tramite   licencia");
/// ```
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    folded.trim().to_string()
}

/// Combining Diacritical Marks block (U+0300..U+036F).
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Significant words of a query, in input order.
pub fn extract_keywords(query: &str) -> Vec<String> {
    normalize_text(query)
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_KEYWORD_LEN && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}
