//! Text helpers shared by the classifiers.

use std::collections::HashSet;

/// Lowercases, trims, folds typographic apostrophes and collapses whitespace.
pub fn normalize(text: &str) -> String {
    let folded = text.replace(['\u{2019}', '\u{2018}', '`'], "'");
    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Splits normalized text into alphanumeric tokens.
///
/// Apostrophes and hyphens separate tokens, so `l'âge` yields `l` and `âge`.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
}

/// Returns true when `keyword` occurs in `normalized`.
///
/// Multi-word keywords (containing a space, apostrophe or hyphen) match as
/// substrings. Single words must equal a whole token, optionally followed
/// by a plural `s` or `x`.
pub fn contains_keyword(normalized: &str, keyword: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return false;
    }
    if keyword.contains([' ', '\'', '-']) {
        return normalized.contains(keyword);
    }
    tokens(normalized).any(|token| {
        token == keyword
            || token
                .strip_suffix(['s', 'x'])
                .is_some_and(|stem| stem == keyword)
    })
}

/// Word-overlap ratio between two texts.
///
/// Both texts are lowercased and split on whitespace; the ratio is
/// `|A ∩ B| / max(|A|, |B|)`, or 0.0 when either side is empty.
pub fn word_overlap(a: &str, b: &str) -> f64 {
    let left: HashSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
    let right: HashSet<String> = b.split_whitespace().map(str::to_lowercase).collect();
    let largest = left.len().max(right.len());
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let shared = left.intersection(&right).count();
    shared as f64 / largest as f64
}

/// Capitalizes a first name, segment by segment (`jean-pierre` -> `Jean-Pierre`).
pub fn capitalize_name(raw: &str) -> String {
    raw.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Bonjour   RayhAI  "), "bonjour rayhai");
        assert_eq!(normalize("Je m\u{2019}appelle Léa"), "je m'appelle léa");
    }

    #[test]
    fn test_contains_keyword_whole_tokens() {
        assert!(contains_keyword("quels sont tes projets ?", "projet"));
        assert!(contains_keyword("tes compétences", "compétence"));
        assert!(!contains_keyword("il habite dans le var", "ans"));
        assert!(contains_keyword("tu as quel âge", "âge"));
    }

    #[test]
    fn test_contains_keyword_phrases() {
        assert!(contains_keyword("quel est ton centre d'intérêt", "centre d'intérêt"));
        assert!(contains_keyword("tu fais quoi plus tard", "plus tard"));
        assert!(!contains_keyword("plus rien", "plus tard"));
    }

    #[test]
    fn test_word_overlap() {
        assert_eq!(word_overlap("", "anything"), 0.0);
        assert_eq!(word_overlap("a b c d", "a b x y"), 0.5);
        assert_eq!(word_overlap("Et Python", "et python"), 1.0);
        let ratio = word_overlap("et le deuxième projet", "parle moi du projet");
        assert!((ratio - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_capitalize_name() {
        assert_eq!(capitalize_name("léa"), "Léa");
        assert_eq!(capitalize_name("LÉA"), "Léa");
        assert_eq!(capitalize_name("jean-pierre"), "Jean-Pierre");
    }
}
