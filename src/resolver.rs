// Column resolution for rows whose headers drift between exports.
//
// Lookup order: exact label for each candidate, then a folded substring
// match (diacritics stripped, compatibility forms decomposed, lowercased).
use crate::types::RawRow;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a label for fuzzy comparison: `"Área (M²)"` -> `"area (m2)"`.
pub fn fold_label(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Value of the first column matching any of `candidates`, or `""`.
///
/// Candidates are ordered most-preferred first. Exact hits win in candidate
/// order. Otherwise row labels are scanned in header order and the first
/// label whose folded form contains any folded candidate wins. Empty
/// candidates never match.
pub fn resolve<'a>(row: &'a RawRow, candidates: &[&str]) -> &'a str {
    if let Some(v) = candidates.iter().find_map(|c| row.get(c)) {
        return v;
    }
    let folded: Vec<String> = candidates
        .iter()
        .map(|c| fold_label(c))
        .filter(|c| !c.is_empty())
        .collect();
    if folded.is_empty() {
        return "";
    }
    row.iter()
        .find(|(label, _)| {
            let label = fold_label(label);
            folded.iter().any(|c| label.contains(c.as_str()))
        })
        .map(|(_, v)| v)
        .unwrap_or("")
}
