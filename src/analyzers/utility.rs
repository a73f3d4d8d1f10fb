use std::cmp::Ordering;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compares two names ignoring case, falling back to exact order so that
/// differently-cased spellings still sort deterministically.
pub fn case_insensitive_cmp(a: &str, b: &str) -> Ordering {
    fold_case(a)
        .cmp(fold_case(b))
        .then_with(|| a.cmp(b))
}

/// Key used to treat two airline names as the same airline.
pub fn airline_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}
