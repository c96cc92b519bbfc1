/// Keeps only ASCII decimal digits, dropping `+`, spaces, dashes and anything else.
pub fn clean_digits(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

/// The trailing `count` digits of an already-cleaned digit string.
pub fn trailing_digits(digits: &str, count: usize) -> &str {
    let start = digits.len().saturating_sub(count);
    &digits[start..]
}
