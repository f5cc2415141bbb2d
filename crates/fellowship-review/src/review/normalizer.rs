/// Normalizes a free-text stage value: strips invisible characters, treats `_` and `-` as
/// word breaks, collapses whitespace, and case-folds.
pub(crate) fn normalize_value(value: &str) -> String {
    let cleaned = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .replace(['_', '-'], " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Case- and separator-insensitive form of a field key, so `ProblemSolved`,
/// `problemSolved`, and `problem_solved` compare equal.
pub(crate) fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|ch| !matches!(ch, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// `camelCase` to `snake_case`; keys already in snake case pass through.
pub(crate) fn to_snake_case(key: &str) -> String {
    let mut snake = String::with_capacity(key.len() + 4);
    for (index, ch) in key.chars().enumerate() {
        if ch.is_uppercase() {
            if index > 0 && !snake.ends_with('_') {
                snake.push('_');
            }
            snake.extend(ch.to_lowercase());
        } else {
            snake.push(ch);
        }
    }
    snake
}
