/// Folds a name to its shape: case and separator convention removed.
pub fn name_shape(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | '.' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Two distinct names that only differ by casing/separator convention.
pub fn differs_only_in_convention(a: &str, b: &str) -> bool {
    a != b && !name_shape(a).is_empty() && name_shape(a) == name_shape(b)
}

pub fn naming_convention(name: &str) -> &'static str {
    let has_upper = name.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = name.chars().any(|c| c.is_ascii_lowercase());
    if name.contains('_') {
        if has_upper && !has_lower {
            "SCREAMING_SNAKE_CASE"
        } else {
            "snake_case"
        }
    } else if name.contains('-') {
        "kebab-case"
    } else if name.starts_with(|c: char| c.is_ascii_uppercase()) && has_lower {
        "PascalCase"
    } else if has_upper && has_lower {
        "camelCase"
    } else {
        "lowercase"
    }
}
