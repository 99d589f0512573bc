//! Answer normalisation for free-text survey cells.

use pulse_core::Value;

/// `Yes`, `yes `, ` YES` and a boolean `true` all count as a yes answer.
pub fn is_yes(value: &Value) -> bool {
    match value {
        Value::Text(s) => s.trim().eq_ignore_ascii_case("yes"),
        Value::Bool(b) => *b,
        _ => false,
    }
}

pub fn is_no(value: &Value) -> bool {
    match value {
        Value::Text(s) => s.trim().eq_ignore_ascii_case("no"),
        Value::Bool(b) => !*b,
        _ => false,
    }
}

/// Trim, lowercase, then capitalise each word: `"male "` → `"Male"`.
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Group label for a respondent's self-described category (gender and the like).
///
/// Missing answers keep the empty label so they still form their own group.
pub fn group_label(value: &Value) -> String {
    title_case(&value.category())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_ignore_case_and_padding() {
        assert!(is_yes(&Value::Text(" Yes".into())));
        assert!(is_yes(&Value::Text("YES ".into())));
        assert!(is_no(&Value::Text("no".into())));
        assert!(!is_yes(&Value::Text("y".into())));
        assert!(!is_yes(&Value::Missing));
        assert!(!is_no(&Value::Missing));
        assert!(is_no(&Value::Bool(false)));
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(title_case("male "), "Male");
        assert_eq!(title_case("FEMALE"), "Female");
        assert_eq!(title_case("  non   binary "), "Non Binary");
        assert_eq!(group_label(&Value::Missing), "");
    }
}
