pub fn plural_str(length: usize, word: &str, suffix: Option<String>) -> String {
    let result = if length == 1 {
        word.trim_end_matches('s')
    } else {
        word
    };
    match (suffix, length > 0) {
        (Some(suffix_str), true) => {
            let mut suffix_owned = suffix_str;
            suffix_owned.push_str(result);
            suffix_owned
        }
        (_, _) => result.to_string(),
    }
}

/// Upper-case the first character, e.g. `mongo` -> `Mongo`.
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Quote and comma-join a list of names for log output.
pub fn quoted_names<'a, I: IntoIterator<Item = &'a str>>(names: I) -> String {
    let words: Vec<String> = names.into_iter().map(|name| format!("\"{}\"", name)).collect();
    words.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_str() {
        assert_eq!(plural_str(1, "changes", None), "change");
        assert_eq!(plural_str(3, "changes", Some("3 ".to_owned())), "3 changes");
        assert_eq!(plural_str(0, "changes", Some("0 ".to_owned())), "changes");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("mongo"), "Mongo");
        assert_eq!(title_case("helmchart"), "Helmchart");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_quoted_names() {
        assert_eq!(quoted_names(vec!["a", "b"]), "\"a\", \"b\"");
        assert_eq!(quoted_names(Vec::<&str>::new()), "");
    }
}
