use serde_json::Value;

pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut out = text
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    out.push('…');
    out
}

pub fn format_property(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn truncate_label_keeps_short_names() {
        assert_eq!(truncate_label("HASH_JOIN", 16), "HASH_JOIN");
    }

    #[test]
    fn truncate_label_marks_cut_names() {
        assert_eq!(truncate_label("PARTITIONED_HASH_JOIN", 10), "PARTITION…");
    }

    #[test]
    fn format_property_renders_scalars_plain() {
        assert_eq!(format_property(&json!("lineitem")), "lineitem");
        assert_eq!(format_property(&json!(42)), "42");
        assert_eq!(format_property(&json!(null)), "null");
    }

    #[test]
    fn format_property_renders_nested_values_as_json() {
        assert_eq!(format_property(&json!({"rows": 10})), "{\"rows\":10}");
    }
}
