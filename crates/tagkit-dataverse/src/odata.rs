//! OData query helpers.

/// Escape a value for use inside a single-quoted OData string literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Filter matching names that start with, end with, or equal `candidate`.
pub fn similar_name_filter(field: &str, candidate: &str) -> String {
    let literal = escape_literal(candidate);
    format!(
        "startswith({field}, '{literal}') or endswith({field}, '{literal}') or {field} eq '{literal}'"
    )
}

/// Default entity set (collection) name for an entity logical name.
///
/// Follows the platform's English pluralization of logical names:
/// `case` -> `cases`, `category` -> `categories`, `mailbox` -> `mailboxes`,
/// `tagsettings` -> `tagsettingses`.
pub fn entity_set_name(logical_name: &str) -> String {
    let ends_with_consonant_y = logical_name.ends_with('y')
        && !logical_name[..logical_name.len() - 1].ends_with(['a', 'e', 'i', 'o', 'u']);

    if ends_with_consonant_y {
        format!("{}ies", &logical_name[..logical_name.len() - 1])
    } else if logical_name.ends_with(['s', 'x', 'z']) || logical_name.ends_with("ch") || logical_name.ends_with("sh") {
        format!("{}es", logical_name)
    } else {
        format!("{}s", logical_name)
    }
}
