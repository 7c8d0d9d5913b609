//! Naming utilities for code generation

/// Convert a table name to a class name.
///
/// Strips at most one trailing `s`, splits on `_`, upper-cases the first
/// letter of every segment and joins them: `order_items` -> `OrderItem`.
///
/// Irregular plurals are not handled and singular names ending in `s` lose
/// it (`status` -> `Statu`).
pub fn class_name_of(table_name: &str) -> String {
    let singular = table_name.strip_suffix('s').unwrap_or(table_name);
    singular.split('_').map(upper_first).collect()
}

/// Name of the accessor method for a relation to `target_table`.
///
/// `plural` is set for `hasMany` relations: `order_items` -> `orderItems`.
pub fn relation_accessor_name(target_table: &str, plural: bool) -> String {
    let name = lower_first(&class_name_of(target_table));
    if plural {
        format!("{}s", name)
    } else {
        name
    }
}

/// Class name of the service generated for `table_name`
pub fn service_class_name_of(table_name: &str) -> String {
    format!("{}Service", class_name_of(table_name))
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
