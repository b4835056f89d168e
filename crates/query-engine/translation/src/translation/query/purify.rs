//! Strip the parts of a filter tree that impose no constraint.

use indexmap::IndexMap;

use super::values::Filter;

/// Remove empty maps, empty sequences and nulls from a filter tree.
///
/// A null survives where it carries meaning: under `$eq`, `$ne`, or directly under an
/// attribute. A sequence under `$in` or `$notIn` is kept verbatim, even when empty, since
/// an empty membership list matches nothing rather than everything. The operand of `$sub`
/// is kept as it is, unless it is null.
///
/// Returns `None` when nothing constraining is left.
pub fn purify_filter(filter: &Filter) -> Option<Filter> {
    match filter {
        Filter::Null => None,
        Filter::Scalar(_) => Some(filter.clone()),
        Filter::Sequence(items) => {
            let purified: Vec<Filter> = items.iter().filter_map(purify_filter).collect();
            (!purified.is_empty()).then_some(Filter::Sequence(purified))
        }
        Filter::Map(entries) => {
            let purified: IndexMap<String, Filter> = entries
                .iter()
                .filter_map(|(key, value)| {
                    purify_entry(key, value).map(|purified| (key.clone(), purified))
                })
                .collect();
            (!purified.is_empty()).then_some(Filter::Map(purified))
        }
    }
}

fn purify_entry(key: &str, value: &Filter) -> Option<Filter> {
    match value {
        Filter::Sequence(_) if matches!(key, "$in" | "$notIn") => Some(value.clone()),
        // `$sub` operands are parsed, not filtered, so their `value` keys stay as given
        Filter::Map(_) | Filter::Sequence(_) | Filter::Scalar(_) if key == "$sub" => {
            Some(value.clone())
        }
        Filter::Null if matches!(key, "$eq" | "$ne") || !key.starts_with('$') => Some(Filter::Null),
        _ => purify_filter(value),
    }
}
