use vouch_core::types::Business;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Stable filter over `businesses`.
///
/// `query` is matched case-insensitively as a substring of the name, the
/// category or the description; an empty query matches everything.
/// `category` must match exactly, case included.
pub fn search_businesses<'a>(
    businesses: &'a [Business],
    query: &str,
    category: Option<&str>,
) -> Vec<&'a Business> {
    let needle = query.to_lowercase();
    let category = category.filter(|value| *value != ALL_CATEGORIES);
    businesses
        .iter()
        .filter(|business| match category {
            Some(category) => business.category == category,
            None => true,
        })
        .filter(|business| needle.is_empty() || matches_query(business, &needle))
        .collect()
}

fn matches_query(business: &Business, needle: &str) -> bool {
    business.name.to_lowercase().contains(needle)
        || business.category.to_lowercase().contains(needle)
        || business
            .description
            .as_deref()
            .map(|description| description.to_lowercase().contains(needle))
            .unwrap_or(false)
}
