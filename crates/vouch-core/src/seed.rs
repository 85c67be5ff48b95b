use crate::ids::BusinessId;
use crate::types::Business;

/// Showcase businesses written to an empty store on first run.
pub fn seed_businesses() -> Vec<Business> {
    [
        ("1", "Reflection Beauty Clinic", "Skincare", true),
        ("2", "Mary's Kitchen & Catering", "Food & Restaurant", true),
        ("3", "72 Wears", "Fashion", true),
        ("4", "The Tiny Needle", "Tailoring", false),
    ]
    .into_iter()
    .map(|(id, name, category, verified)| {
        let mut business = Business::new(name, category);
        business.id = BusinessId::from(id);
        business.image_url = Some("/placeholder.svg".to_string());
        business.is_verified = verified;
        business
    })
    .collect()
}
