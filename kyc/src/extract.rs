//! Field extraction at redemption time.
//!
//! Verifiers request fields under display names ("Full Name"); profiles
//! store canonical attribute names (`fullName`). The mapping is a fixed
//! table with a lower-casing fallback for names the table does not know.

use std::collections::BTreeMap;
use vouch_store::UserProfile;

/// Maps requested field names to canonical profile attribute names.
#[derive(Clone, Debug)]
pub struct FieldMap {
    entries: BTreeMap<String, String>,
}

impl Default for FieldMap {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("Full Name".to_string(), "fullName".to_string());
        entries.insert("ID Number".to_string(), "idNumber".to_string());
        entries.insert("Address".to_string(), "address".to_string());
        entries.insert("DOB".to_string(), "dob".to_string());
        // Legacy alias some verifiers still send.
        entries.insert("name".to_string(), "fullName".to_string());
        Self { entries }
    }
}

impl FieldMap {
    /// Canonical attribute name for a requested field. Unknown names fall
    /// back to their lower-cased form.
    pub fn canonical(&self, requested: &str) -> String {
        self.entries
            .get(requested)
            .cloned()
            .unwrap_or_else(|| requested.to_lowercase())
    }

    /// Extract the requested fields from a profile, keyed by canonical
    /// name. Fields absent from the profile, or present but empty, are
    /// silently omitted.
    pub fn extract(&self, profile: &UserProfile, requested: &[String]) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for field in requested {
            let canonical = self.canonical(field);
            if let Some(value) = profile.non_empty(&canonical) {
                out.insert(canonical, value.to_string());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_types::UserId;

    fn profile() -> UserProfile {
        UserProfile::new(UserId::new("u1"))
            .with_attribute("fullName", "Ada Lovelace")
            .with_attribute("idNumber", "A12345")
            .with_attribute("address", "")
            .with_attribute("dob", "1815-12-10")
    }

    #[test]
    fn known_names_map_through_the_table() {
        let map = FieldMap::default();
        assert_eq!(map.canonical("Full Name"), "fullName");
        assert_eq!(map.canonical("ID Number"), "idNumber");
        assert_eq!(map.canonical("Address"), "address");
        assert_eq!(map.canonical("DOB"), "dob");
        assert_eq!(map.canonical("name"), "fullName");
    }

    #[test]
    fn unknown_names_fall_back_to_lowercase() {
        let map = FieldMap::default();
        assert_eq!(map.canonical("Nationality"), "nationality");
    }

    #[test]
    fn extraction_omits_missing_and_empty_fields() {
        let map = FieldMap::default();
        let requested = vec![
            "Full Name".to_string(),
            "Address".to_string(),     // present but empty
            "Nationality".to_string(), // absent
        ];
        let extracted = map.extract(&profile(), &requested);

        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted["fullName"], "Ada Lovelace");
    }

    #[test]
    fn alias_and_display_name_extract_the_same_attribute() {
        let map = FieldMap::default();
        let via_alias = map.extract(&profile(), &["name".to_string()]);
        let via_display = map.extract(&profile(), &["Full Name".to_string()]);
        assert_eq!(via_alias, via_display);
    }
}
