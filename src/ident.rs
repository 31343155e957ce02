//! Public identifier generation for media uploads

use uuid::Uuid;

/// Mint a new upload identifier.
///
/// Identifiers are random UUIDs rendered in hyphenated form: collision
/// resistance needs no coordination, and the value discloses nothing about
/// the uploader or the upload time. The identifier doubles as the external
/// retrieval handle, so it must stay unguessable.
pub fn new_upload_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_valid_hyphenated_uuids() {
        let id = new_upload_id();
        let parsed = Uuid::parse_str(&id).expect("upload id should parse as a UUID");
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(id.len(), 36);
    }

    #[test]
    fn generates_distinct_ids() {
        let ids: HashSet<String> = (0..1000).map(|_| new_upload_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
