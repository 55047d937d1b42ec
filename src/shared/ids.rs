use uuid::Uuid;

pub const BAG_ID_PREFIX: &str = "urn:uuid:";
pub const NBN_PREFIX: &str = "urn:nbn:nl:ui:13-";

/// Returns true when `value` is `urn:uuid:` (any case) followed by exactly one
/// hyphenated UUID.
pub fn is_valid_bag_id(value: &str) -> bool {
    has_urn_with_uuid(value, BAG_ID_PREFIX)
}

/// Returns true when `value` is `urn:nbn:nl:ui:13-` (any case) followed by
/// exactly one hyphenated UUID.
pub fn is_valid_nbn(value: &str) -> bool {
    has_urn_with_uuid(value, NBN_PREFIX)
}

fn has_urn_with_uuid(value: &str, prefix: &str) -> bool {
    let Some(head) = value.get(..prefix.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(prefix) {
        return false;
    }
    let tail = &value[prefix.len()..];
    // `Uuid::parse_str` also accepts simple, braced and urn forms; only the
    // hyphenated form is a valid suffix here.
    tail.len() == uuid::fmt::Hyphenated::LENGTH && Uuid::parse_str(tail).is_ok()
}

/// Source of fresh vault identifiers.
pub trait IdMinter: Send + Sync {
    fn mint_bag_id(&self) -> String;
    fn mint_nbn(&self) -> String;
}

/// Mints identifiers from random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdMinter;

impl IdMinter for UuidIdMinter {
    fn mint_bag_id(&self) -> String {
        format!("{BAG_ID_PREFIX}{}", Uuid::new_v4())
    }

    fn mint_nbn(&self) -> String {
        format!("{NBN_PREFIX}{}", Uuid::new_v4())
    }
}
