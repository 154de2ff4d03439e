//! Proptest generators for property-based testing.

use proptest::prelude::*;

use hashdata_core::{Data, ObjectKey};

/// A key part that is always a valid path segment.
pub fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,15}".prop_map(String::from)
}

/// A semver-shaped version string.
pub fn version() -> impl Strategy<Value = String> {
    (0u16..20, 0u16..20, 0u16..50).prop_map(|(a, b, c)| format!("{a}.{b}.{c}"))
}

/// A valid, already-defaulted key.
pub fn object_key() -> impl Strategy<Value = ObjectKey> {
    (segment(), version()).prop_map(|(t, v)| ObjectKey::new(t, v))
}

/// A key part the validator must reject.
pub fn hostile_segment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("..".to_string()),
        Just(".".to_string()),
        segment().prop_map(|s| format!("../{s}")),
        (segment(), segment()).prop_map(|(a, b)| format!("{a}/{b}")),
        (segment(), segment()).prop_map(|(a, b)| format!("{a}\\{b}")),
        segment().prop_map(|s| format!("{s}\0")),
    ]
}

/// Small JSON documents, as object content.
pub fn json_content() -> impl Strategy<Value = String> {
    prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..6)
        .prop_map(|m| serde_json::to_string(&m).unwrap_or_default())
}

/// A request envelope; `type` / `version` may be empty to exercise defaults.
pub fn request() -> impl Strategy<Value = Data> {
    (
        prop_oneof![Just(String::new()), segment()],
        prop_oneof![Just(String::new()), version()],
        prop_oneof![Just(String::new()), "[0-9a-f]{64}"],
    )
        .prop_map(|(object_type, version, hash)| Data {
            object_type,
            version,
            hash,
            content: String::new(),
        })
}

/// Parameters for planting one object.
#[derive(Debug, Clone)]
pub struct ObjectParams {
    pub key: ObjectKey,
    pub content: String,
}

impl Arbitrary for ObjectParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (object_key(), json_content())
            .prop_map(|(key, content)| ObjectParams { key, content })
            .boxed()
    }
}
