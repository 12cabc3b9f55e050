//! Payload construction and default merging

use contracts::{is_truthy, Payload, ATTR_MESSAGE};
use serde_json::Value;

/// Build the base payload for one invocation
///
/// The message is stored under `message`; every truthy attribute is added on
/// top (a truthy `message` attribute replaces the positional message).
pub fn base_payload(message: &str, attributes: Payload) -> Payload {
    let mut payload = Payload::new();
    payload.insert(ATTR_MESSAGE.to_string(), Value::String(message.to_string()));
    payload.extend(attributes.into_iter().filter(|(_, value)| is_truthy(value)));
    payload
}

/// Deep-merge `defaults` underneath `payload`
///
/// Values already in `payload` win at every nesting level; `defaults` only
/// fills keys that are absent. Nested mappings present on both sides are
/// merged recursively.
pub fn add_defaults(payload: &mut Payload, defaults: &Payload) {
    for (key, default) in defaults {
        match payload.get_mut(key) {
            Some(Value::Object(current)) => {
                if let Value::Object(nested) = default {
                    add_defaults(current, nested);
                }
            }
            Some(_) => {}
            None => {
                payload.insert(key.clone(), default.clone());
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-3i64..3).prop_map(Value::from),
            "[a-z]{0,4}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    /// Small key space so payloads and defaults overlap
    fn arb_payload() -> impl Strategy<Value = Payload> {
        prop::collection::btree_map("[a-d]|message|data", arb_value(), 0..5)
            .prop_map(|map| map.into_iter().collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_merge_is_idempotent(payload in arb_payload(), defaults in arb_payload()) {
            let mut once = payload;
            add_defaults(&mut once, &defaults);
            let mut twice = once.clone();
            add_defaults(&mut twice, &defaults);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_payload_values_win(payload in arb_payload(), defaults in arb_payload()) {
            let mut merged = payload.clone();
            add_defaults(&mut merged, &defaults);

            for (key, value) in &payload {
                if !value.is_object() {
                    prop_assert_eq!(&merged[key], value);
                }
            }
            for (key, value) in &defaults {
                if !payload.contains_key(key) {
                    prop_assert_eq!(&merged[key], value);
                }
            }
        }

        #[test]
        fn prop_base_payload_has_no_falsy_values(
            message in "[a-z]{0,5}",
            attributes in arb_payload(),
        ) {
            let base = base_payload(&message, attributes.clone());

            for (key, value) in &base {
                if key != ATTR_MESSAGE {
                    prop_assert!(is_truthy(value), "falsy {} = {}", key, value);
                }
            }
            for (key, value) in &attributes {
                if is_truthy(value) {
                    prop_assert_eq!(&base[key], value);
                } else if key != ATTR_MESSAGE {
                    prop_assert!(!base.contains_key(key));
                }
            }
            match attributes.get(ATTR_MESSAGE) {
                Some(value) if is_truthy(value) => prop_assert_eq!(&base[ATTR_MESSAGE], value),
                _ => prop_assert_eq!(&base[ATTR_MESSAGE], &Value::String(message.clone())),
            }
        }

        #[test]
        fn prop_overlays_do_not_leak_between_targets(
            payload in arb_payload(),
            first in arb_payload(),
            second in arb_payload(),
        ) {
            let snapshot = payload.clone();

            let mut for_first = payload.clone();
            add_defaults(&mut for_first, &first);
            let mut for_second = payload.clone();
            add_defaults(&mut for_second, &second);

            let mut second_alone = snapshot.clone();
            add_defaults(&mut second_alone, &second);

            prop_assert_eq!(&for_second, &second_alone);
            prop_assert_eq!(&payload, &snapshot);
            for key in first.keys() {
                if !payload.contains_key(key) && !second.contains_key(key) {
                    prop_assert!(!for_second.contains_key(key));
                }
            }
        }
    }
}
