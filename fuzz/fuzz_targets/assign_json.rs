#![no_main]

use std::borrow::Cow;

use cowstate_core::{ChangeSet, assign_value, equals};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

// Input is `<state JSON>\n<changes JSON>`. Malformed halves are skipped.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Some((state_raw, changes_raw)) = text.split_once('\n') else {
        return;
    };
    let Ok(state) = serde_json::from_str::<Value>(state_raw) else {
        return;
    };
    let Ok(changes) = serde_json::from_str::<Value>(changes_raw) else {
        return;
    };
    let Ok(changes) = ChangeSet::from_json(changes, true) else {
        return;
    };

    let before = state.clone();
    let Ok(result) = assign_value(&state, &changes) else {
        assert!(!state.is_object());
        return;
    };

    // Input untouched.
    assert_eq!(state, before);

    match result {
        Cow::Borrowed(same) => assert!(std::ptr::eq(same, &state)),
        Cow::Owned(next) => {
            let next = next.as_object().expect("assign yields an object");
            for (property, value) in &changes {
                match value {
                    Some(v) => assert!(next.get(property).is_some_and(|cur| equals(cur, &v))),
                    None => assert!(!next.contains_key(property)),
                }
            }
        }
    }
});
