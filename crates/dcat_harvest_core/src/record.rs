use serde_json::{Map, Value};

/// Flat dataset record built up by the profiles for one dataset.
pub type Record = Map<String, Value>;

/// Looks up a string field on a record.
///
/// The root level is checked first. If the key is not found there, entries of
/// the `extras` list are checked, both with the key provided and with `dcat_`
/// prepended (legacy field names). Empty strings count as missing.
pub fn dict_value<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    if let Some(value) = record.get(key) {
        return value.as_str().filter(|s| !s.is_empty());
    }

    let legacy = format!("dcat_{key}");
    record
        .get("extras")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|extra| {
            extra
                .get("key")
                .and_then(Value::as_str)
                .is_some_and(|k| k == key || k == legacy)
        })
        .and_then(|extra| extra.get("value"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Appends `{key, value}` to the record's `extras` list, creating it if needed.
pub(crate) fn push_extra(record: &mut Record, key: &str, value: impl Into<Value>) {
    push_to_list(
        record,
        "extras",
        serde_json::json!({ "key": key, "value": value.into() }),
    );
}

/// Appends `item` to the list under `list`, creating the list if needed.
///
/// A non-list value an earlier profile stored under that key is left as it
/// is and `false` is returned.
pub(crate) fn push_to_list(record: &mut Record, list: &str, item: Value) -> bool {
    let entry = record
        .entry(list.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    match entry {
        Value::Array(items) => {
            items.push(item);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn root_value_wins_over_extras() {
        let rec = record(json!({
            "identifier": "root",
            "extras": [{"key": "identifier", "value": "extra"}]
        }));
        assert_eq!(dict_value(&rec, "identifier"), Some("root"));
    }

    #[test]
    fn legacy_extras_key_is_found() {
        let rec = record(json!({
            "extras": [{"key": "dcat_identifier", "value": "legacy"}]
        }));
        assert_eq!(dict_value(&rec, "identifier"), Some("legacy"));
    }

    #[test]
    fn empty_values_are_missing() {
        let rec = record(json!({
            "extras": [{"key": "uri", "value": ""}]
        }));
        assert_eq!(dict_value(&rec, "uri"), None);
    }

    #[test]
    fn push_extra_creates_list() {
        let mut rec = Record::new();
        push_extra(&mut rec, "issued", "2023-01-01");
        push_extra(&mut rec, "modified", "2023-02-01");
        assert_eq!(rec["extras"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn non_list_field_is_left_alone() {
        let mut rec = record(json!({ "extras": "set by another profile" }));
        assert!(!push_to_list(&mut rec, "extras", json!({"key": "k", "value": "v"})));
        assert_eq!(rec["extras"], json!("set by another profile"));
    }
}
