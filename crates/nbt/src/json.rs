//! Lossy JSON view of a tag tree, for inspection and debugging output.
//!
//! Numeric widths and the list/array distinction are not preserved, so the
//! result cannot be turned back into the same tree.

use serde_json::{Map, Number, Value as JsonValue};

use crate::tag::{Tag, Value};

/// Converts a payload to JSON. Compounds become objects in child order;
/// unnamed children are keyed by the empty string. Non-finite floats map to
/// `null`.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Byte(v) => JsonValue::from(*v),
        Value::Short(v) => JsonValue::from(*v),
        Value::Int(v) => JsonValue::from(*v),
        Value::Long(v) => JsonValue::from(*v),
        Value::Float(v) => float(f64::from(*v)),
        Value::Double(v) => float(*v),
        Value::ByteArray(v) => JsonValue::Array(v.iter().map(|b| JsonValue::from(*b)).collect()),
        Value::String(v) => JsonValue::String(v.clone()),
        Value::List(list) => {
            JsonValue::Array(list.iter().map(|item| value_to_json(item.value())).collect())
        }
        Value::Compound(compound) => {
            let mut map = Map::new();
            for child in compound {
                map.insert(
                    child.name().unwrap_or_default().to_owned(),
                    value_to_json(child.value()),
                );
            }
            JsonValue::Object(map)
        }
        Value::IntArray(v) => JsonValue::Array(v.iter().map(|i| JsonValue::from(*i)).collect()),
    }
}

/// JSON view of a whole tree; the root's name is dropped.
pub fn tag_to_json(tag: &Tag) -> JsonValue {
    value_to_json(tag.value())
}

fn float(v: f64) -> JsonValue {
    Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::{Compound, List};
    use crate::TagType;
    use serde_json::json;

    #[test]
    fn nested_tree_to_json() {
        let mut pos = Compound::new();
        pos.push(Tag::named("x", 1i32));
        pos.push(Tag::named("y", 2.5f64));
        let mut root = Compound::new();
        root.push(Tag::named("name", "steve"));
        root.push(Tag::named("pos", pos));
        root.push(Tag::named("inv", List::new(TagType::Compound)));
        root.push(Tag::named("bytes", vec![1i8, -1]));
        root.push(Tag::named("nan", f32::NAN));

        let json = tag_to_json(&Tag::named("", root));
        assert_eq!(
            json,
            json!({
                "name": "steve",
                "pos": {"x": 1, "y": 2.5},
                "inv": [],
                "bytes": [1, -1],
                "nan": null,
            })
        );
    }

    #[test]
    fn object_keys_keep_child_order() {
        let root: Compound = ["z", "a", "m"]
            .into_iter()
            .map(|n| Tag::named(n, 0i8))
            .collect();
        let json = value_to_json(&Value::Compound(root));
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
