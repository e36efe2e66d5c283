use serde_json::{Map, Value};

/// Compile a nested JSON object into a flat mapping of dot-joined paths to
/// leaf values, suitable for use as a "set these fields" update document.
///
/// Plain objects are recursed into; everything else (scalars, nulls, and
/// arrays) is a leaf and is recorded whole under its path. Arrays are
/// deliberately not expanded into indexed sub-paths: a partial update to an
/// array field replaces the entire array atomically.
pub fn flatten(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut output = Map::new();
    flatten_into(obj, "", &mut output);
    output
}

fn flatten_into(obj: &Map<String, Value>, path: &str, output: &mut Map<String, Value>) {
    for (key, value) in obj {
        let joined = if path.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", path, key)
        };

        match value {
            Value::Object(inner) => flatten_into(inner, &joined, output),
            other => {
                output.insert(joined, other.clone());
            }
        }
    }
}

/// Reconstruct a nested object from a flat dot-path mapping. Inverse of
/// [`flatten`] for inputs without array-valued leaves.
pub fn unflatten(flat: &Map<String, Value>) -> Value {
    let mut root = Map::new();
    for (path, value) in flat {
        let mut segments = path.split('.').peekable();
        let mut current = &mut root;
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.insert(segment.to_string(), value.clone());
            } else {
                let entry = current
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                // a leaf already sitting on this path is overwritten
                if !entry.is_object() {
                    *entry = Value::Object(Map::new());
                }
                match entry {
                    Value::Object(inner) => current = inner,
                    _ => unreachable!(),
                }
            }
        }
    }
    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn nested_objects_become_dot_paths() {
        let input = obj(json!({
            "title": "Rocks Pack",
            "meta": { "source": { "vendor": "acme" }, "verified": true }
        }));

        let flat = flatten(&input);

        assert_eq!(flat.len(), 3);
        assert_eq!(flat["title"], json!("Rocks Pack"));
        assert_eq!(flat["meta.source.vendor"], json!("acme"));
        assert_eq!(flat["meta.verified"], json!(true));
    }

    #[test]
    fn arrays_are_leaves_not_recursed() {
        let input = obj(json!({ "images": [{ "url": "a" }] }));

        let flat = flatten(&input);

        assert_eq!(flat.len(), 1);
        assert_eq!(flat["images"], json!([{ "url": "a" }]));
    }

    #[test]
    fn idempotent_on_already_flat_input() {
        let input = obj(json!({
            "category": "UE4",
            "a.b": 1,
            "tags": [{ "name": "rock", "path": "/nature/rock" }]
        }));

        let once = flatten(&input);
        let twice = flatten(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn null_and_scalar_leaves_kept_at_their_paths() {
        let input = obj(json!({ "a": { "b": null, "c": 2 }, "d": "x" }));

        let flat = flatten(&input);

        assert_eq!(flat.len(), 3);
        assert_eq!(flat["a.b"], Value::Null);
        assert_eq!(flat["a.c"], json!(2));
        assert_eq!(flat["d"], json!("x"));
    }

    #[test]
    fn unflatten_recovers_array_free_structures() {
        let original = json!({
            "a": { "b": { "c": 1 }, "d": "two" },
            "e": true
        });

        let flat = flatten(&obj(original.clone()));
        assert_eq!(unflatten(&flat), original);
    }

    #[test]
    fn empty_object_flattens_to_empty() {
        assert!(flatten(&Map::new()).is_empty());
    }
}
