use serde_json::Value as JsonValue;

/// Walks a dot-separated path through nested JSON objects.
///
/// Every segment must be a key of an object; arrays and scalars along the way end the walk.
pub fn lookup_path<'a>(data: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut cur = data;
    for segment in path.split('.') {
        cur = cur.as_object()?.get(segment)?;
    }
    Some(cur)
}
