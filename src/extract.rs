//! Locate assistant text inside a loosely-typed chat response.
//!
//! Endpoints disagree on where the reply lives, so the response is run
//! through an ordered list of shape lookups and the first non-empty string wins.

use serde_json::Value;

type ShapeLookup = fn(&Value) -> Option<&str>;

/// Known shapes in priority order.
const SHAPES: &[ShapeLookup] = &[openai_style, output_wrapper, data_wrapper];

/// `choices[0].message.content`
fn openai_style(value: &Value) -> Option<&str> {
    value.get("choices")?.get(0)?.get("message")?.get("content")?.as_str()
}

/// `output.content`
fn output_wrapper(value: &Value) -> Option<&str> {
    value.get("output")?.get("content")?.as_str()
}

/// `data.choices[0].message.content`
fn data_wrapper(value: &Value) -> Option<&str> {
    openai_style(value.get("data")?)
}

/// Return the assistant text of a response, or an empty string when no known
/// shape matches. Never fails.
pub fn extract_assistant_text(value: &Value) -> String {
    SHAPES
        .iter()
        .filter_map(|lookup| lookup(value))
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_openai_shape() {
        let value = json!({"choices": [{"message": {"content": "Hi there"}}]});
        assert_eq!(extract_assistant_text(&value), "Hi there");
    }

    #[test]
    fn reads_output_wrapper() {
        let value = json!({"output": {"content": "wrapped"}});
        assert_eq!(extract_assistant_text(&value), "wrapped");
    }

    #[test]
    fn reads_nested_data_wrapper() {
        let value = json!({"data": {"choices": [{"message": {"content": "nested"}}]}});
        assert_eq!(extract_assistant_text(&value), "nested");
    }

    #[test]
    fn first_match_wins() {
        let value = json!({
            "choices": [{"message": {"content": "A"}}],
            "output": {"content": "B"},
            "data": {"choices": [{"message": {"content": "C"}}]}
        });
        assert_eq!(extract_assistant_text(&value), "A");

        let value = json!({
            "output": {"content": "B"},
            "data": {"choices": [{"message": {"content": "C"}}]}
        });
        assert_eq!(extract_assistant_text(&value), "B");
    }

    #[test]
    fn empty_match_falls_through_to_next_shape() {
        let value = json!({
            "choices": [{"message": {"content": ""}}],
            "output": {"content": "B"}
        });
        assert_eq!(extract_assistant_text(&value), "B");
    }

    #[test]
    fn tolerates_missing_and_mistyped_fields() {
        let cases = [
            json!({}),
            json!(null),
            json!([]),
            json!("just a string"),
            json!({"choices": null}),
            json!({"choices": []}),
            json!({"choices": [null]}),
            json!({"choices": [{}]}),
            json!({"choices": [{"message": null}]}),
            json!({"choices": [{"message": {"content": null}}]}),
            json!({"choices": [{"message": {"content": 42}}]}),
            json!({"choices": {"0": {"message": {"content": "not an array"}}}}),
            json!({"output": null}),
            json!({"output": "flat"}),
            json!({"output": {"content": ["x"]}}),
            json!({"data": null}),
            json!({"data": {"choices": []}}),
            json!({"data": [{"choices": []}]}),
        ];
        for value in cases {
            assert_eq!(extract_assistant_text(&value), "", "value: {}", value);
        }
    }
}
