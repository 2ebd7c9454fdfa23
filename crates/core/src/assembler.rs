//! Conversion between [`FormState`] and a persisted `responses` object.
//!
//! Question answers are stored under their decimal id; collections are
//! stored under their own non-numeric key as an array of entries.

use serde_json::{Map, Value};

use crate::collection::is_collection_key;
use crate::error::CoreError;
use crate::form_state::FormState;
use crate::schema::FormSchema;
use crate::types::QuestionId;

/// Flatten answers and collections into one `responses` object.
pub fn serialize(state: &FormState) -> Map<String, Value> {
    let mut out: Map<String, Value> = state
        .answers
        .iter()
        .map(|(id, value)| (id.to_string(), value.clone()))
        .collect();
    for (key, entries) in &state.collections {
        let items = entries.iter().cloned().map(Value::Object).collect();
        out.insert(key.clone(), Value::Array(items));
    }
    out
}

/// Rebuild a form state from a stored `responses` value.
///
/// Non-numeric keys holding arrays become collections; every other key must
/// parse as a question id. The error map of the result is empty.
pub fn hydrate(responses: &Value) -> Result<FormState, CoreError> {
    let obj = match responses {
        Value::Object(obj) => obj,
        Value::Null => return Ok(FormState::new()),
        _ => {
            return Err(CoreError::Validation(
                "responses must be a JSON object".to_string(),
            ))
        }
    };

    let mut state = FormState::new();
    for (key, value) in obj {
        if let Ok(id) = key.parse::<QuestionId>() {
            state.answers.insert(id, value.clone());
            continue;
        }
        match value {
            Value::Array(items) if is_collection_key(key) => {
                let entries = items
                    .iter()
                    .map(|item| item.as_object().cloned().unwrap_or_default())
                    .collect();
                state.collections.insert(key.clone(), entries);
            }
            _ => {
                return Err(CoreError::Validation(format!(
                    "Response key '{key}' is neither a question id nor a collection"
                )))
            }
        }
    }
    Ok(state)
}

/// Answer keys that do not name a question of `schema`.
pub fn unknown_question_ids(state: &FormState, schema: &FormSchema) -> Vec<QuestionId> {
    state
        .answers
        .keys()
        .copied()
        .filter(|id| schema.question(*id).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::{MultiSelection, SingleSelection};
    use crate::schema::fixtures::schema;
    use crate::schema::{Question, QuestionType};
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn roundtrip_preserves_every_answer_shape() {
        let mut state = FormState::new();
        state.set_answer(1, json!("스테이 한옥"));
        state.set_answer(2, json!("/uploads/1700000000000-license.pdf"));
        let mut multi = MultiSelection::default();
        multi.toggle("인스타그램", true);
        multi.set_input("인스타그램", "@stay");
        state.set_answer(3, multi.to_value());
        state.set_answer(4, SingleSelection::default().to_value());
        state.set_answer(5, json!([{"대표자명": "홍길동"}, {}]));
        state.set_answer(6, json!({"agreed": true}));
        state.add_room();
        state.set_room_field(0, "name", "디럭스");

        let serialized = Value::Object(serialize(&state));
        assert_eq!(serialized["rooms"][0]["name"], json!("디럭스"));
        assert_eq!(serialized["1"], json!("스테이 한옥"));

        let restored = hydrate(&serialized).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn hydrate_null_is_empty_state() {
        assert_eq!(hydrate(&Value::Null).unwrap(), FormState::new());
    }

    #[test]
    fn hydrate_rejects_stray_keys() {
        assert_matches!(hydrate(&json!({"note": "x"})), Err(CoreError::Validation(_)));
        assert_matches!(hydrate(&json!([1, 2])), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unknown_ids_are_reported() {
        let s = schema(vec![Question::new(1, 1, 1, "a", QuestionType::Text)]);
        let state = hydrate(&json!({"1": "a", "99": "b", "rooms": []})).unwrap();
        assert_eq!(unknown_question_ids(&state, &s), vec![99]);
    }
}
