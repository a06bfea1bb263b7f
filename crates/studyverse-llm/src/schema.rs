//! Response schema for structured quiz output.

use serde_json::{Value, json};

/// Schema for an array of quiz items, in Gemini's OpenAPI subset.
pub fn quiz_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": {
                    "type": "STRING",
                    "description": "The question text."
                },
                "options": {
                    "type": "ARRAY",
                    "items": {"type": "STRING"},
                    "description": "An array of 4 possible answers."
                },
                "correctAnswer": {
                    "type": "STRING",
                    "description": "The correct answer from the options."
                },
                "explanation": {
                    "type": "STRING",
                    "description": "A brief explanation of why the answer is correct."
                }
            },
            "required": ["question", "options", "correctAnswer", "explanation"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields() {
        let schema = quiz_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(
            schema["items"]["required"],
            json!(["question", "options", "correctAnswer", "explanation"])
        );
        assert_eq!(schema["items"]["properties"]["options"]["items"]["type"], "STRING");
    }
}
