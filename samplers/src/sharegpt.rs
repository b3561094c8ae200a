//! Prompt extraction from ShareGPT-style conversation records

use serde_json::Value;

/// Turn roles that count as the user speaking
pub const USER_ROLES: [&str; 3] = ["user", "human", "prompter"];

/// Pull at most `limit` prompts out of an array of conversation records
///
/// Each record contributes the first user turn with non-blank text, trimmed.
/// Turns come from `conversations`, or from `messages` when the former is
/// missing or empty. Speaker is read from `role` then `from`, text from
/// `value` then `content`. Records without such a turn are skipped.
pub fn extract_prompts(records: &[Value], limit: usize) -> Vec<String> {
    let mut prompts = Vec::new();
    if limit == 0 {
        return prompts;
    }

    for record in records {
        if let Some(prompt) = first_user_turn(record) {
            prompts.push(prompt);
            if prompts.len() >= limit {
                break;
            }
        }
    }
    prompts
}

fn first_user_turn(record: &Value) -> Option<String> {
    turns(record)?
        .iter()
        .filter(|turn| speaker(turn).is_some_and(|role| USER_ROLES.contains(&role)))
        .filter_map(text)
        .next()
}

fn turns(record: &Value) -> Option<&Vec<Value>> {
    non_empty_array(record.get("conversations")).or_else(|| non_empty_array(record.get("messages")))
}

fn non_empty_array(value: Option<&Value>) -> Option<&Vec<Value>> {
    value?.as_array().filter(|turns| !turns.is_empty())
}

fn speaker(turn: &Value) -> Option<&str> {
    first_non_empty_str(turn, &["role", "from"])
}

fn text(turn: &Value) -> Option<String> {
    let text = first_non_empty_str(turn, &["value", "content"])?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn first_non_empty_str<'a>(turn: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| turn.get(*key)?.as_str())
        .find(|s| !s.is_empty())
}
