//! Persona prompt rendering.

use minijinja::{Environment, context};

use crate::assistant::RespondRequest;
use crate::error::ChatError;

/// Default system prompt for the chat model.
pub const PERSONA_TEMPLATE: &str = r#"You are {{ persona }}, a helpful and emotionally aware voice assistant.

You are talking to {{ user_id }}. They sound {{ mood }} right now.
- If they are sad, be comforting.
- If they are angry, be calm and supportive.
- If they are happy, match the excitement.
- If they are neutral, be clear and kind.
{%- if recent %}

Recent conversation:
{%- for turn in recent %}
- they said: {{ turn.heard }}
  you said: {{ turn.reply }}
{%- endfor %}
{%- endif %}

Respond in one or two short, emotionally aware sentences."#;

/// Render the system prompt for one request.
pub fn render_prompt(
    template: &str,
    persona: &str,
    req: &RespondRequest<'_>,
) -> Result<String, ChatError> {
    let mut env = Environment::new();
    env.add_template("persona", template)
        .map_err(|e| ChatError::Template(e.to_string()))?;

    let tmpl = env
        .get_template("persona")
        .map_err(|e| ChatError::Template(e.to_string()))?;
    tmpl.render(context! {
        persona => persona,
        user_id => req.user_id,
        mood => req.mood.as_str(),
        recent => req.recent,
    })
    .map_err(|e| ChatError::Template(e.to_string()))
}

#[cfg(test)]
mod prompt_tests {
    use super::*;
    use earshot_emotion::Mood;
    use earshot_history::Turn;

    #[test]
    fn test_render_without_history() {
        let req = RespondRequest {
            user_id: "alice",
            heard: "hello",
            mood: Mood::Happy,
            recent: &[],
        };

        let result = render_prompt(PERSONA_TEMPLATE, "Earshot", &req).unwrap();
        assert!(result.contains("You are Earshot,"));
        assert!(result.contains("talking to alice"));
        assert!(result.contains("sound happy"));
        // No history section when empty.
        assert!(!result.contains("Recent conversation"));
    }

    #[test]
    fn test_render_with_history() {
        let recent = vec![
            Turn {
                user_id: "alice".to_string(),
                heard: "good morning".to_string(),
                reply: "Morning! How did you sleep?".to_string(),
                ts: 1,
            },
            Turn {
                user_id: "alice".to_string(),
                heard: "pretty well".to_string(),
                reply: "Glad to hear it.".to_string(),
                ts: 2,
            },
        ];
        let req = RespondRequest {
            user_id: "alice",
            heard: "what's next",
            mood: Mood::Neutral,
            recent: &recent,
        };

        let result = render_prompt(PERSONA_TEMPLATE, "Earshot", &req).unwrap();
        assert!(result.contains("Recent conversation:"));
        assert!(result.contains("they said: good morning"));
        assert!(result.contains("you said: Glad to hear it."));
    }

    #[test]
    fn test_custom_template() {
        let req = RespondRequest {
            user_id: "bob",
            heard: "hi",
            mood: Mood::Sad,
            recent: &[],
        };

        let result = render_prompt("{{ persona }}: {{ user_id }} is {{ mood }}", "Echo", &req).unwrap();
        assert_eq!(result, "Echo: bob is sad");
    }

    #[test]
    fn test_bad_template_is_an_error() {
        let req = RespondRequest {
            user_id: "bob",
            heard: "hi",
            mood: Mood::Sad,
            recent: &[],
        };

        let err = render_prompt("{% if %}", "Earshot", &req).unwrap_err();
        assert!(matches!(err, ChatError::Template(_)));
    }
}
