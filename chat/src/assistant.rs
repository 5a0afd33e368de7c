//! The reply seam and its top-level composition.

use earshot_emotion::Mood;
use earshot_history::Turn;
use tracing::warn;

use crate::error::ChatError;
use crate::weather::{WeatherClient, is_weather_question};

const MODEL_FALLBACK: &str = "Sorry, I couldn't generate a response.";
const WEATHER_FALLBACK: &str = "Sorry, I couldn't fetch the weather right now.";

/// Everything the assistant knows about one utterance.
#[derive(Debug, Clone)]
pub struct RespondRequest<'a> {
    pub user_id: &'a str,
    /// What the transcriber heard.
    pub heard: &'a str,
    pub mood: Mood,
    /// Recent turns with this user, oldest first.
    pub recent: &'a [Turn],
}

/// Interface for generating a spoken reply.
pub trait Responder: Send + Sync {
    fn respond(&self, req: &RespondRequest<'_>) -> Result<String, ChatError>;
}

/// The assistant's reply policy: weather questions go straight to the
/// weather service, everything else to the chat model, and failures
/// degrade to a spoken apology instead of an error.
pub struct Assistant {
    model: Box<dyn Responder>,
    weather: Option<WeatherClient>,
}

impl Assistant {
    pub fn new(model: Box<dyn Responder>) -> Self {
        Self {
            model,
            weather: None,
        }
    }

    pub fn with_weather(mut self, weather: WeatherClient) -> Self {
        self.weather = Some(weather);
        self
    }
}

impl Responder for Assistant {
    fn respond(&self, req: &RespondRequest<'_>) -> Result<String, ChatError> {
        if let Some(weather) = &self.weather {
            if is_weather_question(req.heard) {
                return Ok(match weather.report(req.heard) {
                    Ok(sentence) => sentence,
                    Err(e) => {
                        warn!("weather lookup failed: {e}");
                        WEATHER_FALLBACK.to_string()
                    }
                });
            }
        }

        match self.model.respond(req) {
            Ok(reply) => Ok(reply),
            Err(e) => {
                warn!("chat model failed: {e}");
                Ok(MODEL_FALLBACK.to_string())
            }
        }
    }
}
