//! Weather questions answered directly from OpenWeatherMap.

use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use ureq::Agent;

use crate::error::ChatError;

/// Configuration for [`WeatherClient`].
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Base URL of the API, e.g. `https://api.openweathermap.org`.
    pub base_url: String,
    pub api_key: String,
    /// City used when the question names none.
    pub default_city: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org".to_string(),
            api_key: String::new(),
            default_city: "Chandigarh".to_string(),
            timeout_secs: 10,
        }
    }
}

/// True if the utterance is asking about the weather.
pub fn is_weather_question(text: &str) -> bool {
    text.to_lowercase().contains("weather")
}

/// Pulls the city out of "... weather ... in <city>" questions.
pub fn city_in_question(text: &str) -> Option<String> {
    let re = Regex::new(r"weather.*in ([a-z\s]+)").unwrap();
    let lowered = text.to_lowercase();
    let caps = re.captures(&lowered)?;
    let city = clean_city_name(&caps[1]);
    if city.is_empty() { None } else { Some(city) }
}

/// Normalizes a captured city: drop filler words and punctuation,
/// collapse whitespace, Title Case.
fn clean_city_name(raw: &str) -> String {
    let mut s = raw.to_lowercase();
    s = s.replace("today", "");
    s.retain(|c| c.is_ascii_alphabetic() || c == ' ');
    for filler in ["weather in", "how is", "hows", "whats"] {
        s = s.replace(filler, "");
    }
    s.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[derive(Deserialize)]
struct WeatherReply {
    main: WeatherMain,
    weather: Vec<WeatherCondition>,
}

#[derive(Deserialize)]
struct WeatherMain {
    temp: f32,
}

#[derive(Deserialize)]
struct WeatherCondition {
    description: String,
}

/// Current-weather lookups, phrased as a spoken one-liner.
pub struct WeatherClient {
    cfg: WeatherConfig,
    agent: Agent,
}

impl WeatherClient {
    pub fn new(cfg: WeatherConfig) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(cfg.timeout_secs)))
            .build();
        Self {
            cfg,
            agent: config.into(),
        }
    }

    /// Answers a weather question.
    pub fn report(&self, question: &str) -> Result<String, ChatError> {
        let city =
            city_in_question(question).unwrap_or_else(|| self.cfg.default_city.clone());
        debug!("weather lookup for {city}");

        let url = format!(
            "{}/data/2.5/weather",
            self.cfg.base_url.trim_end_matches('/')
        );
        let mut res = self
            .agent
            .get(&url)
            .query("q", &city)
            .query("appid", &self.cfg.api_key)
            .query("units", "metric")
            .call()
            .map_err(|e| ChatError::Http(e.to_string()))?;

        let reply: WeatherReply = res
            .body_mut()
            .read_json()
            .map_err(|e| ChatError::BadResponse(e.to_string()))?;
        let description = reply
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| ChatError::BadResponse("no weather conditions".to_string()))?;

        Ok(format!(
            "The weather in {city} is currently {}\u{b0}C with {description}.",
            reply.main.temp
        ))
    }
}

#[cfg(test)]
mod weather_tests {
    use super::*;
    use crate::testserver::{ok_response, serve_once};

    #[test]
    fn test_is_weather_question() {
        assert!(is_weather_question("What's the Weather in Paris?"));
        assert!(!is_weather_question("tell me a story"));
    }

    #[test]
    fn test_city_extraction() {
        assert_eq!(
            city_in_question("What's the weather in New York today?"),
            Some("New York".to_string())
        );
        assert_eq!(
            city_in_question("how is the weather in paris"),
            Some("Paris".to_string())
        );
        // Weather question with no city.
        assert_eq!(city_in_question("what's the weather like"), None);
        assert_eq!(city_in_question("tell me a story"), None);
    }

    #[test]
    fn test_report_round_trip() {
        let body = b"{\"main\":{\"temp\":21.5},\"weather\":[{\"description\":\"clear sky\"}]}";
        let (base_url, server) = serve_once(ok_response("application/json", body));

        let client = WeatherClient::new(WeatherConfig {
            base_url,
            api_key: "k".to_string(),
            timeout_secs: 5,
            ..Default::default()
        });
        let sentence = client.report("what's the weather in new york").unwrap();
        assert_eq!(
            sentence,
            "The weather in New York is currently 21.5\u{b0}C with clear sky."
        );

        let request = server.join().unwrap();
        let head = String::from_utf8_lossy(&request);
        assert!(head.contains("GET /data/2.5/weather?"));
        assert!(head.contains("q=New"));
        assert!(head.contains("units=metric"));
    }

    #[test]
    fn test_report_uses_default_city() {
        let body = b"{\"main\":{\"temp\":30},\"weather\":[{\"description\":\"haze\"}]}";
        let (base_url, server) = serve_once(ok_response("application/json", body));

        let client = WeatherClient::new(WeatherConfig {
            base_url,
            api_key: "k".to_string(),
            timeout_secs: 5,
            ..Default::default()
        });
        let sentence = client.report("weather please").unwrap();
        assert!(sentence.starts_with("The weather in Chandigarh"));

        let request = server.join().unwrap();
        assert!(String::from_utf8_lossy(&request).contains("q=Chandigarh"));
    }

    #[test]
    fn test_report_bad_reply_is_an_error() {
        let (base_url, server) = serve_once(ok_response("application/json", b"{}"));
        let client = WeatherClient::new(WeatherConfig {
            base_url,
            timeout_secs: 5,
            ..Default::default()
        });
        assert!(client.report("weather in paris").is_err());
        server.join().unwrap();
    }
}
