//! Reply generation for the assistant.
//!
//! The seam is [`Responder`]: given what was heard, who said it, how
//! they sound and the recent conversation, produce a short spoken
//! reply. [`ChatModel`] renders the persona prompt and calls an
//! OpenAI-compatible chat-completions endpoint; [`Assistant`] layers
//! the reply policy on top: weather questions go to
//! [`WeatherClient`], and any failure degrades to a spoken apology.

mod assistant;
mod error;
mod openai;
mod prompt;
mod weather;

#[cfg(test)]
mod testserver;

pub use assistant::{Assistant, Responder, RespondRequest};
pub use error::ChatError;
pub use openai::{ChatConfig, ChatModel};
pub use prompt::{PERSONA_TEMPLATE, render_prompt};
pub use weather::{WeatherClient, WeatherConfig, city_in_question, is_weather_question};
