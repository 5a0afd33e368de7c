//! The interactive assistant session.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use earshot_audio::{AudioClip, wav};
use earshot_chat::{Assistant, Responder, RespondRequest};
use earshot_emotion::classify;
use earshot_history::{HistoryLog, Turn};
use earshot_speakerid::{Identification, SpeakerRegistry};
use earshot_speech::{
    EnergyGate, HttpSynthesizer, HttpTranscriber, Synthesizer, Transcriber, TtsError,
    UtteranceSource,
};
use tracing::{debug, info, warn};

use crate::app;
use crate::config::AppConfig;

/// One assistant session: utterances in, replies out, identities and
/// history maintained along the way.
pub struct Session {
    registry: SpeakerRegistry,
    assistant: Assistant,
    history: HistoryLog,
    transcriber: HttpTranscriber,
    synthesizer: Option<HttpSynthesizer>,
    speak_dir: Option<PathBuf>,
    gate: EnergyGate,
    stop_words: Vec<String>,
    history_turns: usize,
    no_prompt: bool,
    greeted: HashSet<String>,
    spoken: usize,
}

impl Session {
    /// Wires every component the loop needs from configuration.
    pub fn open(
        cfg: &AppConfig,
        data_dir: &Path,
        speak_dir: Option<PathBuf>,
        no_prompt: bool,
    ) -> anyhow::Result<Self> {
        let synthesizer = match &speak_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Some(app::build_synthesizer(cfg))
            }
            None => None,
        };
        Ok(Self {
            registry: app::open_registry(cfg, data_dir)?,
            assistant: app::build_assistant(cfg),
            history: app::open_history(data_dir)?,
            transcriber: app::build_transcriber(cfg),
            synthesizer,
            speak_dir,
            gate: EnergyGate::new(cfg.session.energy_threshold),
            stop_words: cfg.session.stop_words.clone(),
            history_turns: cfg.session.history_turns,
            no_prompt,
            greeted: HashSet::new(),
            spoken: 0,
        })
    }

    /// Drains the source, answering each utterance in turn.
    pub fn run(&mut self, source: &mut dyn UtteranceSource) -> anyhow::Result<()> {
        println!("listening...");
        while let Some(clip) = source.next_utterance()? {
            if !self.gate.is_speech(&clip) {
                debug!("clip below energy threshold, skipping");
                continue;
            }

            let heard = match self.transcriber.transcribe(&clip) {
                Ok(text) if text.is_empty() => {
                    debug!("empty transcript, skipping");
                    continue;
                }
                Ok(text) => text,
                Err(e) => {
                    warn!("transcription failed: {e}");
                    continue;
                }
            };
            println!("heard: {heard}");

            if is_stop_phrase(&heard, &self.stop_words) {
                println!("goodbye");
                break;
            }

            let speaker = self.resolve_speaker(&clip)?;
            let mood = classify(&clip);
            println!("mood: {} {}", mood, mood.emoji());

            let recent = match &speaker {
                Some(id) => self.history.recent(id, self.history_turns)?,
                None => Vec::new(),
            };
            let name = speaker.as_deref().unwrap_or("guest");
            let reply = self.assistant.respond(&RespondRequest {
                user_id: name,
                heard: &heard,
                mood,
                recent: &recent,
            })?;
            println!("earshot: {reply}");

            if let Some(id) = &speaker {
                let turn = Turn {
                    user_id: id.clone(),
                    heard: heard.clone(),
                    reply: reply.clone(),
                    ts: 0,
                };
                if let Err(e) = self.history.append(turn) {
                    warn!("history append failed: {e}");
                }
            }

            self.speak(&reply);
        }
        Ok(())
    }

    /// Works out who is talking, enrolling or refreshing on request.
    fn resolve_speaker(&mut self, clip: &AudioClip) -> anyhow::Result<Option<String>> {
        match self.registry.identify(clip)? {
            Identification::Accepted { user_id, distance } => {
                debug!("accepted {user_id} at distance {distance:.3}");
                if self.greeted.insert(user_id.clone()) {
                    println!("welcome back, {user_id}");
                }
                Ok(Some(user_id))
            }
            Identification::Tentative { user_id, distance } => {
                info!("tentative match for {user_id} at distance {distance:.3}");
                let question = format!("you sound a bit like {user_id}. is that you? [y/N] ");
                if self.confirm(&question)? {
                    match self.registry.enroll(&user_id, clip) {
                        Ok(()) => println!("voiceprint refreshed for {user_id}"),
                        Err(e) => warn!("could not refresh voiceprint: {e}"),
                    }
                    Ok(Some(user_id))
                } else {
                    Ok(None)
                }
            }
            Identification::Rejected { distance } => {
                info!("unknown speaker at distance {distance:.3}");
                self.offer_enrollment(clip)
            }
            Identification::NoEnrolledUsers => {
                println!("no voices enrolled yet.");
                self.offer_enrollment(clip)
            }
            Identification::EmbeddingFailure { reason } => {
                warn!("could not extract a voiceprint: {reason}");
                Ok(None)
            }
        }
    }

    fn offer_enrollment(&mut self, clip: &AudioClip) -> anyhow::Result<Option<String>> {
        let Some(name) =
            self.prompt_line("I don't recognize your voice. enroll as (blank to skip): ")?
        else {
            return Ok(None);
        };
        match self.registry.enroll(&name, clip) {
            Ok(()) => {
                println!("nice to meet you, {name}");
                self.greeted.insert(name.clone());
                Ok(Some(name))
            }
            Err(e) => {
                warn!("enrollment failed: {e}");
                Ok(None)
            }
        }
    }

    fn confirm(&self, question: &str) -> anyhow::Result<bool> {
        Ok(matches!(
            self.prompt_line(question)?,
            Some(answer) if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
        ))
    }

    /// Prints the prompt and reads one trimmed line. `None` when the
    /// answer is empty or prompting is disabled.
    fn prompt_line(&self, prompt: &str) -> anyhow::Result<Option<String>> {
        if self.no_prompt {
            return Ok(None);
        }
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let line = line.trim();
        if line.is_empty() {
            Ok(None)
        } else {
            Ok(Some(line.to_string()))
        }
    }

    /// Synthesizes the reply into the speak directory, best effort.
    fn speak(&mut self, reply: &str) {
        let (Some(dir), Some(synth)) = (&self.speak_dir, &self.synthesizer) else {
            return;
        };
        match synth.synthesize(reply) {
            Ok(clip) => {
                self.spoken += 1;
                let path = dir.join(format!("reply-{:04}.wav", self.spoken));
                if let Err(e) = wav::write_file(&path, &clip) {
                    warn!("could not write spoken reply: {e}");
                } else {
                    println!("spoke to {}", path.display());
                }
            }
            Err(TtsError::EmptyText) => debug!("nothing pronounceable to speak"),
            Err(e) => warn!("synthesis failed: {e}"),
        }
    }
}

/// True when the transcript asks to end the session.
fn is_stop_phrase(heard: &str, stop_words: &[String]) -> bool {
    let lowered = heard.to_lowercase();
    stop_words.iter().any(|w| lowered.contains(w.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_phrases() {
        let words = vec![
            "stop".to_string(),
            "goodbye".to_string(),
            "shut down".to_string(),
        ];
        assert!(is_stop_phrase("Goodbye now", &words));
        assert!(is_stop_phrase("please SHUT DOWN", &words));
        assert!(!is_stop_phrase("tell me a story", &words));
    }
}
