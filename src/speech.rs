//! Reads titles aloud through an external speech program.
//!
//! The program is called as `<program> -v <voice> <text>`, which both
//! macOS `say` and espeak understand, and the cycle waits for it to exit.

use std::process::Command;

use tracing::debug;

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::post::PostRecord;
use crate::title::{self, Gender};

pub trait Narrator {
    fn narrate(&self, post: &PostRecord) -> Result<(), SpeechError>;
}

/// Narrator used when speech is turned off
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Narrator for Silent {
    fn narrate(&self, _post: &PostRecord) -> Result<(), SpeechError> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SpeechCommand {
    program: String,
    male_voice: String,
    female_voice: String,
}

impl SpeechCommand {
    pub fn new(config: &SpeechConfig) -> Self {
        SpeechCommand {
            program: config.program.clone(),
            male_voice: config.male_voice.clone(),
            female_voice: config.female_voice.clone(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Voice and text for a post. Posters tagged male get the male voice,
    /// everyone else the female one.
    pub fn utterance(&self, post: &PostRecord) -> (&str, String) {
        let voice = match title::op_gender(&post.title) {
            Some(Gender::Male) => self.male_voice.as_str(),
            _ => self.female_voice.as_str(),
        };

        (voice, title::spoken_text(&post.title))
    }
}

impl Narrator for SpeechCommand {
    fn narrate(&self, post: &PostRecord) -> Result<(), SpeechError> {
        let (voice, text) = self.utterance(post);
        debug!(program = %self.program, voice, "speaking title");

        let status = Command::new(&self.program)
            .arg("-v")
            .arg(voice)
            .arg(&text)
            .status()?;

        if !status.success() {
            return Err(SpeechError::Exit { code: status.code() });
        }

        Ok(())
    }
}

/// Either narrator, picked from config at startup.
#[derive(Debug, Clone)]
pub enum Voice {
    Silent(Silent),
    Command(SpeechCommand),
}

impl Voice {
    pub fn from_config(config: &SpeechConfig) -> Self {
        if config.enabled {
            Voice::Command(SpeechCommand::new(config))
        } else {
            Voice::Silent(Silent)
        }
    }
}

impl Narrator for Voice {
    fn narrate(&self, post: &PostRecord) -> Result<(), SpeechError> {
        match self {
            Voice::Silent(n) => n.narrate(post),
            Voice::Command(n) => n.narrate(post),
        }
    }
}
