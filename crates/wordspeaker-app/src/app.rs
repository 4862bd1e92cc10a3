//! The interactive session: owns every subsystem and executes commands.
//!
//! All methods run on the binary's event loop. Output for the user goes to
//! the writer passed in; problems are queued as [`Notice`]s and flushed by
//! [`App::write_notices`].

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use wordspeaker_core::config::{expand_home, WordSpeakerConfig};
use wordspeaker_core::error::WordSpeakerError;
use wordspeaker_core::events::{Notice, NoticeCategory};
use wordspeaker_core::types::{Generation, PlaybackStatus, WordList};
use wordspeaker_dictation::{render, DictationChecker, DictationError, Palette, SentenceGenerator, SentenceLevel};
use wordspeaker_playback::{PlaybackError, PlaybackScheduler, PlaybackSettings, Ticker};
use wordspeaker_speech::{Speaker, SpeechEvent, SpeechGateway, UtteranceId};
use wordspeaker_store::{StoreError, WordStore};

use crate::commands::{self, Command, HELP};

/// Whether the REPL keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    store: WordStore,
    scheduler: PlaybackScheduler,
    gateway: Arc<SpeechGateway>,
    checker: DictationChecker,
    sentences: SentenceGenerator,
    palette: Palette,
    /// Utterance started by `say`, outside playback.
    adhoc: Option<UtteranceId>,
    notices: Vec<Notice>,
}

impl App {
    pub fn new(config: &WordSpeakerConfig, gateway: Arc<SpeechGateway>, ticker: Box<dyn Ticker>) -> Self {
        let speaker: Arc<dyn Speaker> = gateway.clone();
        let scheduler = PlaybackScheduler::new(speaker, ticker, PlaybackSettings::from_config(config));

        let mut notices = Vec::new();
        if !gateway.is_available() {
            warn!(engine = gateway.engine_name(), "Speech engine not found");
            notices.push(Notice::warning(
                NoticeCategory::Speech,
                format!(
                    "Speech engine '{}' not found; words will not be heard.",
                    gateway.engine_name()
                ),
            ));
        }

        Self {
            store: WordStore::from_config(config),
            scheduler,
            gateway,
            checker: DictationChecker::new(config.dictation.style),
            sentences: SentenceGenerator::new(),
            palette: if config.dictation.color {
                Palette::Ansi
            } else {
                Palette::Plain
            },
            adhoc: None,
            notices,
        }
    }

    /// Use a fixed seed for example sentences.
    pub fn with_sentences(mut self, sentences: SentenceGenerator) -> Self {
        self.sentences = sentences;
        self
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    pub fn store(&self) -> &WordStore {
        &self.store
    }

    /// Short progress line that does not reveal the word.
    pub fn progress(&self) -> String {
        let snapshot = self.scheduler.snapshot();
        match (snapshot.status, snapshot.position) {
            (PlaybackStatus::Playing, Some(p)) => format!("Playing word {}/{}", p + 1, snapshot.queue_len),
            (PlaybackStatus::Paused, Some(p)) => format!("Paused at word {}/{}", p + 1, snapshot.queue_len),
            _ if snapshot.completed => "Completed".to_string(),
            _ => "Stopped".to_string(),
        }
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Import a word list; `~` is expanded. Replaces the scheduler's words.
    pub fn import<W: Write>(&mut self, path: &Path, out: &mut W) -> io::Result<()> {
        let loaded = self.store.load(&expand_home(&path.to_string_lossy()));
        self.after_import(loaded, out)
    }

    /// Parse and execute one line. Parse errors become notices.
    pub async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        match commands::parse(line) {
            Ok(Some(command)) => self.execute(command, out).await,
            Ok(None) => Ok(Flow::Continue),
            Err(e) => {
                self.notices.push(user_notice(e));
                Ok(Flow::Continue)
            }
        }
    }

    pub async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<Flow> {
        debug!(?command, "Executing command");
        match command {
            Command::Import(path) => self.import(&path, out)?,
            Command::List => self.write_words(out)?,
            Command::History => self.write_history(out)?,
            Command::Open(n) => {
                let loaded = self.store.open_history(n - 1);
                self.after_import(loaded, out)?;
            }
            Command::Start => self.transport(|s| s.start(), out)?,
            Command::Pause => self.transport(|s| s.pause(), out)?,
            Command::Resume => self.transport(|s| s.resume(), out)?,
            Command::Toggle => self.transport(|s| s.toggle(), out)?,
            Command::Stop => {
                self.scheduler.stop();
                writeln!(out, "{}", self.progress())?;
            }
            Command::Next => self.transport(|s| s.advance(), out)?,
            Command::Jump(n) => self.transport(|s| s.jump_to(n - 1), out)?,
            Command::Replay => self.transport(|s| s.replay(), out)?,
            Command::Say(text) => {
                self.adhoc = Some(self.gateway.speak(&text, self.scheduler.settings().volume));
            }
            Command::Order(order) => {
                self.scheduler.set_order(order);
                writeln!(out, "Order: {}", order)?;
            }
            Command::Loop(loop_mode) => {
                self.scheduler.set_loop(loop_mode);
                writeln!(out, "Loop: {}", loop_mode)?;
            }
            Command::Auto(enabled) => {
                self.scheduler.set_auto_advance(enabled);
                writeln!(out, "Auto advance: {}", on_off(enabled))?;
            }
            Command::Manual(allowed) => {
                self.scheduler.set_allow_manual_while_paused(allowed);
                writeln!(out, "Manual next while paused: {}", on_off(allowed))?;
            }
            Command::Interval(interval) => {
                self.scheduler.set_interval(interval);
                writeln!(out, "Interval: {:.1}s", interval.secs())?;
            }
            Command::Volume(volume) => {
                self.scheduler.set_volume(volume);
                writeln!(out, "Volume: {}%", volume.percent())?;
            }
            Command::Voices => self.write_voices(out).await?,
            Command::Voice(voice) => {
                match &voice {
                    Some(id) => writeln!(out, "Voice: {}", id)?,
                    None => writeln!(out, "Voice: default")?,
                }
                self.gateway.set_voice(voice);
            }
            Command::Style(style) => {
                self.checker.set_style(style);
                writeln!(out, "Dictation style: {}", style)?;
            }
            Command::Check(answer) => self.check_answer(&answer, out)?,
            Command::Examples { count, level } => self.write_examples(count, level, out)?,
            Command::Stats(n) => self.write_stats(n, out)?,
            Command::Status => {
                let settings = self.scheduler.settings();
                writeln!(out, "{}", self.scheduler.status_line())?;
                writeln!(
                    out,
                    "{} | {} | auto {} | {:.1}s | volume {}% | {}",
                    settings.order,
                    settings.loop_mode,
                    on_off(settings.auto_advance),
                    settings.interval.secs(),
                    settings.volume.percent(),
                    self.checker.style(),
                )?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => {
                self.shutdown();
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    // -------------------------------------------------------------------------
    // Asynchronous results
    // -------------------------------------------------------------------------

    /// Feed a fired timer to the scheduler. Returns a progress line when
    /// playback moved on.
    pub fn on_timer(&mut self, generation: Generation) -> Option<String> {
        let before = self.scheduler.generation();
        self.scheduler.on_timer(generation);
        (self.scheduler.generation() != before && self.scheduler.status() == PlaybackStatus::Playing)
            .then(|| self.progress())
    }

    pub fn on_speech_event(&mut self, event: &SpeechEvent) {
        if self.adhoc == Some(event.id()) {
            self.adhoc = None;
            if let SpeechEvent::Failed { message, .. } = event {
                warn!(error = %message, "Speech failed");
                self.notices.push(Notice::error(
                    NoticeCategory::Speech,
                    format!("Error: {}", message),
                ));
            }
            return;
        }
        self.scheduler.on_speech_event(event);
    }

    /// Every notice raised since the last call, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut notices = std::mem::take(&mut self.notices);
        notices.extend(self.store.take_notices());
        notices.extend(self.scheduler.take_notices());
        notices
    }

    pub fn write_notices<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for notice in self.drain_notices() {
            writeln!(out, "{}", notice)?;
        }
        Ok(())
    }

    /// Stop playback and silence the engine.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
        self.gateway.cancel();
        info!("Session ended");
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn after_import<W: Write>(
        &mut self,
        loaded: Result<WordList, StoreError>,
        out: &mut W,
    ) -> io::Result<()> {
        match loaded {
            Ok(words) => {
                let count = words.len();
                self.scheduler.replace_words(words);
                let name = self
                    .store
                    .history()
                    .first()
                    .map(|e| e.name.clone())
                    .unwrap_or_default();
                writeln!(out, "Imported {} words from {}.", count, name)?;
            }
            Err(e) => {
                debug!(error = %e, "Import failed");
                self.notices.push(e.notice());
            }
        }
        Ok(())
    }

    fn transport<W, F>(&mut self, action: F, out: &mut W) -> io::Result<()>
    where
        W: Write,
        F: FnOnce(&mut PlaybackScheduler) -> Result<(), PlaybackError>,
    {
        match action(&mut self.scheduler) {
            Ok(()) => writeln!(out, "{}", self.progress()),
            Err(e) => {
                self.notices.push(e.notice());
                Ok(())
            }
        }
    }

    fn write_words<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let words = self.scheduler.words();
        if words.is_empty() {
            self.notices.push(PlaybackError::EmptyWordList.notice());
            return Ok(());
        }
        let current = self.scheduler.current_index();
        for (i, word) in words.iter().enumerate() {
            let marker = if current == Some(i) { '>' } else { ' ' };
            writeln!(out, "{}{:>4}. {}", marker, i + 1, word)?;
        }
        Ok(())
    }

    fn write_history<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let entries = self.store.history();
        if entries.is_empty() {
            writeln!(out, "No history yet.")?;
        }
        for (i, entry) in entries.iter().enumerate() {
            writeln!(
                out,
                "{:>4}. {}  ({})  {}",
                i + 1,
                entry.name,
                entry.display_time(),
                entry.path.display()
            )?;
        }
        Ok(())
    }

    async fn write_voices<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.gateway.list_voices().await {
            Ok(voices) if voices.is_empty() => writeln!(out, "No voices reported by {}.", self.gateway.engine_name())?,
            Ok(voices) => {
                let selected = self.gateway.voice();
                for voice in voices {
                    let marker = if selected.as_ref() == Some(&voice.id) { '>' } else { ' ' };
                    writeln!(
                        out,
                        "{}{:<16} {:<24} {:<12} {:?}",
                        marker,
                        voice.id.to_string(),
                        voice.name,
                        voice.languages.join(","),
                        voice.gender
                    )?;
                }
            }
            Err(e) => {
                warn!(error = %e, "Voice enumeration failed");
                self.notices
                    .push(Notice::error(NoticeCategory::Speech, format!("Error: {}", e)));
            }
        }
        Ok(())
    }

    fn check_answer<W: Write>(&mut self, answer: &str, out: &mut W) -> io::Result<()> {
        match self.checker.check(self.scheduler.current_word(), answer) {
            Ok(result) => {
                writeln!(out, "{}", render(&result, self.palette))?;
                if result.is_correct() {
                    writeln!(out, "Correct!")?;
                } else {
                    writeln!(out, "Accuracy: {:.0}%", result.accuracy() * 100.0)?;
                }
            }
            Err(e) => self.notices.push(e.notice()),
        }
        Ok(())
    }

    fn write_examples<W: Write>(
        &mut self,
        count: usize,
        level: Option<SentenceLevel>,
        out: &mut W,
    ) -> io::Result<()> {
        let Some(word) = self.scheduler.current_word() else {
            self.notices.push(DictationError::NoCurrentWord.notice());
            return Ok(());
        };
        let word = word.to_string();
        let levels = match level {
            Some(level) => vec![level],
            None => SentenceLevel::ALL.to_vec(),
        };
        for sentence in self.sentences.generate_many(&word, count, &levels) {
            writeln!(out, "  {}", sentence)?;
        }
        Ok(())
    }

    fn write_stats<W: Write>(&mut self, n: usize, out: &mut W) -> io::Result<()> {
        let Some(stats) = self.store.stats() else {
            writeln!(out, "Frequency tracking is off.")?;
            return Ok(());
        };
        if stats.is_empty() {
            writeln!(out, "No statistics yet.")?;
        }
        for (token, count) in stats.top(n) {
            writeln!(out, "{:>6}  {}", count, token)?;
        }
        Ok(())
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn user_notice(err: WordSpeakerError) -> Notice {
    match err {
        WordSpeakerError::Validation(message) => Notice::info(NoticeCategory::UserInput, message),
        other => Notice::info(NoticeCategory::UserInput, other.to_string()),
    }
}
