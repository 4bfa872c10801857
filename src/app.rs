use anyhow::{bail, Result};
use ratatui::widgets::ListState;

use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::prompt::{build_prompt, BOARD_TYPES, PROJECT_TYPES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Boards,
    Projects,
    Chat,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// All session state. Created once at startup, owned by the event loop,
/// discarded on exit. Nothing here survives the process.
pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Selector state over the fixed option sets
    pub board_state: ListState,
    pub project_state: ListState,

    // Free-text requirement being edited (char-indexed cursor)
    pub input: String,
    pub cursor: usize,

    // Conversation transcript, append-only within a session
    pub transcript: Vec<ChatMessage>,

    // In-flight completion; at most one per session
    pub loading: bool,
    pub query_task: Option<tokio::task::JoinHandle<Result<String>>>,

    // Last failed request, shown inline until the next submit or clear
    pub last_error: Option<String>,

    // Chat viewport (updated during render, drives scrolling)
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    pub animation_frame: u8,

    pub gemini: GeminiClient,
}

impl App {
    /// Fails when no API key is available, before any terminal setup.
    pub fn new(config: &Config) -> Result<Self> {
        let Some(api_key) = config.api_key() else {
            bail!(
                "no Gemini API key found: set the GEMINI_API_KEY environment variable \
                 or add \"gemini_api_key\" to the settings file"
            );
        };

        let mut gemini = GeminiClient::new(&api_key);
        if let Some(model) = &config.model {
            gemini = gemini.with_model(model);
        }

        let mut board_state = ListState::default();
        board_state.select(Some(0));
        let mut project_state = ListState::default();
        project_state.select(Some(0));

        Ok(Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: FocusPane::Input,

            board_state,
            project_state,

            input: String::new(),
            cursor: 0,

            transcript: Vec::new(),

            loading: false,
            query_task: None,

            last_error: None,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,

            gemini,
        })
    }

    pub fn selected_board(&self) -> &'static str {
        BOARD_TYPES[self.board_state.selected().unwrap_or(0).min(BOARD_TYPES.len() - 1)]
    }

    pub fn selected_project(&self) -> &'static str {
        PROJECT_TYPES[self
            .project_state
            .selected()
            .unwrap_or(0)
            .min(PROJECT_TYPES.len() - 1)]
    }

    /// First half of a submit: record the user entry and produce the prompt
    /// to send. Returns `None` (and changes nothing) when the trimmed input
    /// is empty or a completion is already in flight.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.loading {
            return None;
        }

        let request = self.input.trim().to_string();
        if request.is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(request.clone()));

        let prompt = build_prompt(self.selected_board(), self.selected_project(), &request);

        self.input.clear();
        self.cursor = 0;
        self.last_error = None;
        self.loading = true;
        self.scroll_chat_to_bottom();

        Some(prompt)
    }

    /// Second half of a submit: fold the completion result back into the
    /// session. Success appends the assistant entry; failure keeps the
    /// transcript as-is and surfaces the message.
    pub fn apply_completion(&mut self, result: Result<String>) {
        self.loading = false;
        match result {
            Ok(text) => {
                self.transcript.push(ChatMessage::assistant(text));
                self.scroll_chat_to_bottom();
            }
            Err(e) => {
                self.last_error = Some(format!("{e:#}"));
            }
        }
    }

    /// Reap the spawned completion task once it finishes. Called on every
    /// tick; a no-op while the call is still in flight.
    pub async fn poll_completion(&mut self) {
        let finished = self
            .query_task
            .as_ref()
            .map(|t| t.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.query_task.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(anyhow::anyhow!("completion task failed: {e}")),
            };
            self.apply_completion(result);
        }
    }

    /// Empty the transcript. Selections are deliberately left alone.
    pub fn clear_history(&mut self) {
        self.transcript.clear();
        self.chat_scroll = 0;
        self.last_error = None;
    }

    // Selector movement

    pub fn select_next(&mut self) {
        match self.focus {
            FocusPane::Boards => Self::list_next(&mut self.board_state, BOARD_TYPES.len()),
            FocusPane::Projects => Self::list_next(&mut self.project_state, PROJECT_TYPES.len()),
            _ => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            FocusPane::Boards => Self::list_prev(&mut self.board_state),
            FocusPane::Projects => Self::list_prev(&mut self.project_state),
            _ => {}
        }
    }

    fn list_next(state: &mut ListState, len: usize) {
        let i = state.selected().unwrap_or(0);
        state.select(Some((i + 1).min(len - 1)));
    }

    fn list_prev(state: &mut ListState) {
        let i = state.selected().unwrap_or(0);
        state.select(Some(i.saturating_sub(1)));
    }

    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Boards => FocusPane::Projects,
            FocusPane::Projects => FocusPane::Chat,
            FocusPane::Chat => FocusPane::Input,
            FocusPane::Input => FocusPane::Boards,
        };
    }

    // Chat scrolling

    pub fn scroll_chat_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_chat_down(&mut self) {
        let max = self.total_chat_lines().saturating_sub(self.chat_height);
        self.chat_scroll = self.chat_scroll.saturating_add(1).min(max);
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_scroll = self.total_chat_lines().saturating_sub(self.chat_height);
    }

    /// Estimate of the rendered transcript height, counting wrapped lines at
    /// the current chat width. Used to clamp scrolling.
    fn total_chat_lines(&self) -> u16 {
        let width = self.chat_width.max(1) as usize;
        let mut total = 0usize;

        for msg in &self.transcript {
            // Role label line plus a blank separator
            total += 2;
            for line in msg.content.lines() {
                let chars = line.chars().count();
                total += if chars == 0 { 1 } else { chars.div_ceil(width) };
            }
        }
        if self.loading {
            total += 2;
        }

        total.min(u16::MAX as usize) as u16
    }

    pub fn tick_animation(&mut self) {
        if self.loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}
