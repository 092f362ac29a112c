#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryCursor {
    #[default]
    Idle,
    Browsing(usize),
}

impl HistoryCursor {
    pub fn is_browsing(self) -> bool {
        matches!(self, Self::Browsing(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionCursor {
    #[default]
    Unselected,
    Selected(usize),
}

impl SuggestionCursor {
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Unselected => None,
            Self::Selected(idx) => Some(idx),
        }
    }
}

/// Keys the command line reacts to beyond plain text editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKey {
    Up,
    Down,
    Tab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    caret: usize,
}

impl TextBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position in chars, `0..=len`.
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.caret = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.caret = 0;
    }

    fn insert_char(&mut self, c: char) {
        let byte_idx = char_to_byte_idx(&self.text, self.caret);
        self.text.insert(byte_idx, c);
        self.caret += 1;
    }

    fn backspace(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        let start = char_to_byte_idx(&self.text, self.caret - 1);
        let end = char_to_byte_idx(&self.text, self.caret);
        self.text.drain(start..end);
        self.caret -= 1;
        true
    }

    fn delete(&mut self) -> bool {
        if self.caret >= self.text.chars().count() {
            return false;
        }
        let start = char_to_byte_idx(&self.text, self.caret);
        let end = char_to_byte_idx(&self.text, self.caret + 1);
        self.text.drain(start..end);
        true
    }

    fn move_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    fn move_right(&mut self) {
        self.caret = (self.caret + 1).min(self.text.chars().count());
    }

    fn move_home(&mut self) {
        self.caret = 0;
    }

    fn move_end(&mut self) {
        self.caret = self.text.chars().count();
    }
}

/// The command input: what the player is typing, what they typed before, and
/// which scene choices match the current text.
///
/// Two small machines live side by side here. History browsing goes
/// `Idle -> Browsing(i)` on Up and back to `Idle` when Down walks off the
/// newest entry, on every typed edit, and on submit. Suggestion browsing goes
/// `Unselected -> Selected(i)` on Up/Down while the list is non-empty and back
/// to `Unselected` whenever the list is recomputed.
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    buffer: TextBuffer,
    conversation: TextBuffer,
    conversation_mode: bool,
    history: Vec<String>,
    history_limit: Option<usize>,
    history_cursor: HistoryCursor,
    choices: Vec<String>,
    suggestions: Vec<String>,
    suggestion_cursor: SuggestionCursor,
}

impl CommandLine {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` entries, dropping the oldest. `0` is treated as
    /// unbounded.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history_limit: (limit > 0).then_some(limit),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    #[cfg(test)]
    pub fn conversation_text(&self) -> &str {
        self.conversation.text()
    }

    pub fn conversation_buffer(&self) -> &TextBuffer {
        &self.conversation
    }

    pub fn is_conversation_mode(&self) -> bool {
        self.conversation_mode
    }

    #[cfg(test)]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    #[cfg(test)]
    pub fn history_cursor(&self) -> HistoryCursor {
        self.history_cursor
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn suggestion_cursor(&self) -> SuggestionCursor {
        self.suggestion_cursor
    }

    /// Replace the primary buffer as if the user had typed `text` in one go.
    #[cfg(test)]
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer.replace(text);
        self.after_primary_edit();
    }

    pub fn set_choices(&mut self, choices: Vec<String>) {
        self.choices = choices;
        self.refresh_suggestions();
    }

    pub fn set_conversation_mode(&mut self, active: bool) {
        self.conversation_mode = active;
    }

    pub fn insert_char(&mut self, c: char) {
        if self.conversation_mode {
            self.conversation.insert_char(c);
            return;
        }
        self.buffer.insert_char(c);
        self.after_primary_edit();
    }

    pub fn backspace(&mut self) {
        if self.conversation_mode {
            self.conversation.backspace();
            return;
        }
        if self.buffer.backspace() {
            self.after_primary_edit();
        }
    }

    pub fn delete(&mut self) {
        if self.conversation_mode {
            self.conversation.delete();
            return;
        }
        if self.buffer.delete() {
            self.after_primary_edit();
        }
    }

    pub fn move_caret_left(&mut self) {
        self.active_buffer_mut().move_left();
    }

    pub fn move_caret_right(&mut self) {
        self.active_buffer_mut().move_right();
    }

    pub fn move_caret_home(&mut self) {
        self.active_buffer_mut().move_home();
    }

    pub fn move_caret_end(&mut self) {
        self.active_buffer_mut().move_end();
    }

    /// Rules are tried top to bottom and the first whose guard holds wins.
    /// Up/Down browse history unless a suggestion dropdown is open and the
    /// user has not already started browsing history.
    pub fn on_key(&mut self, key: LineKey) -> KeyOutcome {
        if self.conversation_mode {
            return KeyOutcome::Ignored;
        }
        match key {
            LineKey::Up if self.history_cursor.is_browsing() || self.suggestions.is_empty() => {
                self.history_back()
            }
            LineKey::Down if self.history_cursor.is_browsing() => self.history_forward(),
            LineKey::Tab if !self.suggestions.is_empty() => {
                let idx = self.suggestion_cursor.index().unwrap_or(0);
                self.accept_suggestion(idx);
                KeyOutcome::Consumed
            }
            LineKey::Down if !self.suggestions.is_empty() => {
                let len = self.suggestions.len();
                let next = match self.suggestion_cursor {
                    SuggestionCursor::Unselected => 0,
                    SuggestionCursor::Selected(idx) => (idx + 1) % len,
                };
                self.suggestion_cursor = SuggestionCursor::Selected(next);
                KeyOutcome::Consumed
            }
            LineKey::Up if !self.suggestions.is_empty() => {
                let len = self.suggestions.len();
                let prev = match self.suggestion_cursor {
                    SuggestionCursor::Unselected => len - 1,
                    SuggestionCursor::Selected(idx) => (idx + len - 1) % len,
                };
                self.suggestion_cursor = SuggestionCursor::Selected(prev);
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Pointer selection of a dropdown entry. Out-of-range picks are ignored.
    pub fn pick_suggestion(&mut self, index: usize) -> bool {
        if index >= self.suggestions.len() {
            return false;
        }
        self.accept_suggestion(index);
        true
    }

    /// Finalize the active buffer. Whitespace-only input is silently dropped.
    pub fn submit(&mut self) -> Option<String> {
        let command = if self.conversation_mode {
            self.conversation.text().trim().to_string()
        } else {
            self.buffer.text().trim().to_string()
        };
        if command.is_empty() {
            return None;
        }

        self.record(command.clone());
        if self.conversation_mode {
            self.conversation.clear();
        } else {
            self.buffer.clear();
            self.suggestions.clear();
            self.suggestion_cursor = SuggestionCursor::Unselected;
        }
        Some(command)
    }

    /// Record a command issued some other way (clicking an action) so it can
    /// be recalled with Up.
    pub fn submit_direct(&mut self, raw_command: &str) -> Option<String> {
        let command = raw_command.trim().to_string();
        if command.is_empty() {
            return None;
        }
        self.record(command.clone());
        Some(command)
    }

    fn record(&mut self, command: String) {
        self.history.push(command);
        if let Some(limit) = self.history_limit
            && self.history.len() > limit
        {
            let overflow = self.history.len() - limit;
            self.history.drain(..overflow);
        }
        self.history_cursor = HistoryCursor::Idle;
    }

    fn history_back(&mut self) -> KeyOutcome {
        if self.history.is_empty() {
            return KeyOutcome::Ignored;
        }
        let idx = match self.history_cursor {
            HistoryCursor::Idle => self.history.len() - 1,
            HistoryCursor::Browsing(idx) => idx.saturating_sub(1),
        };
        self.show_history_entry(idx);
        KeyOutcome::Consumed
    }

    fn history_forward(&mut self) -> KeyOutcome {
        let HistoryCursor::Browsing(idx) = self.history_cursor else {
            return KeyOutcome::Ignored;
        };
        let next = idx + 1;
        if next < self.history.len() {
            self.show_history_entry(next);
        } else {
            self.history_cursor = HistoryCursor::Idle;
            self.buffer.clear();
            self.refresh_suggestions();
        }
        KeyOutcome::Consumed
    }

    fn show_history_entry(&mut self, idx: usize) {
        self.history_cursor = HistoryCursor::Browsing(idx);
        self.buffer.replace(self.history[idx].clone());
        self.refresh_suggestions();
    }

    fn accept_suggestion(&mut self, idx: usize) {
        let chosen = self.suggestions[idx].clone();
        self.buffer.replace(chosen);
        self.history_cursor = HistoryCursor::Idle;
        self.suggestions.clear();
        self.suggestion_cursor = SuggestionCursor::Unselected;
    }

    fn after_primary_edit(&mut self) {
        self.history_cursor = HistoryCursor::Idle;
        self.refresh_suggestions();
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = filter_choices(&self.choices, self.buffer.text());
        self.suggestion_cursor = SuggestionCursor::Unselected;
    }

    fn active_buffer_mut(&mut self) -> &mut TextBuffer {
        if self.conversation_mode {
            &mut self.conversation
        } else {
            &mut self.buffer
        }
    }
}

/// Case-insensitive prefix match, preserving `choices` order.
pub fn filter_choices(choices: &[String], typed: &str) -> Vec<String> {
    if typed.is_empty() {
        return Vec::new();
    }
    let needle = typed.to_lowercase();
    choices
        .iter()
        .filter(|choice| choice.to_lowercase().starts_with(&needle))
        .cloned()
        .collect()
}

fn char_to_byte_idx(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

#[cfg(test)]
#[path = "../tests/unit/command_line_tests.rs"]
mod tests;
