use std::time::Duration;

/// Reveals text one character at a time as wall-clock time is fed in.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    total_chars: usize,
    revealed_chars: usize,
    per_char: Duration,
    carry: Duration,
}

impl Typewriter {
    pub fn new(per_char: Duration) -> Self {
        Self {
            text: String::new(),
            total_chars: 0,
            revealed_chars: 0,
            per_char,
            carry: Duration::ZERO,
        }
    }

    /// Starts over only when the text actually changes, so re-fetching the
    /// same scene does not replay the animation.
    pub fn set_text(&mut self, text: &str) {
        if self.text == text {
            return;
        }
        self.text = text.to_string();
        self.total_chars = text.chars().count();
        self.revealed_chars = 0;
        self.carry = Duration::ZERO;
        if self.per_char.is_zero() {
            self.finish();
        }
    }

    pub fn advance(&mut self, elapsed: Duration) {
        if self.is_done() {
            return;
        }
        if self.per_char.is_zero() {
            self.finish();
            return;
        }
        self.carry += elapsed;
        let steps = (self.carry.as_nanos() / self.per_char.as_nanos()) as usize;
        if steps == 0 {
            return;
        }
        self.carry -= self.per_char * steps as u32;
        self.revealed_chars = (self.revealed_chars + steps).min(self.total_chars);
    }

    pub fn finish(&mut self) {
        self.revealed_chars = self.total_chars;
        self.carry = Duration::ZERO;
    }

    pub fn is_done(&self) -> bool {
        self.revealed_chars >= self.total_chars
    }

    pub fn visible(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.revealed_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len());
        &self.text[..end]
    }
}
