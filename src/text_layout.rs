/// Word-wraps `text` to `width` columns. Words longer than a line are broken
/// mid-word; explicit newlines always start a new line.
pub fn wrap_lines(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, width, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, width: u16, out: &mut Vec<String>) {
    let chars: Vec<char> = paragraph.chars().collect();
    let mut line = String::new();
    let mut col = 0u16;
    let mut at_wrap = false;

    for (idx, ch) in chars.iter().copied().enumerate() {
        if should_wrap_before_word(&chars, idx, col, width) || col >= width {
            out.push(std::mem::take(&mut line).trim_end().to_string());
            col = 0;
            at_wrap = true;
        }
        if at_wrap && ch.is_whitespace() {
            continue;
        }
        at_wrap = false;
        line.push(ch);
        col = col.saturating_add(1);
    }
    out.push(line.trim_end().to_string());
}

fn should_wrap_before_word(chars: &[char], idx: usize, col: u16, width: u16) -> bool {
    if col == 0 {
        return false;
    }
    let ch = chars[idx];
    if ch.is_whitespace() {
        return false;
    }
    if idx > 0 && !chars[idx - 1].is_whitespace() {
        return false;
    }

    let word_len = chars[idx..]
        .iter()
        .take_while(|c| !c.is_whitespace())
        .count() as u16;

    word_len <= width && col.saturating_add(word_len) > width
}
