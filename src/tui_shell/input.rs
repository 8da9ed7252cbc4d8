//! Single-line search input and cursor editing for the file buffer.
//! Cursors are byte offsets kept on char boundaries.

#[derive(Debug, Default)]
pub(super) struct Input {
    pub(super) buf: String,
    pub(super) cursor: usize,
}

impl Input {
    pub(super) fn clear(&mut self) {
        self.buf.clear();
        self.cursor = 0;
    }

    pub(super) fn insert_char(&mut self, c: char) {
        insert_char(&mut self.buf, &mut self.cursor, c);
    }

    pub(super) fn backspace(&mut self) {
        backspace(&mut self.buf, &mut self.cursor);
    }

    pub(super) fn delete(&mut self) {
        if self.cursor < self.buf.len() {
            self.buf.remove(self.cursor);
        }
    }

    pub(super) fn move_left(&mut self) {
        move_left(&self.buf, &mut self.cursor);
    }

    pub(super) fn move_right(&mut self) {
        move_right(&self.buf, &mut self.cursor);
    }

    /// Display column of the cursor.
    pub(super) fn column(&self) -> usize {
        self.buf[..self.cursor].chars().count()
    }
}

pub(super) fn insert_char(buf: &mut String, cursor: &mut usize, c: char) {
    clamp(buf, cursor);
    buf.insert(*cursor, c);
    *cursor += c.len_utf8();
}

pub(super) fn backspace(buf: &mut String, cursor: &mut usize) {
    clamp(buf, cursor);
    if let Some(c) = buf[..*cursor].chars().next_back() {
        *cursor -= c.len_utf8();
        buf.remove(*cursor);
    }
}

pub(super) fn move_left(buf: &str, cursor: &mut usize) {
    if let Some(c) = buf[..(*cursor).min(buf.len())].chars().next_back() {
        *cursor -= c.len_utf8();
    }
}

pub(super) fn move_right(buf: &str, cursor: &mut usize) {
    if let Some(c) = buf.get(*cursor..).and_then(|s| s.chars().next()) {
        *cursor += c.len_utf8();
    }
}

/// (line, column) of the cursor, both zero-based, column in chars.
pub(super) fn line_col(buf: &str, cursor: usize) -> (usize, usize) {
    let before = &buf[..cursor.min(buf.len())];
    let line = before.matches('\n').count();
    let col = before.rsplit('\n').next().unwrap_or("").chars().count();
    (line, col)
}

pub(super) fn move_vertical(buf: &str, cursor: &mut usize, down: bool) {
    let (line, col) = line_col(buf, *cursor);
    let target = if down {
        line + 1
    } else if line == 0 {
        return;
    } else {
        line - 1
    };

    let mut start = 0;
    for (i, l) in buf.split('\n').enumerate() {
        if i == target {
            let offset: usize = l.chars().take(col).map(char::len_utf8).sum();
            *cursor = start + offset;
            return;
        }
        start += l.len() + 1;
    }
}

fn clamp(buf: &str, cursor: &mut usize) {
    *cursor = (*cursor).min(buf.len());
    while !buf.is_char_boundary(*cursor) {
        *cursor -= 1;
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/input_tests.rs"]
mod tests;
