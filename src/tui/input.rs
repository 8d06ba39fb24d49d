use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Editable text with a byte-offset cursor (always on a char boundary)
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub text: String,
    pub cursor_pos: usize,
}

impl TextInput {
    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor_pos, s);
        self.cursor_pos += s.len();
    }

    /// Returns false when there was nothing to delete
    pub fn backspace(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        let prev = self.prev_boundary();
        self.text.remove(prev);
        self.cursor_pos = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor_pos >= self.text.len() {
            return false;
        }
        self.text.remove(self.cursor_pos);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor_pos = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        if self.cursor_pos < self.text.len() {
            self.cursor_pos = self.text[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.text.len());
        }
    }

    pub fn home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn end(&mut self) {
        self.cursor_pos = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_pos = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Display column of the cursor on a single unwrapped line
    pub fn cursor_column(&self) -> u16 {
        saturate(self.text[..self.cursor_pos].width())
    }

    /// Break the text into display rows of at most `width` columns, splitting
    /// on newlines and mid-word. Also returns the cursor's (column, row).
    pub fn wrap(&self, width: u16) -> (Vec<String>, (u16, u16)) {
        let width = width.max(1) as usize;
        let mut rows = vec![String::new()];
        let mut row_width = 0usize;
        let mut cursor = (0u16, 0u16);

        for (idx, c) in self.text.char_indices() {
            if idx == self.cursor_pos {
                cursor = (saturate(row_width), saturate(rows.len() - 1));
            }
            if c == '\n' {
                rows.push(String::new());
                row_width = 0;
                continue;
            }
            let w = c.width().unwrap_or(0);
            if row_width + w > width {
                rows.push(String::new());
                row_width = 0;
                if idx == self.cursor_pos {
                    cursor = (0, saturate(rows.len() - 1));
                }
            }
            if let Some(row) = rows.last_mut() {
                row.push(c);
            }
            row_width += w;
        }

        if self.cursor_pos >= self.text.len() {
            if row_width >= width {
                rows.push(String::new());
                row_width = 0;
            }
            cursor = (saturate(row_width), saturate(rows.len() - 1));
        }

        (rows, cursor)
    }
}

/// Terminal coordinates are u16; clamp instead of wrapping around
fn saturate(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
