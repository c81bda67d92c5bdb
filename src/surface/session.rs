/// Edit session owned by a mounted input control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    original_value: String,
    live_value: String,
    /// Caret position as a char index into `live_value`
    caret: usize,
}

/// Caret movements inside an input control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMovement {
    Left,
    Right,
    Start,
    End,
    /// Jump to a char index, clamped to the value
    To(usize),
}

impl EditSession {
    /// Start a session on `value`, caret at the end
    pub fn new(value: impl Into<String>) -> Self {
        let original_value = value.into();
        let caret = original_value.chars().count();
        Self {
            live_value: original_value.clone(),
            original_value,
            caret,
        }
    }

    pub fn original_value(&self) -> &str {
        &self.original_value
    }

    pub fn live_value(&self) -> &str {
        &self.live_value
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Terminal columns between the start of the value and the caret
    pub fn caret_column(&self) -> usize {
        let before: String = self.live_value.chars().take(self.caret).collect();
        super::display_width(&before)
    }

    pub fn is_changed(&self) -> bool {
        self.live_value != self.original_value
    }

    /// Replace the live value, caret at the end
    pub fn set_live_value(&mut self, value: impl Into<String>) {
        self.live_value = value.into();
        self.caret = self.live_value.chars().count();
    }

    /// Drop any typed changes
    pub fn revert(&mut self) {
        let original = self.original_value.clone();
        self.set_live_value(original);
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index(self.caret);
        self.live_value.insert(idx, c);
        self.caret += 1;
    }

    pub fn backspace(&mut self) {
        if self.caret == 0 {
            return;
        }
        self.caret -= 1;
        let idx = self.byte_index(self.caret);
        self.live_value.remove(idx);
    }

    pub fn delete(&mut self) {
        if self.caret >= self.live_value.chars().count() {
            return;
        }
        let idx = self.byte_index(self.caret);
        self.live_value.remove(idx);
    }

    pub fn move_caret(&mut self, movement: CaretMovement) {
        let len = self.live_value.chars().count();
        self.caret = match movement {
            CaretMovement::Left => self.caret.saturating_sub(1),
            CaretMovement::Right => (self.caret + 1).min(len),
            CaretMovement::Start => 0,
            CaretMovement::End => len,
            CaretMovement::To(idx) => idx.min(len),
        };
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.live_value
            .char_indices()
            .nth(char_idx)
            .map_or(self.live_value.len(), |(idx, _)| idx)
    }
}
