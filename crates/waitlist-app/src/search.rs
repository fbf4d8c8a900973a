// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

use std::time::Duration;

/// Quiet period after the last keystroke before the draft becomes the
/// active query.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Debounced search input. Every edit bumps a token and arms a pending
/// commit; the caller schedules a timer carrying that token and hands it
/// back via [`SearchBox::take_commit`]. Only the latest token fires, so a
/// burst of keystrokes propagates exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchBox {
    buffer: String,
    cursor: usize,
    token: u64,
    pending: bool,
}

impl SearchBox {
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Inserts at the cursor and arms a fresh commit token.
    pub fn push_char(&mut self, ch: char) -> u64 {
        let at = byte_offset(&self.buffer, self.cursor);
        self.buffer.insert(at, ch);
        self.cursor += 1;
        self.arm()
    }

    /// Deletes the character before the cursor, if any, arming a fresh token.
    pub fn pop_char(&mut self) -> u64 {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = byte_offset(&self.buffer, self.cursor);
            self.buffer.remove(at);
        }
        self.arm()
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.buffer.chars().count();
        self.cursor = (self.cursor + 1).min(len);
    }

    /// Replaces the whole draft, arming a fresh token.
    pub fn set_buffer(&mut self, value: impl Into<String>) -> u64 {
        self.buffer = value.into();
        self.cursor = self.buffer.chars().count();
        self.arm()
    }

    /// Consumes a due timer. Returns the draft exactly when `token` is still
    /// the latest and the commit has not fired yet; stale timers from
    /// superseded keystrokes return `None`.
    pub fn take_commit(&mut self, token: u64) -> Option<String> {
        if self.pending && token == self.token {
            self.pending = false;
            Some(self.buffer.clone())
        } else {
            None
        }
    }

    /// Drops the draft and any armed commit without firing one.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.pending = false;
        self.token = self.token.wrapping_add(1);
    }

    fn arm(&mut self) -> u64 {
        self.token = self.token.wrapping_add(1);
        self.pending = true;
        self.token
    }
}

fn byte_offset(buffer: &str, chars: usize) -> usize {
    buffer
        .char_indices()
        .nth(chars)
        .map_or(buffer.len(), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::SearchBox;

    #[test]
    fn burst_of_keystrokes_commits_once_with_the_final_draft() {
        let mut search = SearchBox::default();
        let first = search.push_char('a');
        let second = search.push_char('b');
        let third = search.push_char('c');

        assert_eq!(search.take_commit(first), None);
        assert_eq!(search.take_commit(second), None);
        assert_eq!(search.take_commit(third), Some("abc".to_owned()));
        assert_eq!(search.take_commit(third), None);
    }

    #[test]
    fn backspace_arms_a_commit_too() {
        let mut search = SearchBox::default();
        search.push_char('a');
        search.push_char('b');
        let token = search.pop_char();
        assert_eq!(search.take_commit(token), Some("a".to_owned()));
    }

    #[test]
    fn set_buffer_supersedes_earlier_tokens() {
        let mut search = SearchBox::default();
        let typed = search.push_char('x');
        let replaced = search.set_buffer("ada");
        assert_eq!(search.take_commit(typed), None);
        assert_eq!(search.take_commit(replaced), Some("ada".to_owned()));
    }

    #[test]
    fn reset_cancels_an_armed_commit() {
        let mut search = SearchBox::default();
        let token = search.push_char('a');
        search.reset();
        assert_eq!(search.buffer(), "");
        assert!(!search.is_pending());
        assert_eq!(search.take_commit(token), None);
    }

    #[test]
    fn cursor_edits_in_the_middle_of_the_draft() {
        let mut search = SearchBox::default();
        search.set_buffer("ac");
        search.move_cursor_left();
        search.push_char('b');
        assert_eq!(search.buffer(), "abc");
        assert_eq!(search.cursor(), 2);
    }

    #[test]
    fn cursor_movement_alone_does_not_arm_a_commit() {
        let mut search = SearchBox::default();
        let token = search.set_buffer("ab");
        assert_eq!(search.take_commit(token), Some("ab".to_owned()));
        search.move_cursor_left();
        search.move_cursor_right();
        assert!(!search.is_pending());
    }
}
