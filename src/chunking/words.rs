//! Fixed-size word window splitting.

use super::TextChunk;

/// Splits text into non-overlapping windows of a fixed number of words.
#[derive(Debug, Clone, Copy)]
pub struct WordSplitter {
    split_length: usize,
}

impl WordSplitter {
    /// Create a splitter producing windows of `split_length` words.
    pub fn new(split_length: usize) -> Self {
        Self {
            split_length: split_length.max(1),
        }
    }

    /// Words per window.
    pub fn split_length(&self) -> usize {
        self.split_length
    }

    /// Split `text` into chunks tagged with `source`.
    ///
    /// The final window holds whatever words remain. Line breaks inside a window are
    /// preserved so chunk text keeps the document's paragraph structure.
    pub fn split(&self, source: &str, text: &str) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut words_in_window = 0;

        for line in text.lines() {
            let mut line_words: Vec<&str> = Vec::new();
            for word in line.split_whitespace() {
                line_words.push(word);
                words_in_window += 1;

                if words_in_window == self.split_length {
                    current.push(line_words.join(" "));
                    line_words.clear();
                    Self::flush(&mut chunks, &mut current, source);
                    words_in_window = 0;
                }
            }
            if !line_words.is_empty() {
                current.push(line_words.join(" "));
            }
        }

        Self::flush(&mut chunks, &mut current, source);
        chunks
    }

    fn flush(chunks: &mut Vec<TextChunk>, current: &mut Vec<String>, source: &str) {
        let content = current.join("\n");
        current.clear();
        if content.trim().is_empty() {
            return;
        }
        let order = chunks.len() as i32;
        chunks.push(TextChunk::new(source, content, order));
    }
}

impl Default for WordSplitter {
    fn default() -> Self {
        Self::new(200)
    }
}
