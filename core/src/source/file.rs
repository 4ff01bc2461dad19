use crate::utils::Position;

/// 一份打开的文档：最近一次的完整文本加上行首索引
#[derive(Debug, Clone)]
pub struct Document {
    pub uri: String,
    pub version: i32,
    pub text: String,
    line_starts: Vec<usize>,
}

impl Document {
    pub fn new(uri: String, version: i32, text: String) -> Self {
        let line_starts = compute_line_starts(&text);
        Self {
            uri,
            version,
            text,
            line_starts,
        }
    }

    /// 全量替换文本，重新计算行首
    pub fn replace(&mut self, version: i32, text: String) {
        self.line_starts = compute_line_starts(&text);
        self.version = version;
        self.text = text;
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 第 line 行 (0-based) 的文本，不含换行符和行尾的 \r
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let line = line as usize;
        let start = *self.line_starts.get(line)?;
        let end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        let text = &self.text[start..end];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }

    /// 0-based (行, UTF-16 列) 转字节偏移。列超过行尾时夹到行尾。
    pub fn offset_at(&self, pos: Position) -> Option<usize> {
        let start = *self.line_starts.get(pos.line as usize)?;
        let line = self.line_text(pos.line)?;
        Some(start + utf16_to_byte(line, pos.character))
    }

    /// 光标所在的单词 (字母、数字、下划线)，向左右两侧扩展。
    /// 光标紧跟在单词后面也算在单词上。
    pub fn word_at(&self, pos: Position) -> Option<&str> {
        let line = self.line_text(pos.line)?;
        let cursor = utf16_to_byte(line, pos.character);

        let start = word_start(line, cursor);
        let end = line[cursor..]
            .char_indices()
            .find(|&(_, c)| !is_word_char(c))
            .map_or(line.len(), |(i, _)| cursor + i);

        if start == end {
            None
        } else {
            Some(&line[start..end])
        }
    }

    /// 光标左边的半个单词，补全只按它过滤
    pub fn prefix_at(&self, pos: Position) -> Option<&str> {
        let line = self.line_text(pos.line)?;
        let cursor = utf16_to_byte(line, pos.character);
        Some(&line[word_start(line, cursor)..cursor])
    }
}

fn word_start(line: &str, cursor: usize) -> usize {
    line[..cursor]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_word_char(c))
        .last()
        .map_or(cursor, |(i, _)| i)
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

fn utf16_to_byte(line: &str, character: u32) -> usize {
    let mut units = 0u32;
    for (i, c) in line.char_indices() {
        if units >= character {
            return i;
        }
        units += c.len_utf16() as u32;
    }
    line.len()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document::new("file:///t.4gl".to_string(), 1, text.to_string())
    }

    #[test]
    fn lines_strip_carriage_return() {
        let d = doc("LET a = 1\r\nRETURN a\r\n");
        assert_eq!(d.line_count(), 3);
        assert_eq!(d.line_text(0), Some("LET a = 1"));
        assert_eq!(d.line_text(1), Some("RETURN a"));
        assert_eq!(d.line_text(2), Some(""));
        assert_eq!(d.line_text(3), None);
    }

    #[test]
    fn word_under_cursor() {
        let d = doc("CALL do_work(total)");
        assert_eq!(d.word_at(Position::new(0, 0)), Some("CALL"));
        assert_eq!(d.word_at(Position::new(0, 7)), Some("do_work"));
        // 紧跟在单词后面
        assert_eq!(d.word_at(Position::new(0, 12)), Some("do_work"));
        assert_eq!(d.word_at(Position::new(0, 4)), Some("CALL"));
        assert_eq!(d.word_at(Position::new(5, 0)), None);
    }

    #[test]
    fn prefix_stops_at_cursor() {
        let d = doc("CALL do_work(total)");
        assert_eq!(d.prefix_at(Position::new(0, 16)), Some("tot"));
        assert_eq!(d.prefix_at(Position::new(0, 13)), Some(""));
        assert_eq!(d.prefix_at(Position::new(0, 12)), Some("do_work"));
        assert_eq!(d.prefix_at(Position::new(5, 0)), None);
    }

    #[test]
    fn utf16_columns() {
        // "é" 是一个 UTF-16 码元，"😀" 是两个
        let d = doc("# é😀\nLET total = 1");
        assert_eq!(d.offset_at(Position::new(0, 3)), Some(4));
        assert_eq!(d.offset_at(Position::new(0, 5)), Some(8));
        assert_eq!(d.word_at(Position::new(1, 6)), Some("total"));
    }

    #[test]
    fn replace_recomputes_lines() {
        let mut d = doc("a");
        d.replace(2, "a\nb\nc".to_string());
        assert_eq!(d.version, 2);
        assert_eq!(d.line_text(2), Some("c"));
    }
}
