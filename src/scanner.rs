//! 词法扫描器：单次遍历 SQL，跟踪字符串、标识符、注释与 dollar-quote 块，
//! 只在“普通”状态下识别 `:name` / `?` / `$name` / `$1` 候选占位符。
//!
//! 这里不是 SQL parser：语法上再奇怪的 SQL，只要词法结构完整就不会被拒绝。
//! 唯一的致命错误是未闭合的 `'...'` 字符串。

use crate::dialect::DialectDescriptor;

/// 源字符串中的字节区间 `[start, end)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `:name` 命名替换。
    Named,
    /// `?` 位置替换。
    Positional,
    /// `$name` 命名绑定参数。
    Bind,
    /// `$1` 编号绑定参数。
    NumberedBind,
}

/// 一个候选占位符。`name` 不含前缀字符；位置替换的 `name` 为空。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub name: &'a str,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("The following SQL query includes an unterminated string literal:\n{sql}")]
    UnterminatedString { sql: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    QuotedIdentifier,
    SingleQuoted { backslash_escapes: bool },
    DollarQuoted,
    LineComment,
    BlockComment,
}

/// 单次扫描的全部可变状态，每次调用新建，不跨调用共享。
#[derive(Debug)]
struct ScanState<'a> {
    pos: usize,
    mode: Mode,
    /// 已打开的 dollar-quote 定界符（含两侧 `$`），栈顶是最内层。
    dollar_tags: Vec<&'a str>,
    tokens: Vec<Token<'a>>,
}

struct Scanner<'a> {
    sql: &'a str,
    bytes: &'a [u8],
    dialect: &'a DialectDescriptor,
}

/// 扫描 `sql`，按出现顺序返回所有候选占位符。
pub fn scan<'a>(sql: &'a str, dialect: &'a DialectDescriptor) -> Result<Vec<Token<'a>>, ScanError> {
    let scanner = Scanner {
        sql,
        bytes: sql.as_bytes(),
        dialect,
    };
    let mut st = ScanState {
        pos: 0,
        mode: Mode::Normal,
        dollar_tags: Vec::new(),
        tokens: Vec::new(),
    };

    while st.pos < scanner.bytes.len() {
        match st.mode {
            Mode::Normal => scanner.step_normal(&mut st),
            Mode::QuotedIdentifier => scanner.step_quoted_identifier(&mut st),
            Mode::SingleQuoted { backslash_escapes } => {
                scanner.step_single_quoted(&mut st, backslash_escapes)
            }
            Mode::DollarQuoted => scanner.step_dollar_quoted(&mut st),
            Mode::LineComment => {
                if scanner.bytes[st.pos] == b'\n' {
                    st.mode = Mode::Normal;
                }
                st.pos += 1;
            }
            Mode::BlockComment => {
                if scanner.bytes[st.pos..].starts_with(b"*/") {
                    st.mode = Mode::Normal;
                    st.pos += 2;
                } else {
                    st.pos += 1;
                }
            }
        }
    }

    if matches!(st.mode, Mode::SingleQuoted { .. }) {
        return Err(ScanError::UnterminatedString {
            sql: sql.to_owned(),
        });
    }

    tracing::trace!(tokens = st.tokens.len(), len = sql.len(), "scanned sql");
    Ok(st.tokens)
}

impl<'a> Scanner<'a> {
    fn prev(&self, pos: usize) -> Option<u8> {
        pos.checked_sub(1).map(|p| self.bytes[p])
    }

    fn step_normal(&self, st: &mut ScanState<'a>) {
        let i = st.pos;
        let left = self.dialect.tick_char_left();
        if starts_with_char(self.bytes, i, left) {
            st.mode = Mode::QuotedIdentifier;
            st.pos += left.len_utf8();
            return;
        }

        match self.bytes[i] {
            b'\'' => {
                st.mode = Mode::SingleQuoted {
                    backslash_escapes: self.string_is_backslash_escapable(i),
                };
                st.pos += 1;
            }
            b'-' if self.bytes.get(i + 1) == Some(&b'-') => {
                st.mode = Mode::LineComment;
                st.pos += 2;
            }
            b'/' if self.bytes.get(i + 1) == Some(&b'*') => {
                st.mode = Mode::BlockComment;
                st.pos += 2;
            }
            b'$' => self.dollar(st),
            b':' => self.named_replacement(st),
            b'?' => self.positional_replacement(st),
            _ => st.pos += 1,
        }
    }

    /// `E'...'` 只有在 E 本身是一个新 token 的开头时才算前缀（`AE'x'` 不算）。
    fn string_is_backslash_escapable(&self, quote: usize) -> bool {
        if self.dialect.can_backslash_escape() {
            return true;
        }
        self.dialect.escape_string_constants
            && matches!(self.prev(quote), Some(b'E' | b'e'))
            && can_precede_token(self.prev(quote - 1))
    }

    /// `$` 可能是 dollar-quote 的开始，也可能是绑定参数。
    fn dollar(&self, st: &mut ScanState<'a>) {
        let i = st.pos;
        let prev = self.prev(i);
        // 标识符的一部分，如 `z$$`、`id$id`
        if prev.is_some_and(is_ident_byte) {
            st.pos += 1;
            return;
        }

        if self.dialect.dollar_quoted_strings
            && let Some(len) = dollar_tag_len(self.bytes, i)
        {
            st.dollar_tags.push(&self.sql[i..i + len]);
            st.mode = Mode::DollarQuoted;
            st.pos += len;
            return;
        }

        if can_precede_token(prev) {
            let start = i + 1;
            let (kind, n) = match ident_len(self.bytes, start) {
                0 => (TokenKind::NumberedBind, number_len(self.bytes, start)),
                n => (TokenKind::Bind, n),
            };
            if n > 0 && can_follow_token(self.bytes, start + n) {
                self.push_token(st, kind, start, start + n);
                return;
            }
        }
        st.pos += 1;
    }

    fn named_replacement(&self, st: &mut ScanState<'a>) {
        let i = st.pos;
        if can_precede_token(self.prev(i)) && self.bytes.get(i + 1) != Some(&b':') {
            let start = i + 1;
            let n = ident_len(self.bytes, start);
            if n > 0 && can_follow_token(self.bytes, start + n) {
                self.push_token(st, TokenKind::Named, start, start + n);
                return;
            }
        }
        st.pos += 1;
    }

    fn positional_replacement(&self, st: &mut ScanState<'a>) {
        let i = st.pos;
        // `?|` 与 `?&` 是 PostgreSQL 的 jsonb 运算符
        if can_precede_token(self.prev(i)) && !matches!(self.bytes.get(i + 1), Some(b'|' | b'&')) {
            self.push_token(st, TokenKind::Positional, i + 1, i + 1);
            return;
        }
        st.pos += 1;
    }

    /// `name_start..name_end` 是去掉单字符前缀后的名字区间。
    fn push_token(&self, st: &mut ScanState<'a>, kind: TokenKind, name_start: usize, name_end: usize) {
        st.tokens.push(Token {
            kind,
            name: &self.sql[name_start..name_end],
            span: Span {
                start: name_start - 1,
                end: name_end,
            },
        });
        st.pos = name_end;
    }

    fn step_quoted_identifier(&self, st: &mut ScanState<'a>) {
        let right = self.dialect.tick_char_right();
        if starts_with_char(self.bytes, st.pos, right) {
            st.mode = Mode::Normal;
            st.pos += right.len_utf8();
        } else {
            st.pos += 1;
        }
    }

    fn step_single_quoted(&self, st: &mut ScanState<'a>, backslash_escapes: bool) {
        let i = st.pos;
        match self.bytes[i] {
            b'\\' if backslash_escapes => st.pos += 2,
            b'\'' if self.bytes.get(i + 1) == Some(&b'\'') => st.pos += 2,
            b'\'' => {
                st.mode = Mode::Normal;
                st.pos += 1;
            }
            _ => st.pos += 1,
        }
    }

    /// 块内只关心定界符：与栈顶相同则关闭，不同则作为嵌套块打开。
    fn step_dollar_quoted(&self, st: &mut ScanState<'a>) {
        let i = st.pos;
        if self.bytes[i] == b'$'
            && let Some(len) = dollar_tag_len(self.bytes, i)
        {
            let tag = &self.sql[i..i + len];
            if st.dollar_tags.last() == Some(&tag) {
                st.dollar_tags.pop();
                if st.dollar_tags.is_empty() {
                    st.mode = Mode::Normal;
                }
                st.pos += len;
                return;
            }
            if !self.prev(i).is_some_and(is_ident_byte) {
                st.dollar_tags.push(tag);
                st.pos += len;
                return;
            }
        }
        st.pos += 1;
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// 占位符前面只允许：输入开头、空白、`(`、`[`、`>`、`,`、`=`。
fn can_precede_token(prev: Option<u8>) -> bool {
    match prev {
        None => true,
        Some(b) => b.is_ascii_whitespace() || matches!(b, b'(' | b'[' | b'>' | b',' | b'='),
    }
}

/// 占位符后面不能紧跟标识符字符、`$` 或单个 `:`；`::` 类型转换是允许的。
fn can_follow_token(bytes: &[u8], end: usize) -> bool {
    match bytes.get(end) {
        None => true,
        Some(b':') => bytes.get(end + 1) == Some(&b':'),
        Some(&b) => !is_ident_byte(b) && b != b'$',
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*` 的长度，不匹配时为 0。
fn ident_len(bytes: &[u8], start: usize) -> usize {
    match bytes.get(start) {
        Some(&b) if b.is_ascii_alphabetic() || b == b'_' => {
            1 + bytes[start + 1..]
                .iter()
                .take_while(|&&b| is_ident_byte(b))
                .count()
        }
        _ => 0,
    }
}

/// `[1-9][0-9]*` 的长度，不匹配时为 0。
fn number_len(bytes: &[u8], start: usize) -> usize {
    match bytes.get(start) {
        Some(b'1'..=b'9') => {
            1 + bytes[start + 1..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
        }
        _ => 0,
    }
}

/// `$$` 或 `$tag$` 定界符的总长度。
fn dollar_tag_len(bytes: &[u8], dollar: usize) -> Option<usize> {
    let end = dollar + 1 + ident_len(bytes, dollar + 1);
    (bytes.get(end) == Some(&b'$')).then_some(end + 1 - dollar)
}

fn starts_with_char(bytes: &[u8], pos: usize, ch: char) -> bool {
    let mut buf = [0u8; 4];
    bytes[pos..].starts_with(ch.encode_utf8(&mut buf).as_bytes())
}
