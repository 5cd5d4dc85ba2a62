//! 方言描述符：扫描器与格式化器唯一需要查询的词法能力表。
//!
//! 新增方言只需要构造一个新的 [`DialectDescriptor`]，不需要修改扫描逻辑。

use crate::flavor::{Flavor, default_flavor};
use time::UtcOffset;

/// 原生绑定参数风格。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindStyle {
    /// 使用 `?`，每次出现都要重新提供一次值（常见于 MySQL/Db2）。
    QuestionMark,
    /// 使用 `<prefix>1, <prefix>2, ...`，同名参数复用编号（PostgreSQL 的 `$n`，Oracle 的 `:n`）。
    Numbered(char),
    /// 使用 `<prefix>name` 原样保留名字（SQL Server 的 `@name`，SQLite 的 `$name`）。
    Named(char),
}

impl BindStyle {
    /// 写入第 `index_1_based` 个（或名为 `name` 的）绑定参数。
    pub(crate) fn write_placeholder(self, name: &str, index_1_based: usize, out: &mut String) {
        match self {
            Self::QuestionMark => out.push('?'),
            Self::Numbered(prefix) => {
                out.push(prefix);
                out.push_str(&index_1_based.to_string());
            }
            Self::Named(prefix) => {
                out.push(prefix);
                out.push_str(name);
            }
        }
    }
}

/// 二进制字面量的写法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlobLiteral {
    /// `X'0A0B'`
    HexString,
    /// `'\x0a0b'`（PostgreSQL bytea）
    Bytea,
    /// `0x0A0B`
    HexNumber,
    /// `hextoraw('0A0B')`
    HexToRaw,
}

/// 目标 SQL 的词法约定。构造后只读，可在线程间随意共享。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialectDescriptor {
    pub flavor: Flavor,
    /// 标识符引号：`(TICK_CHAR_LEFT, TICK_CHAR_RIGHT)`。
    pub identifier_delimiters: (char, char),
    /// 所有 `'...'` 字符串都支持反斜杠转义（MySQL/MariaDB）。
    pub backslash_escapes: bool,
    /// PostgreSQL 的 `standard_conforming_strings`；关闭时普通字符串也支持反斜杠转义。
    pub standard_conforming_strings: bool,
    /// 是否识别 `E'...'` 前缀字符串。
    pub escape_string_constants: bool,
    /// 是否识别 `$tag$ ... $tag$` 块。
    pub dollar_quoted_strings: bool,
    /// 字符串字面量前加 `N`。
    pub national_strings: bool,
    /// 布尔值写成 `TRUE/FALSE`；否则写成 `1/0`。
    pub boolean_literals: bool,
    /// 时间字面量是否带时区偏移。
    pub datetime_offset: bool,
    /// 时间值写入字面量前先换算到该时区，默认 UTC。
    pub timezone: UtcOffset,
    /// 是否有原生 ARRAY 类型。
    pub arrays: bool,
    pub blob_literal: BlobLiteral,
    pub bind_style: BindStyle,
}

impl DialectDescriptor {
    /// 以最保守的约定创建描述符；通常应使用 [`Flavor::descriptor`]。
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            identifier_delimiters: ('"', '"'),
            backslash_escapes: false,
            standard_conforming_strings: true,
            escape_string_constants: false,
            dollar_quoted_strings: true,
            national_strings: false,
            boolean_literals: true,
            datetime_offset: false,
            timezone: UtcOffset::UTC,
            arrays: false,
            blob_literal: BlobLiteral::HexString,
            bind_style: BindStyle::QuestionMark,
        }
    }

    /// 普通 `'...'` 字符串里的反斜杠是否是转义符。
    pub fn can_backslash_escape(&self) -> bool {
        self.backslash_escapes || !self.standard_conforming_strings
    }

    pub fn tick_char_left(&self) -> char {
        self.identifier_delimiters.0
    }

    pub fn tick_char_right(&self) -> char {
        self.identifier_delimiters.1
    }

    /// 用标识符引号包裹 `name`，内部出现的右引号会被双写（`a]b` => `[a]]b]`）。
    pub fn quote_identifier(&self, name: &str) -> String {
        let (left, right) = self.identifier_delimiters;
        let mut out = String::with_capacity(name.len() + 2);
        out.push(left);
        for ch in name.chars() {
            if ch == right {
                out.push(right);
            }
            out.push(ch);
        }
        out.push(right);
        out
    }

    pub fn with_identifier_delimiters(mut self, left: char, right: char) -> Self {
        self.identifier_delimiters = (left, right);
        self
    }

    pub fn with_backslash_escapes(mut self, on: bool) -> Self {
        self.backslash_escapes = on;
        self
    }

    pub fn with_standard_conforming_strings(mut self, on: bool) -> Self {
        self.standard_conforming_strings = on;
        self
    }

    pub fn with_escape_string_constants(mut self, on: bool) -> Self {
        self.escape_string_constants = on;
        self
    }

    pub fn with_dollar_quoted_strings(mut self, on: bool) -> Self {
        self.dollar_quoted_strings = on;
        self
    }

    pub fn with_national_strings(mut self, on: bool) -> Self {
        self.national_strings = on;
        self
    }

    pub fn with_boolean_literals(mut self, on: bool) -> Self {
        self.boolean_literals = on;
        self
    }

    pub fn with_datetime_offset(mut self, on: bool) -> Self {
        self.datetime_offset = on;
        self
    }

    pub fn with_timezone(mut self, offset: UtcOffset) -> Self {
        self.timezone = offset;
        self
    }

    pub fn with_arrays(mut self, on: bool) -> Self {
        self.arrays = on;
        self
    }

    pub fn with_blob_literal(mut self, style: BlobLiteral) -> Self {
        self.blob_literal = style;
        self
    }

    pub fn with_bind_style(mut self, style: BindStyle) -> Self {
        self.bind_style = style;
        self
    }
}

impl Default for DialectDescriptor {
    /// 使用全局默认 Flavor 的预设。
    fn default() -> Self {
        default_flavor().descriptor()
    }
}

impl From<Flavor> for DialectDescriptor {
    fn from(flavor: Flavor) -> Self {
        flavor.descriptor()
    }
}
