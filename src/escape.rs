//! 字面量格式化：把替换值写成目标方言可直接内联的 SQL 字面量。
//!
//! 安全警告：内联永远不如绑定参数安全；只在调用方明确要求 replacement 时使用。

use crate::dialect::{BlobLiteral, DialectDescriptor};
use crate::modifiers::{Raw, Replacement};
use crate::replacements::InjectError;
use crate::value::SqlValue;
use time::macros::format_description;

impl DialectDescriptor {
    /// 把一个替换值格式化为 SQL 字面量。
    pub fn escape(&self, value: &Replacement) -> Result<String, InjectError> {
        let mut out = String::new();
        self.write_literal(&mut out, value)?;
        Ok(out)
    }

    /// 把字符串格式化为带引号的字面量。
    pub fn escape_string(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 3);
        if self.national_strings {
            out.push('N');
        }
        if self.backslash_escapes {
            out.push_str(&escape_mysql_string(value));
            return out;
        }

        let double_backslash = self.can_backslash_escape();
        out.push('\'');
        for ch in value.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '\\' if double_backslash => out.push_str("\\\\"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
        out
    }

    pub(crate) fn write_literal(
        &self,
        out: &mut String,
        value: &Replacement,
    ) -> Result<(), InjectError> {
        match value {
            Replacement::Value(v) => self.write_sql_value(out, v),
            Replacement::Valuer(v) => {
                let vv = v.value()?;
                self.write_sql_value(out, &vv)
            }
            Replacement::Raw(Raw { expr }) => {
                out.push_str(expr);
                Ok(())
            }
            Replacement::List(items) => {
                out.push('(');
                self.write_joined(out, items, ", ")?;
                out.push(')');
                Ok(())
            }
            // 数组里出现 list()/raw() 时按逗号直接拼接，支持 `VALUES ?` 批量插入。
            Replacement::Array(items) if items.iter().any(Replacement::is_expression) => {
                self.write_joined(out, items, ", ")
            }
            Replacement::Array(items) if self.arrays => {
                out.push_str("ARRAY[");
                self.write_joined(out, items, ",")?;
                out.push(']');
                Ok(())
            }
            Replacement::Array(items) => {
                out.push('(');
                self.write_joined(out, items, ", ")?;
                out.push(')');
                Ok(())
            }
        }
    }

    fn write_joined(
        &self,
        out: &mut String,
        items: &[Replacement],
        sep: &str,
    ) -> Result<(), InjectError> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            self.write_literal(out, item)?;
        }
        Ok(())
    }

    fn write_sql_value(&self, out: &mut String, v: &SqlValue) -> Result<(), InjectError> {
        match v {
            SqlValue::Null => out.push_str("NULL"),
            SqlValue::Bool(b) => out.push_str(match (self.boolean_literals, *b) {
                (true, true) => "TRUE",
                (true, false) => "FALSE",
                (false, true) => "1",
                (false, false) => "0",
            }),
            SqlValue::I64(n) => out.push_str(&n.to_string()),
            SqlValue::U64(n) => out.push_str(&n.to_string()),
            SqlValue::F32(n) if n.is_finite() => out.push_str(&n.to_string()),
            SqlValue::F64(n) if n.is_finite() => out.push_str(&n.to_string()),
            SqlValue::F32(n) => return Err(non_finite(f64::from(*n))),
            SqlValue::F64(n) => return Err(non_finite(*n)),
            SqlValue::String(s) => out.push_str(&self.escape_string(s)),
            SqlValue::Bytes(b) => self.write_bytes(out, b),
            SqlValue::DateTime(dt) => {
                let dt = dt.checked_to_offset(self.timezone).ok_or_else(|| {
                    InjectError::UnsupportedValue(format!("{dt} is out of range in {}", self.timezone))
                })?;
                let formatted = if self.datetime_offset {
                    dt.format(format_description!(
                        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6] [offset_hour sign:mandatory]:[offset_minute]"
                    ))
                } else {
                    dt.format(format_description!(
                        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]"
                    ))
                };
                let s = formatted.map_err(|e| InjectError::UnsupportedValue(e.to_string()))?;
                out.push('\'');
                out.push_str(&s);
                out.push('\'');
            }
        }
        Ok(())
    }

    fn write_bytes(&self, out: &mut String, data: &[u8]) {
        match self.blob_literal {
            BlobLiteral::HexString => {
                out.push_str("X'");
                push_hex(out, data);
                out.push('\'');
            }
            BlobLiteral::Bytea => {
                out.push_str(if self.can_backslash_escape() {
                    "'\\\\x"
                } else {
                    "'\\x"
                });
                push_hex(out, data);
                out.push('\'');
            }
            BlobLiteral::HexNumber => {
                out.push_str("0x");
                push_hex(out, data);
            }
            BlobLiteral::HexToRaw => {
                out.push_str("hextoraw('");
                push_hex(out, data);
                out.push_str("')");
            }
        }
    }
}

fn non_finite(n: f64) -> InjectError {
    InjectError::UnsupportedValue(format!("{n} cannot be written as a SQL literal"))
}

/// MySQL/MariaDB 风格的字符串转义：控制字符、单引号与反斜杠都用反斜杠转义。
pub fn escape_mysql_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\u{0000}' => out.push_str("\\0"),
            '\u{0008}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{001a}' => out.push_str("\\Z"),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

fn push_hex(out: &mut String, data: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    for &b in data {
        out.push(HEX[usize::from(b >> 4)] as char);
        out.push(HEX[usize::from(b & 0xF)] as char);
    }
}
