//! 替换值修饰器：`list` / `array` / `raw`，以及各种基础类型到 [`Replacement`] 的转换。

use crate::value::SqlValue;
use crate::valuer::SqlValuer;

/// Raw：原样拼入 SQL，不做任何转义。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw {
    pub(crate) expr: String,
}

pub fn raw(expr: impl Into<String>) -> Replacement {
    Replacement::Raw(Raw { expr: expr.into() })
}

/// List：渲染为括号包裹的字面量列表 `(a, b, c)`，而不是方言的 ARRAY 类型。
pub fn list<T: FlattenIntoReplacements>(values: T) -> Replacement {
    Replacement::List(flatten(values))
}

/// Array：有 ARRAY 类型的方言渲染为 `ARRAY[a,b]`，其余方言退化为 `(a, b)`。
pub fn array<T: FlattenIntoReplacements>(values: T) -> Replacement {
    Replacement::Array(flatten(values))
}

/// 递归展开为扁平的替换值序列。
pub fn flatten<T: FlattenIntoReplacements>(v: T) -> Vec<Replacement> {
    let mut out = Vec::new();
    v.flatten_into(&mut out);
    out
}

/// 一个占位符的替换值。
#[derive(Clone)]
pub enum Replacement {
    Value(SqlValue),
    Valuer(Box<dyn SqlValuer>),
    Raw(Raw),
    List(Vec<Replacement>),
    Array(Vec<Replacement>),
}

impl Replacement {
    /// List/Raw 属于“SQL 表达式”，包含它们的数组按逗号直接拼接。
    pub(crate) fn is_expression(&self) -> bool {
        matches!(self, Self::List(_) | Self::Raw(_))
    }
}

impl std::fmt::Debug for Replacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Valuer(_) => f.write_str("Valuer(..)"),
            Self::Raw(v) => f.debug_tuple("Raw").field(v).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
        }
    }
}

impl PartialEq for Replacement {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Raw(a), Self::Raw(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl From<SqlValue> for Replacement {
    fn from(v: SqlValue) -> Self {
        Self::Value(v)
    }
}

impl From<Box<dyn SqlValuer>> for Replacement {
    fn from(v: Box<dyn SqlValuer>) -> Self {
        Self::Valuer(v)
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty),+ $(,)?) => {
        $(
            impl From<$t> for Replacement {
                fn from(v: $t) -> Self {
                    Self::Value(SqlValue::from(v))
                }
            }
        )+
    };
}

impl_from_scalar!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    &'static str,
    time::OffsetDateTime,
);

impl<T> From<Option<T>> for Replacement
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        Self::Value(SqlValue::from_option(v))
    }
}

/// 把单值、`Vec`、数组统一展开为替换值序列。
pub trait FlattenIntoReplacements {
    fn flatten_into(self, out: &mut Vec<Replacement>);
}

impl<T: Into<Replacement>> FlattenIntoReplacements for T {
    fn flatten_into(self, out: &mut Vec<Replacement>) {
        out.push(self.into());
    }
}

impl<T: FlattenIntoReplacements> FlattenIntoReplacements for Vec<T> {
    fn flatten_into(self, out: &mut Vec<Replacement>) {
        for v in self {
            v.flatten_into(out);
        }
    }
}

impl<T: FlattenIntoReplacements, const N: usize> FlattenIntoReplacements for [T; N] {
    fn flatten_into(self, out: &mut Vec<Replacement>) {
        for v in self {
            v.flatten_into(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn list_flattens_vec_and_array() {
        assert_eq!(
            list(vec![1_i64, 2, 3]),
            Replacement::List(vec![1_i64.into(), 2_i64.into(), 3_i64.into()])
        );
        assert_eq!(list(["a", "b"]), list(vec!["a", "b"]));
    }

    #[test]
    fn nested_lists_stay_nested() {
        let rows = array(vec![list(["john", "j@x"]), list(["mike", "m@x"])]);
        match rows {
            Replacement::Array(items) => {
                assert_eq!(items.len(), 2);
                assert!(items.iter().all(Replacement::is_expression));
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn option_maps_to_null() {
        assert_eq!(
            Replacement::from(None::<i64>),
            Replacement::Value(SqlValue::Null)
        );
    }
}
