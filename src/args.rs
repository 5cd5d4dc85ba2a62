//! Replacements / BindValues：一次注入或绑定调用所使用的值表，调用期间只读。

use crate::modifiers::Replacement;
use crate::value::SqlValue;
use std::collections::{BTreeMap, HashMap};

/// `:name` 使用命名表，`?` 使用按出现顺序消费的列表。
#[derive(Debug, Clone, PartialEq)]
pub enum Replacements {
    Named(HashMap<String, Replacement>),
    Positional(Vec<Replacement>),
}

impl Replacements {
    pub fn named<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Replacement>,
    {
        Self::Named(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn positional<V: Into<Replacement>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Named(m) => m.len(),
            Self::Positional(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 交给驱动的绑定值：位置列表（名字为 `"1".."n"`）或命名表。
#[derive(Debug, Clone, PartialEq)]
pub enum BindValues {
    Positional(Vec<SqlValue>),
    Named(BTreeMap<String, SqlValue>),
}

impl BindValues {
    pub fn named<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<SqlValue>,
    {
        Self::Named(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn positional<V: Into<SqlValue>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    /// 按绑定参数名取值；位置列表只接受 `1` 起的十进制编号。
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        match self {
            Self::Named(m) => m.get(name),
            Self::Positional(v) => {
                if name.starts_with('0') {
                    return None;
                }
                let n: usize = name.parse().ok()?;
                v.get(n.checked_sub(1)?)
            }
        }
    }

    /// 转成命名表，位置值的名字为 `"1".."n"`。
    pub fn into_named(self) -> BTreeMap<String, SqlValue> {
        match self {
            Self::Named(m) => m,
            Self::Positional(v) => v
                .into_iter()
                .enumerate()
                .map(|(i, value)| ((i + 1).to_string(), value))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Named(m) => m.len(),
            Self::Positional(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
