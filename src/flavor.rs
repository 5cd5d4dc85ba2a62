//! SQL Flavor（方言）：决定默认的词法约定、字面量格式与绑定参数风格。

use crate::dialect::{BindStyle, BlobLiteral, DialectDescriptor};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

/// 内置方言枚举，每个值对应一份 [`DialectDescriptor`] 预设。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Flavor {
    #[default]
    MySQL,
    MariaDB,
    PostgreSQL,
    SQLite,
    SQLServer,
    Db2,
    IBMi,
    Snowflake,
    Oracle,
}

static DEFAULT_FLAVOR: AtomicU8 = AtomicU8::new(Flavor::MySQL as u8);
static DEFAULT_FLAVOR_LOCK: Mutex<()> = Mutex::new(());

impl Flavor {
    pub const ALL: [Flavor; 9] = [
        Self::MySQL,
        Self::MariaDB,
        Self::PostgreSQL,
        Self::SQLite,
        Self::SQLServer,
        Self::Db2,
        Self::IBMi,
        Self::Snowflake,
        Self::Oracle,
    ];

    fn from_u8(v: u8) -> Self {
        Self::ALL
            .get(usize::from(v))
            .copied()
            .unwrap_or(Self::MySQL)
    }

    /// 该方言的默认描述符。
    pub fn descriptor(self) -> DialectDescriptor {
        let base = DialectDescriptor::new(self);
        match self {
            Self::MySQL | Self::MariaDB => base
                .with_identifier_delimiters('`', '`')
                .with_backslash_escapes(true)
                .with_bind_style(BindStyle::QuestionMark),
            Self::PostgreSQL => base
                .with_escape_string_constants(true)
                .with_arrays(true)
                .with_datetime_offset(true)
                .with_blob_literal(BlobLiteral::Bytea)
                .with_bind_style(BindStyle::Numbered('$')),
            Self::SQLite => base
                .with_identifier_delimiters('`', '`')
                .with_boolean_literals(false)
                .with_datetime_offset(true)
                .with_bind_style(BindStyle::Named('$')),
            Self::SQLServer => base
                .with_identifier_delimiters('[', ']')
                .with_national_strings(true)
                .with_boolean_literals(false)
                .with_datetime_offset(true)
                .with_blob_literal(BlobLiteral::HexNumber)
                .with_bind_style(BindStyle::Named('@')),
            Self::Db2 | Self::IBMi | Self::Snowflake => {
                base.with_bind_style(BindStyle::QuestionMark)
            }
            Self::Oracle => base
                .with_boolean_literals(false)
                .with_blob_literal(BlobLiteral::HexToRaw)
                .with_bind_style(BindStyle::Numbered(':')),
        }
    }
}

/// 获取当前全局默认 Flavor。
pub fn default_flavor() -> Flavor {
    Flavor::from_u8(DEFAULT_FLAVOR.load(Ordering::Relaxed))
}

/// 设置全局默认 Flavor，返回旧值。
pub fn set_default_flavor(flavor: Flavor) -> Flavor {
    let old = DEFAULT_FLAVOR.swap(flavor as u8, Ordering::Relaxed);
    Flavor::from_u8(old)
}

/// 修改全局默认 Flavor 的 RAII guard（会持有一个全局锁，避免并行测试互相干扰）。
pub struct DefaultFlavorGuard {
    _lock: MutexGuard<'static, ()>,
    old: Flavor,
}

impl Drop for DefaultFlavorGuard {
    fn drop(&mut self) {
        set_default_flavor(self.old);
    }
}

/// 在一个作用域内临时设置 DefaultFlavor，并保证退出作用域后自动恢复。
pub fn set_default_flavor_scoped(flavor: Flavor) -> DefaultFlavorGuard {
    let lock = DEFAULT_FLAVOR_LOCK
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    let old = set_default_flavor(flavor);
    DefaultFlavorGuard { _lock: lock, old }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MySQL => "MySQL",
            Self::MariaDB => "MariaDB",
            Self::PostgreSQL => "PostgreSQL",
            Self::SQLite => "SQLite",
            Self::SQLServer => "SQLServer",
            Self::Db2 => "Db2",
            Self::IBMi => "IBMi",
            Self::Snowflake => "Snowflake",
            Self::Oracle => "Oracle",
        };
        f.write_str(s)
    }
}
