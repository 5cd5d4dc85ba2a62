//! halo-sql-bind：SQL replacement 内联与绑定参数映射。
//!
//! 单次扫描 SQL，跳过字符串、引号标识符、注释与 dollar-quote 块，
//! 把 `:name` / `?` 内联为方言字面量，或把 `$name` / `$1` 改写为驱动原生的绑定参数。

pub mod args;
pub mod binds;
pub mod dialect;
pub mod escape;
pub mod flavor;
pub mod macros;
pub mod modifiers;
pub mod query;
pub mod replacements;
#[cfg(test)]
mod replacements_tests;
pub mod scanner;
mod string_builder;
pub mod value;
pub mod valuer;

pub use crate::args::{BindValues, Replacements};
pub use crate::binds::{
    BindCollector, BindError, BindParamGenerator, MappedBinds, RESERVED_BIND_PREFIX,
    assert_no_reserved_bind, combine_binds, map_bind_parameters,
};
pub use crate::dialect::{BindStyle, BlobLiteral, DialectDescriptor};
pub use crate::escape::escape_mysql_string;
pub use crate::flavor::{
    DefaultFlavorGuard, Flavor, default_flavor, set_default_flavor, set_default_flavor_scoped,
};
pub use crate::modifiers::{FlattenIntoReplacements, Raw, Replacement, array, flatten, list, raw};
pub use crate::query::{
    BoundParams, PreparedQuery, QueryError, QueryOptions, prepare_binds, prepare_query,
};
pub use crate::replacements::{InjectError, inject_replacements};
pub use crate::scanner::{ScanError, Span, Token, TokenKind, scan};
pub use crate::value::SqlValue;
pub use crate::valuer::{SqlValuer, ValuerError};

/// 推荐的便捷命名空间：允许 `use halo_bind::sqlbind::{...}` 形式导入。
pub mod sqlbind {
    pub use crate::*;
}
