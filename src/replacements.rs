//! Replacement 注入：把 `:name` / `?` 替换为方言字面量（不会重新扫描替换结果）。

use crate::args::Replacements;
use crate::dialect::DialectDescriptor;
use crate::flavor::Flavor;
use crate::scanner::{ScanError, TokenKind, scan};
use crate::string_builder::Splicer;
use crate::valuer::ValuerError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InjectError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Named replacement \":{0}\" has no entry in the replacement map.")]
    MissingNamed(String),
    #[error(
        "Positional replacement (?) {0} has no entry in the replacement map (replacements[{0}] is out of range)."
    )]
    MissingPositional(usize),
    #[error("unsupported replacement value: {0}")]
    UnsupportedValue(String),
    #[error(transparent)]
    Valuer(#[from] ValuerError),
}

/// 把 `sql` 中的替换占位符内联为字面量。
///
/// - 命名表只替换 `:name`，同名多次出现复用同一个值；
/// - 位置列表只替换 `?`，严格按照在 SQL 中出现的顺序逐个消费；
/// - 字符串、引号标识符、注释与 dollar-quote 块内的内容不会被替换；
/// - 任一占位符缺值时整体失败，不会返回部分结果。
pub fn inject_replacements(
    sql: &str,
    dialect: &DialectDescriptor,
    replacements: &Replacements,
) -> Result<String, InjectError> {
    let tokens = scan(sql, dialect)?;
    let mut out = Splicer::new(sql);
    let mut consumed = 0usize;
    let mut injected = 0usize;

    for token in &tokens {
        let value = match (token.kind, replacements) {
            (TokenKind::Named, Replacements::Named(map)) => map
                .get(token.name)
                .ok_or_else(|| InjectError::MissingNamed(token.name.to_owned()))?,
            (TokenKind::Positional, Replacements::Positional(values)) => {
                let index = consumed;
                consumed += 1;
                values
                    .get(index)
                    .ok_or(InjectError::MissingPositional(index))?
            }
            _ => continue,
        };
        dialect.write_literal(out.replace(token.span), value)?;
        injected += 1;
    }

    tracing::debug!(
        candidates = tokens.len(),
        injected,
        flavor = %dialect.flavor,
        "injected replacements"
    );
    Ok(out.finish())
}

impl Flavor {
    /// 使用该方言的预设描述符注入 replacements。
    pub fn inject_replacements(
        self,
        sql: &str,
        replacements: &Replacements,
    ) -> Result<String, InjectError> {
        inject_replacements(sql, &self.descriptor(), replacements)
    }
}
