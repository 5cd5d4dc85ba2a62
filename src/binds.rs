//! 绑定参数映射：把 `$name` / `$1` 改写为方言原生的绑定参数语法。
//!
//! 与 replacement 不同，这里不会内联任何值；返回的 `bind_order` 描述了
//! 驱动需要的参数顺序（按最终 SQL 文本中的出现顺序）。

use crate::args::BindValues;
use crate::dialect::{BindStyle, DialectDescriptor};
use crate::flavor::Flavor;
use crate::scanner::{ScanError, TokenKind, scan};
use crate::string_builder::Splicer;
use crate::value::SqlValue;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 内部生成的绑定参数名前缀，调用方提供的绑定参数不能使用。
pub const RESERVED_BIND_PREFIX: &str = "halo_";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(
        "Bind parameter \"{name}\" uses the reserved prefix \"{prefix}\". Bind parameters starting with \"{prefix}\" are generated internally and cannot be provided by the caller."
    )]
    ReservedName { name: String, prefix: String },
    #[error(
        "Query includes bind parameter \"${0}\", but no value has been provided for that bind parameter."
    )]
    MissingBind(String),
}

/// 按方言的绑定风格收集绑定参数，并写出对应的占位符。
#[derive(Debug, Clone)]
pub struct BindCollector {
    style: BindStyle,
    /// `?` 风格：每次出现都记录；编号风格：只记录首次出现。
    order: Vec<String>,
    numbers: HashMap<String, usize>,
}

impl BindCollector {
    pub fn new(style: BindStyle) -> Self {
        Self {
            style,
            order: Vec::new(),
            numbers: HashMap::new(),
        }
    }

    /// 记录一次名为 `name` 的绑定参数，并把原生占位符写入 `out`。
    pub fn collect(&mut self, name: &str, out: &mut String) {
        match self.style {
            BindStyle::QuestionMark => {
                self.order.push(name.to_owned());
                self.style.write_placeholder(name, self.order.len(), out);
            }
            BindStyle::Numbered(_) => {
                let n = match self.numbers.get(name) {
                    Some(&n) => n,
                    None => {
                        self.order.push(name.to_owned());
                        self.numbers.insert(name.to_owned(), self.order.len());
                        self.order.len()
                    }
                };
                self.style.write_placeholder(name, n, out);
            }
            BindStyle::Named(_) => self.style.write_placeholder(name, 0, out),
        }
    }

    /// 驱动需要的参数顺序；原生语法本身已经携带顺序时为 `None`。
    ///
    /// 编号风格下，只有当 `$1, $2, ...` 恰好映射到自身时才返回 `None`。
    pub fn into_bind_order(self) -> Option<Vec<String>> {
        match self.style {
            BindStyle::QuestionMark => Some(self.order),
            BindStyle::Numbered(_) => {
                let identity = self
                    .order
                    .iter()
                    .enumerate()
                    .all(|(i, name)| *name == (i + 1).to_string());
                (!identity).then_some(self.order)
            }
            BindStyle::Named(_) => None,
        }
    }
}

/// [`map_bind_parameters`] 的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedBinds {
    pub sql: String,
    pub bind_order: Option<Vec<String>>,
    /// SQL 中出现过的所有绑定参数名（不含 `$`）。
    pub parameter_set: BTreeSet<String>,
}

/// 把 `sql` 中的 `$name` / `$1` 改写为 `dialect` 的原生绑定参数。
///
/// `:name` 与 `?` 替换占位符保持原样。
pub fn map_bind_parameters(sql: &str, dialect: &DialectDescriptor) -> Result<MappedBinds, BindError> {
    let tokens = scan(sql, dialect)?;
    let mut out = Splicer::new(sql);
    let mut collector = BindCollector::new(dialect.bind_style);
    let mut parameter_set = BTreeSet::new();

    for token in &tokens {
        if !matches!(token.kind, TokenKind::Bind | TokenKind::NumberedBind) {
            continue;
        }
        collector.collect(token.name, out.replace(token.span));
        parameter_set.insert(token.name.to_owned());
    }

    tracing::debug!(
        binds = parameter_set.len(),
        flavor = %dialect.flavor,
        "mapped bind parameters"
    );
    Ok(MappedBinds {
        sql: out.finish(),
        bind_order: collector.into_bind_order(),
        parameter_set,
    })
}

impl Flavor {
    /// 使用该方言的预设描述符映射绑定参数。
    pub fn map_bind_parameters(self, sql: &str) -> Result<MappedBinds, BindError> {
        map_bind_parameters(sql, &self.descriptor())
    }
}

/// 为查询生成器内联的值分配 `$<prefix><n>` 绑定参数。
#[derive(Debug, Clone)]
pub struct BindParamGenerator {
    prefix: String,
    values: BTreeMap<String, SqlValue>,
}

impl Default for BindParamGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BindParamGenerator {
    pub fn new() -> Self {
        Self::with_prefix(RESERVED_BIND_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            values: BTreeMap::new(),
        }
    }

    /// 登记一个值，返回可直接拼进 SQL 的 `$halo_1` 形式的占位符。
    pub fn bind(&mut self, value: impl Into<SqlValue>) -> String {
        let name = format!("{}{}", self.prefix, self.values.len() + 1);
        let placeholder = format!("${name}");
        self.values.insert(name, value.into());
        placeholder
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_binds(self) -> BindValues {
        BindValues::Named(self.values)
    }
}

/// 调用方提供的绑定参数名不能以 `prefix` 开头。位置绑定参数总是合法的。
pub fn assert_no_reserved_bind(binds: &BindValues, prefix: &str) -> Result<(), BindError> {
    let BindValues::Named(map) = binds else {
        return Ok(());
    };
    match map.keys().find(|name| name.starts_with(prefix)) {
        Some(name) => Err(BindError::ReservedName {
            name: name.clone(),
            prefix: prefix.to_owned(),
        }),
        None => Ok(()),
    }
}

/// 合并调用方与生成器的绑定参数；位置参数的名字为 `"1".."n"`，同名时生成器优先。
pub fn combine_binds(user: BindValues, generated: BindValues) -> BindValues {
    let mut combined = user.into_named();
    combined.extend(generated.into_named());
    BindValues::Named(combined)
}

#[cfg(test)]
mod tests {
    use super::{BindCollector, BindParamGenerator};
    use crate::args::BindValues;
    use crate::dialect::BindStyle;
    use crate::value::SqlValue;
    use pretty_assertions::assert_eq;

    fn collect_all(style: BindStyle, names: &[&str]) -> (String, Option<Vec<String>>) {
        let mut c = BindCollector::new(style);
        let mut out = String::new();
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            c.collect(name, &mut out);
        }
        (out, c.into_bind_order())
    }

    #[test]
    fn question_mark_records_every_occurrence() {
        let (sql, order) = collect_all(BindStyle::QuestionMark, &["id", "name", "id"]);
        assert_eq!(sql, "? ? ?");
        assert_eq!(
            order,
            Some(vec!["id".to_string(), "name".to_string(), "id".to_string()])
        );
    }

    #[test]
    fn numbered_reuses_numbers() {
        let (sql, order) = collect_all(BindStyle::Numbered('$'), &["id", "name", "id"]);
        assert_eq!(sql, "$1 $2 $1");
        assert_eq!(order, Some(vec!["id".to_string(), "name".to_string()]));
    }

    #[test]
    fn numbered_identity_has_no_order() {
        let (sql, order) = collect_all(BindStyle::Numbered('$'), &["1", "2", "1"]);
        assert_eq!(sql, "$1 $2 $1");
        assert_eq!(order, None);

        let (sql, order) = collect_all(BindStyle::Numbered(':'), &["2", "1"]);
        assert_eq!(sql, ":1 :2");
        assert_eq!(order, Some(vec!["2".to_string(), "1".to_string()]));
    }

    #[test]
    fn named_keeps_names() {
        let (sql, order) = collect_all(BindStyle::Named('@'), &["id", "1"]);
        assert_eq!(sql, "@id @1");
        assert_eq!(order, None);
    }

    #[test]
    fn generator_issues_prefixed_names() {
        let mut g = BindParamGenerator::new();
        assert_eq!(g.bind(1_i64), "$halo_1");
        assert_eq!(g.bind("x"), "$halo_2");
        assert_eq!(g.len(), 2);
        assert_eq!(
            g.into_binds(),
            BindValues::named([
                ("halo_1", SqlValue::I64(1)),
                ("halo_2", SqlValue::from("x")),
            ])
        );
    }
}
