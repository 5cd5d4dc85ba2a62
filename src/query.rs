//! 查询准备：先内联 replacements，再映射绑定参数并按驱动需要的顺序整理参数值。

use crate::args::{BindValues, Replacements};
use crate::binds::{
    BindError, RESERVED_BIND_PREFIX, assert_no_reserved_bind, combine_binds, map_bind_parameters,
};
use crate::dialect::{BindStyle, DialectDescriptor};
use crate::replacements::{InjectError, inject_replacements};
use crate::value::SqlValue;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Inject(#[from] InjectError),
    #[error(transparent)]
    Bind(#[from] BindError),
}

/// 交给驱动的参数。
#[derive(Debug, Clone, PartialEq)]
pub enum BoundParams {
    /// 按最终 SQL 中占位符的顺序排列。
    Ordered(Vec<SqlValue>),
    /// 命名风格方言（`@name` / `$name`），只包含 SQL 中用到的名字。
    Named(BTreeMap<String, SqlValue>),
}

impl BoundParams {
    pub fn len(&self) -> usize {
        match self {
            Self::Ordered(v) => v.len(),
            Self::Named(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 可以直接交给驱动执行的 SQL 与参数。
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuery {
    pub sql: String,
    pub params: BoundParams,
    pub bind_order: Option<Vec<String>>,
}

/// [`prepare_query`] 的输入。
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub replacements: Option<Replacements>,
    /// 调用方提供的绑定参数，不能使用 [`RESERVED_BIND_PREFIX`]。
    pub bind: Option<BindValues>,
    /// 查询生成器通过 [`BindParamGenerator`](crate::binds::BindParamGenerator) 生成的绑定参数。
    pub generated_bind: Option<BindValues>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replacements(mut self, replacements: Replacements) -> Self {
        self.replacements = Some(replacements);
        self
    }

    pub fn bind(mut self, bind: BindValues) -> Self {
        self.bind = Some(bind);
        self
    }

    pub fn generated_bind(mut self, bind: BindValues) -> Self {
        self.generated_bind = Some(bind);
        self
    }
}

/// 映射绑定参数并整理参数值。
///
/// 依次执行：保留前缀检查、合并绑定参数、改写占位符、检查缺失的值。
pub fn prepare_binds(
    sql: &str,
    dialect: &DialectDescriptor,
    user: BindValues,
    generated: BindValues,
) -> Result<PreparedQuery, BindError> {
    assert_no_reserved_bind(&user, RESERVED_BIND_PREFIX)?;
    let combined = combine_binds(user, generated);
    let mapped = map_bind_parameters(sql, dialect)?;

    let lookup = |name: &str| {
        combined
            .get(name)
            .cloned()
            .ok_or_else(|| BindError::MissingBind(name.to_owned()))
    };

    let params = match (&mapped.bind_order, dialect.bind_style) {
        (Some(order), _) => BoundParams::Ordered(
            order
                .iter()
                .map(|name| lookup(name.as_str()))
                .collect::<Result<_, _>>()?,
        ),
        (None, BindStyle::Named(_)) => BoundParams::Named(
            mapped
                .parameter_set
                .iter()
                .map(|name| lookup(name.as_str()).map(|v| (name.clone(), v)))
                .collect::<Result<_, _>>()?,
        ),
        // 编号恰好是 1..=n，原生语法本身就是顺序
        (None, _) => BoundParams::Ordered(
            (1..=mapped.parameter_set.len())
                .map(|n| lookup(n.to_string().as_str()))
                .collect::<Result<_, _>>()?,
        ),
    };

    tracing::debug!(
        params = params.len(),
        flavor = %dialect.flavor,
        "prepared bind parameters"
    );
    Ok(PreparedQuery {
        sql: mapped.sql,
        params,
        bind_order: mapped.bind_order,
    })
}

/// 完整的查询准备流程：replacements 内联之后再处理绑定参数。
///
/// replacement 的结果里即使出现 `$name` 形式的文本，只要位于字符串字面量中就不会被当作绑定参数。
pub fn prepare_query(
    sql: &str,
    dialect: &DialectDescriptor,
    options: &QueryOptions,
) -> Result<PreparedQuery, QueryError> {
    let injected = match &options.replacements {
        Some(replacements) => inject_replacements(sql, dialect, replacements)?,
        None => sql.to_owned(),
    };
    let user = options
        .bind
        .clone()
        .unwrap_or_else(|| BindValues::Named(BTreeMap::new()));
    let generated = options
        .generated_bind
        .clone()
        .unwrap_or_else(|| BindValues::Named(BTreeMap::new()));
    Ok(prepare_binds(&injected, dialect, user, generated)?)
}
