//! 宏集合：用字面量语法构造 replacement / 绑定参数表。
//!
//! - `replacements! { id => 1, name => "x" }` 构造命名表，`replacements![1, "x"]` 构造位置列表；
//! - `binds!` 同理，构造 [`BindValues`](crate::args::BindValues)。

#[doc(hidden)]
#[macro_export]
macro_rules! __collect_named {
    ($map:ty, $value:ty; $($name:ident => $v:expr),* $(,)?) => {{
        let mut values = <$map>::new();
        $(
            values.insert(::std::string::String::from(::std::stringify!($name)), <$value>::from($v));
        )*
        values
    }};
}

/// 构造 [`Replacements`](crate::args::Replacements)。
#[macro_export]
macro_rules! replacements {
    () => {
        $crate::args::Replacements::Named(::std::collections::HashMap::new())
    };
    ($($name:ident => $v:expr),+ $(,)?) => {
        $crate::args::Replacements::Named($crate::__collect_named!(
            ::std::collections::HashMap<::std::string::String, $crate::modifiers::Replacement>,
            $crate::modifiers::Replacement;
            $($name => $v),+
        ))
    };
    ($($v:expr),+ $(,)?) => {
        $crate::args::Replacements::Positional(vec![$($crate::modifiers::Replacement::from($v)),+])
    };
}

/// 构造 [`BindValues`](crate::args::BindValues)。
#[macro_export]
macro_rules! binds {
    () => {
        $crate::args::BindValues::Named(::std::collections::BTreeMap::new())
    };
    ($($name:ident => $v:expr),+ $(,)?) => {
        $crate::args::BindValues::Named($crate::__collect_named!(
            ::std::collections::BTreeMap<::std::string::String, $crate::value::SqlValue>,
            $crate::value::SqlValue;
            $($name => $v),+
        ))
    };
    ($($v:expr),+ $(,)?) => {
        $crate::args::BindValues::Positional(vec![$($crate::value::SqlValue::from($v)),+])
    };
}
