#[cfg(test)]
mod tests {
    use crate::args::Replacements;
    use crate::flavor::Flavor;
    use crate::modifiers::{Replacement, array, list, raw};
    use crate::replacements::{InjectError, inject_replacements};
    use crate::scanner::ScanError;
    use pretty_assertions::assert_eq;

    fn inject(flavor: Flavor, sql: &str, r: &Replacements) -> String {
        flavor.inject_replacements(sql, r).unwrap()
    }

    fn by_name(entries: Vec<(&str, Replacement)>) -> Replacements {
        Replacements::named(entries)
    }

    #[test]
    fn placeholder_inside_string_is_kept() {
        let r = Replacements::named([("id", 1_i64)]);
        assert_eq!(
            inject(Flavor::MySQL, "SELECT :id FROM t WHERE id = ':id'", &r),
            "SELECT 1 FROM t WHERE id = ':id'"
        );
    }

    #[test]
    fn named_placeholder_reuses_value() {
        let r = Replacements::named([("id", 5_i64)]);
        assert_eq!(
            inject(
                Flavor::PostgreSQL,
                "SELECT * FROM t WHERE id = fn(:id) OR id=:id",
                &r
            ),
            "SELECT * FROM t WHERE id = fn(5) OR id=5"
        );
    }

    #[test]
    fn positional_values_follow_source_order() {
        let r = Replacements::positional(vec![
            Replacement::from(1_i64),
            "a".into(),
            true.into(),
        ]);
        assert_eq!(
            inject(Flavor::MySQL, "SELECT ?, ?, ?", &r),
            "SELECT 1, 'a', TRUE"
        );
    }

    #[test]
    fn json_operator_is_left_alone() {
        let r = Replacements::positional([1_i64]);
        assert_eq!(
            inject(
                Flavor::PostgreSQL,
                "SELECT * FROM t WHERE tags ?& ARRAY[1] AND id = ?;",
                &r
            ),
            "SELECT * FROM t WHERE tags ?& ARRAY[1] AND id = 1;"
        );
    }

    #[test]
    fn missing_named_entry() {
        let r = Replacements::named([("other", 1_i64)]);
        let err = Flavor::MySQL
            .inject_replacements("SELECT :id", &r)
            .unwrap_err();
        assert_eq!(err, InjectError::MissingNamed("id".to_string()));
        assert_eq!(
            err.to_string(),
            "Named replacement \":id\" has no entry in the replacement map."
        );
    }

    #[test]
    fn missing_positional_entry() {
        let r = Replacements::positional([1_i64]);
        let err = Flavor::MySQL
            .inject_replacements("SELECT ?, ?", &r)
            .unwrap_err();
        assert_eq!(err, InjectError::MissingPositional(1));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn unterminated_string_is_propagated() {
        let r = Replacements::named([("id", 1_i64)]);
        let err = Flavor::PostgreSQL
            .inject_replacements("SELECT :id, 'oops", &r)
            .unwrap_err();
        assert_eq!(
            err,
            InjectError::Scan(ScanError::UnterminatedString {
                sql: "SELECT :id, 'oops".to_string()
            })
        );
    }

    #[test]
    fn other_placeholder_kinds_are_untouched() {
        let named = Replacements::named([("id", 1_i64)]);
        assert_eq!(
            inject(Flavor::MySQL, "SELECT ?, :id, $1, $name", &named),
            "SELECT ?, 1, $1, $name"
        );

        let positional = Replacements::positional([1_i64]);
        assert_eq!(
            inject(Flavor::MySQL, "SELECT ?, :id", &positional),
            "SELECT 1, :id"
        );
    }

    #[test]
    fn replaced_values_are_not_rescanned() {
        let r = by_name(vec![("a", ":b".into()), ("b", 2_i64.into())]);
        assert_eq!(
            inject(Flavor::PostgreSQL, "SELECT :a, :b", &r),
            "SELECT ':b', 2"
        );

        let r = by_name(vec![("a", raw(":b")), ("b", 2_i64.into())]);
        assert_eq!(
            inject(Flavor::PostgreSQL, "SELECT :a, :b", &r),
            "SELECT :b, 2"
        );
    }

    #[test]
    fn sql_without_placeholders_is_returned_unchanged() {
        let r = Replacements::named([("id", 1_i64)]);
        let sql = "SELECT * FROM t WHERE a::text = 'x' -- done";
        assert_eq!(inject(Flavor::PostgreSQL, sql, &r), sql);

        let once = inject(Flavor::MySQL, "SELECT :id FROM t WHERE id = ':id'", &r);
        assert_eq!(inject(Flavor::MySQL, &once, &r), once);
    }

    #[test]
    fn dollar_quoted_block_is_byte_for_byte_unchanged() {
        let r = Replacements::named([("id", 1_i64)]);
        let sql = "$tag$ :id $tag$";
        assert_eq!(inject(Flavor::PostgreSQL, sql, &r), sql);
    }

    #[test]
    fn cast_is_appended_after_value() {
        let r = Replacements::named([("id", 1_i64)]);
        assert_eq!(
            inject(Flavor::PostgreSQL, "SELECT :id::string", &r),
            "SELECT 1::string"
        );
    }

    #[test]
    fn falsy_values_are_injected() {
        let r = by_name(vec![("v", 0_i64.into()), ("b", false.into()), ("s", "".into())]);
        assert_eq!(
            inject(Flavor::PostgreSQL, "SELECT :v, :b, :s", &r),
            "SELECT 0, FALSE, ''"
        );
    }

    #[test]
    fn strings_use_dialect_escaping() {
        let r = Replacements::named([("name", "I'm")]);
        assert_eq!(inject(Flavor::MySQL, "SELECT :name", &r), r"SELECT 'I\'m'");
        assert_eq!(inject(Flavor::PostgreSQL, "SELECT :name", &r), "SELECT 'I''m'");
        assert_eq!(inject(Flavor::SQLServer, "SELECT :name", &r), "SELECT N'I''m'");
    }

    #[test]
    fn arrays_and_lists() {
        let r = by_name(vec![("ids", array([1_i64, 2]))]);
        assert_eq!(
            inject(Flavor::PostgreSQL, "SELECT * FROM t WHERE id = ANY(:ids)", &r),
            "SELECT * FROM t WHERE id = ANY(ARRAY[1,2])"
        );

        let r = by_name(vec![("ids", list([1_i64, 2]))]);
        assert_eq!(
            inject(Flavor::MySQL, "SELECT * FROM t WHERE id IN :ids", &r),
            "SELECT * FROM t WHERE id IN (1, 2)"
        );
    }

    #[test]
    fn bulk_values_from_array_of_lists() {
        let rows = array(vec![list(["john", "j@x"]), list(["mike", "m@x"])]);
        let r = Replacements::positional([rows]);
        assert_eq!(
            inject(
                Flavor::SQLServer,
                "INSERT INTO users (name, email) VALUES ?",
                &r
            ),
            "INSERT INTO users (name, email) VALUES (N'john', N'j@x'), (N'mike', N'm@x')"
        );
    }

    #[test]
    fn comments_and_quotes_in_comments() {
        let r = Replacements::named([("id", 1_i64)]);
        assert_eq!(
            inject(Flavor::PostgreSQL, "SELECT -- it's :id\n :id", &r),
            "SELECT -- it's :id\n 1"
        );
        assert_eq!(
            inject(Flavor::PostgreSQL, "SELECT /* :id */ :id", &r),
            "SELECT /* :id */ 1"
        );
    }

    #[test]
    fn three_backslashes_in_backslash_dialect() {
        let r = Replacements::named([("id", 1_i64)]);
        let sql = r"SELECT * FROM t WHERE a = '\\\' :id' OR id = :id";
        assert_eq!(
            inject(Flavor::MySQL, sql, &r),
            r"SELECT * FROM t WHERE a = '\\\' :id' OR id = 1"
        );
        assert!(matches!(
            Flavor::PostgreSQL.inject_replacements(sql, &r),
            Err(InjectError::Scan(_))
        ));
    }

    #[test]
    fn custom_descriptor() {
        let d = Flavor::PostgreSQL
            .descriptor()
            .with_identifier_delimiters('[', ']');
        let r = Replacements::named([("id", 1_i64)]);
        assert_eq!(
            inject_replacements("SELECT [:id], \":id\" = :id", &d, &r).unwrap(),
            "SELECT [:id], \":id\" = 1"
        );
    }

    #[test]
    fn positional_inside_array_brackets() {
        let r = Replacements::positional([1_i64, 1, 4]);
        assert_eq!(
            inject(
                Flavor::PostgreSQL,
                "SELECT * FROM t WHERE id = ARRAY[?]::int[] OR id = ARRAY[?,?]::int[]",
                &r
            ),
            "SELECT * FROM t WHERE id = ARRAY[1]::int[] OR id = ARRAY[1,4]::int[]"
        );
    }
}
