use sea_orm_migration::prelude::*;

/// SQLite expression for "now" with millisecond precision, so consecutive
/// writes get distinguishable timestamps.
pub(crate) const NOW_MILLIS: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

pub(crate) fn pk_id_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

pub(crate) fn fk_id_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col).integer().not_null().to_owned()
}

pub(crate) fn text_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .string()
        .not_null()
        .default(Expr::val(""))
        .to_owned()
}

pub(crate) fn timestamp_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp()
        .not_null()
        .default(Expr::cust(format!("({NOW_MILLIS})")))
        .to_owned()
}

/// Trigger that refreshes `modified_at` whenever a row of `table` changes.
pub(crate) fn modified_at_trigger(table: &str) -> String {
    format!(
        "CREATE TRIGGER IF NOT EXISTS trg_{table}_modified_at \
         AFTER UPDATE ON {table} \
         FOR EACH ROW \
         BEGIN \
             UPDATE {table} SET modified_at = {NOW_MILLIS} WHERE id = NEW.id; \
         END;"
    )
}

pub(crate) fn drop_modified_at_trigger(table: &str) -> String {
    format!("DROP TRIGGER IF EXISTS trg_{table}_modified_at;")
}
