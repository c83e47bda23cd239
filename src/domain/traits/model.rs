/// A database model: a type mapped to one table.
///
/// Models are bound to the ORM through a model module registered in the
/// module catalog, never looked up by type at runtime.
pub trait Model {
    /// Table backing this model
    fn table_name() -> &'static str;

    /// DDL creating the table; must be safe to run against an existing schema
    fn create_table_sql() -> String;
}
