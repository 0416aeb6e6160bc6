//! End-to-end introspection of real DuckDB databases.

use dbviz::error::DbvizError;
use dbviz::graph::{to_dot, to_plantuml, Layout, RenderMode};
use dbviz::introspect::{compile_filter, retrieve, Dialect};
use dbviz::metadata::{open_database, DuckDbMetadata};
use duckdb::Connection;
use schema_gen::{FkStyle, Scale, SchemaGenerator};
use std::path::Path;
use tempfile::TempDir;

const EMP_DEPT: &str = "
CREATE TABLE dept (
    pk_dept_id INTEGER PRIMARY KEY,
    name VARCHAR(40) NOT NULL
);
CREATE TABLE emp (
    pk_emp_id INTEGER PRIMARY KEY,
    lname VARCHAR(80) NOT NULL,
    salary DECIMAL(10,2),
    fk_dept_id INTEGER,
    FOREIGN KEY (fk_dept_id) REFERENCES dept (pk_dept_id)
);
COMMENT ON TABLE emp IS 'Employees';
";

fn emp_dept() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(EMP_DEPT).unwrap();
    conn
}

#[test]
fn test_introspect_emp_dept() {
    let conn = emp_dept();
    let source = DuckDbMetadata::new(&conn);
    let model = retrieve(&source, Dialect::DuckDb, None, Some("main"), None).unwrap();

    let names: Vec<&str> = model.tables().map(|t| t.name()).collect();
    assert_eq!(names, vec!["dept", "emp"]);
    assert!(model
        .database_product
        .as_deref()
        .unwrap()
        .starts_with("DuckDB"));

    let emp = model.get_table("main.emp").unwrap();
    assert_eq!(emp.comment(), Some("Employees"));
    assert!(emp.get_column("pk_emp_id").unwrap().primary_key);
    assert!(emp.get_column("lname").unwrap().not_null);
    assert_eq!(
        emp.get_column("salary").unwrap().type_descriptor,
        "DECIMAL(10,2)"
    );

    let dept = model.get_table("main.dept").unwrap();
    let fk_col = emp.get_column("fk_dept_id").unwrap();
    assert_eq!(fk_col.foreign_key_table(), Some(dept.id()));
    assert_eq!(emp.foreign_key_relations(), &[dept.id()]);
    assert_eq!(model.registry_len(), 2);
}

#[test]
fn test_introspect_all_schemas() {
    let conn = emp_dept();
    conn.execute_batch("CREATE SCHEMA audit; CREATE TABLE audit.log (id INTEGER, message VARCHAR);")
        .unwrap();
    let source = DuckDbMetadata::new(&conn);
    let model = retrieve(&source, Dialect::DuckDb, None, None, None).unwrap();

    let names: Vec<&str> = model.tables().map(|t| t.name()).collect();
    assert!(names.contains(&"log"));
    assert!(names.contains(&"emp"));
    assert!(model.tables().all(|t| t.key().split('.').count() == 3));
}

#[test]
fn test_filter_keeps_foreign_key_target() {
    let conn = emp_dept();
    let source = DuckDbMetadata::new(&conn);
    let filter = compile_filter("^emp").unwrap();
    let model = retrieve(&source, Dialect::DuckDb, None, Some("main"), Some(&filter)).unwrap();

    assert_eq!(model.len(), 1);
    let emp = model.tables().next().unwrap();
    let targets: Vec<&str> = model.relations(emp).map(|t| t.name()).collect();
    assert_eq!(targets, vec!["dept"]);
}

#[test]
fn test_rendering_from_live_database() {
    let conn = emp_dept();
    let source = DuckDbMetadata::new(&conn);
    let model = retrieve(&source, Dialect::DuckDb, None, Some("main"), None).unwrap();

    let dot = to_dot(&model, RenderMode::Detailed, Layout::TB);
    assert!(dot.contains("  main_emp [label=<"));
    assert!(dot.contains("  main_dept [label=<"));
    assert!(dot.contains("main_emp:p0 -> main_dept:p0"));

    let puml = to_plantuml(&model, RenderMode::Detailed);
    assert!(puml.contains("entity \"emp\" as main_emp {"));
    assert!(puml.contains("  *pk_emp_id : INTEGER\n  --\n"));
    assert!(puml.contains("main_emp }o--|| main_dept"));
}

#[test]
fn test_generated_schema_roundtrip() {
    let schema = SchemaGenerator::new(3, Scale::Medium).generate();
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&schema.to_ddl(FkStyle::Inline)).unwrap();

    let source = DuckDbMetadata::new(&conn);
    let model = retrieve(&source, Dialect::DuckDb, None, Some("main"), None).unwrap();

    assert_eq!(model.len(), schema.tables.len());
    assert_eq!(model.column_count(), schema.column_count());
    assert_eq!(model.relationship_count(), schema.foreign_key_count());
    assert_eq!(model.registry_len(), schema.tables.len());
}

#[test]
fn test_open_database_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("company.duckdb");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(EMP_DEPT).unwrap();
    }

    let conn = open_database(&path, true).unwrap();
    let source = DuckDbMetadata::new(&conn);
    let model = retrieve(&source, Dialect::DuckDb, None, Some("main"), None).unwrap();
    assert_eq!(model.len(), 2);
}

#[test]
fn test_open_missing_database_fails() {
    let err = open_database(Path::new("/nonexistent/dir/none.duckdb"), true).unwrap_err();
    assert!(matches!(err, DbvizError::ConnectionFailure { .. }));
}

#[test]
fn test_foreign_key_spelled_in_other_case_resolves_to_same_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE dept (pk_dept_id INTEGER PRIMARY KEY, name VARCHAR(40) NOT NULL);
         CREATE TABLE emp (
             pk_emp_id INTEGER PRIMARY KEY,
             fk_dept_id INTEGER,
             FOREIGN KEY (FK_DEPT_ID) REFERENCES DEPT(PK_DEPT_ID)
         );",
    )
    .unwrap();
    let source = DuckDbMetadata::new(&conn);
    let model = retrieve(&source, Dialect::DuckDb, None, Some("main"), None).unwrap();

    assert_eq!(model.registry_len(), 2);
    let emp = model.get_table("main.emp").unwrap();
    let dept = model.get_table("main.dept").unwrap();
    let fk = emp.get_column("fk_dept_id").unwrap();
    assert_eq!(fk.foreign_key_table(), Some(dept.id()));
    assert_eq!(
        fk.foreign_key.as_ref().and_then(|r| r.column.as_deref()),
        Some("pk_dept_id")
    );
    assert_eq!(emp.foreign_key_relations(), &[dept.id()]);
}
