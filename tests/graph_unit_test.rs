//! Renderer properties over hand-built models.

use dbviz::graph::{
    make_identifier, render, to_dot, to_mermaid, to_plantuml, GraphView, Layout, OutputFormat,
    RenderMode,
};
use dbviz::schema::{Column, Model, TableRegistry};

const FORMATS: [OutputFormat; 4] = [
    OutputFormat::Dot,
    OutputFormat::PlantUml,
    OutputFormat::Mermaid,
    OutputFormat::Json,
];

/// EMP(PK_EMP_ID pk, LNAME not-null, FK_DEPT_ID -> DEPT.PK_DEPT_ID), DEPT(PK_DEPT_ID pk, NAME not-null)
fn emp_dept() -> Model {
    let mut registry = TableRegistry::new();
    let emp = registry.get_or_create(None, None, "EMP");
    let dept = registry.get_or_create(None, None, "DEPT");
    registry.table_mut(emp).unwrap().set_columns(vec![
        Column::new("PK_EMP_ID", "INTEGER").primary_key().not_null(),
        Column::new("LNAME", "VARCHAR(80)").not_null(),
        Column::new("FK_DEPT_ID", "INTEGER").references(dept, Some("PK_DEPT_ID")),
    ]);
    registry.table_mut(dept).unwrap().set_columns(vec![
        Column::new("PK_DEPT_ID", "INTEGER").primary_key().not_null(),
        Column::new("NAME", "VARCHAR(40)").not_null(),
    ]);
    Model::new(registry, vec![emp, dept])
}

/// Three tables with distinctive column names, one self reference and one
/// table that references another twice
fn warehouse() -> Model {
    let mut registry = TableRegistry::new();
    let stock = registry.get_or_create(Some("db"), Some("inv"), "STOCK$ITEM");
    let site = registry.get_or_create(Some("db"), Some("inv"), "SITE");
    let part = registry.get_or_create(Some("db"), Some("inv"), "PART");
    registry.table_mut(stock).unwrap().set_columns(vec![
        Column::new("STOCK_KEY", "BIGINT").primary_key().not_null(),
        Column::new("SOURCE_SITE_REF", "INTEGER").references(site, Some("SITE_KEY")),
        Column::new("TARGET_SITE_REF", "INTEGER").references(site, Some("SITE_KEY")),
        Column::new("PART_REF", "INTEGER").references(part, Some("PART_KEY")),
        Column::new("QTY_ON_HAND", "DECIMAL(12,3)").not_null(),
    ]);
    registry.table_mut(site).unwrap().set_columns(vec![
        Column::new("SITE_KEY", "INTEGER").primary_key(),
        Column::new("SITE_LABEL", "VARCHAR(60)").unique().not_null(),
        Column::new("PARENT_SITE_REF", "INTEGER").references(site, Some("SITE_KEY")),
    ]);
    registry
        .table_mut(part)
        .unwrap()
        .set_columns(vec![Column::new("PART_KEY", "INTEGER").primary_key()]);
    Model::new(registry, vec![stock, site, part])
}

fn column_names(model: &Model) -> Vec<String> {
    model
        .tables()
        .flat_map(|t| t.columns().iter().map(|c| c.name.clone()))
        .collect()
}

#[test]
fn test_make_identifier() {
    assert_eq!(make_identifier("my.schema$tbl"), "my_schema_tbl");
}

#[test]
fn test_end_to_end_emp_dept_dot() {
    let model = emp_dept();
    let dot = to_dot(&model, RenderMode::Detailed, Layout::TB);

    assert_eq!(dot.matches("  emp [label=<").count(), 1);
    assert_eq!(dot.matches("  dept [label=<").count(), 1);

    let emp_line = dot.lines().find(|l| l.starts_with("  emp [")).unwrap();
    for name in ["PK_EMP_ID", "LNAME", "FK_DEPT_ID"] {
        assert!(emp_line.contains(name), "{name} missing from emp node");
    }
    let dept_line = dot.lines().find(|l| l.starts_with("  dept [")).unwrap();
    for name in ["PK_DEPT_ID", "NAME"] {
        assert!(dept_line.contains(name), "{name} missing from dept node");
    }

    let edges: Vec<&str> = dot.lines().filter(|l| l.contains(" -> ")).collect();
    assert_eq!(edges, vec!["  emp:p0 -> dept:p0 [arrowtail=crow, dir=back];"]);
}

#[test]
fn test_rendering_is_deterministic() {
    for model in [emp_dept(), warehouse()] {
        for format in FORMATS {
            for mode in [RenderMode::Detailed, RenderMode::EntitiesOnly] {
                for layout in [Layout::TB, Layout::LR] {
                    let first = render(&model, format, mode, layout);
                    let second = render(&model, format, mode, layout);
                    assert_eq!(first, second, "{format} {mode} {layout}");
                }
            }
        }
    }
}

#[test]
fn test_entities_only_never_emits_column_names() {
    let model = warehouse();
    let names = column_names(&model);

    for format in FORMATS {
        let text = render(&model, format, RenderMode::EntitiesOnly, Layout::TB);
        for name in &names {
            assert!(!text.contains(name.as_str()), "{format} leaked column {name}");
        }
    }
}

#[test]
fn test_detailed_emits_every_column_once() {
    let model = warehouse();
    let names = column_names(&model);

    let dot = to_dot(&model, RenderMode::Detailed, Layout::TB);
    let puml = to_plantuml(&model, RenderMode::Detailed);
    let mermaid = to_mermaid(&model, RenderMode::Detailed);

    for text in [&dot, &puml, &mermaid] {
        for name in &names {
            // Column names are chosen so none is a substring of another
            assert_eq!(text.matches(name.as_str()).count(), 1, "{name} in\n{text}");
        }
    }
}

#[test]
fn test_one_edge_per_referenced_table() {
    let model = warehouse();
    let view = GraphView::new(&model, RenderMode::Detailed);

    let pairs: Vec<(&str, &str)> = view
        .edges
        .iter()
        .map(|e| (e.from_id.as_str(), e.to_id.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("db_inv_stock_item", "db_inv_site"),
            ("db_inv_stock_item", "db_inv_part"),
            ("db_inv_site", "db_inv_site"),
        ]
    );

    let dot = to_dot(&model, RenderMode::EntitiesOnly, Layout::LR);
    assert_eq!(dot.matches(" -> ").count(), 3);
    assert!(dot.contains("rankdir=LR"));
    assert!(dot.contains("db_inv_stock_item:p0 -> db_inv_site:p0"));

    let puml = to_plantuml(&model, RenderMode::Detailed);
    assert_eq!(puml.matches("}o--||").count(), 3);
}

#[test]
fn test_sanitized_identifier_used_everywhere() {
    let model = warehouse();
    let dot = to_dot(&model, RenderMode::Detailed, Layout::TB);

    assert!(dot.contains("  db_inv_stock_item [label=<"));
    assert!(!dot.contains("stock$item"));
    assert!(dot.contains("<B>STOCK$ITEM</B>"));

    let puml = to_plantuml(&model, RenderMode::Detailed);
    assert!(puml.contains("entity \"STOCK$ITEM\" as db_inv_stock_item {"));
}

#[test]
fn test_edges_to_unlisted_tables_are_emitted() {
    let mut registry = TableRegistry::new();
    let orders = registry.get_or_create(None, Some("s"), "ORDERS");
    let customers = registry.get_or_create(None, Some("s"), "CUSTOMERS");
    registry.table_mut(orders).unwrap().set_columns(vec![
        Column::new("ORDER_NO", "INTEGER").primary_key(),
        Column::new("CUSTOMER_NO", "INTEGER").references(customers, None),
    ]);
    let model = Model::new(registry, vec![orders]);

    let dot = to_dot(&model, RenderMode::Detailed, Layout::TB);
    assert!(!dot.contains("  s_customers [label"));
    assert!(dot.contains("s_orders:p0 -> s_customers:p0"));
}

#[test]
fn test_empty_model() {
    let model = Model::new(TableRegistry::new(), Vec::new());
    assert_eq!(
        to_dot(&model, RenderMode::Detailed, Layout::TB),
        "digraph tables {\n  graph [pad=\"0.5\", nodesep=\"1\", ranksep=\"1.5\"];\n  rankdir=TB;\n  node [shape=plaintext];\n\n}\n"
    );
    assert_eq!(
        to_plantuml(&model, RenderMode::Detailed),
        "@startuml\nhide circle\nskinparam linetype ortho\n\n@enduml\n"
    );
}
