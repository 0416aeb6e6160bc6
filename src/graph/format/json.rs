//! JSON export of the ER model.

use crate::graph::view::GraphView;
use crate::graph::RenderMode;
use crate::schema::Model;
use serde::Serialize;

/// JSON representation of the ERD
#[derive(Debug, Serialize)]
pub struct ErdJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub tables: Vec<TableJson>,
    pub relationships: Vec<RelationshipJson>,
    pub stats: ErdStats,
}

/// JSON representation of a table
#[derive(Debug, Serialize)]
pub struct TableJson {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Empty in entities-only mode
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnJson>,
}

/// JSON representation of a column
#[derive(Debug, Serialize)]
pub struct ColumnJson {
    pub name: String,
    #[serde(rename = "type")]
    pub col_type: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_unique: bool,
    pub is_nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references_column: Option<String>,
}

/// JSON representation of a relationship
#[derive(Debug, Serialize)]
pub struct RelationshipJson {
    pub from_table: String,
    pub to_table: String,
}

/// ERD statistics
#[derive(Debug, Serialize)]
pub struct ErdStats {
    pub table_count: usize,
    pub column_count: usize,
    pub relationship_count: usize,
}

/// Generate JSON output from a model
pub fn to_json(model: &Model, mode: RenderMode) -> String {
    let erd = build_erd_json(model, mode);
    serde_json::to_string_pretty(&erd).unwrap_or_else(|_| "{}".to_string())
}

/// Build the JSON structure
pub fn build_erd_json(model: &Model, mode: RenderMode) -> ErdJson {
    let view = GraphView::new(model, mode);
    let mut total_columns = 0;

    let tables: Vec<TableJson> = view
        .tables
        .iter()
        .map(|sketch| {
            let columns: Vec<ColumnJson> = sketch
                .lines
                .iter()
                .map(|line| {
                    let col = line.column;
                    let target = col.foreign_key.as_ref();
                    ColumnJson {
                        name: col.name.clone(),
                        col_type: col.type_descriptor.clone(),
                        is_primary_key: col.primary_key,
                        is_foreign_key: col.is_foreign_key(),
                        is_unique: col.unique,
                        is_nullable: !col.not_null,
                        comment: col.comment.clone(),
                        references_table: target
                            .and_then(|fk| model.table(fk.table))
                            .map(|t| t.key().to_string()),
                        references_column: target.and_then(|fk| fk.column.clone()),
                    }
                })
                .collect();

            total_columns += columns.len();

            TableJson {
                id: sketch.id.clone(),
                key: sketch.table.key().to_string(),
                name: sketch.display_name.to_string(),
                comment: sketch.table.comment().map(str::to_string),
                columns,
            }
        })
        .collect();

    let relationships: Vec<RelationshipJson> = view
        .edges
        .iter()
        .map(|e| RelationshipJson {
            from_table: e.from_key.clone(),
            to_table: e.to_key.clone(),
        })
        .collect();

    ErdJson {
        database: model.database_product.clone(),
        catalog: model.catalog.clone(),
        schema: model.schema.clone(),
        tables,
        relationships,
        stats: ErdStats {
            table_count: view.table_count(),
            column_count: total_columns,
            relationship_count: view.edge_count(),
        },
    }
}
