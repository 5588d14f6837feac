//! Plain-text rendering of a table model.

use std::fmt::Write;
use tablescope::{ColumnDescriptor, TableModel};

/// Render `model` as an indented listing, one column per line.
pub fn render_model(table: &str, model: &TableModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} columns)", table, model.len());

    for column in model {
        render_column(&mut out, column);
    }
    out
}

fn render_column(out: &mut String, column: &ColumnDescriptor) {
    let mut attrs = Vec::new();
    if column.mandatory {
        attrs.push("mandatory".to_string());
    }
    if column.inherited {
        attrs.push("inherited".to_string());
    }
    if column.auto_generated {
        attrs.push("auto".to_string());
    }
    if column.is_virtual {
        attrs.push("virtual".to_string());
    }
    if column.max_length > 0 {
        attrs.push(format!("max {}", column.max_length));
    }

    let attrs = if attrs.is_empty() {
        String::new()
    } else {
        format!(" [{}]", attrs.join(", "))
    };
    let _ = writeln!(
        out,
        "  {}: {}{}  \"{}\"",
        column.name, column.internal_type, attrs, column.label
    );

    if let Some(reference) = &column.reference_detail {
        let _ = writeln!(
            out,
            "    -> {}.{} ({})",
            reference.target_table, reference.display_field, reference.label
        );
    }
    for choice in &column.choice_entries {
        let _ = writeln!(out, "    {}. {} = {}", choice.order, choice.value, choice.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablescope::{ColumnDef, MemoryCatalog, TableDef, build_table_model};

    #[test]
    fn test_render_incident() {
        let catalog = MemoryCatalog::new()
            .with_table(
                TableDef::new("user", "User")
                    .display_field("name")
                    .column(ColumnDef::new("name", "Name", "string").max_length(151)),
            )
            .with_table(
                TableDef::new("task", "Task")
                    .column(
                        ColumnDef::new("number", "Number", "string")
                            .max_length(40)
                            .mandatory(),
                    )
                    .column(
                        ColumnDef::new("sys_class_name", "Task type", "sys_class_name")
                            .choice("task", "Task")
                            .choice("incident", "Incident"),
                    )
                    .column(
                        ColumnDef::new("assigned_to", "Assigned to", "reference")
                            .max_length(32)
                            .reference("user"),
                    ),
            )
            .with_table(
                TableDef::new("incident", "Incident").extends("task").column(
                    ColumnDef::new("urgency", "Urgency", "integer")
                        .choice("1", "1 - High")
                        .choice("2", "2 - Medium"),
                ),
            );

        let model = build_table_model(&catalog, Some("incident")).unwrap();
        insta::assert_snapshot!(render_model("incident", &model), @r#"
        incident (4 columns)
          assigned_to: reference [inherited, max 32]  "Assigned to"
            -> user.name (User)
          number: string [mandatory, inherited, max 40]  "Number"
          sys_class_name: sys_class_name [inherited]  "Task type"
            1. incident = Incident
          urgency: integer  "Urgency"
            1. 1 = 1 - High
            2. 2 = 2 - Medium
        "#);
    }

    #[test]
    fn test_render_empty_model() {
        let rendered = render_model("empty", &TableModel::default());
        assert_eq!(rendered, "empty (0 columns)\n");
    }
}
