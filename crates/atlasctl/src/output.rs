//! Structured output rendering

use comfy_table::Table;
use serde::Serialize;
use serde_json::Value;

use crate::cli;
use crate::error::Result;

/// Machine-readable formats; `auto` output is printed by each command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

impl OutputFormat {
    /// Structured format requested on the command line, if any
    pub fn structured(format: cli::OutputFormat) -> Option<Self> {
        match format {
            cli::OutputFormat::Auto => None,
            cli::OutputFormat::Json => Some(Self::Json),
            cli::OutputFormat::Yaml => Some(Self::Yaml),
            cli::OutputFormat::Table => Some(Self::Table),
        }
    }
}

pub fn print_output<T: Serialize>(data: T, format: OutputFormat) -> Result<()> {
    let json_value = serde_json::to_value(data)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json_value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&json_value)?);
        }
        OutputFormat::Table => {
            println!("{}", render_table(&json_value));
        }
    }

    Ok(())
}

fn render_table(value: &Value) -> String {
    match value {
        Value::Array(arr) if !arr.is_empty() => {
            let mut table = Table::new();

            if let Value::Object(first) = &arr[0] {
                let headers: Vec<String> = first.keys().cloned().collect();
                table.set_header(&headers);

                for item in arr {
                    if let Value::Object(obj) = item {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|h| format_value(obj.get(h).unwrap_or(&Value::Null)))
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![format_value(item)]);
                }
            }

            table.to_string()
        }
        Value::Object(obj) => {
            let mut table = Table::new();
            table.set_header(vec!["Key", "Value"]);

            for (key, val) in obj {
                table.add_row(vec![key.clone(), format_value(val)]);
            }

            table.to_string()
        }
        _ => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_format_mapping() {
        assert_eq!(OutputFormat::structured(cli::OutputFormat::Auto), None);
        assert_eq!(
            OutputFormat::structured(cli::OutputFormat::Yaml),
            Some(OutputFormat::Yaml)
        );
    }

    #[test]
    fn test_table_from_array_of_objects() {
        let table = render_table(&json!([
            {"id": "org1", "name": "Organization 1"},
            {"id": "org2", "name": "Organization 2"}
        ]));
        assert!(table.contains("org1"));
        assert!(table.contains("Organization 2"));
        assert!(table.contains("name"));
    }

    #[test]
    fn test_table_from_object() {
        let table = render_table(&json!({"cluster_name": "demo", "tier": "free"}));
        assert!(table.contains("Key"));
        assert!(table.contains("demo"));
    }

    #[test]
    fn test_format_value_summaries() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1})), "{1 fields}");
    }
}
