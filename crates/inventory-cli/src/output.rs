use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use inventory_console::model::Resource;

#[derive(Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Table with the shared preset and the given header
pub fn new_table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// One row per resource: ID, Type, Name, Feed, Metrics
pub fn resources_table(resources: &[Resource]) -> Table {
    let mut table = new_table(["ID", "Type", "Name", "Feed", "Metrics"]);
    for resource in resources {
        table.add_row([
            truncate_string(&resource.id, 48),
            resource.type_id().to_string(),
            truncate_string(&resource.name, 40),
            resource.feed_id.clone().unwrap_or_else(|| "-".to_string()),
            resource.metrics.len().to_string(),
        ]);
    }
    table
}

/// Compact JSON summary of resources for `--json` output
pub fn resources_json(resources: &[Resource]) -> serde_json::Value {
    serde_json::Value::Array(
        resources
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": &r.id,
                    "name": &r.name,
                    "type": r.type_id(),
                    "feedId": &r.feed_id,
                    "metrics": r.metrics.len(),
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a very long identifier", 10), "a very ...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_string("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_resources_json_summary() {
        let resources = vec![Resource::new("s1", "alpha", "Server")];
        let json = resources_json(&resources);
        assert_eq!(json[0]["type"], "Server");
        assert_eq!(json[0]["metrics"], 0);
        assert!(json[0]["feedId"].is_null());
    }
}
