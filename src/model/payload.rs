//! Content payload extraction
//!
//! Planner output is loosely typed: a content object may carry text, rows,
//! a table, an image or a chart, in several shapes. [`Payload::from_content`]
//! decides exactly one authoritative payload per operation, by the fixed
//! priority text > rows > table > image > chart.

use serde_json::Value;

use super::plan::RawContent;

/// Rectangular table data; every row has the same number of cells
pub type TableRows = Vec<Vec<String>>;

/// The authoritative content of one operation
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Table(TableRows),
    Image(ImagePayload),
    Chart(ChartPayload),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImagePayload {
    pub url: String,
    pub base64: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPayload {
    /// Lower-cased chart type requested by the planner ("bar", "line", ...)
    pub chart_type: String,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartPoint {
    pub label: String,
    pub value: String,
}

/// Chart families the host is asked to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ChartKind {
    ColumnClustered,
    Line,
    Pie,
}

impl Payload {
    pub fn from_content(content: &RawContent) -> Payload {
        if let Some(text) = content.text.as_deref() {
            if !text.trim().is_empty() {
                return Payload::Text(normalize_escaped_newlines(text).trim().to_string());
            }
        }
        if let Some(rows) = content.rows.as_ref().and_then(normalize_table_rows) {
            return Payload::Table(rows);
        }
        if let Some(rows) = content.table.as_ref().and_then(table_rows_from_value) {
            return Payload::Table(rows);
        }
        if let Some(image) = image_payload(content) {
            return Payload::Image(image);
        }
        if let Some(chart) = content.chart.as_ref().and_then(chart_payload) {
            return Payload::Chart(chart);
        }
        Payload::Empty
    }

    /// Plain-text rendering used by the text path and as the last fallback tier
    pub fn text_fallback(&self) -> String {
        match self {
            Payload::Text(text) => text.clone(),
            Payload::Table(rows) => rows_to_text(rows),
            Payload::Image(image) if !image.url.is_empty() => {
                format!("Image reference: {}", image.url)
            }
            Payload::Image(_) => String::new(),
            Payload::Chart(chart) => match chart.to_rows() {
                Some(rows) => rows_to_text(&rows),
                None => "Chart placeholder".to_string(),
            },
            Payload::Empty => String::new(),
        }
    }
}

impl ChartPayload {
    /// Table-of-values for the first series, with a header row.
    ///
    /// Returns `None` when no point carries a label or value.
    pub fn to_rows(&self) -> Option<TableRows> {
        let first = self.series.first()?;
        let mut rows = vec![vec!["Category".to_string(), first.name.clone()]];
        for point in &first.points {
            if point.label.is_empty() && point.value.is_empty() {
                continue;
            }
            rows.push(vec![point.label.clone(), point.value.clone()]);
        }
        (rows.len() > 1).then_some(rows)
    }

    pub fn kind(&self) -> ChartKind {
        if self.chart_type.contains("line") {
            ChartKind::Line
        } else if self.chart_type.contains("pie") {
            ChartKind::Pie
        } else {
            ChartKind::ColumnClustered
        }
    }
}

/// Join table rows into " | "-separated lines
pub fn rows_to_text(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.join(" | "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Turn literal escaped newline/tab sequences (single or double escaped) into real ones.
pub fn normalize_escaped_newlines(text: &str) -> String {
    let mut output = text.to_string();
    for _ in 0..3 {
        output = output
            .replace(r"\\r\\n", "\n")
            .replace(r"\\n", "\n")
            .replace(r"\\t", "\t")
            .replace(r"\r\n", "\n")
            .replace(r"\n", "\n")
            .replace(r"\t", "\t");
    }
    output
}

fn cell_to_string(value: &Value) -> String {
    let raw = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    normalize_escaped_newlines(&raw).trim().to_string()
}

/// Keep array rows, stringify cells and pad every row to the widest one
fn normalize_table_rows(value: &Value) -> Option<TableRows> {
    let rows: Vec<Vec<String>> = value
        .as_array()?
        .iter()
        .filter_map(Value::as_array)
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    let max_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if rows.is_empty() || max_cols == 0 {
        return None;
    }

    Some(
        rows.into_iter()
            .map(|mut row| {
                row.resize(max_cols, String::new());
                row
            })
            .collect(),
    )
}

fn table_rows_from_value(table: &Value) -> Option<TableRows> {
    match table {
        Value::Array(_) => normalize_table_rows(table),
        Value::Object(map) => {
            let mut rows = Vec::new();
            if let Some(headers) = map.get("headers").and_then(Value::as_array) {
                if !headers.is_empty() {
                    rows.push(headers.iter().map(cell_to_string).collect::<Vec<_>>());
                }
            }
            let body = map.get("rows").or_else(|| map.get("values"));
            if let Some(body) = body.and_then(normalize_table_rows) {
                rows.extend(body);
            }
            if rows.is_empty() {
                return None;
            }
            // Headers and body may disagree on width
            let max_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
            for row in &mut rows {
                row.resize(max_cols, String::new());
            }
            Some(rows)
        }
        _ => None,
    }
}

fn non_blank_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn image_payload(content: &RawContent) -> Option<ImagePayload> {
    match content.image.as_ref() {
        Some(Value::String(url)) if !url.trim().is_empty() => {
            return Some(ImagePayload {
                url: url.trim().to_string(),
                ..ImagePayload::default()
            });
        }
        Some(Value::Object(map)) => {
            let url = ["url", "src", "dataUrl"]
                .iter()
                .find_map(|key| non_blank_str(map.get(*key)))
                .unwrap_or_default();
            let base64 = non_blank_str(map.get("base64")).unwrap_or_default();
            let alt = non_blank_str(map.get("alt")).unwrap_or_default();
            if !url.is_empty() || !base64.is_empty() {
                return Some(ImagePayload { url, base64, alt });
            }
        }
        _ => {}
    }

    content
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| ImagePayload {
            url: url.to_string(),
            ..ImagePayload::default()
        })
}

fn chart_payload(chart: &Value) -> Option<ChartPayload> {
    let map = chart.as_object()?;
    let chart_type = non_blank_str(map.get("type"))
        .map(|t| t.to_lowercase())
        .unwrap_or_else(|| "bar".to_string());
    let series = map.get("series")?.as_array()?;
    if series.is_empty() {
        return None;
    }

    let series = series
        .iter()
        .map(|s| ChartSeries {
            name: non_blank_str(s.get("name")).unwrap_or_else(|| "Series".to_string()),
            points: s
                .get("data")
                .and_then(Value::as_array)
                .map(|data| data.iter().map(chart_point).collect())
                .unwrap_or_default(),
        })
        .collect();

    Some(ChartPayload { chart_type, series })
}

fn chart_point(point: &Value) -> ChartPoint {
    let label = point
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let value = match point.get("value") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };
    ChartPoint { label, value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn content(value: Value) -> RawContent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_wins_over_everything() {
        let c = content(json!({"text": "Hello", "rows": [["a"]], "chart": {"series": [{"data": []}]}}));
        assert_eq!(Payload::from_content(&c), Payload::Text("Hello".into()));
    }

    #[test]
    fn test_blank_text_falls_through_to_rows() {
        let c = content(json!({"text": "   ", "rows": [["a", 1], ["b"], "junk"]}));
        assert_eq!(
            Payload::from_content(&c),
            Payload::Table(vec![
                vec!["a".to_string(), "1".to_string()],
                vec!["b".to_string(), String::new()],
            ])
        );
    }

    #[test]
    fn test_table_object_with_headers() {
        let c = content(json!({"table": {"headers": ["Region", "Sales"], "values": [["EU", 12.5], [null, " 4 "]]}}));
        assert_eq!(
            Payload::from_content(&c),
            Payload::Table(vec![
                vec!["Region".to_string(), "Sales".to_string()],
                vec!["EU".to_string(), "12.5".to_string()],
                vec![String::new(), "4".to_string()],
            ])
        );
    }

    #[test]
    fn test_image_variants() {
        let c = content(json!({"image": " https://example.com/a.png "}));
        assert_eq!(
            Payload::from_content(&c),
            Payload::Image(ImagePayload {
                url: "https://example.com/a.png".into(),
                ..ImagePayload::default()
            })
        );

        let c = content(json!({"image": {"src": "data:image/png;base64,AAAA", "alt": "Logo"}}));
        match Payload::from_content(&c) {
            Payload::Image(img) => {
                assert_eq!(img.url, "data:image/png;base64,AAAA");
                assert_eq!(img.alt, "Logo");
            }
            other => panic!("expected image, got {:?}", other),
        }

        let c = content(json!({"imageUrl": "https://example.com/b.png"}));
        assert!(matches!(Payload::from_content(&c), Payload::Image(_)));
    }

    #[test]
    fn test_chart_to_rows() {
        let c = content(json!({"chart": {"type": "Line", "series": [
            {"name": "Revenue", "data": [{"label": "Q1", "value": 10}, {"label": "Q2", "value": "12"}, {}]}
        ]}}));
        let Payload::Chart(chart) = Payload::from_content(&c) else {
            panic!("expected chart");
        };
        assert_eq!(chart.chart_type, "line");
        assert_eq!(chart.kind(), ChartKind::Line);
        assert_eq!(
            chart.to_rows().unwrap(),
            vec![
                vec!["Category".to_string(), "Revenue".to_string()],
                vec!["Q1".to_string(), "10".to_string()],
                vec!["Q2".to_string(), "12".to_string()],
            ]
        );
        assert_eq!(
            Payload::Chart(chart).text_fallback(),
            "Category | Revenue\nQ1 | 10\nQ2 | 12"
        );
    }

    #[test]
    fn test_chart_without_points_has_placeholder_text() {
        let c = content(json!({"chart": {"series": [{"data": []}]}}));
        let payload = Payload::from_content(&c);
        let Payload::Chart(chart) = &payload else {
            panic!("expected chart");
        };
        assert_eq!(chart.chart_type, "bar");
        assert_eq!(chart.series[0].name, "Series");
        assert_eq!(chart.kind(), ChartKind::ColumnClustered);
        assert_eq!(payload.text_fallback(), "Chart placeholder");
    }

    #[test]
    fn test_chart_without_series_is_empty() {
        let c = content(json!({"chart": {"type": "pie", "series": []}}));
        assert_eq!(Payload::from_content(&c), Payload::Empty);
    }

    #[test]
    fn test_normalize_escaped_newlines() {
        assert_eq!(normalize_escaped_newlines(r"a\nb"), "a\nb");
        assert_eq!(normalize_escaped_newlines(r"a\\nb"), "a\nb");
        assert_eq!(normalize_escaped_newlines(r"a\r\nb\tc"), "a\nb\tc");
        assert_eq!(normalize_escaped_newlines("plain"), "plain");
    }
}
