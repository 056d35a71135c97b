use askama::Template;

pub struct MetricCard {
    pub label: String,
    pub value: String,
}

pub struct AssetToggle {
    pub name: String,
    pub checked: bool,
}

pub struct CoinOption {
    pub coin_id: String,
    pub name: String,
    pub selected: bool,
}

pub struct QueryLink {
    pub id: String,
    pub title: String,
}

pub struct TopicGroup {
    pub topic: String,
    pub queries: Vec<QueryLink>,
}

#[derive(Template)]
#[template(path = "dashboard.html.jinja")]
pub struct DashboardTemplate {
    pub start: String,
    pub end: String,
    pub asset_toggles: Vec<AssetToggle>,
    pub metrics: Vec<MetricCard>,
    pub chart_json: String,
    pub table_columns: Vec<String>,
    pub table_rows: Vec<Vec<String>>,
}

#[derive(Template)]
#[template(path = "asset.html.jinja")]
pub struct AssetTemplate {
    pub coin_name: String,
    pub coins: Vec<CoinOption>,
    pub chart_json: String,
}

#[derive(Template)]
#[template(path = "correlation.html.jinja")]
pub struct CorrelationTemplate {
    pub chart_json: String,
}

#[derive(Template)]
#[template(path = "queries.html.jinja")]
pub struct QueriesTemplate {
    pub groups: Vec<TopicGroup>,
}

#[derive(Template)]
#[template(path = "query_result.html.jinja")]
pub struct QueryResultTemplate {
    pub title: String,
    pub sql: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Group digits for the metric cards ("1234567.89" -> "12,34,567.89"
/// is not attempted; plain western grouping is used).
pub fn format_money(value: f64) -> String {
    let raw = format!("{:.2}", value);
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let negative = int_part.starts_with('-');
    let digits: Vec<char> = int_part.trim_start_matches('-').chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(1234.5), "1,234.50");
        assert_eq!(format_money(9876543.21), "9,876,543.21");
        assert_eq!(format_money(-1234.5), "-1,234.50");
    }

    #[test]
    fn test_dashboard_template_renders() {
        let template = DashboardTemplate {
            start: String::new(),
            end: String::new(),
            asset_toggles: vec![AssetToggle {
                name: "BTC_INR".to_string(),
                checked: true,
            }],
            metrics: vec![MetricCard {
                label: "BTC Avg (INR)".to_string(),
                value: "1,234.50".to_string(),
            }],
            chart_json: "[]".to_string(),
            table_columns: vec!["Entry_Date".to_string(), "BTC_INR".to_string()],
            table_rows: vec![vec!["2025-01-15".to_string(), "1234.50".to_string()]],
        };
        let html = template.render().unwrap();
        assert!(html.contains("BTC Avg (INR)"));
        assert!(html.contains("2025-01-15"));
    }

    #[test]
    fn test_query_result_template_escapes_cells() {
        let template = QueryResultTemplate {
            title: "Test".to_string(),
            sql: "SELECT 1".to_string(),
            columns: vec!["col".to_string()],
            rows: vec![vec!["<b>raw</b>".to_string()]],
        };
        let html = template.render().unwrap();
        assert!(html.contains("&lt;b&gt;raw&lt;/b&gt;"));
    }
}
