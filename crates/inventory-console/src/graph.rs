//! Metric graph launcher
//!
//! Translates a [`Metric`] into a URL for an external graphing tool
//! (Prometheus expression browser). A metric without a family or without
//! labels cannot be addressed and is skipped with a log line only.

use tracing::{debug, info};

use crate::config::GraphConfig;
use crate::encoding::encode_component;
use crate::model::Metric;

const DEFAULT_RANGE_INPUT: &str = "1h";

/// Opens a graph URL somewhere the operator can see it
pub trait UrlOpener {
    fn open(&self, url: &str);
}

/// Label selector expression for `metric`: `family{k1='v1',k2='v2'}`
///
/// Returns `None` when the family is absent or when there are no labels.
pub fn label_selector(metric: &Metric) -> Option<String> {
    let family = metric.family.as_deref()?;
    let labels = metric.labels.as_ref().filter(|l| !l.is_empty())?;

    let selector = labels
        .iter()
        .map(|(name, value)| format!("{name}='{value}'"))
        .collect::<Vec<_>>()
        .join(",");

    Some(format!("{family}{{{selector}}}"))
}

/// Graph URL for `metric` under `base_url` with the default 1h range
pub fn build_graph_url(metric: &Metric, base_url: &str) -> Option<String> {
    build_graph_url_with_range(metric, base_url, DEFAULT_RANGE_INPUT)
}

/// Graph URL for `metric` under `base_url` showing `range_input`
pub fn build_graph_url_with_range(
    metric: &Metric,
    base_url: &str,
    range_input: &str,
) -> Option<String> {
    let Some(expression) = label_selector(metric) else {
        info!(
            "Unable to show graph for metric [{}]. No family and/or no labels.",
            metric.display_name
        );
        return None;
    };

    let url = format!(
        "{}/graph?g0.range_input={}&g0.tab=0&g0.expr={}",
        base_url.trim_end_matches('/'),
        encode_component(range_input),
        encode_component(&expression)
    );
    debug!("Graph URL for metric [{}]: {}", metric.display_name, url);
    Some(url)
}

/// Builds graph URLs from configuration and hands them to an opener
#[derive(Debug, Clone)]
pub struct GraphLauncher {
    config: GraphConfig,
}

impl GraphLauncher {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn url_for(&self, metric: &Metric) -> Option<String> {
        build_graph_url_with_range(metric, &self.config.base_url, &self.config.range_input)
    }

    /// Open the graph for `metric`. Returns the URL when one was opened.
    pub fn launch(&self, metric: &Metric, opener: &dyn UrlOpener) -> Option<String> {
        let url = self.url_for(metric)?;
        opener.open(&url);
        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Labels;
    use std::cell::RefCell;

    fn metric(family: Option<&str>, labels: Option<Labels>) -> Metric {
        Metric {
            family: family.map(String::from),
            labels,
            ..Metric::new("CPU usage")
        }
    }

    #[test]
    fn test_no_family_yields_none() {
        let labels: Labels = [("pod", "a")].into_iter().collect();
        assert!(build_graph_url(&metric(None, Some(labels)), "http://h:9090").is_none());
    }

    #[test]
    fn test_no_labels_yields_none() {
        assert!(build_graph_url(&metric(Some("cpu_usage"), None), "http://h:9090").is_none());
    }

    #[test]
    fn test_empty_labels_yields_none() {
        let m = metric(Some("cpu_usage"), Some(Labels::new()));
        assert!(build_graph_url(&m, "http://h:9090").is_none());
    }

    #[test]
    fn test_single_label_url() {
        let labels: Labels = [("pod", "x")].into_iter().collect();
        let url = build_graph_url(&metric(Some("cpu_usage"), Some(labels)), "http://h:9090")
            .expect("url");
        assert_eq!(
            url,
            "http://h:9090/graph?g0.range_input=1h&g0.tab=0&g0.expr=cpu_usage%7Bpod%3D'x'%7D"
        );
    }

    #[test]
    fn test_labels_in_insertion_order() {
        let labels: Labels = [("pod", "x"), ("namespace", "prod"), ("app", "web")]
            .into_iter()
            .collect();
        let m = metric(Some("cpu_usage"), Some(labels));
        assert_eq!(
            label_selector(&m).as_deref(),
            Some("cpu_usage{pod='x',namespace='prod',app='web'}")
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let labels: Labels = [("pod", "x")].into_iter().collect();
        let url = build_graph_url(&metric(Some("up"), Some(labels)), "http://h:9090/")
            .expect("url");
        assert!(url.starts_with("http://h:9090/graph?"));
    }

    struct RecordingOpener(RefCell<Vec<String>>);

    impl UrlOpener for RecordingOpener {
        fn open(&self, url: &str) {
            self.0.borrow_mut().push(url.to_string());
        }
    }

    #[test]
    fn test_launcher_uses_configured_range() {
        let launcher = GraphLauncher::new(GraphConfig {
            base_url: "http://prom:9090".to_string(),
            range_input: "6h".to_string(),
        });
        let opener = RecordingOpener(RefCell::new(Vec::new()));

        let labels: Labels = [("pod", "x")].into_iter().collect();
        let url = launcher
            .launch(&metric(Some("up"), Some(labels)), &opener)
            .expect("launched");
        assert!(url.contains("g0.range_input=6h"));
        assert_eq!(opener.0.borrow().as_slice(), [url]);

        assert!(launcher.launch(&metric(None, None), &opener).is_none());
        assert_eq!(opener.0.borrow().len(), 1);
    }
}
