use serde::Serialize;

/// An action item reshaped from the Fairwinds Insights wire format.
#[derive(Debug, Clone, Serialize)]
pub struct ActionItem {
    pub title: String,
    pub severity: Severity,
    pub cluster: String,
    pub resource_name: String,
    pub report_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    None,
}

impl Severity {
    /// Insights reports severity as a 0..=1 score; bucket it the way the
    /// dashboard does.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Self::Critical
        } else if score >= 0.65 {
            Self::High
        } else if score >= 0.4 {
            Self::Medium
        } else if score > 0.0 {
            Self::Low
        } else {
            Self::None
        }
    }
}

/// Severity-bucketed vulnerability counts plus the highest-severity items.
#[derive(Debug, Clone, Serialize)]
pub struct VulnerabilityReport {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub top_items: Vec<ActionItem>,
}

pub fn bucket_by_severity(mut items: Vec<ActionItem>, top: usize) -> VulnerabilityReport {
    let count = |s: Severity| items.iter().filter(|i| i.severity == s).count();
    let report = VulnerabilityReport {
        total: items.len(),
        critical: count(Severity::Critical),
        high: count(Severity::High),
        medium: count(Severity::Medium),
        low: count(Severity::Low),
        top_items: Vec::new(),
    };
    items.sort_by_key(|i| i.severity as u8);
    items.truncate(top);
    VulnerabilityReport { top_items: items, ..report }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkloadCost {
    pub workload: String,
    pub cluster: String,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostReport {
    pub total_cost: f64,
    pub workloads: Vec<WorkloadCost>,
}

impl CostReport {
    pub fn from_workloads(workloads: Vec<WorkloadCost>) -> Self {
        let total_cost = workloads.iter().map(|w| w.total_cost).sum();
        Self { total_cost, workloads }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(severity: Severity) -> ActionItem {
        ActionItem {
            title: "outdated base image".to_string(),
            severity,
            cluster: "prod".to_string(),
            resource_name: "api-server".to_string(),
            report_type: "trivy".to_string(),
        }
    }

    #[test]
    fn severity_buckets() {
        assert_eq!(Severity::from_score(0.95), Severity::Critical);
        assert_eq!(Severity::from_score(0.7), Severity::High);
        assert_eq!(Severity::from_score(0.5), Severity::Medium);
        assert_eq!(Severity::from_score(0.1), Severity::Low);
        assert_eq!(Severity::from_score(0.0), Severity::None);
    }

    #[test]
    fn bucket_counts_and_orders_top_items() {
        let items = vec![item(Severity::Low), item(Severity::Critical), item(Severity::High)];
        let report = bucket_by_severity(items, 2);
        assert_eq!(report.total, 3);
        assert_eq!(report.critical, 1);
        assert_eq!(report.high, 1);
        assert_eq!(report.low, 1);
        assert_eq!(report.top_items.len(), 2);
        assert_eq!(report.top_items[0].severity, Severity::Critical);
        assert_eq!(report.top_items[1].severity, Severity::High);
    }

    #[test]
    fn cost_report_totals() {
        let report = CostReport::from_workloads(vec![
            WorkloadCost { workload: "api".into(), cluster: "prod".into(), total_cost: 12.5 },
            WorkloadCost { workload: "worker".into(), cluster: "prod".into(), total_cost: 7.5 },
        ]);
        assert!((report.total_cost - 20.0).abs() < f64::EPSILON);
    }
}
