use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info};

use crate::models::{
    new_id, InsightKind, LeadershipCategory, LeadershipMetric, MetricKind, PerformanceInsight,
    PerformancePoint, Priority, Trend,
};

/// Length of each rolling comparison window.
pub const WINDOW_DAYS: i64 = 30;

const EVIDENCE_PER_CATEGORY: usize = 3;

/// Incoming sample before it receives an id.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSample {
    pub metric: MetricKind,
    pub value: f64,
    pub timestamp: NaiveDate,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricChange {
    pub value: i64,
    pub change: i64,
}

impl MetricChange {
    fn average(a: MetricChange, b: MetricChange) -> Self {
        Self {
            value: round_half_up((a.value + b.value) as f64 / 2.0) as i64,
            change: round_half_up((a.change + b.change) as f64 / 2.0) as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatestMetrics {
    /// Efficiency.
    pub productivity: MetricChange,
    /// Quality.
    pub growth: MetricChange,
    /// Engagement and efficiency.
    pub capacity: MetricChange,
    /// Leadership and quality.
    pub response: MetricChange,
}

/// Rounds halves toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Start of the current window and start of the previous window for `today`.
pub fn window_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let current_start = today - Duration::days(WINDOW_DAYS);
    let previous_start = current_start - Duration::days(WINDOW_DAYS);
    (current_start, previous_start)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Time-series performance samples with derived leadership scores and insights.
///
/// Points are kept sorted newest first. Derived collections are recomputed
/// after every write.
#[derive(Debug, Clone, Default)]
pub struct PerformanceLedger {
    user_id: String,
    points: Vec<PerformancePoint>,
    leadership: Vec<LeadershipMetric>,
    insights: Vec<PerformanceInsight>,
}

impl PerformanceLedger {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn points(&self) -> &[PerformancePoint] {
        &self.points
    }

    pub fn leadership_metrics(&self) -> &[LeadershipMetric] {
        &self.leadership
    }

    pub fn insights(&self) -> &[PerformanceInsight] {
        &self.insights
    }

    /// Discards existing points and loads `samples`.
    pub fn replace(&mut self, samples: Vec<PerformanceSample>) {
        self.points.clear();
        self.ingest(samples);
    }

    /// Merges samples keyed by (date, metric). A sample whose key already
    /// exists overwrites the stored value and trend but keeps the stored id,
    /// so re-ingesting a batch leaves the ledger unchanged.
    pub fn ingest(&mut self, samples: Vec<PerformanceSample>) -> usize {
        let mut index: HashMap<(NaiveDate, MetricKind), usize> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| ((p.timestamp, p.metric), i))
            .collect();

        let received = samples.len();
        for sample in samples {
            let key = (sample.timestamp, sample.metric);
            match index.get(&key).copied() {
                Some(i) => {
                    let point = &mut self.points[i];
                    point.value = sample.value;
                    point.trend = sample.trend;
                    point.user_id = self.user_id.clone();
                }
                None => {
                    index.insert(key, self.points.len());
                    self.points.push(PerformancePoint {
                        id: new_id(),
                        user_id: self.user_id.clone(),
                        metric: sample.metric,
                        value: sample.value,
                        timestamp: sample.timestamp,
                        trend: sample.trend,
                    });
                }
            }
        }

        self.points.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.metric.cmp(&b.metric))
        });

        self.recompute();
        info!(received, stored = self.points.len(), "performance samples ingested");
        received
    }

    fn recompute(&mut self) {
        self.leadership = leadership_metrics(&self.user_id, &self.points);
        self.insights = performance_insights(&self.user_id, &self.points);
        debug!(
            leadership = self.leadership.len(),
            insights = self.insights.len(),
            "derived performance views recomputed"
        );
    }

    pub fn latest_metrics(&self) -> LatestMetrics {
        self.latest_metrics_at(Utc::now().date_naive())
    }

    pub fn latest_metrics_at(&self, today: NaiveDate) -> LatestMetrics {
        let efficiency = self.metric_change(MetricKind::Efficiency, today);
        let engagement = self.metric_change(MetricKind::Engagement, today);
        let quality = self.metric_change(MetricKind::Quality, today);
        let leadership = self.metric_change(MetricKind::Leadership, today);

        LatestMetrics {
            productivity: efficiency,
            growth: quality,
            capacity: MetricChange::average(engagement, efficiency),
            response: MetricChange::average(leadership, quality),
        }
    }

    /// Mean of the current window against the previous one. An empty
    /// previous window compares against the current mean.
    pub fn metric_change(&self, metric: MetricKind, today: NaiveDate) -> MetricChange {
        let (current_start, previous_start) = window_bounds(today);
        let mut current = Vec::new();
        let mut previous = Vec::new();

        for point in self.points.iter().filter(|p| p.metric == metric) {
            if point.timestamp > current_start {
                current.push(point.value);
            } else if point.timestamp > previous_start {
                previous.push(point.value);
            }
        }

        let current_value = mean(&current).unwrap_or(0.0);
        let previous_value = mean(&previous).unwrap_or(current_value);
        let change = if previous_value == 0.0 {
            0.0
        } else {
            (current_value - previous_value) / previous_value * 100.0
        };

        MetricChange {
            value: round_half_up(current_value) as i64,
            change: round_half_up(change) as i64,
        }
    }

    /// Value of the newest sample for `metric`, or 0.
    pub fn most_recent_value(&self, metric: MetricKind) -> f64 {
        most_recent_value(&self.points, metric)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn most_recent_value(points: &[PerformancePoint], metric: MetricKind) -> f64 {
    points
        .iter()
        .filter(|p| p.metric == metric)
        .max_by_key(|p| p.timestamp)
        .map(|p| p.value)
        .unwrap_or(0.0)
}

/// 0-10 score from the mean of one metric's samples.
pub fn leadership_score(points: &[PerformancePoint], metric: MetricKind) -> u8 {
    let values: Vec<f64> = points
        .iter()
        .filter(|p| p.metric == metric)
        .map(|p| p.value)
        .collect();
    match mean(&values) {
        Some(average) => round_half_up(average / 100.0 * 10.0).clamp(0.0, 10.0) as u8,
        None => 0,
    }
}

struct CategoryTemplate {
    category: LeadershipCategory,
    source: MetricKind,
    evidence: [&'static str; 5],
    recommendations: [&'static str; 3],
}

const CATEGORY_TEMPLATES: [CategoryTemplate; 4] = [
    CategoryTemplate {
        category: LeadershipCategory::Communication,
        source: MetricKind::Leadership,
        evidence: [
            "Effectively leads team meetings",
            "Clear and concise documentation",
            "Positive feedback from team members",
            "Strong presentation skills",
            "Regular status updates",
        ],
        recommendations: [
            "Lead more cross-team meetings",
            "Create communication guidelines",
            "Share best practices",
        ],
    },
    CategoryTemplate {
        category: LeadershipCategory::Initiative,
        source: MetricKind::Efficiency,
        evidence: [
            "Proactively identifies process improvements",
            "Takes ownership of critical projects",
            "Mentors junior team members",
            "Drives innovation",
            "Leads by example",
        ],
        recommendations: [
            "Lead strategic projects",
            "Create innovation programs",
            "Mentor new leaders",
        ],
    },
    CategoryTemplate {
        category: LeadershipCategory::Mentorship,
        source: MetricKind::Engagement,
        evidence: [
            "Regular 1:1 sessions with team members",
            "Positive mentee feedback",
            "Knowledge sharing sessions",
            "Career development guidance",
            "Technical mentoring",
        ],
        recommendations: [
            "Develop mentorship program",
            "Create learning paths",
            "Share success stories",
        ],
    },
    CategoryTemplate {
        category: LeadershipCategory::Innovation,
        source: MetricKind::Quality,
        evidence: [
            "Introduces new tools to the team",
            "Prototypes alternative approaches",
            "Raises the quality bar on reviews",
            "Experiments with process changes",
            "Shares lessons from failed experiments",
        ],
        recommendations: [
            "Run an internal hack day",
            "Document experiment outcomes",
            "Pilot one new practice per quarter",
        ],
    },
];

pub fn leadership_metrics(user_id: &str, points: &[PerformancePoint]) -> Vec<LeadershipMetric> {
    CATEGORY_TEMPLATES
        .iter()
        .enumerate()
        .map(|(i, template)| LeadershipMetric {
            id: (i + 1).to_string(),
            user_id: user_id.to_string(),
            category: template.category,
            score: leadership_score(points, template.source),
            evidence: template
                .evidence
                .iter()
                .take(EVIDENCE_PER_CATEGORY)
                .map(|s| s.to_string())
                .collect(),
            recommendations: template.recommendations.iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}

pub fn performance_insights(user_id: &str, points: &[PerformancePoint]) -> Vec<PerformanceInsight> {
    if points.is_empty() {
        return Vec::new();
    }

    let leadership_priority = if most_recent_value(points, MetricKind::Leadership) > 80.0 {
        Priority::High
    } else {
        Priority::Medium
    };
    let balance_priority = if most_recent_value(points, MetricKind::Engagement) < 70.0 {
        Priority::High
    } else {
        Priority::Medium
    };

    vec![
        PerformanceInsight {
            id: "1".to_string(),
            user_id: user_id.to_string(),
            kind: InsightKind::Strength,
            title: "Technical Leadership Excellence".to_string(),
            description: "Demonstrates exceptional ability in technical leadership and mentoring"
                .to_string(),
            metrics: vec![MetricKind::Efficiency, MetricKind::Leadership],
            recommendations: strings(&[
                "Lead architecture review sessions",
                "Create technical documentation guidelines",
                "Mentor junior developers",
            ]),
            priority: leadership_priority,
        },
        PerformanceInsight {
            id: "2".to_string(),
            user_id: user_id.to_string(),
            kind: InsightKind::Improvement,
            title: "Work-Life Balance".to_string(),
            description: "Current workload patterns suggest potential sustainability concerns"
                .to_string(),
            metrics: vec![MetricKind::Engagement, MetricKind::Efficiency],
            recommendations: strings(&[
                "Delegate non-critical tasks",
                "Schedule regular breaks",
                "Review project timelines",
            ]),
            priority: balance_priority,
        },
        PerformanceInsight {
            id: "3".to_string(),
            user_id: user_id.to_string(),
            kind: InsightKind::Opportunity,
            title: "Cross-team Collaboration".to_string(),
            description: "Potential to expand influence across different teams".to_string(),
            metrics: vec![MetricKind::Leadership, MetricKind::Engagement],
            recommendations: strings(&[
                "Join cross-functional projects",
                "Share knowledge in company-wide forums",
                "Build relationships with other team leads",
            ]),
            priority: Priority::Medium,
        },
    ]
}
