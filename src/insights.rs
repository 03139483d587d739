//! Insight and recommendation rules
//!
//! Deterministic threshold rules that turn metrics and patterns into advisory
//! messages. Rules are evaluated in a fixed order; each category is gated
//! independently and simply omitted when nothing triggers it.

use tracing::debug;
use uuid::Uuid;

use crate::config::RuleThresholds;
use crate::types::{
    ActivityMetrics, ActivityPatterns, Insight, InsightType, Priority, Recommendation,
};

/// Rule engine for insights and recommendations
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    thresholds: RuleThresholds,
}

impl InsightEngine {
    pub fn new(thresholds: RuleThresholds) -> Self {
        Self { thresholds }
    }

    /// Generate insights in rule order: activity level, inactivity, consistency
    pub fn generate_insights(
        &self,
        metrics: &ActivityMetrics,
        patterns: &ActivityPatterns,
    ) -> Vec<Insight> {
        let t = &self.thresholds;
        let mut insights = Vec::new();

        // Activity level. The band (low, good] falls through to the general message.
        if metrics.avg_intensity < t.low_intensity {
            insights.push(insight(
                InsightType::ActivityLevel,
                "Your activity level has been quite low during this session. Adding more movement to your day can boost your energy levels.",
                Priority::Medium,
            ));
        } else if metrics.avg_intensity > t.high_intensity {
            insights.push(insight(
                InsightType::ActivityLevel,
                "Great job! You had high activity levels during this session.",
                Priority::High,
            ));
        } else if metrics.avg_intensity > t.good_intensity {
            insights.push(insight(
                InsightType::ActivityLevel,
                "You had a good level of activity during this session.",
                Priority::Medium,
            ));
        } else {
            insights.push(insight(
                InsightType::ActivityLevel,
                "I've analyzed your movement patterns. Consider adding more varied movements to your routine.",
                Priority::Low,
            ));
        }

        let period_count = patterns.inactivity_periods.len();
        if period_count > 0 {
            let priority = if period_count > t.many_inactivity_periods {
                Priority::High
            } else {
                Priority::Medium
            };
            insights.push(insight(
                InsightType::Inactivity,
                &format!(
                    "I noticed {period_count} periods of inactivity. Taking movement breaks can help maintain your energy and focus."
                ),
                priority,
            ));
        }

        let long_session = metrics.total_duration > t.min_consistency_minutes;
        if long_session && metrics.movement_consistency > t.consistent_movement {
            insights.push(insight(
                InsightType::Consistency,
                "Your movement was very consistent during this session. This is great for maintaining steady energy.",
                Priority::Medium,
            ));
        } else if long_session && metrics.movement_consistency < t.variable_movement {
            insights.push(insight(
                InsightType::Consistency,
                "Your movement patterns showed high variability. This could indicate sporadic activity.",
                Priority::Low,
            ));
        }

        for item in &mut insights {
            item.id = new_id();
        }

        debug!(count = insights.len(), "generated insights");
        insights
    }

    /// Generate recommendations: activity level, inactivity, consistency, daily goal
    pub fn generate_recommendations(
        &self,
        metrics: &ActivityMetrics,
        patterns: &ActivityPatterns,
    ) -> Vec<Recommendation> {
        let t = &self.thresholds;
        let mut recommendations = Vec::new();

        if metrics.avg_intensity < t.low_intensity {
            recommendations.push(recommendation(
                InsightType::ActivityLevel,
                "Increase Your Movement",
                "Try to incorporate more movement throughout your day. Even small actions like standing up and stretching can make a difference.",
                Priority::High,
            ));
        } else if metrics.avg_intensity > t.high_intensity {
            recommendations.push(recommendation(
                InsightType::ActivityLevel,
                "Great Activity Level",
                "You're maintaining a good activity level. Keep up the great work!",
                Priority::Low,
            ));
        } else {
            recommendations.push(recommendation(
                InsightType::ActivityLevel,
                "Optimize Your Movement Patterns",
                "Consider adding variety to your movement patterns for better overall health.",
                Priority::Medium,
            ));
        }

        if !patterns.inactivity_periods.is_empty() {
            recommendations.push(recommendation(
                InsightType::Inactivity,
                "Break Up Sitting Periods",
                "I noticed periods of inactivity. Try setting a timer to remind you to move every 30 minutes.",
                Priority::High,
            ));
        }

        if metrics.movement_consistency < t.variable_movement
            && metrics.total_duration > t.min_consistency_minutes
        {
            recommendations.push(recommendation(
                InsightType::Consistency,
                "Find Steady Rhythms",
                "Your movement patterns show high variability. Finding more consistent, rhythmic movements might help you maintain energy throughout the day.",
                Priority::Medium,
            ));
        }

        if metrics.active_minutes < t.low_active_minutes
            && metrics.total_duration > t.goal_min_session_minutes
        {
            recommendations.push(recommendation(
                InsightType::DailyGoal,
                "Set a Small Movement Goal",
                "Try to include at least 10 minutes of active movement in your next session.",
                Priority::Medium,
            ));
        } else if metrics.active_minutes > t.goal_active_minutes {
            recommendations.push(recommendation(
                InsightType::DailyGoal,
                "You're Meeting Activity Goals",
                "You've reached over 20 minutes of active movement. Keep maintaining this healthy pattern!",
                Priority::Low,
            ));
        }

        for item in &mut recommendations {
            item.id = new_id();
        }

        debug!(count = recommendations.len(), "generated recommendations");
        recommendations
    }
}

/// Generate insights with the default thresholds
pub fn generate_insights(metrics: &ActivityMetrics, patterns: &ActivityPatterns) -> Vec<Insight> {
    InsightEngine::default().generate_insights(metrics, patterns)
}

/// Generate recommendations with the default thresholds
pub fn generate_recommendations(
    metrics: &ActivityMetrics,
    patterns: &ActivityPatterns,
) -> Vec<Recommendation> {
    InsightEngine::default().generate_recommendations(metrics, patterns)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn insight(insight_type: InsightType, message: &str, priority: Priority) -> Insight {
    Insight {
        id: String::new(),
        insight_type,
        message: message.to_string(),
        priority,
    }
}

fn recommendation(
    recommendation_type: InsightType,
    title: &str,
    message: &str,
    priority: Priority,
) -> Recommendation {
    Recommendation {
        id: String::new(),
        recommendation_type,
        title: title.to_string(),
        message: message.to_string(),
        priority,
    }
}
