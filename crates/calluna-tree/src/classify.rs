use crate::profile_type::ProfileType;
use crate::stats::AggregateStats;

/// Classify a group by its aggregate statistics.
///
/// Thresholds are fractions in [0, 1]. Evaluation order is fixed:
///
/// 1. hit fraction ≤ `chance_max_hit` and refusal fraction ≤
///    `chance_max_refusal` → [`ProfileType::Chance`]
/// 2. otherwise, hit fraction ≥ `risk_min_hit` → [`ProfileType::Risk`]
/// 3. otherwise → [`ProfileType::Inbetween`]
///
/// Pure and total: every input yields exactly one type.
#[must_use]
pub fn classify(
    stats: &AggregateStats,
    chance_max_hit: f64,
    chance_max_refusal: f64,
    risk_min_hit: f64,
) -> ProfileType {
    if stats.hit_fraction <= chance_max_hit && stats.refusal_fraction <= chance_max_refusal {
        ProfileType::Chance
    } else if stats.hit_fraction >= risk_min_hit {
        ProfileType::Risk
    } else {
        ProfileType::Inbetween
    }
}
