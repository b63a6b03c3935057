use std::collections::HashMap;

use rand::Rng;

use crate::models::{JobPosting, TrendingSkill};

/// Size of the trending leaderboard
pub const TOP_SKILLS: usize = 10;

/// Skill frequencies across postings, most demanded first
///
/// Ties keep first-appearance order so repeated calls over the same postings
/// produce the same leaderboard.
pub fn count_skills(jobs: &[JobPosting]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for job in jobs {
        for skill in &job.skills {
            let entry = counts.entry(skill.as_str()).or_insert(0);
            if *entry == 0 {
                order.push(skill.as_str());
            }
            *entry += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|skill| (skill.to_string(), counts[skill]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_SKILLS);
    ranked
}

/// Demand label for a posting count
#[inline]
pub fn demand_label(count: usize) -> &'static str {
    if count > 5 {
        "High"
    } else if count > 2 {
        "Medium"
    } else {
        "Low"
    }
}

/// Mocked growth figure between +10% and +39%, regenerated per call.
/// Purely decorative until a real postings-over-time series exists.
pub fn mock_growth() -> String {
    format!("+{}%", rand::thread_rng().gen_range(10..40))
}

/// Assemble the trending leaderboard from ranked counts
pub fn trending_skills(ranked: &[(String, usize)]) -> Vec<TrendingSkill> {
    ranked
        .iter()
        .map(|(skill, count)| TrendingSkill {
            skill: skill.clone(),
            demand: demand_label(*count).to_string(),
            growth: mock_growth(),
        })
        .collect()
}
