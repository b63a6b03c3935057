use std::collections::HashSet;

use crate::models::{ExperienceTier, JobPosting, ScoringWeights, User};

/// Tier adjacency factor: a posting one tier above (or any tier below) the
/// user earns 15 of the 20 experience points under default weights
const CLOSE_TIER_FACTOR: f64 = 0.75;

/// Points granted per matching project / education entry / career goal
const PROJECT_POINTS: f64 = 3.0;
const EDUCATION_POINTS: f64 = 2.0;
const GOAL_POINTS: f64 = 2.0;

/// Calculate a match percentage (0-100) for a job posting against a profile
///
/// Scoring formula (default weights):
/// score = (
///     skills_overlap * 60 +        # Shared skills / required skills
///     experience_fit * 20 +        # Exact tier 20, adjacent-or-below 15
///     project_hits * 3 (cap 10) +  # Project prefixes found in description
///     education_hits * 2 (cap 5) + # Education prefixes found in description
///     goal_hits * 2 (cap 5)        # Goal prefixes in description or title
/// ) / 100
///
/// The divisor is always the full weight sum: factors skipped for missing
/// data still count against the percentage. Ranking depends on that, so the
/// behavior is pinned by tests rather than "fixed".
pub fn calculate_match_score(
    user: &User,
    job: &JobPosting,
    weights: &ScoringWeights,
) -> (u8, Vec<String>) {
    let mut score = 0.0;
    let mut max_score = 0.0;

    // Stage 1: skills overlap, the dominant factor
    max_score += weights.skills;
    let matched_skills = skills_overlap(&user.skills, &job.skills);
    if !job.skills.is_empty() && !user.skills.is_empty() {
        score += weights.skills * matched_skills.len() as f64 / job.skills.len() as f64;
    }

    // Stage 2: experience tier proximity
    max_score += weights.experience;
    score += experience_score(
        user.experience_tier(),
        job.experience_tier(),
        weights.experience,
    );

    let description = job.description.to_lowercase();

    // Stage 3: project relevance against the posting description
    max_score += weights.projects;
    if !user.projects.is_empty() && !description.is_empty() {
        let hits = prefix_hits(&user.projects, &description, 20);
        score += (PROJECT_POINTS * hits as f64).min(weights.projects);
    }

    // Stage 4: education relevance
    max_score += weights.education;
    if !user.education.is_empty() && !description.is_empty() {
        let hits = prefix_hits(&user.education, &description, 15);
        score += (EDUCATION_POINTS * hits as f64).min(weights.education);
    }

    // Stage 5: goal alignment, description prefix or shorter title prefix
    max_score += weights.goals;
    if !user.career_goals.is_empty() {
        let title = job.title.to_lowercase();
        let hits = user
            .career_goals
            .iter()
            .filter(|goal| {
                description.contains(&lowercase_prefix(goal, 20))
                    || title.contains(&lowercase_prefix(goal, 15))
            })
            .count();
        score += (GOAL_POINTS * hits as f64).min(weights.goals);
    }

    if max_score <= 0.0 {
        return (0, matched_skills);
    }

    // Half-up rounding; the clamp only matters for pathological weight configs
    let percentage = (score / max_score * 100.0).round().clamp(0.0, 100.0) as u8;
    (percentage, matched_skills)
}

/// Required skills present in the profile, job order kept, duplicates dropped
#[inline]
fn skills_overlap(user_skills: &[String], job_skills: &[String]) -> Vec<String> {
    let user_set: HashSet<&str> = user_skills.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    job_skills
        .iter()
        .filter(|skill| user_set.contains(skill.as_str()) && seen.insert(skill.as_str()))
        .cloned()
        .collect()
}

/// Experience points: exact tier earns the full weight, a posting at most one
/// tier above (or anywhere below) earns the adjacency share, otherwise zero.
/// Unparseable tiers on either side earn nothing.
#[inline]
fn experience_score(
    user_tier: Option<ExperienceTier>,
    job_tier: Option<ExperienceTier>,
    weight: f64,
) -> f64 {
    match (user_tier, job_tier) {
        (Some(user), Some(job)) if user == job => weight,
        (Some(user), Some(job)) if job.index() <= user.index() + 1 => weight * CLOSE_TIER_FACTOR,
        _ => 0.0,
    }
}

/// Count entries whose lowercased character prefix appears in the haystack
#[inline]
fn prefix_hits(entries: &[String], haystack_lower: &str, prefix_chars: usize) -> usize {
    entries
        .iter()
        .filter(|entry| haystack_lower.contains(&lowercase_prefix(entry, prefix_chars)))
        .count()
}

/// First `max_chars` characters, lowercased; char-based so multibyte text
/// never slices mid-codepoint
#[inline]
fn lowercase_prefix(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn base_user() -> User {
        User {
            id: "user-1".to_string(),
            email: "dev@example.com".to_string(),
            password: "hash".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Reyes".to_string(),
            title: "Developer".to_string(),
            bio: String::new(),
            location: "Berlin".to_string(),
            profile_picture: String::new(),
            skills: vec![],
            career_goals: vec![],
            projects: vec![],
            education: vec![],
            experience: "senior".to_string(),
            created_at: Some(Utc::now()),
            updated_at: None,
        }
    }

    fn base_job() -> JobPosting {
        JobPosting {
            id: "job-1".to_string(),
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Berlin".to_string(),
            description: "We build payment infrastructure in Rust.".to_string(),
            salary: None,
            skills: vec![],
            experience: "senior".to_string(),
            job_type: Some("full-time".to_string()),
            requirements: vec![],
            benefits: vec![],
            application_url: None,
            posted_date: Utc::now(),
            is_active: true,
        }
    }

    #[test]
    fn score_is_bounded_and_deterministic() {
        let mut user = base_user();
        user.skills = vec!["Rust".to_string(), "SQL".to_string()];
        user.career_goals = vec!["Backend Engineer".to_string()];
        let mut job = base_job();
        job.skills = vec!["Rust".to_string(), "Kubernetes".to_string()];

        let weights = ScoringWeights::default();
        let (first, _) = calculate_match_score(&user, &job, &weights);
        let (second, _) = calculate_match_score(&user, &job, &weights);

        assert!(first <= 100);
        assert_eq!(first, second);
    }

    #[test]
    fn disjoint_skills_with_exact_tier_scores_twenty() {
        let mut user = base_user();
        user.skills = vec!["Rust".to_string()];
        let mut job = base_job();
        job.skills = vec!["Go".to_string()];
        job.description = String::new();

        let (score, matched) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(score, 20);
        assert!(matched.is_empty());
    }

    #[test]
    fn full_overlap_with_exact_tier_scores_eighty() {
        let mut user = base_user();
        user.skills = vec!["Rust".to_string(), "SQL".to_string()];
        let mut job = base_job();
        job.skills = vec!["Rust".to_string(), "SQL".to_string()];
        job.description = String::new();

        let (score, matched) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(score, 80);
        assert_eq!(matched, vec!["Rust", "SQL"]);
    }

    #[test]
    fn missing_factors_still_weigh_the_denominator() {
        // No skills on the profile: the 60-point factor is skipped entirely
        // yet the divisor stays 100, so an exact tier match is 20, not 50.
        let user = base_user();
        let mut job = base_job();
        job.skills = vec!["Rust".to_string()];
        job.description = String::new();

        let (score, _) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(score, 20);
    }

    #[test]
    fn adjacent_tier_earns_partial_credit() {
        let mut user = base_user();
        user.experience = "entry".to_string();
        let mut job = base_job();
        job.experience = "mid".to_string();
        job.description = String::new();

        let (score, _) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(score, 15);

        // Two tiers above is out of reach
        job.experience = "senior".to_string();
        let (score, _) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(score, 0);
    }

    #[test]
    fn tier_below_the_user_still_earns_partial_credit() {
        let mut user = base_user();
        user.experience = "executive".to_string();
        let mut job = base_job();
        job.experience = "entry".to_string();
        job.description = String::new();

        let (score, _) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(score, 15);
    }

    #[test]
    fn unknown_tier_earns_nothing() {
        let mut user = base_user();
        user.experience = "wizard".to_string();
        let mut job = base_job();
        job.description = String::new();

        let (score, _) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(score, 0);
    }

    #[test]
    fn project_hits_are_capped_at_the_factor_weight() {
        let mut user = base_user();
        user.experience = "wizard".to_string();
        user.projects = vec![
            "Payment gateway integration".to_string(),
            "Payment reconciliation tool".to_string(),
            "Payment fraud detector".to_string(),
            "Payment ledger service".to_string(),
        ];
        let mut job = base_job();
        job.description =
            "payment gateway integrationpayment reconciliation toolpayment fraud detectorpayment ledger servic"
                .to_string();

        // Four hits at 3 points each would be 12; the factor caps at 10
        let (score, _) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(score, 10);
    }

    #[test]
    fn education_prefix_matches_against_description() {
        let mut user = base_user();
        user.experience = "wizard".to_string();
        user.education = vec!["Bachelor of Science in Computer Science".to_string()];
        let mut job = base_job();
        job.description = "Ideal for a bachelor of sci graduate.".to_string();

        let (score, _) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(score, 2);
    }

    #[test]
    fn goal_matches_through_the_title_prefix() {
        let mut user = base_user();
        user.experience = "wizard".to_string();
        user.career_goals = vec!["Backend Engineering Leadership".to_string()];
        let mut job = base_job();
        job.title = "Backend Engineering Manager".to_string();
        job.description = String::new();

        let (score, _) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(score, 2);
    }

    #[test]
    fn rounding_is_half_up() {
        // One of eight required skills: 60 / 8 = 7.5, which rounds to 8
        let mut user = base_user();
        user.experience = "wizard".to_string();
        user.skills = vec!["Rust".to_string()];
        let mut job = base_job();
        job.description = String::new();
        job.skills = vec![
            "Rust".to_string(),
            "Go".to_string(),
            "C".to_string(),
            "Zig".to_string(),
            "Lua".to_string(),
            "Perl".to_string(),
            "Tcl".to_string(),
            "Ada".to_string(),
        ];

        let (score, _) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(score, 8);
    }

    #[test]
    fn duplicate_required_skills_count_once_in_the_overlap() {
        let mut user = base_user();
        user.skills = vec!["Rust".to_string()];
        let mut job = base_job();
        job.skills = vec!["Rust".to_string(), "Rust".to_string()];

        let (_, matched) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert_eq!(matched, vec!["Rust"]);
    }

    #[test]
    fn multibyte_prefixes_never_panic() {
        let mut user = base_user();
        user.projects = vec!["Zürich Öffi routing engine with live data".to_string()];
        let mut job = base_job();
        job.description = "We maintain the zürich öffi routing en platform.".to_string();

        let (score, _) = calculate_match_score(&user, &job, &ScoringWeights::default());
        assert!(score >= 3);
    }
}
