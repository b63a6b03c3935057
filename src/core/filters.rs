use crate::models::{CandidateFilter, ExperienceTier, JobPosting};

/// Build the ordered retrieval cascade for a user's recommendations
///
/// Each stage is broader than the one before it. The executor runs stages in
/// order and stops at the first non-empty result set:
/// 1. skills overlap within the tier window (only when the user has skills)
/// 2. the same query once more, shaking off transient emptiness
/// 3. tier window alone (only when the profile tier parsed)
/// 4. every active posting
///
/// The catch-all stage is always present, so a user with an unrecognized
/// tier and no skills still gets recommendations from the active pool.
pub fn recommendation_cascade(
    tier: Option<ExperienceTier>,
    skills: &[String],
) -> Vec<CandidateFilter> {
    let tier_window = tier.map(ExperienceTier::and_above);
    let mut stages = Vec::with_capacity(4);

    if !skills.is_empty() {
        let targeted = CandidateFilter {
            tiers: tier_window.clone(),
            skills: Some(skills.to_vec()),
        };
        stages.push(targeted.clone());
        stages.push(targeted);
    }

    if let Some(tiers) = tier_window {
        stages.push(CandidateFilter {
            tiers: Some(tiers),
            skills: None,
        });
    }

    stages.push(CandidateFilter::unrestricted());
    stages
}

/// Check whether a posting satisfies a cascade stage in-process
///
/// The store applies the same constraints server-side; this predicate backs
/// the pipeline tests and guards against stale query results.
#[inline]
pub fn matches_filter(job: &JobPosting, filter: &CandidateFilter) -> bool {
    if !job.is_active {
        return false;
    }

    if let Some(tiers) = &filter.tiers {
        match job.experience_tier() {
            Some(tier) if tiers.contains(&tier) => {}
            _ => return false,
        }
    }

    if let Some(skills) = &filter.skills {
        if !skills.iter().any(|skill| job.skills.contains(skill)) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn create_job(job_skills: &[&str], experience: &str, active: bool) -> JobPosting {
        JobPosting {
            id: "job-1".to_string(),
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            salary: None,
            skills: skills(job_skills),
            experience: experience.to_string(),
            job_type: None,
            requirements: vec![],
            benefits: vec![],
            application_url: None,
            posted_date: Utc::now(),
            is_active: active,
        }
    }

    #[test]
    fn full_cascade_has_four_stages() {
        let stages = recommendation_cascade(Some(ExperienceTier::Mid), &skills(&["Rust"]));

        assert_eq!(stages.len(), 4);
        assert_eq!(stages[0], stages[1]);
        assert_eq!(stages[0].skills, Some(skills(&["Rust"])));
        assert_eq!(
            stages[0].tiers,
            Some(vec![
                ExperienceTier::Mid,
                ExperienceTier::Senior,
                ExperienceTier::Executive
            ])
        );
        assert_eq!(stages[2].skills, None);
        assert!(stages[2].tiers.is_some());
        assert_eq!(stages[3], CandidateFilter::unrestricted());
    }

    #[test]
    fn no_skills_drops_the_targeted_stages() {
        let stages = recommendation_cascade(Some(ExperienceTier::Senior), &[]);

        assert_eq!(stages.len(), 2);
        assert_eq!(
            stages[0].tiers,
            Some(vec![ExperienceTier::Senior, ExperienceTier::Executive])
        );
        assert_eq!(stages[1], CandidateFilter::unrestricted());
    }

    #[test]
    fn unknown_tier_leaves_only_skill_stages_and_catch_all() {
        let stages = recommendation_cascade(None, &skills(&["Rust"]));

        assert_eq!(stages.len(), 3);
        assert_eq!(stages[0].tiers, None);
        assert_eq!(stages[0].skills, Some(skills(&["Rust"])));
        assert_eq!(stages[2], CandidateFilter::unrestricted());
    }

    #[test]
    fn bare_profile_still_gets_the_catch_all() {
        let stages = recommendation_cascade(None, &[]);
        assert_eq!(stages, vec![CandidateFilter::unrestricted()]);
    }

    #[test]
    fn filter_checks_tier_window_and_overlap() {
        let filter = CandidateFilter {
            tiers: Some(vec![ExperienceTier::Mid, ExperienceTier::Senior]),
            skills: Some(skills(&["Rust", "Go"])),
        };

        assert!(matches_filter(&create_job(&["Rust"], "mid", true), &filter));
        assert!(!matches_filter(&create_job(&["Rust"], "entry", true), &filter));
        assert!(!matches_filter(&create_job(&["Java"], "mid", true), &filter));
        assert!(!matches_filter(&create_job(&["Rust"], "mid", false), &filter));
    }

    #[test]
    fn unrestricted_filter_only_requires_an_active_posting() {
        let filter = CandidateFilter::unrestricted();
        assert!(matches_filter(&create_job(&[], "anything", true), &filter));
        assert!(!matches_filter(&create_job(&[], "anything", false), &filter));
    }
}
