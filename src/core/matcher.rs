use crate::core::scoring::calculate_match_score;
use crate::models::{JobPosting, MatchedJob, ScoringWeights, User};

/// Result of ranking a batch of candidate postings
#[derive(Debug)]
pub struct RankedJobs {
    pub jobs: Vec<MatchedJob>,
    pub total_candidates: usize,
}

/// Ranking orchestrator for job recommendations
///
/// # Pipeline Stages
/// 1. Drop inactive postings (queries already exclude them, this is a guard)
/// 2. Score every posting against the profile
/// 3. Stable sort by match percentage, descending
/// 4. Truncate to the requested limit
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Rank candidate postings for a user profile
    ///
    /// Every active candidate is kept, including zero-percent matches: the
    /// broadening retrieval cascade promises results whenever active postings
    /// exist at all. Ties keep their retrieval order (the sort is stable).
    pub fn rank_jobs(&self, user: &User, candidates: Vec<JobPosting>, limit: usize) -> RankedJobs {
        let total_candidates = candidates.len();

        let mut ranked: Vec<MatchedJob> = candidates
            .into_iter()
            .filter(|job| job.is_active)
            .map(|job| {
                let (match_percentage, matched_skills) =
                    calculate_match_score(user, &job, &self.weights);

                MatchedJob {
                    id: job.id,
                    title: job.title,
                    company: job.company,
                    location: job.location,
                    salary: job.salary,
                    skills: job.skills,
                    experience: job.experience,
                    job_type: job.job_type,
                    description: job.description,
                    application_url: job.application_url,
                    posted_date: job.posted_date,
                    match_percentage,
                    matched_skills,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));
        ranked.truncate(limit);

        RankedJobs {
            jobs: ranked,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_user(skills: &[&str]) -> User {
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
            skills: skills.iter().map(|s| s.to_string()).collect(),
            career_goals: vec![],
            projects: vec![],
            education: vec![],
            experience: "mid".to_string(),
            created_at: Some(Utc::now()),
            updated_at: None,
        }
    }

    fn create_job(id: &str, skills: &[&str], experience: &str, active: bool) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            title: format!("Role {}", id),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            salary: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
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
    fn ranks_best_overlap_first() {
        let matcher = Matcher::with_default_weights();
        let user = create_user(&["Rust", "SQL", "Docker"]);

        let jobs = vec![
            create_job("weak", &["Java", "Spring"], "mid", true),
            create_job("strong", &["Rust", "SQL"], "mid", true),
            create_job("partial", &["Rust", "Kubernetes"], "mid", true),
        ];

        let result = matcher.rank_jobs(&user, jobs, 10);

        assert_eq!(result.total_candidates, 3);
        assert_eq!(result.jobs[0].id, "strong");
        assert_eq!(result.jobs[1].id, "partial");
        assert_eq!(result.jobs[2].id, "weak");
        assert_eq!(result.jobs[0].matched_skills, vec!["Rust", "SQL"]);
    }

    #[test]
    fn ties_keep_retrieval_order() {
        let matcher = Matcher::with_default_weights();
        let user = create_user(&["Rust"]);

        let jobs = vec![
            create_job("first", &["Rust"], "mid", true),
            create_job("second", &["Rust"], "mid", true),
            create_job("third", &["Rust"], "mid", true),
        ];

        let result = matcher.rank_jobs(&user, jobs, 10);
        let order: Vec<&str> = result.jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn respects_limit() {
        let matcher = Matcher::with_default_weights();
        let user = create_user(&["Rust"]);

        let jobs: Vec<JobPosting> = (0..40)
            .map(|i| create_job(&i.to_string(), &["Rust"], "mid", true))
            .collect();

        let result = matcher.rank_jobs(&user, jobs, 20);
        assert_eq!(result.jobs.len(), 20);
        assert_eq!(result.total_candidates, 40);
    }

    #[test]
    fn inactive_postings_never_surface() {
        let matcher = Matcher::with_default_weights();
        let user = create_user(&["Rust"]);

        let jobs = vec![
            create_job("live", &["Rust"], "mid", true),
            create_job("closed", &["Rust"], "mid", false),
        ];

        let result = matcher.rank_jobs(&user, jobs, 10);
        assert_eq!(result.jobs.len(), 1);
        assert_eq!(result.jobs[0].id, "live");
    }

    #[test]
    fn zero_percent_matches_are_still_returned() {
        let matcher = Matcher::with_default_weights();
        let user = create_user(&[]);

        let mut job = create_job("any", &["Go"], "executive", true);
        job.experience = "executive".to_string();

        let result = matcher.rank_jobs(&user, vec![job], 10);
        assert_eq!(result.jobs.len(), 1);
        assert_eq!(result.jobs[0].match_percentage, 0);
    }
}
