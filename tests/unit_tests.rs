// Unit tests for Career Coach API

use career_coach_api::auth::AuthManager;
use career_coach_api::core::{
    filters::{matches_filter, recommendation_cascade},
    resume::extract_fallback,
    scoring::calculate_match_score,
    trending::{count_skills, demand_label},
};
use career_coach_api::models::{
    CandidateFilter, ExperienceTier, JobPosting, Pagination, ScoringWeights, User,
};
use chrono::Utc;

fn create_test_user(skills: &[&str], experience: &str) -> User {
    User {
        id: "user-1".to_string(),
        email: "dev@example.com".to_string(),
        password: "hashed".to_string(),
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
        experience: experience.to_string(),
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

fn create_test_job(id: &str, skills: &[&str], experience: &str) -> JobPosting {
    JobPosting {
        id: id.to_string(),
        title: format!("Role {}", id),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        description: String::new(),
        salary: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        experience: experience.to_string(),
        job_type: Some("full-time".to_string()),
        requirements: vec![],
        benefits: vec![],
        application_url: None,
        posted_date: Utc::now(),
        is_active: true,
    }
}

#[test]
fn test_tier_parsing() {
    assert_eq!(ExperienceTier::parse("entry"), Some(ExperienceTier::Entry));
    assert_eq!(ExperienceTier::parse("Mid"), Some(ExperienceTier::Mid));
    assert_eq!(ExperienceTier::parse(" senior "), Some(ExperienceTier::Senior));
    assert_eq!(ExperienceTier::parse("executive"), Some(ExperienceTier::Executive));
    assert_eq!(ExperienceTier::parse("principal"), None);
    assert_eq!(ExperienceTier::parse(""), None);
}

#[test]
fn test_tier_window_is_inclusive_and_upward() {
    assert_eq!(
        ExperienceTier::Mid.and_above(),
        vec![
            ExperienceTier::Mid,
            ExperienceTier::Senior,
            ExperienceTier::Executive
        ]
    );
    assert_eq!(ExperienceTier::Executive.and_above(), vec![ExperienceTier::Executive]);
}

#[test]
fn test_match_score_within_valid_range() {
    let user = create_test_user(&["Rust", "SQL", "Docker"], "mid");
    let job = create_test_job("1", &["Rust", "Kubernetes"], "senior");

    let weights = ScoringWeights::default();
    let (score, _) = calculate_match_score(&user, &job, &weights);

    assert!(score <= 100, "Score should be in valid range");
}

#[test]
fn test_full_skill_overlap_with_exact_tier() {
    let user = create_test_user(&["Rust", "SQL"], "mid");
    let job = create_test_job("1", &["Rust", "SQL"], "mid");

    let (score, matched) = calculate_match_score(&user, &job, &ScoringWeights::default());

    // 60 skill points plus 20 experience points out of 100
    assert_eq!(score, 80);
    assert_eq!(matched, vec!["Rust", "SQL"]);
}

#[test]
fn test_stronger_overlap_scores_higher() {
    let user = create_test_user(&["Rust", "SQL", "Docker"], "mid");
    let strong = create_test_job("strong", &["Rust", "SQL"], "mid");
    let weak = create_test_job("weak", &["Rust", "Go", "Java"], "mid");

    let weights = ScoringWeights::default();
    let (strong_score, _) = calculate_match_score(&user, &strong, &weights);
    let (weak_score, _) = calculate_match_score(&user, &weak, &weights);

    assert!(
        strong_score > weak_score,
        "Expected {} > {}",
        strong_score,
        weak_score
    );
}

#[test]
fn test_exact_tier_beats_adjacent_tier() {
    let user = create_test_user(&[], "mid");
    let exact = create_test_job("exact", &[], "mid");
    let adjacent = create_test_job("adjacent", &[], "senior");
    let distant = create_test_job("distant", &[], "executive");

    let weights = ScoringWeights::default();
    let (exact_score, _) = calculate_match_score(&user, &exact, &weights);
    let (adjacent_score, _) = calculate_match_score(&user, &adjacent, &weights);
    let (distant_score, _) = calculate_match_score(&user, &distant, &weights);

    assert_eq!(exact_score, 20);
    assert_eq!(adjacent_score, 15);
    assert_eq!(distant_score, 0);
}

#[test]
fn test_matched_skills_keep_posting_order() {
    let user = create_test_user(&["Docker", "Rust", "SQL"], "mid");
    let job = create_test_job("1", &["SQL", "Rust", "Go"], "mid");

    let (_, matched) = calculate_match_score(&user, &job, &ScoringWeights::default());
    assert_eq!(matched, vec!["SQL", "Rust"]);
}

#[test]
fn test_cascade_four_stages_for_full_profile() {
    let skills = vec!["Rust".to_string()];
    let stages = recommendation_cascade(Some(ExperienceTier::Mid), &skills);

    assert_eq!(stages.len(), 4);
    // Targeted stage runs twice before broadening
    assert_eq!(stages[0], stages[1]);
    assert_eq!(stages[0].skills, Some(skills));
    assert_eq!(stages[2].skills, None);
    assert!(stages[2].tiers.is_some());
    assert_eq!(stages[3], CandidateFilter::unrestricted());
}

#[test]
fn test_cascade_without_skills_skips_targeted_stages() {
    let stages = recommendation_cascade(Some(ExperienceTier::Senior), &[]);

    assert_eq!(stages.len(), 2);
    assert_eq!(
        stages[0].tiers,
        Some(vec![ExperienceTier::Senior, ExperienceTier::Executive])
    );
    assert_eq!(stages[1], CandidateFilter::unrestricted());
}

#[test]
fn test_cascade_bare_profile_still_has_catch_all() {
    let stages = recommendation_cascade(None, &[]);
    assert_eq!(stages, vec![CandidateFilter::unrestricted()]);
}

#[test]
fn test_filter_predicate_enforces_every_constraint() {
    let filter = CandidateFilter {
        tiers: Some(vec![ExperienceTier::Mid, ExperienceTier::Senior]),
        skills: Some(vec!["Rust".to_string()]),
    };

    assert!(matches_filter(&create_test_job("1", &["Rust"], "mid"), &filter));
    assert!(!matches_filter(&create_test_job("2", &["Rust"], "entry"), &filter));
    assert!(!matches_filter(&create_test_job("3", &["Java"], "mid"), &filter));

    let mut inactive = create_test_job("4", &["Rust"], "mid");
    inactive.is_active = false;
    assert!(!matches_filter(&inactive, &filter));
}

#[test]
fn test_trending_counts_rank_by_frequency() {
    let jobs = vec![
        create_test_job("1", &["React", "Rust"], "mid"),
        create_test_job("2", &["Rust"], "mid"),
        create_test_job("3", &["Rust", "React", "SQL"], "mid"),
    ];

    let ranked = count_skills(&jobs);
    assert_eq!(ranked[0], ("Rust".to_string(), 3));
    assert_eq!(ranked[1], ("React".to_string(), 2));
    assert_eq!(ranked[2], ("SQL".to_string(), 1));
}

#[test]
fn test_demand_labels() {
    assert_eq!(demand_label(10), "High");
    assert_eq!(demand_label(6), "High");
    assert_eq!(demand_label(5), "Medium");
    assert_eq!(demand_label(3), "Medium");
    assert_eq!(demand_label(2), "Low");
}

#[test]
fn test_fallback_extraction_finds_known_skills() {
    let text = "Senior engineer working with Rust, Docker and PostgreSQL. \
                5 years of experience shipping backend services.";
    let extracted = extract_fallback(text);

    assert!(extracted.skills.contains(&"Rust".to_string()));
    assert!(extracted.skills.contains(&"Docker".to_string()));
    assert!(extracted.skills.contains(&"PostgreSQL".to_string()));
    assert_eq!(extracted.experience, "5 years of professional experience");
}

#[test]
fn test_fallback_extraction_never_fails() {
    let extracted = extract_fallback("");

    assert!(extracted.skills.is_empty());
    assert!(!extracted.experience.is_empty());
    assert!(extracted.projects.is_empty());
    assert!(extracted.education.is_empty());
}

#[test]
fn test_password_hashing_round_trip() {
    // Cost 4 keeps the test fast
    let auth = AuthManager::new("secret", 168, 4);
    let hash = auth.hash_password("sufficiently-long").unwrap();

    assert_ne!(hash, "sufficiently-long");
    assert!(auth.verify_password("sufficiently-long", &hash).unwrap());
    assert!(!auth.verify_password("something-else", &hash).unwrap());
}

#[test]
fn test_token_round_trip() {
    let auth = AuthManager::new("secret", 168, 4);
    let token = auth.issue_token("user-42", "dev@example.com").unwrap();
    let claims = auth.verify_token(&token).unwrap();

    assert_eq!(claims.sub, "user-42");
    assert_eq!(claims.email, "dev@example.com");
}

#[test]
fn test_token_rejected_across_secrets() {
    let issuer = AuthManager::new("secret-a", 168, 4);
    let verifier = AuthManager::new("secret-b", 168, 4);

    let token = issuer.issue_token("user-1", "dev@example.com").unwrap();
    assert!(verifier.verify_token(&token).is_err());
}

#[test]
fn test_pagination_math() {
    let pagination = Pagination::new(2, 10, 45);
    assert_eq!(pagination.page, 2);
    assert_eq!(pagination.limit, 10);
    assert_eq!(pagination.total, 45);
    assert_eq!(pagination.pages, 5);

    // Exact division
    assert_eq!(Pagination::new(1, 10, 40).pages, 4);
    // Empty result set
    assert_eq!(Pagination::new(1, 10, 0).pages, 0);
}
