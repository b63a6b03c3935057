use serde::{Deserialize, Serialize};

use crate::models::domain::{
    CareerAdvice, ExtractedResume, JobPosting, MatchedJob, TrendingSkill, User,
};

/// User projection safe to return to clients, password hash stripped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: String,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub title: String,
    pub bio: String,
    pub location: String,
    #[serde(rename = "profilePicture")]
    pub profile_picture: String,
    pub skills: Vec<String>,
    #[serde(rename = "careerGoals")]
    pub career_goals: Vec<String>,
    pub projects: Vec<String>,
    pub education: Vec<String>,
    pub experience: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            title: user.title,
            bio: user.bio,
            location: user.location,
            profile_picture: user.profile_picture,
            skills: user.skills,
            career_goals: user.career_goals,
            projects: user.projects,
            education: user.education,
            experience: user.experience,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Error response, the envelope every failure uses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Registration and login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserPublic,
}

/// Single-user payload for profile reads and updates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub success: bool,
    pub message: String,
    pub user: UserPublic,
}

/// Ranked recommendations payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub success: bool,
    pub recommendations: Vec<MatchedJob>,
    pub total: usize,
}

/// Paginated job listing payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsResponse {
    pub success: bool,
    pub jobs: Vec<JobPosting>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit)
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// Single job payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub success: bool,
    pub job: JobPosting,
}

/// Trending skills payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingSkillsResponse {
    pub success: bool,
    #[serde(rename = "trendingSkills")]
    pub trending_skills: Vec<TrendingSkill>,
}

/// Parsed resume payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeResponse {
    pub success: bool,
    pub message: String,
    pub data: ExtractedResume,
}

/// Career advice payload, advice fields flattened beside the envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub advice: CareerAdvice,
}

/// Skill mutations echo the updated skill list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsResponse {
    pub success: bool,
    pub message: String,
    pub skills: Vec<String>,
}

/// Save/unsave mutations echo the remaining saved-job ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedJobIdsResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "savedJobs")]
    pub saved_jobs: Vec<String>,
}

/// Application mutations echo the applied-job ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedJobIdsResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "appliedJobs")]
    pub applied_jobs: Vec<String>,
}

/// Saved jobs joined back to full postings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedJobsResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "savedJobs")]
    pub saved_jobs: Vec<JobPosting>,
}

/// Applied jobs joined back to full postings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedJobsResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "appliedJobs")]
    pub applied_jobs: Vec<JobPosting>,
}

/// Per-user activity counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResponse {
    pub success: bool,
    #[serde(rename = "savedJobs")]
    pub saved_jobs: i64,
    #[serde(rename = "appliedJobs")]
    pub applied_jobs: i64,
    #[serde(rename = "lastActivity")]
    pub last_activity: Option<chrono::DateTime<chrono::Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_pages_up() {
        let p = Pagination::new(1, 10, 25);
        assert_eq!(p.pages, 3);
        assert_eq!(Pagination::new(1, 10, 30).pages, 3);
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
    }

    #[test]
    fn error_response_serializes_failure_envelope() {
        let body = serde_json::to_value(ErrorResponse::new("nope")).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "nope");
    }
}
