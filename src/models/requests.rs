use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create an account. Fields default to empty so missing
/// keys surface as the same validation failure as blank values.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 6))]
    #[serde(default)]
    pub password: String,
    #[validate(length(min = 1))]
    #[serde(default, alias = "first_name", rename = "firstName")]
    pub first_name: String,
    #[validate(length(min = 1))]
    #[serde(default, alias = "last_name", rename = "lastName")]
    pub last_name: String,
}

/// Request to log in
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub password: String,
}

/// Partial profile update, untouched fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(alias = "first_name", rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "last_name", rename = "lastName")]
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "profile_picture", rename = "profilePicture")]
    pub profile_picture: Option<String>,
    pub skills: Option<Vec<String>>,
    #[serde(alias = "career_goals", rename = "careerGoals")]
    pub career_goals: Option<Vec<String>>,
    pub projects: Option<Vec<String>>,
    pub education: Option<Vec<String>>,
    pub experience: Option<String>,
}

impl UpdateProfileRequest {
    /// True when no field was provided at all
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.title.is_none()
            && self.bio.is_none()
            && self.location.is_none()
            && self.profile_picture.is_none()
            && self.skills.is_none()
            && self.career_goals.is_none()
            && self.projects.is_none()
            && self.education.is_none()
            && self.experience.is_none()
    }
}

/// Single-skill mutation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SkillRequest {
    #[validate(length(min = 1))]
    pub skill: String,
}

/// Job save / unsave / apply body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobInteractionRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "job_id", rename = "jobId")]
    pub job_id: String,
}

/// Extracted resume data to merge into the profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyResumeRequest {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

/// Query string for the public job listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub limit: usize,
    pub location: Option<String>,
    pub experience: Option<String>,
    /// Comma-separated skill names
    pub skills: Option<String>,
}

impl JobsQuery {
    /// Splits the comma-separated skills parameter, dropping blanks
    pub fn skill_list(&self) -> Vec<String> {
        self.skills
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    10
}

/// Free-form input for the career advisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceRequest {
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default, alias = "careerGoals", alias = "interests")]
    pub goals: String,
}

impl AdviceRequest {
    /// All three facts are required before talking to the model
    pub fn missing_fields(&self) -> bool {
        self.skills.trim().is_empty()
            || self.experience.trim().is_empty()
            || self.goals.trim().is_empty()
    }
}
