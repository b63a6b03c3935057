use serde::{Deserialize, Serialize};

/// User account and career profile as stored in the document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "$id")]
    pub id: String,
    pub email: String,
    /// Bcrypt hash, never exposed through API responses
    pub password: String,
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "profilePicture", default)]
    pub profile_picture: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "careerGoals", default)]
    pub career_goals: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default = "default_experience")]
    pub experience: String,
    #[serde(rename = "createdAt", alias = "$createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "updatedAt", alias = "$updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    /// Experience tier parsed from the stored name, None when unrecognized
    pub fn experience_tier(&self) -> Option<ExperienceTier> {
        ExperienceTier::parse(&self.experience)
    }
}

fn default_title() -> String {
    "Developer".to_string()
}

fn default_experience() -> String {
    ExperienceTier::Entry.to_string()
}

/// Career experience tiers in ascending order of seniority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceTier {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl ExperienceTier {
    pub const ALL: [ExperienceTier; 4] = [
        ExperienceTier::Entry,
        ExperienceTier::Mid,
        ExperienceTier::Senior,
        ExperienceTier::Executive,
    ];

    /// Ordinal position, entry = 0 through executive = 3
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parses the lowercase wire name, None for anything unrecognized
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "entry" => Some(ExperienceTier::Entry),
            "mid" => Some(ExperienceTier::Mid),
            "senior" => Some(ExperienceTier::Senior),
            "executive" => Some(ExperienceTier::Executive),
            _ => None,
        }
    }

    /// This tier and every tier above it, in ascending order
    pub fn and_above(self) -> Vec<ExperienceTier> {
        Self::ALL
            .iter()
            .copied()
            .filter(|tier| tier.index() >= self.index())
            .collect()
    }
}

impl std::fmt::Display for ExperienceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExperienceTier::Entry => "entry",
            ExperienceTier::Mid => "mid",
            ExperienceTier::Senior => "senior",
            ExperienceTier::Executive => "executive",
        };
        f.write_str(name)
    }
}

/// Job posting document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(alias = "$id")]
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub salary: Option<SalaryRange>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default = "default_experience")]
    pub experience: String,
    #[serde(rename = "type", default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(rename = "applicationUrl", default)]
    pub application_url: Option<String>,
    #[serde(rename = "postedDate", default = "chrono::Utc::now")]
    pub posted_date: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
}

impl JobPosting {
    /// Experience tier parsed from the posting, None when unrecognized
    pub fn experience_tier(&self) -> Option<ExperienceTier> {
        ExperienceTier::parse(&self.experience)
    }
}

fn default_true() -> bool {
    true
}

/// Salary range attached to a posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRange {
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Job posting scored against a user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedJob {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub salary: Option<SalaryRange>,
    pub skills: Vec<String>,
    pub experience: String,
    #[serde(rename = "type", default)]
    pub job_type: Option<String>,
    pub description: String,
    #[serde(rename = "applicationUrl", default)]
    pub application_url: Option<String>,
    #[serde(rename = "postedDate")]
    pub posted_date: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "matchPercentage")]
    pub match_percentage: u8,
    #[serde(rename = "matchedSkills")]
    pub matched_skills: Vec<String>,
}

/// One stage of the candidate retrieval cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFilter {
    /// Acceptable posting tiers, None means no tier constraint
    pub tiers: Option<Vec<ExperienceTier>>,
    /// Required skills overlap, None means no skills constraint
    pub skills: Option<Vec<String>>,
}

impl CandidateFilter {
    pub fn unrestricted() -> Self {
        Self {
            tiers: None,
            skills: None,
        }
    }
}

/// Filters for the public job listing
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub location: Option<String>,
    pub experience: Option<ExperienceTier>,
    pub skills: Vec<String>,
    pub page: usize,
    pub limit: usize,
}

/// Structured data pulled out of an uploaded resume
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedResume {
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

impl ExtractedResume {
    /// Fills the experience summary when the model left it blank
    pub fn normalize(mut self) -> Self {
        if self.experience.trim().is_empty() {
            self.experience = "Experience extracted from resume".to_string();
        }
        self
    }
}

/// Structured career advice returned by the advisor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CareerAdvice {
    #[serde(default)]
    pub advice: String,
    #[serde(rename = "recommendedRoles", default)]
    pub recommended_roles: Vec<RecommendedRole>,
    #[serde(rename = "skillsToDevelop", default)]
    pub skills_to_develop: Vec<SkillToDevelop>,
    #[serde(rename = "learningPaths", default)]
    pub learning_paths: Vec<LearningPath>,
}

impl CareerAdvice {
    /// Guarantees a non-empty advice paragraph; arrays already default to empty
    pub fn normalize(mut self) -> Self {
        if self.advice.trim().is_empty() {
            self.advice = "Based on your profile, I recommend focusing on continuous skill development and networking in your field.".to_string();
        }
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendedRole {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "matchScore", default)]
    pub match_score: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillToDevelop {
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningPath {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub timeline: String,
}

/// Market demand snapshot for one skill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingSkill {
    pub skill: String,
    pub demand: String,
    /// Mocked growth figure, regenerated per request and not authoritative
    pub growth: String,
}

/// Scoring weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub projects: f64,
    pub education: f64,
    pub goals: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 60.0,
            experience: 20.0,
            projects: 10.0,
            education: 5.0,
            goals: 5.0,
        }
    }
}
