// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CandidateFilter, CareerAdvice, ExperienceTier, ExtractedResume, JobFilter, JobPosting,
    LearningPath, MatchedJob, RecommendedRole, SalaryRange, ScoringWeights, SkillToDevelop,
    TrendingSkill, User,
};
pub use requests::{
    AdviceRequest, ApplyResumeRequest, JobInteractionRequest, JobsQuery, LoginRequest,
    RegisterRequest, SkillRequest, UpdateProfileRequest,
};
pub use responses::{
    ActivityResponse, AdviceResponse, AppliedJobIdsResponse, AppliedJobsResponse, AuthResponse,
    ErrorResponse, HealthResponse, JobResponse, JobsResponse, Pagination, RecommendationsResponse,
    ResumeResponse, SavedJobIdsResponse, SavedJobsResponse, SkillsResponse, TrendingSkillsResponse,
    UserPublic, UserResponse,
};
