use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::StreamExt;
use serde_json::{json, Value};

use crate::auth::AuthenticatedUser;
use crate::core::{extract_fallback, extract_pdf_text, MAX_RESUME_BYTES};
use crate::models::{
    ActivityResponse, AppliedJobIdsResponse, AppliedJobsResponse, ApplyResumeRequest,
    ErrorResponse, ExperienceTier, JobInteractionRequest, ResumeResponse, SavedJobIdsResponse,
    SavedJobsResponse, SkillRequest, SkillsResponse, UpdateProfileRequest, UserResponse,
};
use crate::routes::AppState;
use crate::services::{AppwriteError, CacheKey, InteractionType};

/// Configure user profile and interaction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("/profile", web::put().to(update_profile))
            .route("/skills", web::post().to(add_skill))
            .route("/skills", web::delete().to(remove_skill))
            .route("/upload-resume", web::post().to(upload_resume))
            .route("/apply-resume", web::post().to(apply_resume))
            .route("/save-job", web::post().to(save_job))
            .route("/saved-job", web::delete().to(remove_saved_job))
            .route("/apply-job", web::post().to(apply_job))
            .route("/saved-jobs", web::get().to(saved_jobs))
            .route("/applied-jobs", web::get().to(applied_jobs))
            .route("/activity", web::get().to(activity)),
    );
}

/// Union that keeps the existing order and appends new distinct entries
fn merge_distinct(existing: &[String], additions: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + additions.len());
    for value in existing.iter().chain(additions) {
        if !merged.contains(value) {
            merged.push(value.clone());
        }
    }
    merged
}

async fn invalidate_profile(state: &web::Data<AppState>, user_id: &str) {
    if let Err(e) = state.cache.delete(&CacheKey::profile(user_id)).await {
        tracing::warn!("Failed to invalidate cached profile {}: {}", user_id, e);
    }
}

/// Partial profile update, only provided fields are written
///
/// PUT /api/user/profile
async fn update_profile(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    req: web::Json<UpdateProfileRequest>,
) -> impl Responder {
    let req = req.into_inner();

    // Tier names are validated and canonicalized before anything is written
    let experience = match req.experience.as_deref() {
        None => None,
        Some(raw) => match ExperienceTier::parse(raw) {
            Some(tier) => Some(tier.to_string()),
            None => {
                return HttpResponse::BadRequest().json(ErrorResponse::new(
                    "Invalid experience level. Must be one of: entry, mid, senior, executive.",
                ));
            }
        },
    };

    if req.is_empty() {
        // Nothing to write, echo the current profile
        return match state.appwrite.get_user(&identity.user_id).await {
            Ok(user) => HttpResponse::Ok().json(UserResponse {
                success: true,
                message: "Profile updated successfully.".to_string(),
                user: user.into(),
            }),
            Err(AppwriteError::NotFound(_)) => user_not_found(),
            Err(e) => {
                tracing::error!("Profile fetch failed for {}: {}", identity.user_id, e);
                update_error()
            }
        };
    }

    let mut fields = serde_json::Map::new();
    if let Some(first_name) = req.first_name {
        fields.insert("firstName".to_string(), json!(first_name));
    }
    if let Some(last_name) = req.last_name {
        fields.insert("lastName".to_string(), json!(last_name));
    }
    if let Some(title) = req.title {
        fields.insert("title".to_string(), json!(title));
    }
    if let Some(bio) = req.bio {
        fields.insert("bio".to_string(), json!(bio));
    }
    if let Some(location) = req.location {
        fields.insert("location".to_string(), json!(location));
    }
    if let Some(profile_picture) = req.profile_picture {
        fields.insert("profilePicture".to_string(), json!(profile_picture));
    }
    if let Some(skills) = req.skills {
        fields.insert("skills".to_string(), json!(skills));
    }
    if let Some(career_goals) = req.career_goals {
        fields.insert("careerGoals".to_string(), json!(career_goals));
    }
    if let Some(projects) = req.projects {
        fields.insert("projects".to_string(), json!(projects));
    }
    if let Some(education) = req.education {
        fields.insert("education".to_string(), json!(education));
    }
    if let Some(experience) = experience {
        fields.insert("experience".to_string(), json!(experience));
    }

    match state
        .appwrite
        .update_user(&identity.user_id, Value::Object(fields))
        .await
    {
        Ok(user) => {
            invalidate_profile(&state, &identity.user_id).await;
            tracing::info!("Updated profile for {}", identity.user_id);
            HttpResponse::Ok().json(UserResponse {
                success: true,
                message: "Profile updated successfully.".to_string(),
                user: user.into(),
            })
        }
        Err(AppwriteError::NotFound(_)) => user_not_found(),
        Err(e) => {
            tracing::error!("Profile update failed for {}: {}", identity.user_id, e);
            update_error()
        }
    }
}

/// Add one skill, already-known skills are a no-op
///
/// POST /api/user/skills
async fn add_skill(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    req: web::Json<SkillRequest>,
) -> impl Responder {
    let skill = req.into_inner().skill.trim().to_string();
    if skill.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::new("Skill is required."));
    }

    let user = match state.appwrite.get_user(&identity.user_id).await {
        Ok(user) => user,
        Err(AppwriteError::NotFound(_)) => return user_not_found(),
        Err(e) => {
            tracing::error!("Profile fetch failed for {}: {}", identity.user_id, e);
            return add_skill_error();
        }
    };

    if user.skills.contains(&skill) {
        return HttpResponse::Ok().json(SkillsResponse {
            success: true,
            message: "Skill added successfully.".to_string(),
            skills: user.skills,
        });
    }

    let mut skills = user.skills;
    skills.push(skill);

    match state
        .appwrite
        .update_user(&identity.user_id, json!({ "skills": skills }))
        .await
    {
        Ok(updated) => {
            invalidate_profile(&state, &identity.user_id).await;
            HttpResponse::Ok().json(SkillsResponse {
                success: true,
                message: "Skill added successfully.".to_string(),
                skills: updated.skills,
            })
        }
        Err(AppwriteError::NotFound(_)) => user_not_found(),
        Err(e) => {
            tracing::error!("Skill update failed for {}: {}", identity.user_id, e);
            add_skill_error()
        }
    }
}

fn add_skill_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new("Server error while adding skill."))
}

/// Remove one skill
///
/// DELETE /api/user/skills
async fn remove_skill(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    req: web::Json<SkillRequest>,
) -> impl Responder {
    let skill = req.into_inner().skill.trim().to_string();
    if skill.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::new("Skill is required."));
    }

    let user = match state.appwrite.get_user(&identity.user_id).await {
        Ok(user) => user,
        Err(AppwriteError::NotFound(_)) => return user_not_found(),
        Err(e) => {
            tracing::error!("Profile fetch failed for {}: {}", identity.user_id, e);
            return remove_skill_error();
        }
    };

    let skills: Vec<String> = user.skills.into_iter().filter(|s| s != &skill).collect();

    match state
        .appwrite
        .update_user(&identity.user_id, json!({ "skills": skills }))
        .await
    {
        Ok(updated) => {
            invalidate_profile(&state, &identity.user_id).await;
            HttpResponse::Ok().json(SkillsResponse {
                success: true,
                message: "Skill removed successfully.".to_string(),
                skills: updated.skills,
            })
        }
        Err(AppwriteError::NotFound(_)) => user_not_found(),
        Err(e) => {
            tracing::error!("Skill update failed for {}: {}", identity.user_id, e);
            remove_skill_error()
        }
    }
}

fn remove_skill_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(ErrorResponse::new("Server error while removing skill."))
}

/// Parse an uploaded PDF resume into structured profile data
///
/// POST /api/user/upload-resume (multipart field `resume`)
async fn upload_resume(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    mut payload: Multipart,
) -> impl Responder {
    let mut resume: Option<Vec<u8>> = None;

    while let Some(entry) = payload.next().await {
        let mut field = match entry {
            Ok(field) => field,
            Err(e) => {
                tracing::warn!("Malformed multipart payload: {}", e);
                return HttpResponse::BadRequest()
                    .json(ErrorResponse::new("Invalid upload. Please try again."));
            }
        };

        if field.name() != Some("resume") {
            continue;
        }

        let is_pdf = field
            .content_type()
            .map(|mime| mime.essence_str() == "application/pdf")
            .unwrap_or(false);
        if !is_pdf {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "Only PDF files are allowed.",
            ));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::warn!("Upload stream error: {}", e);
                    return HttpResponse::BadRequest()
                        .json(ErrorResponse::new("Invalid upload. Please try again."));
                }
            };

            if data.len() + chunk.len() > MAX_RESUME_BYTES {
                return HttpResponse::BadRequest().json(ErrorResponse::new(
                    "Resume file is too large. Maximum size is 5MB.",
                ));
            }
            data.extend_from_slice(&chunk);
        }

        resume = Some(data);
    }

    let bytes = match resume {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "No file uploaded. Please upload a PDF resume.",
            ));
        }
    };

    // PDF parsing is CPU-bound, keep it off the async workers
    let text = match web::block(move || extract_pdf_text(&bytes)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::warn!("PDF text extraction failed: {}", e);
            return unreadable_pdf();
        }
        Err(e) => {
            tracing::error!("PDF extraction worker failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to parse resume. Please try again.",
            ));
        }
    };

    if text.trim().is_empty() {
        return unreadable_pdf();
    }

    let (message, data) = match state.gemini.extract_resume(&text).await {
        Ok(data) => ("Resume parsed successfully.", data),
        Err(e) => {
            tracing::warn!("AI resume extraction failed, using basic extraction: {}", e);
            ("Resume parsed with basic extraction.", extract_fallback(&text))
        }
    };

    tracing::info!(
        "Parsed resume for {}: {} skills, {} projects",
        identity.user_id,
        data.skills.len(),
        data.projects.len()
    );

    HttpResponse::Ok().json(ResumeResponse {
        success: true,
        message: message.to_string(),
        data,
    })
}

fn unreadable_pdf() -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(
        "Could not extract text from PDF. Please ensure the PDF contains selectable text.",
    ))
}

/// Merge extracted resume data into the stored profile
///
/// POST /api/user/apply-resume
async fn apply_resume(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    req: web::Json<ApplyResumeRequest>,
) -> impl Responder {
    let req = req.into_inner();

    let user = match state.appwrite.get_user(&identity.user_id).await {
        Ok(user) => user,
        Err(AppwriteError::NotFound(_)) => return user_not_found(),
        Err(e) => {
            tracing::error!("Profile fetch failed for {}: {}", identity.user_id, e);
            return update_error();
        }
    };

    let mut fields = serde_json::Map::new();

    if !req.skills.is_empty() {
        fields.insert(
            "skills".to_string(),
            json!(merge_distinct(&user.skills, &req.skills)),
        );
    }
    if !req.projects.is_empty() {
        fields.insert(
            "projects".to_string(),
            json!(merge_distinct(&user.projects, &req.projects)),
        );
    }
    if !req.education.is_empty() {
        fields.insert(
            "education".to_string(),
            json!(merge_distinct(&user.education, &req.education)),
        );
    }
    // The extracted experience narrative lands in the bio unless one exists
    if !req.experience.trim().is_empty() && user.bio.trim().is_empty() {
        fields.insert("bio".to_string(), json!(req.experience));
    }

    if fields.is_empty() {
        return HttpResponse::Ok().json(UserResponse {
            success: true,
            message: "Profile updated successfully.".to_string(),
            user: user.into(),
        });
    }

    match state
        .appwrite
        .update_user(&identity.user_id, Value::Object(fields))
        .await
    {
        Ok(updated) => {
            invalidate_profile(&state, &identity.user_id).await;
            tracing::info!("Applied resume data to profile {}", identity.user_id);
            HttpResponse::Ok().json(UserResponse {
                success: true,
                message: "Profile updated successfully.".to_string(),
                user: updated.into(),
            })
        }
        Err(AppwriteError::NotFound(_)) => user_not_found(),
        Err(e) => {
            tracing::error!("Resume merge failed for {}: {}", identity.user_id, e);
            update_error()
        }
    }
}

/// Save a job for later
///
/// POST /api/user/save-job
async fn save_job(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    req: web::Json<JobInteractionRequest>,
) -> impl Responder {
    let job_id = req.into_inner().job_id.trim().to_string();
    if job_id.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::new("Job ID is required."));
    }

    // The posting must exist and still be active
    match state.appwrite.get_job(&job_id).await {
        Ok(job) if job.is_active => {}
        Ok(_) | Err(AppwriteError::NotFound(_)) => return job_not_found(),
        Err(e) => {
            tracing::error!("Job lookup failed for {}: {}", job_id, e);
            return save_job_error();
        }
    }

    if let Err(e) = state
        .postgres
        .record_interaction(&identity.user_id, &job_id, InteractionType::Saved)
        .await
    {
        tracing::error!("Failed to record saved job for {}: {}", identity.user_id, e);
        return save_job_error();
    }

    match state
        .postgres
        .interaction_ids(&identity.user_id, InteractionType::Saved)
        .await
    {
        Ok(saved_jobs) => HttpResponse::Ok().json(SavedJobIdsResponse {
            success: true,
            message: "Job saved successfully.".to_string(),
            saved_jobs,
        }),
        Err(e) => {
            tracing::error!("Failed to list saved jobs for {}: {}", identity.user_id, e);
            save_job_error()
        }
    }
}

fn save_job_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new("Server error while saving job."))
}

/// Drop a job from the saved list
///
/// DELETE /api/user/saved-job
async fn remove_saved_job(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    req: web::Json<JobInteractionRequest>,
) -> impl Responder {
    let job_id = req.into_inner().job_id.trim().to_string();
    if job_id.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::new("Job ID is required."));
    }

    match state
        .postgres
        .remove_interaction(&identity.user_id, &job_id, InteractionType::Saved)
        .await
    {
        Ok(removed) => {
            tracing::debug!(
                "Removed saved job {} for {} (existed: {})",
                job_id,
                identity.user_id,
                removed
            );
        }
        Err(e) => {
            tracing::error!("Failed to remove saved job for {}: {}", identity.user_id, e);
            return remove_saved_job_error();
        }
    }

    match state
        .postgres
        .interaction_ids(&identity.user_id, InteractionType::Saved)
        .await
    {
        Ok(saved_jobs) => HttpResponse::Ok().json(SavedJobIdsResponse {
            success: true,
            message: "Job removed from saved jobs successfully.".to_string(),
            saved_jobs,
        }),
        Err(e) => {
            tracing::error!("Failed to list saved jobs for {}: {}", identity.user_id, e);
            remove_saved_job_error()
        }
    }
}

fn remove_saved_job_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(ErrorResponse::new("Server error while removing saved job."))
}

/// Record a job application
///
/// POST /api/user/apply-job
async fn apply_job(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    req: web::Json<JobInteractionRequest>,
) -> impl Responder {
    let job_id = req.into_inner().job_id.trim().to_string();
    if job_id.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::new("Job ID is required."));
    }

    match state.appwrite.get_job(&job_id).await {
        Ok(job) if job.is_active => {}
        Ok(_) | Err(AppwriteError::NotFound(_)) => return job_not_found(),
        Err(e) => {
            tracing::error!("Job lookup failed for {}: {}", job_id, e);
            return apply_job_error();
        }
    }

    if let Err(e) = state
        .postgres
        .record_interaction(&identity.user_id, &job_id, InteractionType::Applied)
        .await
    {
        tracing::error!(
            "Failed to record application for {}: {}",
            identity.user_id,
            e
        );
        return apply_job_error();
    }

    match state
        .postgres
        .interaction_ids(&identity.user_id, InteractionType::Applied)
        .await
    {
        Ok(applied_jobs) => HttpResponse::Ok().json(AppliedJobIdsResponse {
            success: true,
            message: "Application submitted successfully.".to_string(),
            applied_jobs,
        }),
        Err(e) => {
            tracing::error!("Failed to list applications for {}: {}", identity.user_id, e);
            apply_job_error()
        }
    }
}

fn apply_job_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(ErrorResponse::new("Server error while submitting application."))
}

/// Saved jobs joined back to their postings
///
/// GET /api/user/saved-jobs
async fn saved_jobs(state: web::Data<AppState>, identity: AuthenticatedUser) -> impl Responder {
    let ids = match state
        .postgres
        .interaction_ids(&identity.user_id, InteractionType::Saved)
        .await
    {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("Failed to list saved jobs for {}: {}", identity.user_id, e);
            return saved_jobs_error();
        }
    };

    match state.appwrite.get_jobs_by_ids(&ids).await {
        Ok(jobs) => HttpResponse::Ok().json(SavedJobsResponse {
            success: true,
            message: "Saved jobs retrieved successfully.".to_string(),
            saved_jobs: jobs,
        }),
        Err(e) => {
            tracing::error!("Failed to join saved jobs for {}: {}", identity.user_id, e);
            saved_jobs_error()
        }
    }
}

fn saved_jobs_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(ErrorResponse::new("Server error while retrieving saved jobs."))
}

/// Applications joined back to their postings
///
/// GET /api/user/applied-jobs
async fn applied_jobs(state: web::Data<AppState>, identity: AuthenticatedUser) -> impl Responder {
    let ids = match state
        .postgres
        .interaction_ids(&identity.user_id, InteractionType::Applied)
        .await
    {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("Failed to list applications for {}: {}", identity.user_id, e);
            return applied_jobs_error();
        }
    };

    match state.appwrite.get_jobs_by_ids(&ids).await {
        Ok(jobs) => HttpResponse::Ok().json(AppliedJobsResponse {
            success: true,
            message: "Applied jobs retrieved successfully.".to_string(),
            applied_jobs: jobs,
        }),
        Err(e) => {
            tracing::error!("Failed to join applications for {}: {}", identity.user_id, e);
            applied_jobs_error()
        }
    }
}

fn applied_jobs_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        "Server error while retrieving applied jobs.",
    ))
}

/// Interaction counters for the dashboard
///
/// GET /api/user/activity
async fn activity(state: web::Data<AppState>, identity: AuthenticatedUser) -> impl Responder {
    match state.postgres.interaction_stats(&identity.user_id).await {
        Ok(stats) => HttpResponse::Ok().json(ActivityResponse {
            success: true,
            saved_jobs: stats.saved,
            applied_jobs: stats.applied,
            last_activity: stats.last_activity,
        }),
        Err(e) => {
            tracing::error!("Failed to load activity for {}: {}", identity.user_id, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Server error while retrieving activity."))
        }
    }
}

fn user_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("User not found."))
}

fn job_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Job not found."))
}

fn update_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(ErrorResponse::new("Server error while updating profile."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_existing_order_and_appends_new() {
        let existing = vec!["React".to_string(), "Node.js".to_string()];
        let additions = vec![
            "Node.js".to_string(),
            "Rust".to_string(),
            "React".to_string(),
        ];
        assert_eq!(
            merge_distinct(&existing, &additions),
            vec!["React", "Node.js", "Rust"]
        );
    }

    #[test]
    fn merge_drops_duplicates_within_additions() {
        let merged = merge_distinct(&[], &["Go".to_string(), "Go".to_string()]);
        assert_eq!(merged, vec!["Go"]);
    }

    #[test]
    fn merge_with_no_additions_is_identity() {
        let existing = vec!["SQL".to_string()];
        assert_eq!(merge_distinct(&existing, &[]), existing);
    }
}
