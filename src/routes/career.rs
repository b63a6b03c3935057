use actix_web::{web, HttpResponse, Responder};

use crate::auth::AuthenticatedUser;
use crate::core::{count_skills, recommendation_cascade, trending_skills};
use crate::models::{
    CandidateFilter, ErrorResponse, ExperienceTier, JobFilter, JobPosting, JobResponse, JobsQuery,
    JobsResponse, Pagination, RecommendationsResponse, TrendingSkillsResponse, User,
};
use crate::routes::AppState;
use crate::services::{AppwriteClient, AppwriteError, CacheKey};

/// Candidate pool fetched per cascade stage before ranking
const CANDIDATE_POOL: usize = 100;

/// Active postings sampled for the trending aggregation
const TRENDING_POOL: usize = 200;

/// Configure career routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/career")
            .route("/recommendations", web::get().to(recommendations))
            .route("/jobs", web::get().to(list_jobs))
            .route("/jobs/{id}", web::get().to(get_job))
            .route("/trending-skills", web::get().to(trending)),
    );
}

/// Runs the query plan in order, stopping at the first stage with candidates
pub async fn execute_cascade(
    appwrite: &AppwriteClient,
    tier: Option<ExperienceTier>,
    skills: &[String],
    limit: usize,
) -> Result<Vec<JobPosting>, AppwriteError> {
    let plan = recommendation_cascade(tier, skills);
    let stages = plan.len();

    for (stage, filter) in plan.iter().enumerate() {
        let candidates = appwrite.query_jobs(filter, limit).await?;
        if !candidates.is_empty() {
            tracing::debug!(
                "Cascade stage {}/{} produced {} candidates",
                stage + 1,
                stages,
                candidates.len()
            );
            return Ok(candidates);
        }
    }

    Ok(vec![])
}

/// Ranked job recommendations for the authenticated user
///
/// GET /api/career/recommendations
async fn recommendations(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
) -> impl Responder {
    let cache_key = CacheKey::profile(&identity.user_id);

    let user: User = match state.cache.get(&cache_key).await {
        Ok(user) => user,
        Err(_) => match state.appwrite.get_user(&identity.user_id).await {
            Ok(user) => {
                if let Err(e) = state.cache.set(&cache_key, &user).await {
                    tracing::warn!("Failed to cache profile {}: {}", identity.user_id, e);
                }
                user
            }
            Err(AppwriteError::NotFound(_)) => {
                return HttpResponse::NotFound()
                    .json(ErrorResponse::new("User profile not found."));
            }
            Err(e) => {
                tracing::error!("Profile fetch failed for {}: {}", identity.user_id, e);
                return server_error();
            }
        },
    };

    let candidates = match execute_cascade(
        &state.appwrite,
        user.experience_tier(),
        &user.skills,
        CANDIDATE_POOL,
    )
    .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Candidate query failed for {}: {}", identity.user_id, e);
            return server_error();
        }
    };

    let ranked = state
        .matcher
        .rank_jobs(&user, candidates, state.recommendation_limit);

    tracing::info!(
        "Ranked {} of {} candidates for {}",
        ranked.jobs.len(),
        ranked.total_candidates,
        identity.user_id
    );

    let total = ranked.jobs.len();
    HttpResponse::Ok().json(RecommendationsResponse {
        success: true,
        recommendations: ranked.jobs,
        total,
    })
}

/// Public paginated job listing
///
/// GET /api/career/jobs?page&limit&location&experience&skills
async fn list_jobs(state: web::Data<AppState>, query: web::Query<JobsQuery>) -> impl Responder {
    let query = query.into_inner();
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, state.max_page_size);

    // An unrecognized tier name matches no postings at all
    let experience = match query.experience.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match ExperienceTier::parse(raw) {
            Some(tier) => Some(tier),
            None => {
                return HttpResponse::Ok().json(JobsResponse {
                    success: true,
                    jobs: vec![],
                    pagination: Pagination::new(page, limit, 0),
                });
            }
        },
    };

    let filter = JobFilter {
        location: query.location.clone().filter(|l| !l.trim().is_empty()),
        experience,
        skills: query.skill_list(),
        page,
        limit,
    };

    match state.appwrite.list_jobs(&filter).await {
        Ok((jobs, total)) => HttpResponse::Ok().json(JobsResponse {
            success: true,
            jobs,
            pagination: Pagination::new(page, limit, total),
        }),
        Err(e) => {
            tracing::error!("Job listing failed: {}", e);
            server_error()
        }
    }
}

/// Single job lookup, inactive postings are hidden
///
/// GET /api/career/jobs/{id}
async fn get_job(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let job_id = path.into_inner();

    match state.appwrite.get_job(&job_id).await {
        Ok(job) if job.is_active => HttpResponse::Ok().json(JobResponse { success: true, job }),
        Ok(_) => job_not_found(),
        Err(AppwriteError::NotFound(_)) => job_not_found(),
        Err(e) => {
            tracing::error!("Job fetch failed for {}: {}", job_id, e);
            server_error()
        }
    }
}

/// Most demanded skills across active postings
///
/// GET /api/career/trending-skills
async fn trending(state: web::Data<AppState>) -> impl Responder {
    let cache_key = CacheKey::trending();

    // Counts are cached; the growth figure is rolled fresh on every request
    let counts: Vec<(String, usize)> = match state.cache.get(&cache_key).await {
        Ok(counts) => counts,
        Err(_) => {
            let jobs = match state
                .appwrite
                .query_jobs(&CandidateFilter::unrestricted(), TRENDING_POOL)
                .await
            {
                Ok(jobs) => jobs,
                Err(e) => {
                    tracing::error!("Trending query failed: {}", e);
                    return server_error();
                }
            };

            let counts = count_skills(&jobs);
            if let Err(e) = state.cache.set(&cache_key, &counts).await {
                tracing::warn!("Failed to cache trending counts: {}", e);
            }
            counts
        }
    };

    HttpResponse::Ok().json(TrendingSkillsResponse {
        success: true,
        trending_skills: trending_skills(&counts),
    })
}

fn job_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Job not found"))
}

fn server_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new("Server error"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_experience_value_yields_empty_page() {
        // parse() rejects names outside the tier ladder
        assert!(ExperienceTier::parse("wizard").is_none());
    }

    #[test]
    fn listing_query_splits_skills() {
        let query = JobsQuery {
            page: 1,
            limit: 10,
            location: None,
            experience: None,
            skills: Some("React,Go".to_string()),
        };
        assert_eq!(query.skill_list().len(), 2);
    }
}
