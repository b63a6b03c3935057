use actix_web::{web, HttpResponse, Responder};

use crate::models::{AdviceRequest, AdviceResponse, ErrorResponse};
use crate::routes::AppState;

/// Configure AI advisory routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/ai").route("/recommend", web::post().to(recommend)));
}

/// Personalized career advice from the model chain
///
/// POST /api/ai/recommend
async fn recommend(state: web::Data<AppState>, req: web::Json<AdviceRequest>) -> impl Responder {
    let req = req.into_inner();

    if req.missing_fields() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Missing required fields. Please provide skills, experience, and goals.",
        ));
    }

    if !state.gemini.is_configured() {
        return HttpResponse::InternalServerError().json(ErrorResponse::new(
            "AI service is not configured. Please contact support.",
        ));
    }

    match state
        .gemini
        .career_advice(&req.skills, &req.experience, &req.goals)
        .await
    {
        Ok(advice) => HttpResponse::Ok().json(AdviceResponse {
            success: true,
            message: "Career advice generated successfully.".to_string(),
            advice,
        }),
        Err(e) => {
            tracing::error!("Career advice generation failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()))
        }
    }
}
