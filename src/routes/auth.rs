use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::models::{
    AuthResponse, ErrorResponse, LoginRequest, RegisterRequest, User, UserResponse,
};
use crate::routes::AppState;
use crate::services::AppwriteError;

/// Configure authentication routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/verify", web::get().to(verify))
            .route("/me", web::get().to(current_user))
            .route("/profile/{id}", web::get().to(get_profile)),
    );
}

/// Register a new account
///
/// POST /api/auth/register
async fn register(state: web::Data<AppState>, req: web::Json<RegisterRequest>) -> impl Responder {
    let req = req.into_inner();

    // Blank and missing fields are the same failure
    if req.email.trim().is_empty()
        || req.password.is_empty()
        || req.first_name.trim().is_empty()
        || req.last_name.trim().is_empty()
    {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Missing required fields. Please provide email, password, first name, and last name.",
        ));
    }

    // After the emptiness gate only the email and password rules can fail
    if let Err(errors) = req.validate() {
        if errors.field_errors().contains_key("email") {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "Invalid email format. Please enter a valid email address.",
            ));
        }
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Password must be at least 6 characters long.",
        ));
    }

    let email = req.email.trim().to_lowercase();

    match state.appwrite.find_user_by_email(&email).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(ErrorResponse::new(
                "Account already exists with this email address. Please try logging in instead.",
            ));
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Duplicate-email lookup failed for {}: {}", email, e);
            return registration_error();
        }
    }

    let password = match state.auth.hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return registration_error();
        }
    };

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        password,
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        title: "Developer".to_string(),
        bio: String::new(),
        location: String::new(),
        profile_picture: String::new(),
        skills: vec![],
        career_goals: vec![],
        projects: vec![],
        education: vec![],
        experience: "entry".to_string(),
        created_at: Some(now),
        updated_at: Some(now),
    };

    if let Err(e) = state.appwrite.create_user(&user).await {
        tracing::error!("Failed to create user document: {}", e);
        return registration_error();
    }

    let token = match state.auth.issue_token(&user.id, &user.email) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Token issuance failed for {}: {}", user.id, e);
            return registration_error();
        }
    };

    tracing::info!("Registered new user {}", user.id);

    HttpResponse::Created().json(AuthResponse {
        success: true,
        message: "Account created successfully! Welcome to Career Coach AI.".to_string(),
        token,
        user: user.into(),
    })
}

fn registration_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        "Server error during registration. Please try again later.",
    ))
}

/// Log into an existing account
///
/// POST /api/auth/login
async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    let req = req.into_inner();

    if req.email.trim().is_empty() || req.password.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Missing credentials. Please provide both email and password.",
        ));
    }

    // Only the email validator can still fail after the emptiness check
    if req.validate().is_err() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Invalid email format. Please enter a valid email address.",
        ));
    }

    let email = req.email.trim().to_lowercase();

    let user = match state.appwrite.find_user_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(ErrorResponse::new(
                "Account not found. Please check your email address or create a new account.",
            ));
        }
        Err(e) => {
            tracing::error!("User lookup failed for {}: {}", email, e);
            return login_error();
        }
    };

    match state.auth.verify_password(&req.password, &user.password) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::Unauthorized().json(ErrorResponse::new(
                "Incorrect password. Please check your password and try again.",
            ));
        }
        Err(e) => {
            tracing::error!("Password verification failed for {}: {}", user.id, e);
            return login_error();
        }
    }

    let token = match state.auth.issue_token(&user.id, &user.email) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Token issuance failed for {}: {}", user.id, e);
            return login_error();
        }
    };

    tracing::info!("User {} logged in", user.id);

    HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: "Login successful! Welcome back to Career Coach AI.".to_string(),
        token,
        user: user.into(),
    })
}

fn login_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        "Server error during login. Please try again later.",
    ))
}

/// Confirm a token is still valid and return its owner
///
/// GET /api/auth/verify
async fn verify(state: web::Data<AppState>, identity: AuthenticatedUser) -> impl Responder {
    match state.appwrite.get_user(&identity.user_id).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse {
            success: true,
            message: "Token is valid.".to_string(),
            user: user.into(),
        }),
        Err(AppwriteError::NotFound(_)) => {
            HttpResponse::Unauthorized().json(ErrorResponse::new("Invalid token. User not found."))
        }
        Err(e) => {
            tracing::error!("Profile fetch failed for {}: {}", identity.user_id, e);
            profile_error()
        }
    }
}

/// Return the profile behind the presented token
///
/// GET /api/auth/me
async fn current_user(state: web::Data<AppState>, identity: AuthenticatedUser) -> impl Responder {
    match state.appwrite.get_user(&identity.user_id).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse {
            success: true,
            message: "Profile retrieved successfully.".to_string(),
            user: user.into(),
        }),
        Err(AppwriteError::NotFound(_)) => {
            HttpResponse::NotFound().json(ErrorResponse::new("User profile not found."))
        }
        Err(e) => {
            tracing::error!("Profile fetch failed for {}: {}", identity.user_id, e);
            profile_error()
        }
    }
}

/// Public profile lookup by id
///
/// GET /api/auth/profile/{id}
async fn get_profile(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    match state.appwrite.get_user(&user_id).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse {
            success: true,
            message: "Profile retrieved successfully.".to_string(),
            user: user.into(),
        }),
        Err(AppwriteError::NotFound(_)) => {
            HttpResponse::NotFound().json(ErrorResponse::new("User profile not found."))
        }
        Err(e) => {
            tracing::error!("Profile fetch failed for {}: {}", user_id, e);
            profile_error()
        }
    }
}

fn profile_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        "Server error while retrieving profile.",
    ))
}
