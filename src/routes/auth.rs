use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    is_valid_playing_style, ErrorResponse, LoginRequest, ProfileResponse, RegisterRequest,
    TokenResponse, UpdateProfileRequest, User, PLAYING_STYLES,
};
use crate::routes::AppState;
use crate::services::PostgresError;

/// Configure all auth-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/register", web::post().to(register))
        .route("/auth/login", web::post().to(login))
        .route("/auth/refresh", web::post().to(refresh))
        .route("/auth/profile", web::get().to(get_profile))
        .route("/auth/profile", web::put().to(update_profile));
}

fn token_pair(state: &AppState, user_id: i64) -> Result<TokenResponse, HttpResponse> {
    let access_token = state.auth.issue_access_token(user_id);
    let refresh_token = state.auth.issue_refresh_token(user_id);

    match (access_token, refresh_token) {
        (Ok(access_token), Ok(refresh_token)) => Ok(TokenResponse {
            access_token,
            refresh_token,
        }),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!("Failed to issue tokens: {}", e);
            Err(HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Token issuing failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            }))
        }
    }
}

/// Register a new user
///
/// POST /api/v1/auth/register
async fn register(state: web::Data<AppState>, req: web::Json<RegisterRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if let Some(style) = &req.playing_style {
        if !is_valid_playing_style(style) {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Validation failed".to_string(),
                message: format!("playing_style must be one of: {}", PLAYING_STYLES.join(", ")),
                status_code: 400,
            });
        }
    }

    // Reject duplicates before hashing
    match state.postgres.find_user_by_username(&req.username).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(ErrorResponse {
                error: "Username already exists".to_string(),
                message: format!("Username {} is taken", req.username),
                status_code: 409,
            });
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Failed to check username: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error creating user".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    }

    match state.postgres.find_user_by_email(&req.email).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(ErrorResponse {
                error: "Email already registered".to_string(),
                message: format!("Email {} is taken", req.email),
                status_code: 409,
            });
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Failed to check email: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error creating user".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    }

    let password_hash = match state.auth.hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error creating user".to_string(),
                message: "Password hashing failed".to_string(),
                status_code: 500,
            });
        }
    };

    let user = match state
        .postgres
        .create_user(
            &req.username,
            &req.email,
            &password_hash,
            req.handicap,
            req.playing_style.as_deref(),
        )
        .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to create user: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error creating user".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    tracing::info!("Registered user {} ({})", user.username, user.id);

    match token_pair(&state, user.id) {
        Ok(tokens) => HttpResponse::Created().json(tokens),
        Err(response) => response,
    }
}

/// Authenticate and issue a token pair
///
/// POST /api/v1/auth/login
async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user = match state.postgres.find_user_by_username(&req.username).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error during login".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let verified = match &user {
        Some(u) => state
            .auth
            .verify_password(&req.password, &u.password_hash)
            .unwrap_or(false),
        None => false,
    };

    let user = match (verified, user) {
        (true, Some(user)) => user,
        _ => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Invalid credentials".to_string(),
                message: "Invalid username or password".to_string(),
                status_code: 401,
            });
        }
    };

    match token_pair(&state, user.id) {
        Ok(tokens) => HttpResponse::Ok().json(tokens),
        Err(response) => response,
    }
}

/// Exchange a refresh token for a fresh access token
///
/// POST /api/v1/auth/refresh
async fn refresh(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let user_id = match state.auth.authenticate_refresh(&http_req) {
        Ok(id) => id,
        Err(e) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Invalid refresh token".to_string(),
                message: e.to_string(),
                status_code: 401,
            });
        }
    };

    match state.auth.issue_access_token(user_id) {
        Ok(access_token) => {
            HttpResponse::Ok().json(serde_json::json!({ "access_token": access_token }))
        }
        Err(e) => {
            tracing::error!("Failed to issue access token: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Token issuing failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

fn profile_response(user: &User) -> ProfileResponse {
    ProfileResponse {
        username: user.username.clone(),
        email: user.email.clone(),
        handicap: user.handicap,
        playing_style: user.playing_style.clone(),
        created_at: user.created_at,
    }
}

/// Get the authenticated user's profile
///
/// GET /api/v1/auth/profile
async fn get_profile(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let user_id = match state.auth.authenticate(&http_req) {
        Ok(id) => id,
        Err(e) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Unauthorized".to_string(),
                message: e.to_string(),
                status_code: 401,
            });
        }
    };

    match state.postgres.get_user(user_id).await {
        Ok(user) => HttpResponse::Ok().json(profile_response(&user)),
        Err(PostgresError::NotFound(message)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "User not found".to_string(),
            message,
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error retrieving profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Update the authenticated user's profile
///
/// PUT /api/v1/auth/profile
async fn update_profile(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<UpdateProfileRequest>,
) -> impl Responder {
    let user_id = match state.auth.authenticate(&http_req) {
        Ok(id) => id,
        Err(e) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Unauthorized".to_string(),
                message: e.to_string(),
                status_code: 401,
            });
        }
    };

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if let Some(style) = &req.playing_style {
        if !is_valid_playing_style(style) {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Validation failed".to_string(),
                message: format!("playing_style must be one of: {}", PLAYING_STYLES.join(", ")),
                status_code: 400,
            });
        }
    }

    let mut user = match state.postgres.get_user(user_id).await {
        Ok(user) => user,
        Err(PostgresError::NotFound(message)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "User not found".to_string(),
                message,
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch user {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error updating profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if let Some(username) = &req.username {
        match state.postgres.find_user_by_username(username).await {
            Ok(Some(existing)) if existing.id != user_id => {
                return HttpResponse::Conflict().json(ErrorResponse {
                    error: "Username already exists".to_string(),
                    message: format!("Username {} is taken", username),
                    status_code: 409,
                });
            }
            Ok(_) => user.username = username.clone(),
            Err(e) => {
                tracing::error!("Failed to check username: {}", e);
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Error updating profile".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                });
            }
        }
    }

    if let Some(email) = &req.email {
        match state.postgres.find_user_by_email(email).await {
            Ok(Some(existing)) if existing.id != user_id => {
                return HttpResponse::Conflict().json(ErrorResponse {
                    error: "Email already registered".to_string(),
                    message: format!("Email {} is taken", email),
                    status_code: 409,
                });
            }
            Ok(_) => user.email = email.clone(),
            Err(e) => {
                tracing::error!("Failed to check email: {}", e);
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Error updating profile".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                });
            }
        }
    }

    if let Some(password) = &req.password {
        match state.auth.hash_password(password) {
            Ok(hash) => user.password_hash = hash,
            Err(e) => {
                tracing::error!("Password hashing failed: {}", e);
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Error updating profile".to_string(),
                    message: "Password hashing failed".to_string(),
                    status_code: 500,
                });
            }
        }
    }

    if let Some(handicap) = req.handicap {
        user.handicap = Some(handicap);
    }

    if let Some(style) = &req.playing_style {
        user.playing_style = Some(style.clone());
    }

    match state.postgres.save_profile(&user).await {
        Ok(()) => HttpResponse::Ok().json(profile_response(&user)),
        Err(e) => {
            tracing::error!("Failed to save profile for {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error updating profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
