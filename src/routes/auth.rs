use crate::{
    auth::{
        generate_access_token, hash_password, verify_password, AuthResponse, LoginRequest,
        RegisterRequest, RegisterResponse,
    },
    config::{JwtConfig, PasswordConfig},
    error::AppError,
    models::User,
    store::TodoStore,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates the account and returns it together with an access token.
///
/// ## Responses:
/// - `201 Created`: `{user, token}`.
/// - `400 Bad Request`: a field is missing or malformed, or the email/userName is taken.
#[post("/register")]
pub async fn register(
    store: web::Data<dyn TodoStore>,
    jwt: web::Data<JwtConfig>,
    password: web::Data<PasswordConfig>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.check_required()?;
    register_data.validate()?;

    if store.find_user_by_email(&register_data.email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".into()));
    }
    if store.find_user(&register_data.user_name).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let request = register_data.into_inner();
    let password_hash = hash_password(&request.password, password.bcrypt_cost)?;
    let user = store
        .insert_user(&User::new(
            request.user_name,
            request.email,
            request.first_name,
            request.last_name,
            password_hash,
        ))
        .await?;

    let token = generate_access_token(&user.user_name, &jwt)?;
    log::info!("registered user {}", user.user_name);

    Ok(HttpResponse::Created().json(RegisterResponse { user, token }))
}

/// Login user
///
/// Authenticates with `userName` and `password` and returns an access token.
///
/// ## Responses:
/// - `200 OK`: `{token, userName}`.
/// - `400 Bad Request`: userName or password missing.
/// - `401 Unauthorized`: unknown user or wrong password.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn TodoStore>,
    jwt: web::Data<JwtConfig>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.check_required()?;

    let user = match store.find_user(&login_data.user_name).await? {
        Some(user) => user,
        None => {
            log::warn!("login attempt for unknown user {}", login_data.user_name);
            return Err(AppError::Unauthorized("Invalid username or password".into()));
        }
    };

    if !verify_password(&login_data.password, &user.password_hash)? {
        log::warn!("failed login for user {}", user.user_name);
        return Err(AppError::Unauthorized("Invalid username or password".into()));
    }

    let token = generate_access_token(&user.user_name, &jwt)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user_name: user.user_name,
    }))
}
