use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use shared::{
    AddIncomeRequest, AddIncomeResponse, BalanceResponse, ClearExpensesResponse,
    CreateExpenseRequest, DeleteResponse, ErrorResponse, InitialBalanceResponse, MessageResponse,
    SetInitialBalanceRequest, UpdateExpenseRequest,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{LedgerError, LedgerService};

/// Matches the original API's `express.json({limit: '10mb'})` so base64
/// receipt photos fit in a request body.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub ledger: LedgerService,
}

impl AppState {
    pub fn new(ledger: LedgerService) -> Self {
        Self { ledger }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = match &self {
            LedgerError::InvalidAmount | LedgerError::InvalidInput => StatusCode::BAD_REQUEST,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::Storage(e) => {
                error!("Storage failure: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let error = match &self {
            LedgerError::Storage(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Build the application router. Cross-origin requests are universally
/// permitted; the listen address is the caller's concern.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/balance", get(get_balance))
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/:id", put(update_expense).delete(delete_expense))
        .route("/initial-balance", post(set_initial_balance))
        .route("/add-income", post(add_income))
        .route("/reset-expenses-only", delete(clear_expenses))
        .route("/reset", delete(reset))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(MessageResponse {
        message: "WalletTracker API running".to_string(),
    })
}

async fn get_balance(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /balance");
    Json(BalanceResponse {
        balance: state.ledger.balance().await,
    })
}

async fn list_expenses(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /expenses");
    Json(state.ledger.list_records().await)
}

async fn set_initial_balance(
    State(state): State<AppState>,
    Json(request): Json<SetInitialBalanceRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    info!("POST /initial-balance - request: {:?}", request);

    let balance = state.ledger.set_initial_balance(request).await?;
    Ok(Json(InitialBalanceResponse {
        success: true,
        balance,
    }))
}

async fn add_income(
    State(state): State<AppState>,
    Json(request): Json<AddIncomeRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    info!("POST /add-income - request: {:?}", request);

    let new_balance = state.ledger.add_income(request).await?;
    Ok(Json(AddIncomeResponse {
        success: true,
        new_balance,
    }))
}

async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    info!("POST /expenses - description: {:?}", request.description);

    let record = state.ledger.add_expense(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    info!("PUT /expenses/{}", id);

    let record = state.ledger.update_record(id, request).await?;
    Ok(Json(record))
}

async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, LedgerError> {
    info!("DELETE /expenses/{}", id);

    state.ledger.delete_record(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

async fn clear_expenses(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, LedgerError> {
    info!("DELETE /reset-expenses-only");

    let balance = state.ledger.clear_records().await?;
    Ok(Json(ClearExpensesResponse {
        message: "expenses cleared, balance kept".to_string(),
        balance,
    }))
}

async fn reset(State(state): State<AppState>) -> Result<impl IntoResponse, LedgerError> {
    info!("DELETE /reset");

    state.ledger.reset().await?;
    Ok(Json(MessageResponse {
        message: "all data cleared".to_string(),
    }))
}
