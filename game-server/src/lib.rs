use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;

use crate::game_manager::GameManager;
use crate::orchestrator::RoundOrchestrator;
use crate::websocket::ConnectionManager;
use game_core::GameError;
use game_types::{CreateGameRequest, ErrorCode, ErrorResponse};

pub mod config;
pub mod game_manager;
pub mod orchestrator;
pub mod websocket;

const MAX_BODY_BYTES: u64 = 16 * 1024;

pub fn create_routes(
    connection_manager: Arc<ConnectionManager>,
    game_manager: Arc<GameManager>,
    orchestrator: Arc<RoundOrchestrator>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let connection_manager_filter = warp::any().map({
        let connection_manager = connection_manager.clone();
        move || connection_manager.clone()
    });

    let game_manager_filter = warp::any().map({
        let game_manager = game_manager.clone();
        move || game_manager.clone()
    });

    let orchestrator_filter = warp::any().map({
        let orchestrator = orchestrator.clone();
        move || orchestrator.clone()
    });

    // WebSocket endpoint
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(connection_manager_filter)
        .and(game_manager_filter.clone())
        .and(orchestrator_filter)
        .map(|ws: warp::ws::Ws, conn_mgr, game_mgr, orchestrator| {
            ws.on_upgrade(move |socket| {
                websocket::handle_connection(socket, conn_mgr, game_mgr, orchestrator)
            })
        });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let create_game = warp::path!("games" / "new")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(game_manager_filter.clone())
        .and_then(handle_create_game);

    let join_game = warp::path!("games" / String)
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(game_manager_filter.clone())
        .and_then(handle_join_game);

    let list_games = warp::path!("games")
        .and(warp::get())
        .and(game_manager_filter)
        .and_then(handle_list_games);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);

    websocket
        .or(health)
        .or(create_game)
        .or(join_game)
        .or(list_games)
        .with(cors)
        .with(warp::log("word_rooms"))
}

async fn handle_create_game(
    request: CreateGameRequest,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let response = game_manager.create_game(&request.player_name).await;
    Ok(warp::reply::json(&response))
}

async fn handle_join_game(
    game_id: String,
    request: CreateGameRequest,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match game_manager.join_game(&game_id, &request.player_name).await {
        Ok(response) => Ok(warp::reply::with_status(
            warp::reply::json(&response),
            StatusCode::OK,
        )),
        Err(err) => {
            let error = match err {
                GameError::GameNotFound(_) => ErrorCode::InvalidGameId,
                GameError::NotInLobby { .. } | GameError::NoPlayers(_) => {
                    ErrorCode::GameInProgress
                }
            };

            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorResponse { error }),
                StatusCode::BAD_REQUEST,
            ))
        }
    }
}

async fn handle_list_games(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let games = game_manager.list_games().await;
    Ok(warp::reply::json(&games))
}
