use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use dashmap::DashMap;
use futures_util::{stream::StreamExt, SinkExt};
use parking_lot::Mutex as P_Mutex;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use dragon_tiger_core::{ClientMessage, GameError, GameState, ServerMessage, SessionId, CHIP_DENOMINATIONS};

const DEFAULT_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 25917);

// 服务器全局状态
struct AppState {
    sessions: DashMap<SessionId, Arc<Session>>,
}

// 单个会话：每个连接独占一份账本和牌堆，会话之间互不共享
struct Session {
    game: P_Mutex<GameState>,
}

type SharedState = Arc<AppState>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let state = SharedState::new(AppState {
        sessions: DashMap::new(),
    });

    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(state);

    let addr = match std::env::var("DRAGON_TIGER_ADDR") {
        Ok(s) => s.parse::<SocketAddr>()?,
        Err(_) => SocketAddr::from(DEFAULT_ADDR),
    };
    info!("服务器正在监听 {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}

/// 处理 WebSocket 连接请求
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// 处理单个 WebSocket 连接的生命周期
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();

    // 从其他任务接收要发送的消息
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(32);

    // 专门负责把通道里的消息写到 WebSocket
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let payload = match serde_json::to_string(&msg) {
                Ok(p) => p,
                Err(e) => {
                    error!("序列化消息失败: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(payload.into())).await.is_err() {
                // 客户端已断开
                break;
            }
        }
    });

    let mut session_id: Option<SessionId> = None;

    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Text(text) = msg {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    handle_client_message(client_msg, &state, &tx, &mut session_id).await;
                }
                Err(e) => {
                    warn!("解析消息失败: {}", e);
                    let _ = tx.send(ServerMessage::Error { message: format!("无法解析的消息: {}", e) }).await;
                }
            }
        }
    }

    // 连接断开，会话随之销毁
    if let Some(id) = session_id {
        state.sessions.remove(&id);
        info!("会话 {} 已关闭", id);
    }
    info!("客户端连接关闭");
}

/// 核心消息处理逻辑
async fn handle_client_message(
    msg: ClientMessage,
    state: &SharedState,
    tx: &mpsc::Sender<ServerMessage>,
    session_id: &mut Option<SessionId>,
) {
    if let ClientMessage::NewSession = msg {
        // 同一连接重复开局时替换旧会话
        if let Some(old) = session_id.take() {
            state.sessions.remove(&old);
        }
        let id = Uuid::new_v4();
        let game = GameState::new();
        let table = game.view();
        state.sessions.insert(id, Arc::new(Session { game: P_Mutex::new(game) }));
        *session_id = Some(id);

        info!("创建了新会话 {}", id);
        let _ = tx.send(ServerMessage::SessionStarted {
            session_id: id,
            chips: CHIP_DENOMINATIONS.to_vec(),
            table,
        }).await;
        return;
    }

    let session = match (*session_id).and_then(|id| state.sessions.get(&id).map(|s| s.value().clone())) {
        Some(s) => s,
        None => {
            let _ = tx.send(ServerMessage::Error { message: "请先开启会话".to_string() }).await;
            return;
        }
    };

    // 锁只在同步代码块内持有，不跨越 await
    let reply = {
        let mut game = session.game.lock();
        apply_client_message(&mut game, msg)
    };

    if let ServerMessage::Error { message } = &reply {
        warn!("会话 {:?} 操作被拒绝: {}", session_id, message);
    }
    let _ = tx.send(reply).await;
}

/// 把一条客户端消息应用到游戏状态上，返回要回复的消息
fn apply_client_message(game: &mut GameState, msg: ClientMessage) -> ServerMessage {
    let outcome = match msg {
        ClientMessage::SelectChip(amount) => game.select_chip(amount).map(|_| None),
        ClientMessage::PlaceBet(outcome) => game.place_bet(outcome).map(|_| None),
        ClientMessage::ResetBets => game.reset_bets().map(|_| None),
        ClientMessage::Deal => game.deal().map(Some),
        ClientMessage::NextRound => game.next_round().map(|_| None),
        ClientMessage::NewGame => {
            game.new_game();
            Ok(None)
        }
        ClientMessage::NewSession => Ok(None),
    };

    match outcome {
        Ok(Some(result)) => {
            if result.game_over {
                info!("余额用完，游戏结束");
            }
            ServerMessage::RoundResolved { result, table: game.view() }
        }
        Ok(None) => ServerMessage::TableUpdated(game.view()),
        Err(e) => {
            if e == GameError::EmptyDeck {
                error!("发牌时牌堆为空，补牌逻辑有缺陷");
            }
            ServerMessage::Error { message: e.to_string() }
        }
    }
}
