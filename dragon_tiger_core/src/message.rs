use crate::ledger::Outcome;
use crate::logic::RoundResult;
use crate::state::TableView;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SessionId = Uuid;

// --- 客户端 -> 服务器 的消息 ---
// 这些是展示层可以发给核心的输入事件。

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// 请求开启一个新的游戏会话
    NewSession,
    /// 选择筹码面额
    SelectChip(u32),
    /// 用当前筹码在某个区域下注
    PlaceBet(Outcome),
    /// 发牌
    Deal,
    /// 撤回本局所有下注
    ResetBets,
    /// 开始下一局
    NextRound,
    /// 余额用完后重新开始
    NewGame,
}

// --- 服务器 -> 客户端 的消息 ---

#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum ServerMessage {
    /// 会话创建成功
    SessionStarted {
        session_id: SessionId,
        chips: Vec<u32>, // 可选的筹码面额
        table: TableView,
    },
    /// 每次状态变化后的快照
    TableUpdated(TableView),
    /// 发牌结算完成
    RoundResolved {
        result: RoundResult,
        table: TableView,
    },
    /// 只发给出错的那个客户端
    Error { message: String },
}

impl From<Outcome> for ClientMessage {
    fn from(outcome: Outcome) -> Self {
        ClientMessage::PlaceBet(outcome)
    }
}
