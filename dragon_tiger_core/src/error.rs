use thiserror::Error;

/// 核心操作可能返回的错误。
///
/// 除了 `EmptyDeck` 以外都是玩家操作层面的错误，
/// 上层只需拒绝该操作并提示玩家即可，游戏状态不会被改变。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("请先选择筹码")]
    NoChipSelected,
    #[error("无效的筹码面额: {0}")]
    InvalidChip(u32),
    #[error("余额不足: 下注 {amount}, 余额 {balance}")]
    InsufficientFunds { amount: u32, balance: u32 },
    #[error("必须先下注才能发牌")]
    NoBetsPlaced,
    /// 每次发牌前都会检查补牌，出现这个错误说明逻辑有缺陷
    #[error("牌堆已空")]
    EmptyDeck,
    #[error("本局已发牌，不能再下注")]
    BettingClosed,
    #[error("本局尚未发牌")]
    RoundNotDealt,
    /// 入账后余额加上未退回的下注会超出 u32 上限
    #[error("余额超出上限")]
    BalanceOverflow,
    #[error("游戏结束，余额已用完")]
    GameOver,
}
