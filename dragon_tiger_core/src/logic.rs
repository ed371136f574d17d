use crate::card::*;
use crate::error::GameError;
use crate::ledger::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// 一局的结果
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum RoundOutcome {
    DragonWins,
    TigerWins,
    Tie,
}

impl RoundOutcome {
    pub const ALL: [RoundOutcome; 3] = [RoundOutcome::DragonWins, RoundOutcome::TigerWins, RoundOutcome::Tie];

    /// 该结果对应的获胜下注区域
    pub fn winning_bet(self) -> Outcome {
        match self {
            RoundOutcome::DragonWins => Outcome::Dragon,
            RoundOutcome::TigerWins => Outcome::Tiger,
            RoundOutcome::Tie => Outcome::Tie,
        }
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            RoundOutcome::DragonWins => "DRAGON WINS!",
            RoundOutcome::TigerWins => "TIGER WINS!",
            RoundOutcome::Tie => "TIE!",
        })
    }
}

/// 一局结算的完整结果，交给上层展示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub dragon_card: Card,
    pub tiger_card: Card,
    pub dragon_value: u8,
    pub tiger_value: u8,
    pub outcome: RoundOutcome,
    /// 本局记入余额的总额（含退还的本金）
    pub credit: u32,
    /// 结算后的余额
    pub balance: u32,
    /// 需要高亮的区域：只有获胜区域有下注时才有值
    pub highlight: Option<Outcome>,
    /// 结算后余额为 0，游戏结束
    pub game_over: bool,
}

// --- 核心结算函数 ---

/// 比较龙、虎两张牌的点数
pub fn determine_outcome(dragon: &Card, tiger: &Card) -> RoundOutcome {
    let (d, t) = (dragon.value(), tiger.value());
    if d == t {
        RoundOutcome::Tie
    } else if d > t {
        RoundOutcome::DragonWins
    } else {
        RoundOutcome::TigerWins
    }
}

/// 计算本局应记入余额的金额
///
/// - 和：和区本金 + 8 倍，龙、虎区各退还一半本金
/// - 龙/虎赢：获胜区本金 + 1 倍，其余区域输掉
///
/// 金额超出 u32 时返回 `BalanceOverflow`。
pub fn settle(bets: &Bets, outcome: RoundOutcome) -> Result<u32, GameError> {
    let winner = outcome.winning_bet();
    let mut credit = bets.get(winner).checked_mul(1 + winner.payout_ratio());
    if outcome == RoundOutcome::Tie {
        credit = credit.and_then(|c| c.checked_add(bets.dragon / 2 + bets.tiger / 2));
    }
    credit.ok_or(GameError::BalanceOverflow)
}

/// 执行完整的一局：必要时补牌，发两张牌，比较，结算并入账
///
/// 下注额不会在这里清零，它们保持可见，直到下一局开始时调用 `reset_bets`。
pub fn resolve_round<R: Rng + ?Sized>(
    ledger: &mut BetLedger,
    deck: &mut Deck,
    rng: &mut R,
) -> Result<RoundResult, GameError> {
    if ledger.total_staked() == 0 {
        return Err(GameError::NoBetsPlaced);
    }

    // 发牌前确认任何结果都能入账，失败时牌堆和账本都不变
    let bets = ledger.bets();
    for outcome in RoundOutcome::ALL {
        ledger.check_credit(settle(&bets, outcome)?)?;
    }

    if deck.needs_replenishment() {
        debug!("牌堆剩余 {} 张，重新洗一副新牌", deck.len());
        deck.replenish(rng);
    }

    let dragon_card = deck.draw()?;
    let tiger_card = deck.draw()?;
    let outcome = determine_outcome(&dragon_card, &tiger_card);

    let credit = settle(&bets, outcome)?;
    ledger.apply_payout(credit)?;

    let winner = outcome.winning_bet();
    let highlight = (bets.get(winner) > 0).then_some(winner);

    debug!(
        "发牌 龙:{} 虎:{} -> {:?}, 入账 {}, 余额 {}",
        dragon_card, tiger_card, outcome, credit, ledger.balance()
    );

    Ok(RoundResult {
        dragon_card,
        tiger_card,
        dragon_value: dragon_card.value(),
        tiger_value: tiger_card.value(),
        outcome,
        credit,
        balance: ledger.balance(),
        highlight,
        game_over: ledger.is_broke(),
    })
}

// --- 单元测试 ---
