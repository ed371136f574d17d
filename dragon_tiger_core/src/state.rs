use crate::card::{Card, Deck};
use crate::config::is_chip_denomination;
use crate::error::GameError;
use crate::ledger::{BetLedger, Bets, Outcome};
use crate::logic::{RoundResult, resolve_round};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const PLACE_YOUR_BETS: &str = "Place your bets!";
pub const GAME_OVER_MESSAGE: &str = "Game Over! You're out of money.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    Betting,
    Dealt,
    GameOver, // 余额用完，只能开新游戏
}

/// 每次状态变化后交给展示层渲染的快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub balance: u32,
    pub total_staked: u32,
    pub bets: Bets,
    pub selected_chip: Option<u32>,
    // 发牌前为 None
    pub dragon_card: Option<Card>,
    pub tiger_card: Option<Card>,
    pub message: String,
    pub highlight: Option<Outcome>,
    pub phase: GamePhase,
    /// 等价于 `phase == GamePhase::GameOver`，方便展示层直接判断
    pub game_over: bool,
}

/// 一局游戏的全部状态
///
/// 账本和牌堆归它独占，随机数源可以注入，测试时用固定种子。
#[derive(Debug, Clone)]
pub struct GameState<R = StdRng> {
    ledger: BetLedger,
    deck: Deck,
    rng: R,
    phase: GamePhase,
    selected_chip: Option<u32>,
    last_cards: Option<(Card, Card)>,
    message: String,
    highlight: Option<Outcome>,
}

impl GameState<StdRng> {
    /// 使用系统熵作为随机种子
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for GameState<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

// --- GameState 的实现方法 ---

impl<R: Rng> GameState<R> {
    pub fn with_rng(mut rng: R) -> Self {
        let mut deck = Deck::build();
        deck.shuffle(&mut rng);
        GameState {
            ledger: BetLedger::new(),
            deck,
            rng,
            phase: GamePhase::Betting,
            selected_chip: None,
            last_cards: None,
            message: PLACE_YOUR_BETS.to_string(),
            highlight: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn ledger(&self) -> &BetLedger {
        &self.ledger
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// 选择后续下注使用的筹码面额
    pub fn select_chip(&mut self, amount: u32) -> Result<(), GameError> {
        if !is_chip_denomination(amount) {
            return Err(GameError::InvalidChip(amount));
        }
        self.selected_chip = Some(amount);
        Ok(())
    }

    /// 用当前选中的筹码在某个区域下注
    pub fn place_bet(&mut self, outcome: Outcome) -> Result<(), GameError> {
        self.ensure_betting()?;
        let amount = self.selected_chip.ok_or(GameError::NoChipSelected)?;
        self.ledger.place_bet(outcome, amount)
    }

    /// 撤回本局全部下注
    pub fn reset_bets(&mut self) -> Result<(), GameError> {
        self.ensure_betting()?;
        self.ledger.reset_bets();
        Ok(())
    }

    /// 发牌并结算
    ///
    /// 成功后进入 Dealt；若结算后余额为 0 则进入 GameOver。
    pub fn deal(&mut self) -> Result<RoundResult, GameError> {
        self.ensure_betting()?;
        let result = resolve_round(&mut self.ledger, &mut self.deck, &mut self.rng)?;

        self.last_cards = Some((result.dragon_card, result.tiger_card));
        self.highlight = result.highlight;
        if result.game_over {
            self.phase = GamePhase::GameOver;
            self.message = GAME_OVER_MESSAGE.to_string();
        } else {
            self.phase = GamePhase::Dealt;
            self.message = result.outcome.to_string();
        }
        Ok(result)
    }

    /// 开始下一局
    ///
    /// 此时账本里记录的仍是上一局的下注额，它们会通过 `reset_bets` 退回余额。
    pub fn next_round(&mut self) -> Result<(), GameError> {
        match self.phase {
            GamePhase::Dealt => {}
            GamePhase::Betting => return Err(GameError::RoundNotDealt),
            GamePhase::GameOver => return Err(GameError::GameOver),
        }
        self.ledger.reset_bets();
        self.last_cards = None;
        self.highlight = None;
        self.message = PLACE_YOUR_BETS.to_string();
        self.phase = GamePhase::Betting;
        Ok(())
    }

    /// 开一局全新的游戏：余额恢复初始值，换一副新牌
    pub fn new_game(&mut self) {
        self.ledger = BetLedger::new();
        self.deck.replenish(&mut self.rng);
        self.phase = GamePhase::Betting;
        self.selected_chip = None;
        self.last_cards = None;
        self.highlight = None;
        self.message = PLACE_YOUR_BETS.to_string();
    }

    pub fn view(&self) -> TableView {
        TableView {
            balance: self.ledger.balance(),
            total_staked: self.ledger.total_staked(),
            bets: self.ledger.bets(),
            selected_chip: self.selected_chip,
            dragon_card: self.last_cards.map(|(d, _)| d),
            tiger_card: self.last_cards.map(|(_, t)| t),
            message: self.message.clone(),
            highlight: self.highlight,
            phase: self.phase,
            game_over: self.is_game_over(),
        }
    }

    fn ensure_betting(&self) -> Result<(), GameError> {
        match self.phase {
            GamePhase::Betting => Ok(()),
            GamePhase::Dealt => Err(GameError::BettingClosed),
            GamePhase::GameOver => Err(GameError::GameOver),
        }
    }
}

// --- 单元测试 ---
