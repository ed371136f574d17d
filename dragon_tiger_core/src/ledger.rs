use crate::config::{DRAGON_TIGER_PAYOUT, STARTING_BALANCE, TIE_PAYOUT};
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 下注区域，同时也是每局的结果类别
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Outcome {
    Dragon,
    Tie,
    Tiger,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Dragon, Outcome::Tie, Outcome::Tiger];

    /// 赢钱部分的赔率，不含退还的本金
    pub fn payout_ratio(self) -> u32 {
        match self {
            Outcome::Dragon | Outcome::Tiger => DRAGON_TIGER_PAYOUT,
            Outcome::Tie => TIE_PAYOUT,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Outcome::Dragon => "dragon",
            Outcome::Tie => "tie",
            Outcome::Tiger => "tiger",
        })
    }
}

/// 三个区域的下注额
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bets {
    pub dragon: u32,
    pub tie: u32,
    pub tiger: u32,
}

impl Bets {
    pub fn get(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Dragon => self.dragon,
            Outcome::Tie => self.tie,
            Outcome::Tiger => self.tiger,
        }
    }

    fn get_mut(&mut self, outcome: Outcome) -> &mut u32 {
        match outcome {
            Outcome::Dragon => &mut self.dragon,
            Outcome::Tie => &mut self.tie,
            Outcome::Tiger => &mut self.tiger,
        }
    }

    pub fn sum(&self) -> u32 {
        self.dragon + self.tie + self.tiger
    }
}

/// 下注账本：玩家余额和本局各区域的下注
///
/// 不变量：`total_staked == bets.sum()`，每次修改后都会检查；
/// `balance + total_staked` 不超过 `u32::MAX`，因此退回下注永远不会溢出。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLedger {
    balance: u32,
    bets: Bets,
    total_staked: u32,
}

impl Default for BetLedger {
    fn default() -> Self {
        BetLedger::with_balance(STARTING_BALANCE)
    }
}

impl BetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(balance: u32) -> Self {
        BetLedger { balance, bets: Bets::default(), total_staked: 0 }
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn bets(&self) -> Bets {
        self.bets
    }

    pub fn stake(&self, outcome: Outcome) -> u32 {
        self.bets.get(outcome)
    }

    pub fn total_staked(&self) -> u32 {
        self.total_staked
    }

    /// 余额已经用完
    pub fn is_broke(&self) -> bool {
        self.balance == 0
    }

    /// 在某个区域下注
    ///
    /// 金额为 0 视为未选择筹码；金额超过余额时拒绝，状态不变。
    pub fn place_bet(&mut self, outcome: Outcome, amount: u32) -> Result<(), GameError> {
        if amount == 0 {
            return Err(GameError::NoChipSelected);
        }
        if amount > self.balance {
            return Err(GameError::InsufficientFunds { amount, balance: self.balance });
        }

        self.balance -= amount;
        *self.bets.get_mut(outcome) += amount;
        self.total_staked += amount;
        self.check_invariant();
        Ok(())
    }

    /// 撤回全部下注，本金退回余额
    pub fn reset_bets(&mut self) {
        if self.total_staked == 0 {
            return;
        }
        // balance + total_staked 不会溢出，由 apply_payout 保证
        self.balance += self.total_staked;
        self.bets = Bets::default();
        self.total_staked = 0;
        self.check_invariant();
    }

    /// 结算入账
    ///
    /// 入账后余额连同尚未退回的下注超出上限时拒绝，余额不变。
    pub fn apply_payout(&mut self, amount: u32) -> Result<(), GameError> {
        self.check_credit(amount)?;
        self.balance += amount;
        Ok(())
    }

    /// 检查入账 amount 之后是否仍能退回全部下注
    pub fn check_credit(&self, amount: u32) -> Result<(), GameError> {
        self.balance
            .checked_add(amount)
            .and_then(|b| b.checked_add(self.total_staked))
            .map(|_| ())
            .ok_or(GameError::BalanceOverflow)
    }

    fn check_invariant(&self) {
        debug_assert_eq!(self.total_staked, self.bets.sum(), "下注总额与各区域之和不一致");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_bet() {
        let mut ledger = BetLedger::new();
        ledger.place_bet(Outcome::Dragon, 100).unwrap();
        ledger.place_bet(Outcome::Tie, 50).unwrap();
        ledger.place_bet(Outcome::Dragon, 20).unwrap();

        assert_eq!(ledger.balance(), STARTING_BALANCE - 170);
        assert_eq!(ledger.stake(Outcome::Dragon), 120);
        assert_eq!(ledger.stake(Outcome::Tie), 50);
        assert_eq!(ledger.stake(Outcome::Tiger), 0);
        assert_eq!(ledger.total_staked(), 170);
        assert_eq!(ledger.total_staked(), ledger.bets().sum());
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let mut ledger = BetLedger::new();
        assert_eq!(ledger.place_bet(Outcome::Tiger, 0), Err(GameError::NoChipSelected));
        assert_eq!(ledger, BetLedger::new());
    }

    #[test]
    fn test_insufficient_funds_leaves_state_unchanged() {
        let mut ledger = BetLedger::with_balance(300);
        ledger.place_bet(Outcome::Tiger, 100).unwrap();
        let before = ledger.clone();

        let err = ledger.place_bet(Outcome::Dragon, 300).unwrap_err();
        assert_eq!(err, GameError::InsufficientFunds { amount: 300, balance: 200 });
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_bet_whole_balance() {
        let mut ledger = BetLedger::with_balance(100);
        ledger.place_bet(Outcome::Tie, 100).unwrap();
        assert_eq!(ledger.balance(), 0);
        assert!(ledger.is_broke());
        assert!(ledger.place_bet(Outcome::Tie, 20).is_err());
    }

    #[test]
    fn test_reset_restores_balance() {
        let mut ledger = BetLedger::new();
        let stakes = [
            (Outcome::Dragon, 5000),
            (Outcome::Tie, 30),
            (Outcome::Tiger, 1000),
            (Outcome::Dragon, 20),
            (Outcome::Tiger, 3000),
        ];
        for (outcome, amount) in stakes {
            ledger.place_bet(outcome, amount).unwrap();
        }
        assert_eq!(ledger.balance(), STARTING_BALANCE - 9050);

        ledger.reset_bets();
        assert_eq!(ledger.balance(), STARTING_BALANCE);
        assert_eq!(ledger.bets(), Bets::default());
        assert_eq!(ledger.total_staked(), 0);

        // 再次重置没有效果
        ledger.reset_bets();
        assert_eq!(ledger.balance(), STARTING_BALANCE);
    }

    #[test]
    fn test_apply_payout() {
        let mut ledger = BetLedger::with_balance(0);
        ledger.apply_payout(475).unwrap();
        assert_eq!(ledger.balance(), 475);
        ledger.apply_payout(0).unwrap();
        assert_eq!(ledger.balance(), 475);
    }

    #[test]
    fn test_payout_overflow_is_rejected() {
        let mut ledger = BetLedger::with_balance(u32::MAX);
        ledger.place_bet(Outcome::Dragon, 1000).unwrap();

        assert_eq!(ledger.apply_payout(2000), Err(GameError::BalanceOverflow));
        assert_eq!(ledger.balance(), u32::MAX - 1000);
        // 余额 + 下注正好到上限时仍可入账
        ledger.apply_payout(0).unwrap();

        // 退回下注不会溢出
        ledger.reset_bets();
        assert_eq!(ledger.balance(), u32::MAX);
        assert_eq!(ledger.apply_payout(1), Err(GameError::BalanceOverflow));
    }

    #[test]
    fn test_payout_ratios() {
        assert_eq!(Outcome::Dragon.payout_ratio(), 1);
        assert_eq!(Outcome::Tiger.payout_ratio(), 1);
        assert_eq!(Outcome::Tie.payout_ratio(), 8);
    }
}
