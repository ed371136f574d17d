use crate::config::{DECK_SIZE, REPLENISH_THRESHOLD};
use crate::error::GameError;
use rand::Rng;
use rand::prelude::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
// --- 核心数据结构定义 ---

/// 花色 (Suit)，与牌的大小无关
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Heart,   // 红心 ♥
    Diamond, // 方块 ♦
    Club,    // 梅花 ♣
    Spade,   // 黑桃 ♠
}

/// 点数 (Rank)
/// 龙虎斗中 A 最小 (1)，K 最大 (13)，Ord 的派生顺序与点数一致
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Heart, Suit::Diamond, Suit::Club, Suit::Spade];
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven,
        Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King,
    ];

    /// 点数对应的数值，A=1 ... K=13
    pub fn value(self) -> u8 {
        self as u8 + 1
    }
}

/// 单张扑克牌 (Card)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    /// 牌的数值，只看点数
    pub fn value(&self) -> u8 {
        self.rank.value()
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Heart => "♥",
            Suit::Diamond => "♦",
            Suit::Club => "♣",
            Suit::Spade => "♠",
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

// --- 牌堆 ---

/// 牌堆 (Deck)
///
/// 牌堆顶是 `cards` 的最后一个元素，`draw` 从末尾取牌。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// 创建一副完整的 52 张扑克牌，顺序固定：按点数，再按花色
    pub fn build() -> Deck {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for &rank in &Rank::ALL {
            for &suit in &Suit::ALL {
                cards.push(Card { rank, suit });
            }
        }
        Deck { cards }
    }

    /// 用给定的牌构造牌堆，最后一张最先发出
    pub fn from_cards(cards: Vec<Card>) -> Deck {
        debug_assert!(cards.len() <= DECK_SIZE);
        Deck { cards }
    }

    /// 原地洗牌 (Fisher–Yates)
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// 整副重建并洗牌，剩余的牌直接丢弃
    pub fn replenish<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Deck::build();
        self.shuffle(rng);
    }

    /// 从牌堆顶取一张牌
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    /// 剩余张数不足以安全发完一局时返回 true
    pub fn needs_replenishment(&self) -> bool {
        self.cards.len() < REPLENISH_THRESHOLD
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_rank_values() {
        assert_eq!(Rank::Ace.value(), 1);
        assert_eq!(Rank::Seven.value(), 7);
        assert_eq!(Rank::Ten.value(), 10);
        assert_eq!(Rank::King.value(), 13);
        // 花色不影响数值
        assert_eq!(Card::new(Rank::Queen, Suit::Heart).value(), Card::new(Rank::Queen, Suit::Spade).value());
    }

    #[test]
    fn test_card_display() {
        assert_eq!(Card::new(Rank::Ten, Suit::Heart).to_string(), "10♥");
        assert_eq!(Card::new(Rank::Ace, Suit::Spade).to_string(), "A♠");
        assert_eq!(Card::new(Rank::King, Suit::Diamond).to_string(), "K♦");
    }

    #[test]
    fn test_build_deck() {
        let deck = Deck::build();
        assert_eq!(deck.len(), DECK_SIZE);
        let unique: HashSet<_> = deck.cards().iter().collect();
        assert_eq!(unique.len(), DECK_SIZE);

        // 顺序固定：先点数，后花色
        assert_eq!(deck.cards()[0], Card::new(Rank::Ace, Suit::Heart));
        assert_eq!(deck.cards()[3], Card::new(Rank::Ace, Suit::Spade));
        assert_eq!(deck.cards()[4], Card::new(Rank::Two, Suit::Heart));
        assert_eq!(deck.cards()[51], Card::new(Rank::King, Suit::Spade));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut deck = Deck::build();
            deck.shuffle(&mut rng);
            assert_eq!(deck.len(), DECK_SIZE);
            let shuffled: HashSet<_> = deck.cards().iter().copied().collect();
            let fresh: HashSet<_> = Deck::build().cards().iter().copied().collect();
            assert_eq!(shuffled, fresh);
        }
    }

    #[test]
    fn test_shuffle_is_deterministic_for_seed() {
        let mut a = Deck::build();
        let mut b = Deck::build();
        a.shuffle(&mut StdRng::seed_from_u64(42));
        b.shuffle(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_ne!(a, Deck::build());
    }

    #[test]
    fn test_shuffle_is_roughly_uniform() {
        // 3 张牌共 6 种排列，每种期望出现 10000 次
        let three = vec![
            Card::new(Rank::Ace, Suit::Heart),
            Card::new(Rank::Two, Suit::Heart),
            Card::new(Rank::Three, Suit::Heart),
        ];
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<Vec<Card>, u32> = HashMap::new();
        for _ in 0..60_000 {
            let mut deck = Deck::from_cards(three.clone());
            deck.shuffle(&mut rng);
            *counts.entry(deck.cards().to_vec()).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 6);
        for (_, count) in counts {
            assert!((9_400..=10_600).contains(&count), "排列出现次数偏差过大: {}", count);
        }
    }

    #[test]
    fn test_draw_from_top() {
        let mut deck = Deck::from_cards(vec![
            Card::new(Rank::Two, Suit::Club),
            Card::new(Rank::King, Suit::Heart),
        ]);
        assert_eq!(deck.draw(), Ok(Card::new(Rank::King, Suit::Heart)));
        assert_eq!(deck.draw(), Ok(Card::new(Rank::Two, Suit::Club)));
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), Err(GameError::EmptyDeck));
    }

    #[test]
    fn test_needs_replenishment() {
        let mut deck = Deck::build();
        while deck.len() >= REPLENISH_THRESHOLD {
            assert!(!deck.needs_replenishment());
            deck.draw().unwrap();
        }
        assert_eq!(deck.len(), REPLENISH_THRESHOLD - 1);
        assert!(deck.needs_replenishment());

        deck.replenish(&mut StdRng::seed_from_u64(1));
        assert_eq!(deck.len(), DECK_SIZE);
        assert!(!deck.needs_replenishment());
    }
}
