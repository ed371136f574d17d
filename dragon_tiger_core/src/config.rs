// 固定的游戏配置，不在运行时加载

/// 一副牌的张数
pub const DECK_SIZE: usize = 52;

/// 牌堆剩余张数低于该值时，下一次发牌前整副重建并洗牌
pub const REPLENISH_THRESHOLD: usize = 10;

/// 新游戏的初始余额
pub const STARTING_BALANCE: u32 = 10_000;

/// 可选筹码面额。全部为偶数，因此和局时的半额退还总是整除。
pub const CHIP_DENOMINATIONS: [u32; 8] = [20, 30, 50, 100, 300, 1000, 3000, 5000];

/// 龙、虎的赔率 (1:1)
pub const DRAGON_TIGER_PAYOUT: u32 = 1;

/// 和的赔率 (8:1)
pub const TIE_PAYOUT: u32 = 8;

/// 判断金额是否是合法的筹码面额
pub fn is_chip_denomination(amount: u32) -> bool {
    CHIP_DENOMINATIONS.contains(&amount)
}
