//! # 龙虎斗核心逻辑库
//!
//! 这个 `core` crate 包含了龙虎斗游戏的全部核心状态管理、
//! 下注账本、发牌与结算逻辑，以及客户端-服务器通信消息的定义。
//! 它不做任何 IO，可以被网络服务器、终端客户端等上层应用复用。

mod card;
mod config;
mod error;
mod ledger;
mod logic;
mod message;
mod state;

pub use card::*;

pub use config::*;

pub use error::*;

pub use ledger::*;

pub use logic::*;

pub use message::*;

pub use state::*;
