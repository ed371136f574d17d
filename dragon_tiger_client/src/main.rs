use futures_util::{SinkExt, StreamExt};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use dragon_tiger_core::{ClientMessage, Outcome, ServerMessage, TableView};

const DEFAULT_URL: &str = "ws://127.0.0.1:25917/ws";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let url = Url::parse(&std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string()))?;

    println!("正在连接到: {}", url);
    let (ws_stream, _) = connect_async(url.as_str()).await?;
    println!("连接成功!");

    let (mut write, mut read) = ws_stream.split();

    // 处理从服务器接收的消息
    tokio::spawn(async move {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(server_msg) => {
                            println!();
                            render(&server_msg);
                            print!("> ");
                            let _ = std::io::stdout().flush();
                        }
                        Err(e) => warn!("解析服务器消息失败: {}", e),
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!("接收消息时出错: {}", e);
                    break;
                }
            }
        }
    });

    let payload = serde_json::to_string(&ClientMessage::NewSession)?;
    write.send(Message::Text(payload.into())).await?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    println!("--- 龙虎斗客户端 ---");
    println!("可用命令:");
    println!("  chip <面额>               - 选择筹码");
    println!("  dragon | tie | tiger      - 在对应区域下注");
    println!("  deal                      - 发牌");
    println!("  reset                     - 撤回所有下注");
    println!("  next                      - 下一局");
    println!("  new                       - 重新开始游戏");
    println!("  exit                      - 退出");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match stdin.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let parts: Vec<&str> = line.split_whitespace().collect();

        let client_msg = match parts.first().copied() {
            Some("chip") => match parts.get(1).and_then(|s| s.parse::<u32>().ok()) {
                Some(amount) => ClientMessage::SelectChip(amount),
                None => {
                    println!("用法: chip <面额>");
                    continue;
                }
            },
            Some("dragon") => Outcome::Dragon.into(),
            Some("tie") => Outcome::Tie.into(),
            Some("tiger") => Outcome::Tiger.into(),
            Some("deal") => ClientMessage::Deal,
            Some("reset") => ClientMessage::ResetBets,
            Some("next") => ClientMessage::NextRound,
            Some("new") => ClientMessage::NewGame,
            Some("exit") => {
                println!("正在断开连接...");
                break;
            }
            None => continue,
            _ => {
                println!("未知命令: {}", line);
                continue;
            }
        };

        let payload = serde_json::to_string(&client_msg)?;
        write.send(Message::Text(payload.into())).await?;
    }

    Ok(())
}

fn render(msg: &ServerMessage) {
    match msg {
        ServerMessage::SessionStarted { session_id, chips, table } => {
            println!("会话 {} 已开启，可选筹码: {:?}", session_id, chips);
            render_table(table);
        }
        ServerMessage::TableUpdated(table) => render_table(table),
        ServerMessage::RoundResolved { result, table } => {
            println!(
                "龙 {} ({})  vs  虎 {} ({})",
                result.dragon_card, result.dragon_value, result.tiger_card, result.tiger_value
            );
            println!("入账 ${}", result.credit);
            render_table(table);
        }
        ServerMessage::Error { message } => println!("!! {}", message),
    }
}

fn render_table(table: &TableView) {
    let card_text =
        |c: Option<dragon_tiger_core::Card>| c.map_or_else(|| "--".to_string(), |c| c.to_string());
    let mark = |o: Outcome| if table.highlight == Some(o) { "*" } else { " " };

    println!(
        "余额: ${}   总下注: ${}   筹码: {}",
        table.balance,
        table.total_staked,
        table.selected_chip.map_or_else(|| "未选择".to_string(), |c| c.to_string()),
    );
    println!(
        "{}龙 ${:<6} {}和 ${:<6} {}虎 ${:<6}",
        mark(Outcome::Dragon),
        table.bets.dragon,
        mark(Outcome::Tie),
        table.bets.tie,
        mark(Outcome::Tiger),
        table.bets.tiger,
    );
    println!("龙: {}   虎: {}", card_text(table.dragon_card), card_text(table.tiger_card));
    println!("{}", table.message);
}
