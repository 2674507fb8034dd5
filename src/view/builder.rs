use chrono::FixedOffset;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::time::Instant;

use crate::models::{canonical_cmp, ExecutionMode, MarketSnapshot, Trade, CANONICAL_ASSETS};
use crate::sync::{PercentField, Projection};

use super::format::{
    format_amount, format_cents, format_change, format_input, format_pct, format_time,
    format_unix_time, format_usd, format_usd_opt, Tone, MISSING,
};

pub const NO_DECISION: &str = "Sem decisão ainda";
pub const WAITING_FOR_MARKETS: &str = "Aguardando dados do backend...";
pub const NO_TRADES: &str = "Sem trades ainda";
const HISTORY_ROWS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub header: HeaderView,
    pub notice: Option<String>,
    pub stats: Vec<StatCard>,
    pub markets: Vec<MarketCard>,
    pub markets_placeholder: Option<&'static str>,
    pub history: Vec<TradeRow>,
    pub history_placeholder: Option<&'static str>,
    pub strategy_form: StrategyForm,
    pub execution_form: ExecutionForm,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderView {
    pub running: bool,
    pub running_label: &'static str,
    pub mode: ExecutionMode,
    pub tick_count: u64,
    pub last_tick: String,
    pub window_seconds_remaining: Option<i64>,
    pub open_trades: usize,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketCard {
    pub asset: String,
    pub spot_price: String,
    pub change_24h: String,
    pub change_tone: Tone,
    pub trend: &'static str,
    pub yes_odds: String,
    pub no_odds: String,
    pub odds_live: bool,
    pub odds_badge: &'static str,
    pub odds_source: String,
    pub price_source: String,
    pub price_age: String,
    pub window_start: String,
    pub window_end: String,
    pub price_to_beat: String,
    pub updated_at: String,
    pub decision: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRow {
    pub id: String,
    pub time: String,
    pub asset: String,
    pub direction: String,
    pub mode: String,
    pub status: String,
    pub pnl: String,
    pub pnl_tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetChip {
    pub asset: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyForm {
    pub assets: Vec<AssetChip>,
    pub entry_probability_threshold: String,
    pub confidence_threshold: String,
    pub late_entry_seconds: String,
    /// Stop loss in percent (draft stores a fraction).
    pub stop_loss_percent: String,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionForm {
    pub mode: ExecutionMode,
    pub wallet_secret_pending: bool,
    pub wallet_label: String,
    pub dirty: bool,
}

/// Pure derivation of everything a renderer shows. `now` only decides whether
/// the notice has expired.
pub fn build_view(projection: &Projection, offset: FixedOffset, now: Instant) -> DashboardView {
    let snapshot = &projection.snapshot;

    let header = HeaderView {
        running: snapshot.running,
        running_label: if snapshot.running { "Ativo" } else { "Pausado" },
        mode: snapshot.execution_config.mode,
        tick_count: snapshot.tick_count,
        last_tick: format_time(snapshot.last_tick_at, offset),
        window_seconds_remaining: snapshot.window_seconds_remaining,
        open_trades: snapshot.open_trades.len(),
        connected: projection.last_poll_ok,
    };

    let stats = &snapshot.stats;
    let stat_cards = vec![
        money_card("Balance", stats.balance),
        money_card("Today P&L", stats.today_pnl),
        money_card("All-time P&L", stats.all_time_pnl),
        StatCard {
            label: "Trades",
            value: stats.trades.to_string(),
            tone: Tone::Neutral,
        },
        StatCard {
            label: "Win Rate",
            value: format_pct(stats.win_rate),
            tone: Tone::Positive,
        },
        money_card("Avg P&L", stats.avg_pnl),
    ];

    let markets: Vec<MarketCard> = sorted_markets(snapshot.markets.values())
        .into_iter()
        .map(|m| {
            let decision = snapshot
                .last_decision_by_asset
                .get(&m.asset)
                .cloned()
                .unwrap_or_else(|| NO_DECISION.to_string());
            market_card(m, decision, offset)
        })
        .collect();

    let history: Vec<TradeRow> = snapshot
        .history
        .iter()
        .take(HISTORY_ROWS)
        .map(|t| trade_row(t, offset))
        .collect();

    let wallet_label = if snapshot.execution_config.wallet_configured {
        snapshot.execution_config.wallet_masked.clone()
    } else {
        "não".to_string()
    };

    DashboardView {
        header,
        notice: projection.notice_at(now).map(str::to_string),
        stats: stat_cards,
        markets_placeholder: markets.is_empty().then_some(WAITING_FOR_MARKETS),
        markets,
        history_placeholder: history.is_empty().then_some(NO_TRADES),
        history,
        strategy_form: strategy_form(projection),
        execution_form: ExecutionForm {
            mode: projection.execution_mode,
            wallet_secret_pending: projection.wallet_secret_pending,
            wallet_label,
            dirty: projection.execution_dirty,
        },
    }
}

/// Markets in canonical display order regardless of map iteration order.
pub fn sorted_markets<'a>(markets: impl IntoIterator<Item = &'a MarketSnapshot>) -> Vec<&'a MarketSnapshot> {
    let mut list: Vec<&MarketSnapshot> = markets.into_iter().collect();
    list.sort_by(|a, b| canonical_cmp(&a.asset, &b.asset));
    list
}

fn money_card(label: &'static str, value: Decimal) -> StatCard {
    StatCard {
        label,
        value: format_usd(value),
        tone: Tone::of(value),
    }
}

fn market_card(market: &MarketSnapshot, decision: String, offset: FixedOffset) -> MarketCard {
    MarketCard {
        asset: market.asset.clone(),
        spot_price: format_usd_opt(market.spot_price),
        change_24h: format_change(market.change_24h),
        change_tone: Tone::of(market.change_24h),
        trend: if market.is_down() { "DOWN" } else { "UP" },
        yes_odds: format_cents(market.yes_odds),
        no_odds: format_cents(market.no_odds),
        odds_live: market.odds_live,
        odds_badge: if market.odds_live { "LIVE" } else { "FALLBACK" },
        odds_source: market.odds_source.clone(),
        price_source: market.price_source.clone(),
        price_age: market
            .price_age_seconds
            .map(|s| format!("{s}s"))
            .unwrap_or_else(|| MISSING.to_string()),
        window_start: format_unix_time(market.window_ts, offset),
        window_end: format_unix_time(market.market_end_ts, offset),
        price_to_beat: format_usd_opt(market.price_to_beat),
        updated_at: format_time(market.timestamp, offset),
        decision,
    }
}

fn trade_row(trade: &Trade, offset: FixedOffset) -> TradeRow {
    TradeRow {
        id: trade.id.clone(),
        time: format_time(trade.display_time(), offset),
        asset: trade.asset.clone(),
        direction: trade.direction.clone(),
        mode: trade.api_mode.clone(),
        status: trade.status.clone(),
        pnl: format_amount(trade.pnl),
        pnl_tone: Tone::of(trade.pnl),
    }
}

fn strategy_form(projection: &Projection) -> StrategyForm {
    let draft = &projection.strategy;

    let mut chip_assets: Vec<String> = CANONICAL_ASSETS.iter().map(|a| a.to_string()).collect();
    for asset in &draft.enabled_assets {
        if !chip_assets.contains(asset) {
            chip_assets.push(asset.clone());
        }
    }
    chip_assets.sort_by(|a, b| canonical_cmp(a, b));

    StrategyForm {
        assets: chip_assets
            .into_iter()
            .map(|asset| AssetChip {
                enabled: draft.has_asset(&asset),
                asset,
            })
            .collect(),
        entry_probability_threshold: format_input(draft.entry_probability_threshold),
        confidence_threshold: format_input(draft.confidence_threshold),
        late_entry_seconds: draft.late_entry_seconds.to_string(),
        stop_loss_percent: format_input(PercentField::to_display(draft.stop_loss_pct)),
        dirty: projection.strategy_dirty,
    }
}
