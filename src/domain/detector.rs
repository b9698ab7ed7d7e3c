//! Arbitrage detection logic.
//!
//! For every market the detector keeps the best price per outcome, checks
//! whether the implied probabilities of those prices sum to less than one,
//! and if so splits the stake budget so that every leg pays out the same
//! amount.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::debug;

use super::market::{BookmakerOdds, MarketOdds};
use super::money::{round2, saturating_decimal, Amount};
use super::surebet::{Surebet, SurebetBet};

/// Stake budget used when the caller supplies none or an invalid one.
pub const DEFAULT_TOTAL_STAKE: Decimal = Decimal::ONE_HUNDRED;

/// Largest accepted stake budget; larger budgets are clamped to it.
pub const MAX_TOTAL_STAKE: Decimal = dec!(1000000000000);

/// Decimal places kept on the implied-probability sum.
///
/// Each `1 / odds` term carries up to 28 significant digits, so a market such
/// as 3.0/3.0/3.0 sums to 0.999...9 instead of 1. Rounding the sum here puts
/// those break-even markets back on the boundary without touching any real
/// edge.
const IMPLIED_SUM_DP: u32 = 20;

/// Configuration for the arbitrage detector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectorConfig {
    /// Budget split across the legs of every opportunity.
    #[serde(default = "default_total_stake")]
    pub total_stake: Amount,

    /// Opportunities with an ROI (percent) strictly below this are dropped.
    #[serde(default)]
    pub min_roi_pct: Decimal,
}

fn default_total_stake() -> Amount {
    DEFAULT_TOTAL_STAKE
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            total_stake: default_total_stake(),
            min_roi_pct: Decimal::ZERO,
        }
    }
}

impl DetectorConfig {
    pub fn new(total_stake: Amount, min_roi_pct: Decimal) -> Self {
        Self {
            total_stake,
            min_roi_pct,
        }
    }

    /// Build a config from untrusted floats, such as query parameters.
    ///
    /// NaN and infinite stakes fall back to [`DEFAULT_TOTAL_STAKE`] and such
    /// thresholds to zero. Finite values beyond the decimal range saturate.
    pub fn from_f64(total_stake: f64, min_roi_pct: f64) -> Self {
        Self {
            total_stake: saturating_decimal(total_stake).unwrap_or(DEFAULT_TOTAL_STAKE),
            min_roi_pct: saturating_decimal(min_roi_pct).unwrap_or(Decimal::ZERO),
        }
        .sanitized()
    }

    /// Replace a non-positive stake with [`DEFAULT_TOTAL_STAKE`] and clamp
    /// larger ones to [`MAX_TOTAL_STAKE`].
    pub fn sanitized(self) -> Self {
        let total_stake = if self.total_stake <= Decimal::ZERO {
            DEFAULT_TOTAL_STAKE
        } else {
            self.total_stake.min(MAX_TOTAL_STAKE)
        };
        if total_stake != self.total_stake {
            debug!(
                requested = %self.total_stake,
                total_stake = %total_stake,
                "Stake budget out of range, adjusted"
            );
        }
        Self {
            total_stake,
            ..self
        }
    }
}

/// Result of the arbitrage test on one set of best prices.
#[derive(Debug, Clone)]
pub struct Arbitrage<'a> {
    /// Sum of `1 / odds` over the legs; always below one.
    pub implied_sum: Decimal,
    /// Equal gross return of every leg.
    pub payout: Amount,
    /// Unrounded profit.
    pub profit: Amount,
    /// Unrounded ROI in percent.
    pub roi_pct: Decimal,
    /// Each leg with its rounded stake.
    pub legs: Vec<(&'a BookmakerOdds, Amount)>,
}

/// Pick the highest-priced quote for every outcome key.
///
/// Outcomes come back in the order their key was first seen. When two quotes
/// tie on price, the one encountered first is kept. Quotes with non-positive
/// odds are treated as absent.
pub fn best_per_outcome(selections: &[BookmakerOdds]) -> Vec<&BookmakerOdds> {
    let mut best: Vec<&BookmakerOdds> = Vec::new();

    for quote in selections.iter().filter(|q| q.odds > Decimal::ZERO) {
        match best.iter_mut().find(|b| b.outcome_key == quote.outcome_key) {
            Some(current) if quote.odds > current.odds => *current = quote,
            Some(_) => {}
            None => best.push(quote),
        }
    }

    best
}

/// Sum of implied probabilities over the given quotes.
///
/// `None` when the sum leaves the decimal range, which only absurdly small
/// odds can cause.
pub fn implied_sum(quotes: &[&BookmakerOdds]) -> Option<Decimal> {
    quotes
        .iter()
        .filter_map(|q| q.implied_probability())
        .try_fold(Decimal::ZERO, |sum, p| sum.checked_add(p))
        .map(|sum| sum.round_dp(IMPLIED_SUM_DP))
}

/// Test the quotes for arbitrage and split `total_stake` across them.
///
/// Returns `None` unless the implied-probability sum is strictly below one,
/// or when an amount would overflow the decimal range. Each stake is
/// `total_stake * (1 / odds) / implied_sum`, which makes `stake * odds`
/// identical on every leg. Stakes are rounded independently,
/// so their sum may drift from `total_stake` by up to half a cent per leg.
pub fn compute_stakes<'a>(quotes: &[&'a BookmakerOdds], total_stake: Amount) -> Option<Arbitrage<'a>> {
    let implied_sum = implied_sum(quotes)?;
    if implied_sum <= Decimal::ZERO || implied_sum >= Decimal::ONE {
        return None;
    }

    let payout = total_stake.checked_div(implied_sum)?;
    let profit = payout.checked_sub(total_stake)?;
    let roi_pct = profit
        .checked_div(total_stake)?
        .checked_mul(Decimal::ONE_HUNDRED)?;

    let mut legs = Vec::with_capacity(quotes.len());
    for quote in quotes {
        let Some(probability) = quote.implied_probability() else {
            continue;
        };
        let stake = total_stake
            .checked_mul(probability)?
            .checked_div(implied_sum)?;
        legs.push((*quote, round2(stake)));
    }

    Some(Arbitrage {
        implied_sum,
        payout,
        profit,
        roi_pct,
        legs,
    })
}

/// State scoped to a single detection run.
///
/// Holds the id sequence and the timestamp used for markets without one, so
/// concurrent runs never share counters.
struct DetectionRun {
    now: DateTime<Utc>,
    next_seq: u64,
}

impl DetectionRun {
    fn new(now: DateTime<Utc>) -> Self {
        Self { now, next_seq: 1 }
    }

    fn surebet(&mut self, market: &MarketOdds, arb: Arbitrage<'_>) -> Surebet {
        let id = format!("{}-{}-{}", market.match_name, market.market, self.next_seq);
        self.next_seq += 1;

        let bets = arb
            .legs
            .into_iter()
            .map(|(quote, stake)| SurebetBet {
                bookmaker: quote.bookmaker.clone(),
                market: market.market.clone(),
                outcome_key: quote.outcome_key.clone(),
                odds: quote.odds,
                stake,
            })
            .collect();

        Surebet {
            id,
            roi: round2(arb.roi_pct),
            profit: round2(arb.profit),
            sport: market.sport.clone(),
            league: market.league.clone(),
            match_name: market.match_name.clone(),
            market: market.market.clone(),
            updated_at: market.updated_at.unwrap_or(self.now),
            bets,
        }
    }
}

/// Detect surebets across `markets`, timestamped with the current time.
pub fn detect(markets: &[MarketOdds], config: &DetectorConfig) -> Vec<Surebet> {
    detect_at(markets, config, Utc::now())
}

/// Detect surebets across `markets`.
///
/// `now` stands in for `updated_at` on markets that carry none. The result is
/// sorted by ROI, highest first; equal ROIs keep their input order.
pub fn detect_at(
    markets: &[MarketOdds],
    config: &DetectorConfig,
    now: DateTime<Utc>,
) -> Vec<Surebet> {
    let config = config.clone().sanitized();
    let mut run = DetectionRun::new(now);
    let mut surebets = Vec::new();

    for market in markets {
        let best = best_per_outcome(&market.selections);
        if best.len() < 2 {
            continue;
        }

        let Some(arb) = compute_stakes(&best, config.total_stake) else {
            continue;
        };

        // Filter on full precision; rounding is for display only.
        if arb.roi_pct < config.min_roi_pct {
            continue;
        }

        debug!(
            match_name = %market.match_name,
            market = %market.market,
            roi_pct = %round2(arb.roi_pct),
            legs = arb.legs.len(),
            "Surebet detected"
        );
        surebets.push(run.surebet(market, arb));
    }

    surebets.sort_by(|a, b| b.roi.cmp(&a.roi));
    surebets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::{
        build_three_way, build_two_way, MarketParams, ThreeWayOdds, TwoWayOdds,
    };
    use rust_decimal_macros::dec;

    fn quote(bookmaker: &str, key: &str, odds: Decimal) -> BookmakerOdds {
        BookmakerOdds {
            bookmaker: bookmaker.into(),
            market: "1x2".into(),
            outcome_key: key.into(),
            odds,
        }
    }

    fn market(selections: Vec<BookmakerOdds>) -> MarketOdds {
        MarketOdds {
            sport: "Football".into(),
            league: "Test League".into(),
            match_name: "A - B".into(),
            market: "1x2".into(),
            updated_at: None,
            selections,
        }
    }

    fn symmetric_two_way(odds: Decimal) -> MarketOdds {
        build_two_way(
            MarketParams::new("MMA", "UFC", "F1 - F2").market("Winner"),
            TwoWayOdds {
                bookmaker: "X".into(),
                outcome_a: Some(odds),
                outcome_b: Some(odds),
                key_a: Some("F1".into()),
                key_b: Some("F2".into()),
            },
        )
    }

    fn config(total_stake: Decimal) -> DetectorConfig {
        DetectorConfig::new(total_stake, Decimal::ZERO)
    }

    #[test]
    fn best_per_outcome_keeps_highest_price() {
        let selections = vec![
            quote("BookA", "home", dec!(2.2)),
            quote("BookA", "away", dec!(3.0)),
            quote("BookB", "home", dec!(2.05)),
            quote("BookB", "away", dec!(3.3)),
        ];

        let best = best_per_outcome(&selections);

        assert_eq!(best.len(), 2);
        assert_eq!(best[0].bookmaker, "BookA");
        assert_eq!(best[0].odds, dec!(2.2));
        assert_eq!(best[1].bookmaker, "BookB");
        assert_eq!(best[1].odds, dec!(3.3));
    }

    #[test]
    fn best_per_outcome_ties_go_to_first_seen() {
        let selections = vec![
            quote("BookA", "home", dec!(2.5)),
            quote("BookB", "home", dec!(2.5)),
        ];

        let best = best_per_outcome(&selections);

        assert_eq!(best.len(), 1);
        assert_eq!(best[0].bookmaker, "BookA");
    }

    #[test]
    fn best_per_outcome_ignores_non_positive_odds() {
        let selections = vec![
            quote("BookA", "home", dec!(0)),
            quote("BookA", "away", dec!(-1.5)),
        ];

        assert!(best_per_outcome(&selections).is_empty());
    }

    #[test]
    fn even_two_way_is_break_even_not_arbitrage() {
        let m = market(vec![quote("A", "a", dec!(2)), quote("B", "b", dec!(2))]);
        assert!(detect(&[m], &config(dec!(100))).is_empty());
    }

    #[test]
    fn three_way_break_even_survives_division_error() {
        let m = market(vec![
            quote("A", "home", dec!(3)),
            quote("B", "draw", dec!(3)),
            quote("C", "away", dec!(3)),
        ]);
        assert!(detect(&[m], &config(dec!(100))).is_empty());
    }

    #[test]
    fn scenario_a_cross_bookmaker_three_way_without_arbitrage() {
        let m = market(vec![
            quote("BookA", "home", dec!(2.2)),
            quote("BookB", "draw", dec!(3.4)),
            quote("BookC", "away", dec!(3.3)),
        ]);
        assert!(detect(&[m], &config(dec!(100))).is_empty());
    }

    #[test]
    fn scenario_b_three_way_negative_control() {
        let m = market(vec![
            quote("BookA", "home", dec!(2.2)),
            quote("BookB", "draw", dec!(3.4)),
            quote("BookC", "away", dec!(3.6)),
        ]);
        assert!(detect(&[m], &config(dec!(100))).is_empty());
    }

    #[test]
    fn scenario_c_symmetric_two_way_arbitrage() {
        let result = detect(&[symmetric_two_way(dec!(2.1))], &config(dec!(100)));

        assert_eq!(result.len(), 1);
        let surebet = &result[0];
        assert_eq!(surebet.roi, dec!(5.00));
        assert_eq!(surebet.profit, dec!(5.00));
        assert_eq!(surebet.bets.len(), 2);
        assert!(surebet.bets.iter().all(|b| b.stake == dec!(50.00)));
        assert_eq!(surebet.id, "F1 - F2-Winner-1");
    }

    #[test]
    fn scenario_d_single_outcome_is_skipped() {
        let m = market(vec![
            quote("BookA", "home", dec!(5.0)),
            quote("BookB", "home", dec!(9.0)),
        ]);
        assert!(detect(&[m], &config(dec!(100))).is_empty());
    }

    #[test]
    fn scenario_e_min_roi_filters_out_small_edges() {
        let cfg = DetectorConfig::new(dec!(100), dec!(10));
        assert!(detect(&[symmetric_two_way(dec!(2.1))], &cfg).is_empty());
    }

    #[test]
    fn min_roi_is_checked_before_rounding() {
        // ROI here is 4.9999...%, which rounds to 5.00 for display.
        let odds = dec!(2.0999999999);
        let cfg = DetectorConfig::new(dec!(100), dec!(5));
        assert!(detect(&[symmetric_two_way(odds)], &cfg).is_empty());

        let cfg = DetectorConfig::new(dec!(100), dec!(4.99));
        let result = detect(&[symmetric_two_way(odds)], &cfg);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].roi, dec!(5.00));
    }

    #[test]
    fn dominated_quotes_never_become_legs() {
        let mut combined = build_three_way(
            MarketParams::new("Football", "Test League", "A - B"),
            ThreeWayOdds {
                bookmaker: "BookA".into(),
                home: Some(dec!(2.6)),
                draw: Some(dec!(3.1)),
                away: Some(dec!(3.0)),
            },
        );
        for (bookmaker, home, draw, away) in [
            ("BookB", dec!(2.05), dec!(3.9), dec!(2.8)),
            ("BookC", dec!(2.1), dec!(3.2), dec!(4.4)),
        ] {
            combined.selections.extend(
                build_three_way(
                    MarketParams::new("Football", "Test League", "A - B"),
                    ThreeWayOdds {
                        bookmaker: bookmaker.into(),
                        home: Some(home),
                        draw: Some(draw),
                        away: Some(away),
                    },
                )
                .selections,
            );
        }

        let result = detect(&[combined], &config(dec!(100)));

        assert_eq!(result.len(), 1);
        let legs: Vec<_> = result[0]
            .bets
            .iter()
            .map(|b| (b.bookmaker.as_str(), b.outcome_key.as_str(), b.odds))
            .collect();
        assert_eq!(
            legs,
            vec![
                ("BookA", "home", dec!(2.6)),
                ("BookB", "draw", dec!(3.9)),
                ("BookC", "away", dec!(4.4)),
            ]
        );
        let total = result[0].total_stake();
        assert!(total > dec!(99.9) && total < dec!(100.1));
    }

    #[test]
    fn stakes_equalize_payout() {
        let m = market(vec![
            quote("A", "home", dec!(2.6)),
            quote("B", "draw", dec!(3.9)),
            quote("C", "away", dec!(4.4)),
        ]);
        let best = best_per_outcome(&m.selections);
        let arb = compute_stakes(&best, dec!(100)).unwrap();

        for (quote, stake) in &arb.legs {
            let diff = (*stake * quote.odds - arb.payout).abs();
            // Half a cent of stake rounding, scaled by the leg's odds.
            assert!(diff <= dec!(0.005) * quote.odds, "diff {diff} on {}", quote.outcome_key);
        }
    }

    #[test]
    fn results_are_sorted_by_roi_descending() {
        let mut small = symmetric_two_way(dec!(2.05));
        small.match_name = "Small".into();
        let mut large = symmetric_two_way(dec!(2.4));
        large.match_name = "Large".into();
        let mut medium = symmetric_two_way(dec!(2.2));
        medium.match_name = "Medium".into();

        let result = detect(&[small, large, medium], &config(dec!(100)));

        let names: Vec<_> = result.iter().map(|s| s.match_name.as_str()).collect();
        assert_eq!(names, vec!["Large", "Medium", "Small"]);
        assert!(result.windows(2).all(|w| w[0].roi >= w[1].roi));
        // Ids follow encounter order, not rank.
        assert_eq!(result[2].id, "Small-Winner-1");
        assert_eq!(result[0].id, "Large-Winner-2");
    }

    #[test]
    fn equal_roi_keeps_input_order() {
        let mut first = symmetric_two_way(dec!(2.1));
        first.match_name = "First".into();
        let mut second = symmetric_two_way(dec!(2.1));
        second.match_name = "Second".into();

        let result = detect(&[first, second], &config(dec!(100)));

        assert_eq!(result[0].match_name, "First");
        assert_eq!(result[1].match_name, "Second");
    }

    #[test]
    fn missing_timestamp_defaults_to_run_time() {
        let now = DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let stamped = DateTime::parse_from_rfc3339("2024-06-01T11:59:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let bare = symmetric_two_way(dec!(2.1));
        let mut dated = symmetric_two_way(dec!(2.1));
        dated.updated_at = Some(stamped);

        let result = detect_at(&[bare, dated], &config(dec!(100)), now);

        assert_eq!(result[0].updated_at, now);
        assert_eq!(result[1].updated_at, stamped);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(detect(&[], &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn non_positive_stake_falls_back_to_default() {
        let result = detect(&[symmetric_two_way(dec!(2.1))], &config(dec!(-5)));
        assert_eq!(result[0].total_stake(), dec!(100.00));

        let result = detect(&[symmetric_two_way(dec!(2.1))], &config(Decimal::ZERO));
        assert_eq!(result[0].profit, dec!(5.00));
    }

    #[test]
    fn from_f64_substitutes_defaults_for_non_finite_values() {
        let cfg = DetectorConfig::from_f64(f64::NAN, f64::INFINITY);
        assert_eq!(cfg.total_stake, DEFAULT_TOTAL_STAKE);
        assert_eq!(cfg.min_roi_pct, Decimal::ZERO);

        let cfg = DetectorConfig::from_f64(250.0, 1.5);
        assert_eq!(cfg.total_stake, dec!(250));
        assert_eq!(cfg.min_roi_pct, dec!(1.5));
    }

    #[test]
    fn from_f64_saturates_finite_out_of_range_values() {
        let cfg = DetectorConfig::from_f64(100.0, 1e29);
        assert_eq!(cfg.min_roi_pct, Decimal::MAX);
        assert!(detect(&[symmetric_two_way(dec!(2.1))], &cfg).is_empty());

        let cfg = DetectorConfig::from_f64(100.0, -1e29);
        assert_eq!(cfg.min_roi_pct, Decimal::MIN);
        assert_eq!(detect(&[symmetric_two_way(dec!(2.1))], &cfg).len(), 1);
    }

    #[test]
    fn oversized_stake_is_clamped() {
        let cfg = DetectorConfig::from_f64(7.9e28, 0.0);
        assert_eq!(cfg.total_stake, MAX_TOTAL_STAKE);

        let result = detect(&[symmetric_two_way(dec!(2.1))], &config(Decimal::MAX));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].roi, dec!(5.00));
        assert!(result[0].bets.iter().all(|b| b.stake == MAX_TOTAL_STAKE / dec!(2)));
    }

    #[test]
    fn tiny_odds_are_skipped_without_overflow() {
        let selections = (0..9)
            .map(|i| quote("A", &format!("o{i}"), Decimal::new(1, 28)))
            .collect();

        assert!(detect(&[market(selections)], &config(dec!(100))).is_empty());
    }

    #[test]
    fn payout_overflow_skips_the_market() {
        let huge = dec!(10000000000000000000);
        let m = market(vec![quote("A", "home", huge), quote("B", "away", huge)]);

        assert!(detect(&[m.clone()], &config(MAX_TOTAL_STAKE)).is_empty());
        assert_eq!(detect(&[m], &config(dec!(100))).len(), 1);
    }

    #[test]
    fn sub_one_quote_rules_out_arbitrage_for_its_outcome() {
        let m = market(vec![
            quote("A", "home", dec!(4.0)),
            quote("B", "draw", dec!(0.9)),
            quote("C", "away", dec!(4.0)),
        ]);
        assert!(detect(&[m], &config(dec!(100))).is_empty());
    }

    #[test]
    fn stake_scales_with_budget() {
        let result = detect(&[symmetric_two_way(dec!(2.1))], &config(dec!(250)));
        assert!(result[0].bets.iter().all(|b| b.stake == dec!(125.00)));
        assert_eq!(result[0].profit, dec!(12.50));
        assert_eq!(result[0].roi, dec!(5.00));
    }
}
