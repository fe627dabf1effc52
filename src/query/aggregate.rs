use std::collections::BTreeMap;

use crate::query::perspective::{orient, resolve_side};
use crate::types::{Game, OrientedGame, OuResult, Perspective, SeasonSummary, SpreadResult, Summary};

/// Reduce `games` to trend statistics from `perspective`'s side.
///
/// Each game is oriented once. Games with no resolvable side are skipped;
/// the pipeline has already removed them by the time it aggregates.
pub fn summarize<'a>(
    games: impl IntoIterator<Item = &'a Game>,
    perspective: Perspective,
    team: Option<&str>,
) -> Summary {
    let mut acc = Accumulator::default();
    for game in games {
        if let Some(side) = resolve_side(game, perspective, team) {
            acc.add(game, &orient(game, side));
        }
    }
    acc.finish()
}

#[derive(Default)]
struct Accumulator {
    summary: Summary,
    points_for: i64,
    points_against: i64,
    total_points: i64,
    spread_sum: f64,
    spread_count: usize,
    over_under_sum: f64,
    over_under_count: usize,
    seasons: BTreeMap<i32, SeasonSummary>,
}

impl Accumulator {
    fn add(&mut self, game: &Game, oriented: &OrientedGame) {
        let s = &mut self.summary;
        s.games += 1;
        if oriented.won() {
            s.wins += 1;
        } else if oriented.lost() {
            s.losses += 1;
        } else {
            s.ties += 1;
        }

        match oriented.ats_result {
            Some(SpreadResult::Covered) => s.ats_covered += 1,
            Some(SpreadResult::Lost) => s.ats_lost += 1,
            Some(SpreadResult::Push) => s.ats_push += 1,
            None => {}
        }
        match oriented.ou_result {
            Some(OuResult::Over) => s.overs += 1,
            Some(OuResult::Under) => s.unders += 1,
            Some(OuResult::Push) => s.ou_push += 1,
            None => {}
        }

        self.points_for += i64::from(oriented.points_for);
        self.points_against += i64::from(oriented.points_against);
        self.total_points += i64::from(game.total_points);
        if let Some(spread) = oriented.spread {
            self.spread_sum += spread;
            self.spread_count += 1;
        }
        if let Some(line) = game.over_under {
            self.over_under_sum += line;
            self.over_under_count += 1;
        }

        let season = self.seasons.entry(game.season).or_insert_with(|| SeasonSummary {
            season: game.season,
            ..SeasonSummary::default()
        });
        season.games += 1;
        if oriented.won() {
            season.wins += 1;
        } else if oriented.lost() {
            season.losses += 1;
        }
        match oriented.ats_result {
            Some(SpreadResult::Covered) => season.ats_covered += 1,
            Some(SpreadResult::Lost) => season.ats_lost += 1,
            _ => {}
        }
    }

    fn finish(self) -> Summary {
        let mut s = self.summary;
        let games = s.games;

        s.win_pct = pct(s.wins, s.wins + s.losses);
        s.ats_pct = pct(s.ats_covered, s.ats_covered + s.ats_lost);
        s.over_pct = pct(s.overs, s.overs + s.unders);
        s.under_pct = pct(s.unders, s.overs + s.unders);

        s.avg_points_for = avg(self.points_for as f64, games);
        s.avg_points_against = avg(self.points_against as f64, games);
        s.avg_margin = avg((self.points_for - self.points_against) as f64, games);
        s.avg_total_points = avg(self.total_points as f64, games);
        s.avg_spread = avg(self.spread_sum, self.spread_count);
        s.avg_over_under = avg(self.over_under_sum, self.over_under_count);

        s.seasons = self
            .seasons
            .into_values()
            .map(|mut season| {
                season.win_pct = pct(season.wins, season.wins + season.losses);
                season.ats_pct = pct(season.ats_covered, season.ats_covered + season.ats_lost);
                season
            })
            .collect();
        s
    }
}

/// Round to one decimal, halves rounding up (`-2.25` -> `-2.2`).
pub fn round1(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

fn pct(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| round1(numerator as f64 / denominator as f64 * 100.0))
}

fn avg(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| round1(sum / count as f64))
}
