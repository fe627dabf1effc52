use crate::types::{Game, GameOutcome, OrientedGame, Perspective, Side, SpreadResult};

/// `Some(true)` when home is the favorite. A pick'em (`spread == 0`) counts
/// as a home favorite. `None` without a spread.
pub fn home_is_favorite(game: &Game) -> Option<bool> {
    game.spread.map(|spread| spread <= 0.0)
}

/// Which side of `game` the named team played, if any.
///
/// Strategies in priority order, each checking home before away:
/// canonical name equality, raw-name variant equality, then substring
/// containment in a canonical name or variant. All comparisons ignore case.
pub fn match_team(game: &Game, team: &str) -> Option<Side> {
    let needle = team.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let sides = [Side::Home, Side::Away];

    if let Some(side) = sides
        .into_iter()
        .find(|&side| game.team(side).to_lowercase() == needle)
    {
        return Some(side);
    }

    if let Some(side) = sides.into_iter().find(|&side| {
        game.aliases(side)
            .iter()
            .any(|alias| alias.to_lowercase() == needle)
    }) {
        return Some(side);
    }

    sides.into_iter().find(|&side| {
        game.team(side).to_lowercase().contains(&needle)
            || game
                .aliases(side)
                .iter()
                .any(|alias| alias.to_lowercase().contains(&needle))
    })
}

/// The side `perspective` selects for `game`, or `None` when the game has
/// no such side (no spread for favorite/underdog, no team match).
pub fn resolve_side(game: &Game, perspective: Perspective, team: Option<&str>) -> Option<Side> {
    match perspective {
        Perspective::Home => Some(Side::Home),
        Perspective::Away => Some(Side::Away),
        Perspective::Favorite => {
            home_is_favorite(game).map(|home_fav| if home_fav { Side::Home } else { Side::Away })
        }
        Perspective::Underdog => {
            home_is_favorite(game).map(|home_fav| if home_fav { Side::Away } else { Side::Home })
        }
        Perspective::Team => team.and_then(|t| match_team(game, t)),
        Perspective::Opponent => team.and_then(|t| match_team(game, t)).map(Side::flip),
    }
}

/// Re-derive every side-dependent quantity of `game` from `side`.
pub fn orient(game: &Game, side: Side) -> OrientedGame {
    let points_for = game.score(side);
    let points_against = game.score(side.flip());
    let margin = points_for.saturating_sub(points_against);
    let outcome = match margin {
        m if m > 0 => GameOutcome::Win,
        m if m < 0 => GameOutcome::Loss,
        _ => GameOutcome::Tie,
    };

    let ats_result = game.spread.map(|spread| match side {
        Side::Home => SpreadResult::for_home(game.score_difference, spread),
        Side::Away => SpreadResult::for_away(game.score_difference, spread),
    });
    // `0.0 - spread` rather than `-spread` keeps a pick'em at +0.0.
    let spread = game.spread.map(|spread| match side {
        Side::Home => spread,
        Side::Away => 0.0 - spread,
    });

    OrientedGame {
        side,
        team: game.team(side).to_string(),
        opponent: game.team(side.flip()).to_string(),
        points_for,
        points_against,
        margin,
        outcome,
        ats_result,
        spread,
        ou_result: game.ou_result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::CoreFields;
    use crate::types::{RawRecord, Sport};

    fn game(home: i32, away: i32, spread: Option<f64>) -> Game {
        let mut g = CoreFields {
            sport: Sport::Ncaab,
            season: 2024,
            game_date: "2024-02-10".to_string(),
            home_team: "Kansas".to_string(),
            away_team: "Kansas St.".to_string(),
            home_score: home,
            away_score: away,
            spread,
            over_under: None,
        }
        .into_game(RawRecord::new());
        g.away_aliases = vec!["K-State Wildcats".to_string()];
        g
    }

    #[test]
    fn home_favorite_covers_by_one() {
        // -7, 28-20: adjusted 8 + (-7) = 1
        let g = game(28, 20, Some(-7.0));
        assert_eq!(orient(&g, Side::Home).ats_result, Some(SpreadResult::Covered));
        assert_eq!(orient(&g, Side::Away).ats_result, Some(SpreadResult::Lost));
    }

    #[test]
    fn home_favorite_fails_to_cover() {
        // -7, 24-20: adjusted 4 - 7 = -3
        let g = game(24, 20, Some(-7.0));
        assert_eq!(orient(&g, Side::Home).ats_result, Some(SpreadResult::Lost));
        assert_eq!(orient(&g, Side::Away).ats_result, Some(SpreadResult::Covered));
    }

    #[test]
    fn landing_on_the_number_pushes_both_sides() {
        let g = game(27, 20, Some(-7.0));
        assert_eq!(orient(&g, Side::Home).ats_result, Some(SpreadResult::Push));
        assert_eq!(orient(&g, Side::Away).ats_result, Some(SpreadResult::Push));
    }

    #[test]
    fn pickem_favorite_is_home() {
        let g = game(70, 72, Some(0.0));
        assert_eq!(resolve_side(&g, Perspective::Favorite, None), Some(Side::Home));
        assert_eq!(resolve_side(&g, Perspective::Underdog, None), Some(Side::Away));
    }

    #[test]
    fn away_favorite_when_spread_positive() {
        let g = game(70, 72, Some(3.5));
        assert_eq!(resolve_side(&g, Perspective::Favorite, None), Some(Side::Away));
        assert_eq!(resolve_side(&g, Perspective::Underdog, None), Some(Side::Home));
    }

    #[test]
    fn favorite_undefined_without_spread() {
        let g = game(70, 72, None);
        assert_eq!(resolve_side(&g, Perspective::Favorite, None), None);
        assert_eq!(resolve_side(&g, Perspective::Underdog, None), None);
        assert_eq!(resolve_side(&g, Perspective::Home, None), Some(Side::Home));
    }

    #[test]
    fn away_spread_is_negated() {
        for line in [-7.0, -2.5, 0.0, 3.5, 14.0] {
            let g = game(80, 75, Some(line));
            let home = orient(&g, Side::Home).spread.unwrap();
            let away = orient(&g, Side::Away).spread.unwrap();
            assert_eq!(away, -home);
        }
        let pickem = game(80, 75, Some(0.0));
        assert!(orient(&pickem, Side::Away).spread.unwrap().is_sign_positive());
    }

    #[test]
    fn ats_results_mirror_across_sides() {
        for (home, away, line) in [(28, 20, -7.0), (24, 20, -7.0), (20, 27, 7.0), (10, 31, -3.5), (17, 14, 2.5)] {
            let g = game(home, away, Some(line));
            let h = orient(&g, Side::Home).ats_result.unwrap();
            let a = orient(&g, Side::Away).ats_result.unwrap();
            assert_eq!(h, a.mirrored());
        }
    }

    #[test]
    fn orientation_reassigns_points() {
        let g = game(65, 71, Some(-4.0));
        let away = orient(&g, Side::Away);
        assert_eq!(away.team, "Kansas St.");
        assert_eq!(away.opponent, "Kansas");
        assert_eq!(away.points_for, 71);
        assert_eq!(away.points_against, 65);
        assert_eq!(away.margin, 6);
        assert!(away.won());
        assert!(orient(&g, Side::Home).lost());
    }

    #[test]
    fn extreme_scores_do_not_overflow_the_margin() {
        let g = game(i32::MAX, i32::MIN, Some(-3.0));
        assert_eq!(orient(&g, Side::Home).margin, i32::MAX);
        assert_eq!(orient(&g, Side::Away).margin, i32::MIN);
        assert!(orient(&g, Side::Away).lost());
    }

    #[test]
    fn tie_is_neither_win_nor_loss() {
        let g = game(21, 21, None);
        let o = orient(&g, Side::Home);
        assert_eq!(o.outcome, GameOutcome::Tie);
        assert!(!o.won() && !o.lost());
    }

    #[test]
    fn team_matching_prefers_exact_over_substring() {
        let g = game(70, 72, None);
        // "kansas" is a substring of "Kansas St." but matches home exactly.
        assert_eq!(match_team(&g, "KANSAS"), Some(Side::Home));
        assert_eq!(match_team(&g, "kansas st."), Some(Side::Away));
        assert_eq!(match_team(&g, "k-state wildcats"), Some(Side::Away));
        assert_eq!(match_team(&g, "K-State"), Some(Side::Away));
        assert_eq!(match_team(&g, "Duke"), None);
        assert_eq!(match_team(&g, "  "), None);
    }

    #[test]
    fn opponent_flips_the_matched_side() {
        let g = game(70, 72, None);
        assert_eq!(resolve_side(&g, Perspective::Team, Some("Kansas St.")), Some(Side::Away));
        assert_eq!(resolve_side(&g, Perspective::Opponent, Some("Kansas St.")), Some(Side::Home));
        assert_eq!(resolve_side(&g, Perspective::Team, None), None);
    }
}
