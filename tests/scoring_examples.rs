use std::collections::BTreeMap;

use matchday::{
    core::store::LeagueStore,
    engine::scoring::{
        RosterSortKey, SortDirection, fielded_ids, matchday_classification, participant_average,
        participant_points, player_names, season_classification, sorted_roster, team_of_the_week,
    },
    formation::Formation,
    model::{MatchdayRecord, Participant, Player},
    types::{PlayerId, Points, Role},
};

fn player(id: PlayerId, name: &str, roles: &[Role]) -> Player {
    Player {
        id,
        name: name.to_string(),
        roles: roles.to_vec(),
    }
}

fn matchday(points: &[(PlayerId, Points)], not_played: &[PlayerId]) -> MatchdayRecord {
    MatchdayRecord {
        participants: Vec::new(),
        points: points.iter().copied().collect(),
        not_played: points
            .iter()
            .map(|(id, _)| (*id, not_played.contains(id)))
            .collect(),
    }
}

fn fielding(id: u64, name: &str, ids: &[PlayerId], captain: Option<PlayerId>) -> Participant {
    let mut p = Participant::new(id, name);
    p.change_formation(Formation::parse("0-1-1-3").unwrap());
    let slots = [(Role::DF, 0), (Role::MD, 0), (Role::FW, 0), (Role::FW, 1), (Role::FW, 2)];
    for (pid, (role, idx)) in ids.iter().zip(slots) {
        p.assign_player(role, idx, *pid);
    }
    p.set_captain(captain);
    p
}

#[test]
fn captain_doubles_and_average_rounds_to_one_decimal() {
    let md = matchday(&[(1, 5), (2, 3), (3, -2)], &[]);
    let p = fielding(1, "Lia", &[1, 2, 3], Some(1));

    assert_eq!(fielded_ids(&p), vec![1, 2, 3]);
    assert_eq!(participant_points(&p, &md), 11);
    assert_eq!(participant_average(&p, &md), 3.7);
}

#[test]
fn not_played_contributes_nothing_and_leaves_the_denominator() {
    let md = matchday(&[(1, 5), (2, 3), (3, 8)], &[3]);
    let p = fielding(1, "Lia", &[1, 2, 3], None);

    assert_eq!(participant_points(&p, &md), 8);
    assert_eq!(participant_average(&p, &md), 4.0);
}

#[test]
fn empty_or_all_absent_lineup_scores_zero() {
    let md = matchday(&[(1, 5)], &[1]);
    let p = fielding(1, "Lia", &[1], Some(1));
    assert_eq!(participant_points(&p, &md), 0);
    assert_eq!(participant_average(&p, &md), 0.0);

    let empty = Participant::new(2, "Noa");
    assert!(fielded_ids(&empty).is_empty());
    assert_eq!(participant_average(&empty, &md), 0.0);
}

#[test]
fn missing_map_entries_default_to_zero() {
    let md = MatchdayRecord::default();
    let p = fielding(1, "Lia", &[40, 41], Some(40));
    assert_eq!(participant_points(&p, &md), 0);
    assert_eq!(participant_average(&p, &md), 0.0);
}

#[test]
fn team_of_the_week_keeps_roster_order_on_ties() {
    let players = vec![
        player(1, "A", &[Role::FW]),
        player(2, "B", &[Role::GK]),
        player(3, "C", &[Role::DF, Role::MD]),
        player(4, "D", &[Role::MD]),
        player(5, "E", &[]),
        player(6, "F", &[Role::FW]),
        player(7, "G", &[Role::FW]),
    ];
    let md = matchday(&[(1, 9), (2, 9), (3, 7), (4, 7), (5, 7), (6, 2), (7, 30)], &[7]);

    let totw = team_of_the_week(&md, &players);
    let ids: Vec<PlayerId> = totw.picks.iter().map(|p| p.player_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(totw.mvp, Some(1));
    assert_eq!(totw.total, 39);

    let mut expected = BTreeMap::new();
    expected.insert(Role::GK, vec![2]);
    expected.insert(Role::DF, vec![3, 5]);
    expected.insert(Role::MD, vec![4]);
    expected.insert(Role::FW, vec![1]);
    assert_eq!(totw.groups, expected);

    assert_eq!(player_names(&players, &ids[..2]), vec!["A", "B"]);
}

#[test]
fn team_of_the_week_without_players_has_no_mvp() {
    let players = vec![player(1, "A", &[Role::FW])];
    let md = matchday(&[(1, 4)], &[1]);
    let totw = team_of_the_week(&md, &players);
    assert!(totw.picks.is_empty());
    assert_eq!(totw.mvp, None);
    assert_eq!(totw.total, 0);
    assert_eq!(totw.groups.len(), 4);
}

#[test]
fn matchday_classification_ranks_by_points() {
    let mut md = matchday(&[(1, 5), (2, 3), (3, -2)], &[]);
    md.participants = vec![
        fielding(1, "Low", &[3], None),
        fielding(2, "", &[1, 2], None),
        fielding(3, "Top", &[1, 2], Some(1)),
    ];

    let table = matchday_classification(&md);
    let names: Vec<&str> = table.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Top", "Participant 2", "Low"]);
    assert_eq!(table[0].points, 13);
    assert_eq!(table[0].average, 6.5);
    assert_eq!(table[2].points, -2);
}

#[test]
fn season_classification_joins_by_name() {
    let mut one = matchday(&[(1, 4), (2, 1)], &[]);
    one.participants = vec![fielding(1, "Ana", &[1], None), fielding(2, "Bea", &[2], None)];
    let mut two = matchday(&[(1, -3), (2, 6)], &[]);
    two.participants = vec![fielding(3, "Bea", &[2], Some(2)), fielding(4, "Ana", &[1], None)];
    let mut three = matchday(&[(1, 0)], &[]);
    three.participants = vec![fielding(5, "Ana", &[1], None)];

    let table = season_classification(&[one, two, three, MatchdayRecord::default()]);
    assert_eq!(table.len(), 2);

    assert_eq!(table[0].name, "Bea");
    assert_eq!(table[0].total_points, 13);
    assert_eq!(table[0].play_count, 2);
    assert_eq!(table[0].average, 6.5);

    assert_eq!(table[1].name, "Ana");
    assert_eq!(table[1].total_points, 1);
    assert_eq!(table[1].play_count, 3);
    assert_eq!(table[1].average, 0.3);
}

#[test]
fn store_queries_use_selected_matchday() {
    let mut store = LeagueStore::new();
    let lia = store.add_participant("Lia").unwrap();
    store.assign_slot(lia, Role::GK, 0, 10).unwrap();
    store.set_points(10, 6).unwrap();
    store.select_matchday(2).unwrap();
    let lia2 = store.add_participant("Lia").unwrap();
    store.assign_slot(lia2, Role::GK, 0, 10).unwrap();
    store.set_points(10, 1).unwrap();

    assert_eq!(store.matchday_classification()[0].points, 1);
    assert_eq!(store.team_of_the_week().mvp, Some(10));

    let season = store.season_classification();
    assert_eq!(season.len(), 1);
    assert_eq!(season[0].total_points, 7);
    assert_eq!(season[0].play_count, 2);
    assert_eq!(season[0].average, 3.5);
}

fn ids(players: Vec<&Player>) -> Vec<PlayerId> {
    players.iter().map(|p| p.id).collect()
}

#[test]
fn roster_sorting_is_stable_both_ways() {
    let players = vec![
        player(1, "carla", &[Role::FW]),
        player(2, "Bea", &[Role::GK]),
        player(3, "alba", &[Role::DF]),
        player(4, "Dani", &[Role::DF]),
    ];
    let md = matchday(&[(1, 2), (2, 5), (3, 2), (4, -1)], &[]);

    assert_eq!(
        ids(sorted_roster(&players, &md, RosterSortKey::Name, SortDirection::Ascending)),
        vec![3, 2, 1, 4]
    );
    assert_eq!(
        ids(sorted_roster(&players, &md, RosterSortKey::Role, SortDirection::Ascending)),
        vec![2, 3, 4, 1]
    );
    assert_eq!(
        ids(sorted_roster(&players, &md, RosterSortKey::Points, SortDirection::Descending)),
        vec![2, 1, 3, 4]
    );
}
