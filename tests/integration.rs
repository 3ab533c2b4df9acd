// Integration tests (native) for the `caterpillar-bond` crate.
// These drive a full session on the virtual clock with a seeded RNG and a
// silent sound sink, so they run under `cargo test` on the host.

use caterpillar_bond::dialogue::{SQUASH_LINES, appearance_line};
use caterpillar_bond::sound::Silent;
use caterpillar_bond::{AnimationState, Event, Game, GameConfig, ManualTimers};

type TestGame = Game<ManualTimers, Silent>;

fn new_game(seed: u64) -> TestGame {
    Game::new(GameConfig::default(), ManualTimers::new(), Silent, seed)
}

// Step the clock until a caterpillar is on the table (or give up after 10s).
fn wait_for_caterpillar(g: &mut TestGame) {
    for _ in 0..100 {
        if g.state().caterpillar.is_some() {
            return;
        }
        g.advance(100);
    }
    panic!("no caterpillar appeared");
}

// Spawn, squash, and let the squash finish clearing.
fn squash_cycle(g: &mut TestGame) {
    wait_for_caterpillar(g);
    assert!(g.squash());
    g.advance(g.config().clear_slow_ms as u64);
    assert!(g.state().caterpillar.is_none());
}

#[test]
fn first_squash_end_to_end() {
    let mut g = new_game(3);
    let st = g.state();
    assert_eq!((st.total_squashes, st.satisfaction), (0, 0));
    assert!(st.caterpillar.is_none());

    g.advance(500);
    let c = g.state().caterpillar.expect("first caterpillar after 500ms");
    assert!((20.0..=80.0).contains(&c.x), "x = {}", c.x);
    assert!((55.0..=85.0).contains(&c.y), "y = {}", c.y);

    assert!(g.squash());
    assert_eq!(g.state().total_squashes, 1);
    assert_eq!(g.state().satisfaction, 20);
    assert!(SQUASH_LINES[0].contains(&g.state().dialogue.as_str()));

    g.advance(g.config().clear_slow_ms as u64);
    assert!(g.state().caterpillar.is_none());
    assert!(!g.state().is_squashing);

    // scheduler re-armed with the longer respawn delay
    let spawns: Vec<_> = g.timers().armed().into_iter().filter(|(_, e)| *e == Event::Spawn).collect();
    assert_eq!(spawns.len(), 1);
    g.advance(g.config().respawn_ms as u64);
    assert!(g.state().caterpillar.is_some());
    assert_eq!(g.state().dialogue, appearance_line(1, 0));
}

#[test]
fn five_squashes_reach_the_next_tier() {
    let mut g = new_game(11);
    for _ in 0..5 {
        squash_cycle(&mut g);
    }
    assert_eq!(g.relationship_level(), 1);

    wait_for_caterpillar(&mut g);
    assert_eq!(g.state().dialogue, "…待ってたよ");
    g.squash();
    assert!(SQUASH_LINES[1].contains(&g.state().dialogue.as_str()), "got '{}'", g.state().dialogue);
}

#[test]
fn counts_and_levels_track_clicks() {
    let mut g = new_game(5);
    for n in 1..=23u32 {
        squash_cycle(&mut g);
        assert_eq!(g.state().total_squashes, n);
        assert_eq!(g.relationship_level(), n / 5);
    }
}

#[test]
fn ignored_clicks_change_nothing() {
    let mut g = new_game(8);
    let before = g.state().clone();
    assert!(!g.squash());
    assert_eq!(*g.state(), before);

    wait_for_caterpillar(&mut g);
    g.squash();
    let mid = g.state().clone();
    let c = mid.caterpillar.expect("still on the table while squashing");
    assert!(!g.squash());
    assert!(!g.click_at(c.x, c.y));
    assert_eq!(*g.state(), mid);
}

#[test]
fn floating_text_expires_exactly_once_after_its_delay() {
    let mut g = new_game(21);
    wait_for_caterpillar(&mut g);
    g.squash();
    let id = g.state().floating_text[0].id;
    g.advance(999);
    assert_eq!(g.state().floating_text.iter().filter(|t| t.id == id).count(), 1);
    g.advance(1);
    assert!(g.state().floating_text.iter().all(|t| t.id != id));

    let mut seen = vec![id];
    for _ in 0..4 {
        squash_cycle(&mut g);
        let newest = g.state().floating_text.last().map(|t| t.id);
        if let Some(n) = newest {
            assert!(!seen.contains(&n));
            seen.push(n);
        }
    }
    g.advance(1_000);
    assert!(g.state().floating_text.is_empty());
}

#[test]
fn attack_always_settles_back_to_idle() {
    let mut g = new_game(99);
    let slow = g.config().slow_motion_period_ms as u64;
    for _ in 0..8 {
        wait_for_caterpillar(&mut g);
        assert!(g.squash());
        // three slow-motion ticks finish the attack
        g.advance(3 * slow - 1);
        assert_eq!(g.state().animation, AnimationState::Attack);
        assert_eq!(g.state().sprite_frame, 2);
        g.advance(1);
        let st = g.state();
        assert_eq!(st.animation, AnimationState::Idle);
        assert_eq!(st.sprite_frame, 0);
        assert!(!st.slow_motion);
    }
}

#[test]
fn gauge_stays_in_bounds_under_any_schedule() {
    let mut g = new_game(1234);
    let mut max_seen = 0;
    for i in 0..200u64 {
        if g.state().caterpillar.is_some() && i % 3 != 0 {
            g.squash();
        }
        g.advance(50 + (i * 37) % 900);
        max_seen = max_seen.max(g.state().satisfaction);
        assert!(g.state().satisfaction <= 100);
    }
    assert!(max_seen > 0);
    g.advance(200_000);
    assert_eq!(g.state().satisfaction, 0);
}

#[test]
fn teardown_leaves_no_live_timers() {
    let mut g = new_game(2);
    squash_cycle(&mut g);
    wait_for_caterpillar(&mut g);
    g.squash();
    g.shutdown();
    assert!(g.is_shut_down());
    assert!(g.timers().armed().is_empty());
    let frozen = g.state().clone();
    g.advance(60_000);
    assert_eq!(*g.state(), frozen);
}

#[test]
fn same_seed_same_session() {
    let mut a = new_game(77);
    let mut b = new_game(77);
    for _ in 0..6 {
        squash_cycle(&mut a);
        squash_cycle(&mut b);
        assert_eq!(a.state(), b.state());
    }
}
