//! Integration tests for fractional-position ordering.
//!
//! Covers the allocator's edge policy as seen through the store: append
//! defaults, server-side neighbor resolution for list moves, the
//! caller-trusted card move, and respacing of precision-exhausted boards.

use std::str::FromStr;

use db::models::{
    board::{Board, CreateBoard},
    card::{Card, CreateCard},
    list::{CreateList, List},
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
};
use tempfile::TempDir;
use uuid::Uuid;

/// Create a file-backed SQLite pool with migrations applied.
async fn setup_test_pool() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");

    let options =
        SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.to_string_lossy()))
            .expect("Invalid database URL")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

    let pool = SqlitePool::connect_with(options)
        .await
        .expect("Failed to create pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    (pool, temp_dir)
}

async fn create_test_board(pool: &SqlitePool, name: &str) -> Board {
    Board::create(
        pool,
        &CreateBoard {
            name: name.to_string(),
            description: String::new(),
        },
    )
    .await
    .expect("Failed to create test board")
}

async fn create_test_list(
    pool: &SqlitePool,
    board_id: Uuid,
    name: &str,
    position: Option<f64>,
) -> List {
    List::create(
        pool,
        board_id,
        &CreateList {
            name: name.to_string(),
            color: "#6b7280".to_string(),
            position,
        },
    )
    .await
    .expect("Failed to create test list")
}

async fn create_test_card(
    pool: &SqlitePool,
    list_id: Uuid,
    title: &str,
    position: Option<f64>,
) -> Card {
    Card::create(
        pool,
        list_id,
        &CreateCard {
            title: title.to_string(),
            description: String::new(),
            color: String::new(),
            due_date: None,
            position,
        },
    )
    .await
    .expect("Failed to create test card")
}

#[tokio::test]
async fn list_create_appends_after_current_tail() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;

    create_test_list(&pool, board.id, "Backlog", Some(1.0)).await;
    create_test_list(&pool, board.id, "Done", Some(5.0)).await;

    let doing = create_test_list(&pool, board.id, "Doing", None).await;
    assert_eq!(doing.position, 6.0);
}

#[tokio::test]
async fn list_move_takes_midpoint_of_stored_neighbors() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;

    let backlog = create_test_list(&pool, board.id, "Backlog", Some(1.0)).await;
    let done = create_test_list(&pool, board.id, "Done", Some(5.0)).await;
    let doing = create_test_list(&pool, board.id, "Doing", None).await;

    let moved = List::move_to_position(&pool, doing.id, 3.0)
        .await
        .expect("Failed to move list");
    assert_eq!(moved.position, 3.0);

    let lists = List::find_by_board_id(&pool, board.id).await.unwrap();
    let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Backlog", "Doing", "Done"]);
    assert_eq!(lists[0].id, backlog.id);
    assert_eq!(lists[2].id, done.id);
}

#[tokio::test]
async fn list_move_past_tail_lands_one_step_after_last_sibling() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;

    let backlog = create_test_list(&pool, board.id, "Backlog", Some(1.0)).await;
    create_test_list(&pool, board.id, "Doing", Some(3.0)).await;
    create_test_list(&pool, board.id, "Done", Some(5.0)).await;

    // No next neighbor: one step past the previous, 5.0 + 1.0
    let moved = List::move_to_position(&pool, backlog.id, 100.0)
        .await
        .unwrap();
    assert_eq!(moved.position, 6.0);

    let lists = List::find_by_board_id(&pool, board.id).await.unwrap();
    let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Doing", "Done", "Backlog"]);
}

#[tokio::test]
async fn list_move_before_head_halves_first_position() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;

    create_test_list(&pool, board.id, "Backlog", Some(1.0)).await;
    let done = create_test_list(&pool, board.id, "Done", Some(5.0)).await;

    // No previous neighbor: half the next position
    let moved = List::move_to_position(&pool, done.id, 0.2).await.unwrap();
    assert_eq!(moved.position, 0.5);

    let lists = List::find_by_board_id(&pool, board.id).await.unwrap();
    let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Done", "Backlog"]);
}

#[tokio::test]
async fn list_move_with_no_siblings_settles_at_one() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;
    let only = create_test_list(&pool, board.id, "Only", Some(42.0)).await;

    // No neighbors at all: back to the first position
    let moved = List::move_to_position(&pool, only.id, 7.0).await.unwrap();
    assert_eq!(moved.position, 1.0);
}

#[tokio::test]
async fn list_move_of_unknown_id_is_row_not_found() {
    let (pool, _temp_dir) = setup_test_pool().await;

    let err = List::move_to_position(&pool, Uuid::new_v4(), 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, sqlx::Error::RowNotFound));
}

#[tokio::test]
async fn narrow_gap_triggers_board_respace() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;

    let a = create_test_list(&pool, board.id, "A", Some(1.0)).await;
    let b = create_test_list(&pool, board.id, "B", Some(1.0 + 1e-7)).await;
    let c = create_test_list(&pool, board.id, "C", Some(5.0)).await;

    // The gap between A and B is narrower than the allocator will split, so
    // the whole board is respaced to 1.0, 2.0, 3.0 before C slots in.
    let moved = List::move_to_position(&pool, c.id, 1.0 + 5e-8)
        .await
        .unwrap();
    assert_eq!(moved.position, 1.5);

    let lists = List::find_by_board_id(&pool, board.id).await.unwrap();
    let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["A", "C", "B"]);
    assert_eq!(lists[0].id, a.id);
    assert_eq!(lists[0].position, 1.0);
    assert_eq!(lists[2].id, b.id);
    assert_eq!(lists[2].position, 2.0);
}

#[tokio::test]
async fn respace_keeps_move_between_its_original_neighbors() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;

    create_test_list(&pool, board.id, "A", Some(1.0)).await;
    create_test_list(&pool, board.id, "B", Some(1.0 + 1e-7)).await;
    create_test_list(&pool, board.id, "C", Some(1.0 + 2e-7)).await;
    let d = create_test_list(&pool, board.id, "D", Some(5.0)).await;

    // The target falls between B and C, but in coordinates that are stale
    // once the board respaces to 1.0..4.0. The move must still land between
    // B and C, not wherever the old target value points afterwards.
    let moved = List::move_to_position(&pool, d.id, 1.0 + 1.5e-7)
        .await
        .unwrap();
    assert_eq!(moved.position, 2.5);

    let lists = List::find_by_board_id(&pool, board.id).await.unwrap();
    let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "D", "C"]);
}

#[tokio::test]
async fn card_create_defaults_walk_up_from_empty_list() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;
    let list = create_test_list(&pool, board.id, "L1", None).await;

    let a = create_test_card(&pool, list.id, "Task A", None).await;
    let b = create_test_card(&pool, list.id, "Task B", None).await;
    assert_eq!(a.position, 1.0);
    assert_eq!(b.position, 2.0);

    // The caller-computed position is stored verbatim: 1.5 still sorts
    // before B at 2.0, so the order is unchanged.
    let moved = Card::move_to_list(&pool, a.id, list.id, 1.5).await.unwrap();
    assert_eq!(moved.position, 1.5);

    let cards = Card::find_by_list_id(&pool, list.id, false).await.unwrap();
    let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Task A", "Task B"]);
    assert_eq!(cards[0].position, 1.5);
    assert_eq!(cards[1].position, 2.0);
}

#[tokio::test]
async fn card_create_with_explicit_position_is_used_verbatim() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;
    let list = create_test_list(&pool, board.id, "L1", None).await;

    let card = create_test_card(&pool, list.id, "Pinned", Some(0.25)).await;
    assert_eq!(card.position, 0.25);
}

#[tokio::test]
async fn card_move_across_lists_rewrites_parent_and_position() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;
    let src = create_test_list(&pool, board.id, "Src", None).await;
    let dst = create_test_list(&pool, board.id, "Dst", None).await;

    let card = create_test_card(&pool, src.id, "Task", None).await;

    let moved = Card::move_to_list(&pool, card.id, dst.id, 1.0).await.unwrap();
    assert_eq!(moved.list_id, dst.id);
    assert_eq!(moved.position, 1.0);

    let src_cards = Card::find_by_list_id(&pool, src.id, true).await.unwrap();
    assert!(src_cards.is_empty());
    let dst_cards = Card::find_by_list_id(&pool, dst.id, false).await.unwrap();
    assert_eq!(dst_cards.len(), 1);
}

#[tokio::test]
async fn card_move_to_missing_list_leaves_card_untouched() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;
    let list = create_test_list(&pool, board.id, "L1", None).await;
    let card = create_test_card(&pool, list.id, "Task", None).await;

    let result = Card::move_to_list(&pool, card.id, Uuid::new_v4(), 1.0).await;
    assert!(result.is_err(), "move into a missing list must fail");

    let stored = Card::find_by_id(&pool, card.id).await.unwrap().unwrap();
    assert_eq!(stored.list_id, list.id);
    assert_eq!(stored.position, card.position);
}

#[tokio::test]
async fn archiving_never_changes_position() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board = create_test_board(&pool, "B1").await;
    let list = create_test_list(&pool, board.id, "L1", None).await;

    let first = create_test_card(&pool, list.id, "First", None).await;
    create_test_card(&pool, list.id, "Second", None).await;

    let archived = Card::set_archived(&pool, first.id, true).await.unwrap();
    assert!(archived.archived);
    assert_eq!(archived.position, first.position);

    let visible = Card::find_by_list_id(&pool, list.id, false).await.unwrap();
    let titles: Vec<&str> = visible.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Second"]);

    let restored = Card::set_archived(&pool, first.id, false).await.unwrap();
    assert!(!restored.archived);
    assert_eq!(restored.position, first.position);

    let visible = Card::find_by_list_id(&pool, list.id, false).await.unwrap();
    let titles: Vec<&str> = visible.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["First", "Second"]);
}

#[tokio::test]
async fn archive_of_unknown_card_is_row_not_found() {
    let (pool, _temp_dir) = setup_test_pool().await;

    let err = Card::set_archived(&pool, Uuid::new_v4(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, sqlx::Error::RowNotFound));
}
