//! Integration test to ensure a world can be created and entered without errors.

use thicket::{
    move_player, GenerationConfig, MoveOutcome, Player, Position, ThicketError, ThicketResult, Tile,
    WorldMap,
};

#[test]
fn test_basic_startup() -> ThicketResult<()> {
    let mut map = WorldMap::new(GenerationConfig::new(12345))?;

    let spawn = map.spawn_position();
    assert_eq!(spawn, Position::new(10, 10));
    assert_eq!(map.get_tile(spawn.x, spawn.y), Tile::Grass);

    map.ensure_area(spawn.x, spawn.y);
    assert_eq!(map.generated_chunk_count(), 9);

    let player = Player::new(spawn);
    assert!(player.is_alive());
    assert!(player.inventory.is_empty());
    Ok(())
}

#[test]
fn test_startup_from_json_config() -> ThicketResult<()> {
    let config = GenerationConfig::from_json_str(r#"{"seed": 99, "chunk_size": 14, "gem_probability": 0.2}"#)?;
    assert_eq!(config.effective_chunk_size(), 15);

    let mut map = WorldMap::new(config)?;
    assert_eq!(map.chunk_size(), 15);
    assert_eq!(map.spawn_position(), Position::new(7, 7));
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = GenerationConfig {
        chunk_size: 3,
        ..GenerationConfig::default()
    };
    assert!(matches!(WorldMap::new(config), Err(ThicketError::InvalidConfig(_))));
}

#[test]
fn test_player_can_take_a_step() -> ThicketResult<()> {
    let mut map = WorldMap::new(GenerationConfig::new(2024))?;
    let mut player = Player::new(map.spawn_position());

    // The spawn blob is at least one cell wide and carving always leaves the
    // centre, so at least one orthogonal neighbour is open.
    let moved = [(1, 0), (-1, 0), (0, 1), (0, -1)]
        .into_iter()
        .any(|(dx, dy)| matches!(move_player(&mut map, &mut player, dx, dy), MoveOutcome::Moved(_)));
    assert!(moved);
    assert_ne!(player.position, Position::new(10, 10));
    Ok(())
}
