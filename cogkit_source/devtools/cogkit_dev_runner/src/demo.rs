//! Two small games used to exercise a whole session headlessly.

use cogkit_addons::countdown_timer::COUNTDOWN_TIMER_COMPLETE;
use cogkit_addons::draw_pad::DRAW_PAD_STROKE_END;
use cogkit_addons::{Button, CountdownTimer, DrawPad, Grid};
use cogkit_core::{
    Color, EventType, Game, GameOptions, NodeOptions, PointerInput, Result, Shape, Size,
};
use cogkit_core::trials::{ParameterSpec, TrialSchemaEntry, TrialValueType};
use serde_json::json;

pub const GRID_GAME: &str = "grid-countdown";
pub const DRAW_GAME: &str = "draw-pad";

fn options(id: &str, name: &str) -> GameOptions {
    GameOptions {
        id: id.to_string(),
        name: name.to_string(),
        trials: 1,
        ..GameOptions::default()
    }
}

/// Counts down, shows a dot in the grid and waits for "Done".
pub fn grid_game() -> Result<Game> {
    let mut options = options(GRID_GAME, "Grid Countdown");
    for (name, default) in [("dot_row", 1), ("dot_column", 2)] {
        options.parameters.insert(
            name.to_string(),
            ParameterSpec {
                default: json!(default),
                description: format!("grid {} of the dot", &name[4..]),
            },
        );
    }
    for (key, value_type, description) in [
        ("dot_row", TrialValueType::Integer, "row the dot was shown in"),
        ("dot_column", TrialValueType::Integer, "column the dot was shown in"),
        ("response_time_ms", TrialValueType::Number, "dot shown to Done tapped"),
    ] {
        options
            .trial_schema
            .insert(key.to_string(), TrialSchemaEntry::new(value_type, description));
    }

    let mut game = Game::new(options);
    let scene = game.create_scene("main", Color::WHITE);
    game.add_scene(scene)?;

    let timer = game.create_composite(
        NodeOptions::named("countdown").at(200.0, 140.0),
        CountdownTimer::new(3000.0, 1000.0),
    )?;
    let grid = game.create_composite(
        NodeOptions::named("grid").at(200.0, 420.0),
        Grid::new(3, 3, Size::new(300.0, 300.0)),
    )?;
    let done = game.create_composite(
        NodeOptions::named("done").at(200.0, 700.0),
        Button::new("Done"),
    )?;
    for child in [timer, grid, done] {
        game.add_child(scene, child)?;
    }

    game.on(scene, EventType::SceneAppear, move |game, _| {
        CountdownTimer::start(game, timer)
    })?;
    game.on(
        timer,
        EventType::composite(COUNTDOWN_TIMER_COMPLETE),
        move |game, _| {
            let row: usize = game.get_parameter("dot_row")?;
            let column: usize = game.get_parameter("dot_column")?;
            let dot = game.create_node(
                NodeOptions::named("dot"),
                Shape::circle(30.0).fill(Color::RED),
            )?;
            Grid::add_at_cell(game, grid, dot, row, column)?;
            game.add_trial_data("dot_row", row as u64)?;
            game.add_trial_data("dot_column", column as u64)?;
            game.start_timer("response");
            Ok(())
        },
    )?;
    game.on(done, EventType::TapUp, |game, _| {
        // taps before the dot appears don't count
        let Ok(elapsed) = game.timer_elapsed("response") else {
            return Ok(());
        };
        game.add_trial_data("response_time_ms", elapsed)?;
        game.trial_complete();
        game.end();
        Ok(())
    })?;
    Ok(game)
}

/// One stroke on a draw pad.
pub fn draw_game() -> Result<Game> {
    let mut options = options(DRAW_GAME, "Draw Pad");
    options.trial_schema.insert(
        "points".to_string(),
        TrialSchemaEntry::new(TrialValueType::Integer, "points in the stroke"),
    );

    let mut game = Game::new(options);
    let scene = game.create_scene("main", Color::WHITE);
    game.add_scene(scene)?;
    let pad = game.create_composite(
        NodeOptions::named("pad").at(200.0, 400.0),
        DrawPad::new(Size::new(300.0, 300.0)),
    )?;
    game.add_child(scene, pad)?;

    game.on(
        pad,
        EventType::composite(DRAW_PAD_STROKE_END),
        move |game, _| {
            let points: usize = game.composite::<DrawPad>(pad)?.strokes().iter().map(Vec::len).sum();
            game.add_trial_data("points", points as u64)?;
            game.trial_complete();
            game.end();
            Ok(())
        },
    )?;
    Ok(game)
}

/// Input fed to activity `id`, `frame` frames after it started.
pub fn scripted_input(id: &str, frame: u32) -> Vec<PointerInput> {
    match (id, frame) {
        (GRID_GAME, 240) => vec![PointerInput::down(200.0, 700.0)],
        (GRID_GAME, 242) => vec![PointerInput::up(200.0, 700.0)],
        (DRAW_GAME, 10) => vec![PointerInput::down(150.0, 400.0)],
        (DRAW_GAME, 11..=20) => {
            let step = (frame - 10) as f32;
            vec![PointerInput::moved(150.0 + step * 10.0, 400.0 + step * 2.0)]
        }
        (DRAW_GAME, 22) => vec![PointerInput::up(250.0, 420.0)],
        _ => Vec::new(),
    }
}
