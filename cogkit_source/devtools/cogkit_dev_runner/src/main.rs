mod demo;

use std::{env, path::PathBuf};

use anyhow::Context;
use cogkit_core::CommandRecorder;
use cogkit_session::{Activity, ActivityFactory, CogkitConfig, Session, SessionEvent, SessionState};

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

fn current_dir_fallback() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn log_session_event(event: &SessionEvent) {
    match &event.activity {
        Some(activity) => match &activity.data {
            Some(data) => log::info!("{:?} {}: {data}", event.kind, activity.activity_id),
            None => log::info!("{:?} {}", event.kind, activity.activity_id),
        },
        None => log::info!("{:?} {}", event.kind, event.session_uuid),
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = parse_flag_value(&args, "--config")
        .map(PathBuf::from)
        .unwrap_or_else(|| current_dir_fallback().join("cogkit.toml"));
    let mut config = if config_path.exists() {
        CogkitConfig::load_from_file(&config_path)?
    } else {
        CogkitConfig::default()
    };
    if let Some(frames) = parse_flag_value(&args, "--frames") {
        config.runner.frames = frames
            .parse()
            .with_context(|| format!("--frames expects a frame count, got \"{frames}\""))?;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.runner.log_level.as_str()),
    )
    .init();
    if !config_path.exists() {
        log::info!("{} not found, using default config", config_path.display());
    }

    let factories: Vec<ActivityFactory> = vec![
        Box::new(|| Ok(Box::new(demo::grid_game()?) as Box<dyn Activity>)),
        Box::new(|| Ok(Box::new(demo::draw_game()?) as Box<dyn Activity>)),
    ];
    let mut session = Session::new(&config, factories)?;
    session.add_event_listener(None, log_session_event);
    pollster::block_on(session.initialize())?;
    session.start()?;

    let mut recorder = CommandRecorder::new();
    let mut current = session.current_activity().map(|a| a.uuid());
    let mut started_at = 0;
    for frame in 0..config.runner.frames {
        if session.state() == SessionState::Ended {
            break;
        }
        let active = session.current_activity().map(|a| (a.uuid(), a.id().to_string()));
        if let Some((uuid, id)) = active {
            if current != Some(uuid) {
                current = Some(uuid);
                started_at = frame;
            }
            for input in demo::scripted_input(&id, frame - started_at) {
                session.handle_pointer(input);
            }
        }
        session.tick(frame as f64 * config.runner.frame_ms)?;
        session.draw(&mut recorder);
    }

    log::info!(
        "{} frame(s) rendered, {} draw command(s) in the last",
        recorder.frames_rendered,
        recorder.commands().len()
    );
    for report in session.diagnostics_mut().drain() {
        log::error!("{}", serde_json::to_string(&report)?);
    }
    session.end();
    Ok(())
}
