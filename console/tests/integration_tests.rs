use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use persona_console::{
    Command, CommandSpec, Console, EngineState, Flow, LogEngine, RenderOptions, SharedBuffer,
    Terminal,
};
use persona_console_core::{Inclusivity, RegistryError, Tag, TagSet};
use persona_console_roster::{Npc, Player, Roster};

fn engine() -> (LogEngine, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let mut engine = LogEngine::new(Terminal::new(buffer.clone(), RenderOptions::default()));
    engine.start().unwrap();
    (engine, buffer)
}

fn roster() -> Arc<Roster> {
    Arc::new(
        Roster::new(
            vec![Npc::new("001", "Mira")],
            vec![Player::new("p1", "Ash")],
        )
        .unwrap(),
    )
}

fn command(name: &str, description: &str) -> Command {
    Command::from_fn(CommandSpec::new(name, description, name), |_, _| {
        Ok(Flow::Continue)
    })
}

fn wait_until(condition: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn help_lists_registered_commands_sorted() {
    let (mut engine, buffer) = engine();
    let mut console = Console::new(engine.logger());
    console.register(command("beta", "the second")).unwrap();
    console.register(command("alpha", "the first")).unwrap();
    console.register(persona_console::commands::help_command()).unwrap();

    console.execute_line("help");
    engine.stop().unwrap();

    let text = buffer.plain_text();
    let alpha = text.find("alpha - the first").unwrap();
    let beta = text.find("beta - the second").unwrap();
    assert!(alpha < beta);
}

#[test]
fn help_describes_session_tags() {
    let (mut engine, buffer) = engine();
    let mut console = Console::with_builtins(engine.logger(), roster()).unwrap();

    console.execute_line("help Session");
    engine.stop().unwrap();

    let text = buffer.plain_text();
    assert!(text.contains(
        "Usage: session switch --npc \"<id>\" | --player \"<id>\", session info"
    ));
    assert!(text.contains("Tags (session, at least one of):"));
    assert!(text.contains("--npc \"<id>\" - Select the active npc by id"));
    assert!(text.contains("--player \"<id>\" - Select the active player by id"));
}

#[test]
fn session_switch_to_known_npc() {
    let (mut engine, buffer) = engine();
    let mut console = Console::with_builtins(engine.logger(), roster()).unwrap();

    console.execute_line("session switch --npc \"001\"");
    engine.stop().unwrap();

    assert_eq!(console.session().npc().map(|npc| npc.id.as_str()), Some("001"));
    assert!(buffer.plain_text().contains("[INFO] -> Session: npc = Mira (001)"));
}

#[test]
fn session_switch_to_unknown_npc_keeps_selection() {
    let (mut engine, buffer) = engine();
    let mut console = Console::with_builtins(engine.logger(), roster()).unwrap();

    console.execute_line("session switch --npc \"999\"");
    engine.stop().unwrap();

    assert!(console.session().npc().is_none());
    assert!(buffer.plain_text().contains("[WARNING] -> no npc found with id: 999"));
}

#[test]
fn unknown_command_warns_without_running_handlers() {
    let (mut engine, buffer) = engine();
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);

    let mut console = Console::new(engine.logger());
    console
        .register(Command::from_fn(
            CommandSpec::new("bogu", "Almost bogus", "bogu"),
            move |_, _| {
                flag.store(true, Ordering::SeqCst);
                Ok(Flow::Continue)
            },
        ))
        .unwrap();

    assert_eq!(console.execute_line("bogus"), Flow::Continue);
    engine.stop().unwrap();

    assert!(!ran.load(Ordering::SeqCst));
    assert!(buffer.plain_text().contains("[WARNING] -> Command 'bogus' is not implemented"));
}

#[test]
fn duplicate_names_are_rejected_everywhere() {
    let (engine, _) = engine();
    let mut console = Console::with_builtins(engine.logger(), roster()).unwrap();

    let err = console.register(command("HELP", "again")).unwrap_err();
    assert!(matches!(err, RegistryError::Duplicate { kind: "command", .. }));

    let tag: Tag<String> = Tag::new("--Npc", "", "", "npc", |raw| Some(raw.to_string()));
    let err = console.tags_mut().register_tag(&tag).unwrap_err();
    assert!(matches!(err, RegistryError::Duplicate { kind: "tag", .. }));

    let set = TagSet::new("SESSION", Inclusivity::Inclusive);
    let err = console.tags_mut().register_set(set).unwrap_err();
    assert!(matches!(err, RegistryError::Duplicate { kind: "tag set", .. }));
}

#[test]
fn entries_logged_during_progress_render_after_it_in_order() {
    let (mut engine, buffer) = engine();
    let logger = engine.logger();
    logger.info("before");
    let progress = logger.progress("Sync", 3);
    wait_until(|| logger.state() == EngineState::Paused);

    let entries: Vec<_> = (0..3)
        .map(|n| logger.info(format!("during {n}")))
        .collect();

    for _ in 0..3 {
        assert!(entries.iter().all(|entry| !entry.is_rendered()));
        progress.step();
    }
    assert!(progress.is_finished());
    wait_until(|| entries.iter().all(|entry| entry.is_rendered()));
    engine.stop().unwrap();

    let text = buffer.plain_text();
    let before = text.find("-> before").unwrap();
    let done = text.find("Sync - DONE").unwrap();
    let during: Vec<usize> = (0..3)
        .map(|n| text.find(&format!("-> during {n}")).unwrap())
        .collect();
    assert!(before < done);
    assert!(during.iter().all(|&position| position > done));
    assert!(during.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn spawned_console_returns_after_end() {
    let (mut engine, buffer) = engine();
    let console = Console::with_builtins(engine.logger(), roster()).unwrap();

    let handle = console
        .spawn(Cursor::new("session switch --player \"p1\"\nend\nsession info\n"))
        .unwrap();
    let console = handle.join().unwrap();
    engine.stop().unwrap();

    assert_eq!(console.session().player().map(|p| p.id.as_str()), Some("p1"));
    let text = buffer.plain_text();
    assert_eq!(text.matches("Session: npc = none, player = Ash (p1)").count(), 1);
    assert!(text.contains("-> Shutting down"));
}
