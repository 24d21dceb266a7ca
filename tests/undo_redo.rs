use egui::pos2;
use raster_paint::settings::{PencilSettings, RectangleSettings};
use raster_paint::{
    Canvas, Color, Command, DrawingSurface, FillMode, FloodFillEngine, HistoryOutcome, PixelBuffer, Tolerance,
    UndoRedoEngine,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn blank() -> Canvas {
    Canvas::new(20, 20, Color::WHITE).unwrap()
}

/// Execute on the canvas, then record, the way tools do
fn apply(history: &mut UndoRedoEngine, canvas: &mut Canvas, command: Command) {
    history.clear_redo();
    command.execute(canvas).unwrap();
    assert_eq!(history.push(command), HistoryOutcome::Applied);
}

fn pencil(color: Color, from: (f32, f32), to: (f32, f32)) -> Command {
    Command::Pencil {
        settings: PencilSettings { color, line_width: 2.0 },
        points: vec![pos2(from.0, from.1), pos2(to.0, to.1)],
    }
}

#[test]
fn test_undo_all_then_redo_all() {
    init_logger();
    let mut canvas = blank();
    let mut history = UndoRedoEngine::new();
    let commands = vec![
        pencil(Color::BLACK, (1.0, 1.0), (18.0, 1.0)),
        pencil(Color::RED, (1.0, 1.0), (1.0, 18.0)),
        pencil(Color::rgb(0, 0, 255), (0.0, 0.0), (19.0, 19.0)),
    ];
    for command in commands {
        apply(&mut history, &mut canvas, command);
    }
    let drawn = canvas.base().clone();

    for _ in 0..3 {
        assert_eq!(history.undo(&mut canvas).unwrap(), HistoryOutcome::Applied);
    }
    assert_eq!(canvas.base(), blank().base());
    assert_eq!(history.undo(&mut canvas).unwrap(), HistoryOutcome::EmptyStackNoOp);

    for _ in 0..3 {
        assert_eq!(history.redo(&mut canvas).unwrap(), HistoryOutcome::Applied);
    }
    assert_eq!(canvas.base(), &drawn);
    assert_eq!(history.redo(&mut canvas).unwrap(), HistoryOutcome::EmptyStackNoOp);
}

#[test]
fn test_rectangle_then_fill() {
    init_logger();
    let mut canvas = blank();
    let mut history = UndoRedoEngine::new();

    apply(
        &mut history,
        &mut canvas,
        Command::Rectangle {
            settings: RectangleSettings {
                primary: Color::BLACK,
                ..RectangleSettings::default()
            },
            start: pos2(0.0, 0.0),
            end: pos2(5.0, 5.0),
            square: false,
        },
    );
    let with_rectangle = canvas.base().clone();

    let engine = FloodFillEngine::new(Color::RED, Tolerance::EXACT);
    let image = engine
        .fill(canvas.base(), pos2(10.0, 10.0), FillMode::Contiguous)
        .unwrap();
    apply(&mut history, &mut canvas, Command::Fill { image });
    let filled = canvas.base().clone();
    assert_eq!(filled.get(10, 10).unwrap(), Color::RED);
    assert_eq!(filled.get(2, 2).unwrap(), Color::BLACK);

    history.undo(&mut canvas).unwrap();
    assert_eq!(canvas.base(), &with_rectangle);

    history.redo(&mut canvas).unwrap();
    assert_eq!(canvas.base(), &filled);
}

#[test]
fn test_new_edit_after_undo_discards_redo() {
    let mut canvas = blank();
    let mut history = UndoRedoEngine::new();
    apply(&mut history, &mut canvas, pencil(Color::BLACK, (2.0, 2.0), (10.0, 2.0)));
    apply(&mut history, &mut canvas, pencil(Color::RED, (2.0, 5.0), (10.0, 5.0)));

    history.undo(&mut canvas).unwrap();
    assert!(history.can_redo());

    apply(&mut history, &mut canvas, pencil(Color::BLACK, (2.0, 8.0), (10.0, 8.0)));
    assert!(!history.can_redo());
    assert_eq!(history.redo(&mut canvas).unwrap(), HistoryOutcome::EmptyStackNoOp);
    assert_eq!(history.undo_stack().len(), 2);
    assert_eq!(canvas.base().get(5, 5).unwrap(), Color::WHITE);
}

#[test]
fn test_resize_is_undone_before_replay() {
    init_logger();
    let mut canvas = blank();
    let mut history = UndoRedoEngine::new();
    apply(&mut history, &mut canvas, pencil(Color::BLACK, (1.0, 1.0), (15.0, 1.0)));
    apply(
        &mut history,
        &mut canvas,
        Command::Resize {
            from: (20, 20),
            to: (10, 30),
        },
    );
    assert_eq!(canvas.current_dimensions(), (10, 30));
    assert_eq!(canvas.base().get(5, 25).unwrap(), Color::WHITE);

    history.undo(&mut canvas).unwrap();
    assert_eq!(canvas.current_dimensions(), (20, 20));
    assert_eq!(canvas.base().get(14, 1).unwrap(), Color::BLACK);

    history.redo(&mut canvas).unwrap();
    assert_eq!(canvas.current_dimensions(), (10, 30));
    assert_eq!(canvas.base().get(5, 1).unwrap(), Color::BLACK);
}

#[test]
fn test_replay_ignores_later_tool_changes() {
    let mut canvas = blank();
    let mut history = UndoRedoEngine::new();
    let mut settings = PencilSettings {
        color: Color::RED,
        line_width: 1.0,
    };
    let command = Command::Pencil {
        settings,
        points: vec![pos2(3.0, 3.0), pos2(12.0, 3.0)],
    };
    // The command owns its copy; editing the settings afterwards changes nothing
    settings.color = Color::BLACK;
    assert_eq!(settings.color, Color::BLACK);

    apply(&mut history, &mut canvas, command);
    apply(&mut history, &mut canvas, pencil(Color::BLACK, (3.0, 10.0), (12.0, 10.0)));
    history.undo(&mut canvas).unwrap();
    assert_eq!(canvas.base().get(6, 3).unwrap(), Color::RED);
}

#[test]
fn test_fill_command_blits_verbatim() {
    let mut canvas = blank();
    let mut image = PixelBuffer::filled(20, 20, Color::WHITE).unwrap();
    image.set(19, 19, Color::rgba(1, 2, 3, 4)).unwrap();
    Command::Fill { image: image.clone() }
        .execute(&mut canvas)
        .unwrap();
    assert_eq!(canvas.base(), &image);
}

#[test]
fn test_replay_redraws_at_recorded_size_after_grow() {
    init_logger();
    let mut canvas = blank();
    let mut history = UndoRedoEngine::new();
    // Clipped at x = 20 when drawn; the resize must not reveal the rest
    apply(&mut history, &mut canvas, pencil(Color::BLACK, (5.0, 5.0), (35.0, 5.0)));
    apply(
        &mut history,
        &mut canvas,
        Command::Resize {
            from: (20, 20),
            to: (40, 20),
        },
    );
    apply(&mut history, &mut canvas, pencil(Color::RED, (5.0, 15.0), (35.0, 15.0)));
    let before = canvas.base().clone();
    assert_eq!(before.get(30, 5).unwrap(), Color::WHITE);
    assert_eq!(before.get(30, 15).unwrap(), Color::RED);

    history.undo(&mut canvas).unwrap();
    assert_eq!(canvas.current_dimensions(), (40, 20));
    assert_eq!(canvas.base().get(30, 5).unwrap(), Color::WHITE);
    assert_eq!(canvas.base().get(30, 15).unwrap(), Color::WHITE);

    history.redo(&mut canvas).unwrap();
    assert_eq!(canvas.base(), &before);

    history.undo(&mut canvas).unwrap();
    history.undo(&mut canvas).unwrap();
    assert_eq!(canvas.current_dimensions(), (20, 20));
    history.redo(&mut canvas).unwrap();
    history.redo(&mut canvas).unwrap();
    assert_eq!(canvas.base(), &before);
}

#[test]
fn test_push_leaves_redo_stack_alone() {
    let mut canvas = blank();
    let mut history = UndoRedoEngine::new();
    apply(&mut history, &mut canvas, pencil(Color::BLACK, (2.0, 2.0), (10.0, 2.0)));
    apply(&mut history, &mut canvas, pencil(Color::RED, (2.0, 5.0), (10.0, 5.0)));
    history.undo(&mut canvas).unwrap();

    // Only clear_redo empties the redo stack
    let command = pencil(Color::BLACK, (2.0, 8.0), (10.0, 8.0));
    command.execute(&mut canvas).unwrap();
    assert_eq!(history.push(command), HistoryOutcome::Applied);
    assert_eq!(history.redo_stack().len(), 1);
    assert_eq!(history.undo_stack().len(), 2);

    history.clear_redo();
    assert!(history.redo_stack().is_empty());
}
