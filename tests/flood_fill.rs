use egui::pos2;
use raster_paint::fill::matches;
use raster_paint::{Color, FillError, FillMode, FloodFillEngine, PixelBuffer, Tolerance};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 10x10 white buffer split by a black vertical wall at x = 5
fn two_regions() -> PixelBuffer {
    let mut buffer = PixelBuffer::filled(10, 10, Color::WHITE).unwrap();
    for y in 0..10 {
        buffer.set(5, y, Color::BLACK).unwrap();
    }
    buffer
}

fn count(buffer: &PixelBuffer, color: Color) -> usize {
    let mut n = 0;
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            if buffer.get(x, y).unwrap() == color {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn test_uniform_buffer_fills_completely() {
    init_logger();
    let buffer = PixelBuffer::filled(10, 10, Color::WHITE).unwrap();
    let engine = FloodFillEngine::new(Color::RED, Tolerance::EXACT);

    let filled = engine.fill(&buffer, pos2(5.0, 5.0), FillMode::Contiguous).unwrap();
    assert_eq!(count(&filled, Color::RED), 100);
    // Corners and the bottom row are included
    assert_eq!(filled.get(0, 0).unwrap(), Color::RED);
    assert_eq!(filled.get(9, 9).unwrap(), Color::RED);
    assert_eq!(filled.get(3, 9).unwrap(), Color::RED);
}

#[test]
fn test_contiguous_vs_non_contiguous() {
    init_logger();
    let buffer = two_regions();
    let engine = FloodFillEngine::new(Color::RED, Tolerance::EXACT);

    let contiguous = engine.fill(&buffer, pos2(2.0, 2.0), FillMode::Contiguous).unwrap();
    assert_eq!(count(&contiguous, Color::RED), 50);
    assert_eq!(contiguous.get(7, 2).unwrap(), Color::WHITE);
    assert_eq!(contiguous.get(5, 2).unwrap(), Color::BLACK);

    let everywhere = engine.fill(&buffer, pos2(2.0, 2.0), FillMode::NonContiguous).unwrap();
    assert_eq!(count(&everywhere, Color::RED), 90);
    assert_eq!(everywhere.get(7, 2).unwrap(), Color::RED);
    assert_eq!(everywhere.get(5, 2).unwrap(), Color::BLACK);
}

#[test]
fn test_contiguous_fill_is_idempotent() {
    let buffer = two_regions();
    let engine = FloodFillEngine::new(Color::RED, Tolerance::new(10.0));
    let once = engine.fill(&buffer, pos2(8.0, 1.0), FillMode::Contiguous).unwrap();
    let twice = engine.fill(&once, pos2(8.0, 1.0), FillMode::Contiguous).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_fill_writes_opacity_too() {
    let buffer = PixelBuffer::filled(4, 4, Color::WHITE).unwrap();
    let translucent = Color::rgba(0, 0, 255, 128);
    let engine = FloodFillEngine::new(translucent, Tolerance::EXACT);
    let filled = engine.fill(&buffer, pos2(0.0, 0.0), FillMode::Contiguous).unwrap();
    assert_eq!(filled.get(3, 3).unwrap(), translucent);
}

#[test]
fn test_invalid_seeds() {
    let buffer = PixelBuffer::filled(10, 10, Color::WHITE).unwrap();
    let engine = FloodFillEngine::new(Color::RED, Tolerance::EXACT);
    for seed in [pos2(-1.0, 0.0), pos2(0.0, 10.0), pos2(f32::NAN, 1.0)] {
        for mode in [FillMode::Contiguous, FillMode::NonContiguous] {
            assert!(matches!(
                engine.fill(&buffer, seed, mode),
                Err(FillError::InvalidSeed { .. })
            ));
        }
    }
}

#[test]
fn test_tolerance_properties() {
    let colors = [
        Color::BLACK,
        Color::WHITE,
        Color::RED,
        Color::rgb(12, 200, 99),
        Color::rgba(128, 128, 128, 0),
    ];
    for a in colors {
        assert!(matches(a, a, 0.0));
        for b in colors {
            assert!(matches(a, b, 100.0));
            for t in [0.0, 5.0, 50.0, 99.0] {
                assert_eq!(matches(a, b, t), matches(b, a, t));
            }
        }
    }
}
