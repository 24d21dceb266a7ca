use std::f32::consts::TAU;
use std::time::Duration;

use egui::{Pos2, vec2};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{PointerButton, Tool, ToolResponse};
use crate::color::Color;
use crate::command::{Command, CommandResult};
use crate::pixel_buffer::PixelBuffer;
use crate::settings::{SpraySettings, ToolParameters};

/// Emission clock, alive only while the pointer is held over the canvas
#[derive(Debug, Clone)]
struct SprayTimer {
    period: Duration,
    elapsed: Duration,
}

impl SprayTimer {
    fn new(frequency_hz: f32) -> Self {
        let period = Duration::from_secs_f32(1.0 / frequency_hz.max(f32::EPSILON));
        Self {
            period,
            elapsed: Duration::ZERO,
        }
    }

    /// Number of whole periods that passed
    fn advance(&mut self, delta: Duration) -> u32 {
        self.elapsed += delta;
        let mut bursts = 0;
        while self.elapsed >= self.period && !self.period.is_zero() {
            self.elapsed -= self.period;
            bursts += 1;
        }
        bursts
    }
}

/// Airbrush emitting random droplets at a fixed rate.
///
/// Droplets are painted live as they are emitted; the finished command
/// records them burst by burst so replay does not depend on the random source
/// and composites exactly like the live painting did.
#[derive(Debug, Clone)]
pub struct SprayTool {
    settings: SpraySettings,
    rng: StdRng,
    position: Pos2,
    /// Bursts of the current gesture; `Some` while the pointer is down
    bursts: Option<Vec<Vec<Pos2>>>,
    timer: Option<SprayTimer>,
}

impl Default for SprayTool {
    fn default() -> Self {
        Self::new(SpraySettings::default())
    }
}

impl SprayTool {
    pub fn new(settings: SpraySettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Deterministic droplet placement, for tests and recordings
    pub fn with_seed(settings: SpraySettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: SpraySettings, rng: StdRng) -> Self {
        Self {
            settings,
            rng,
            position: Pos2::ZERO,
            bursts: None,
            timer: None,
        }
    }

    pub fn settings(&self) -> &SpraySettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SpraySettings {
        &mut self.settings
    }

    pub fn is_emitting(&self) -> bool {
        self.timer.is_some()
    }

    fn start_timer(&mut self) {
        self.timer = Some(SprayTimer::new(self.settings.frequency_hz));
    }

    fn stop_timer(&mut self) {
        if self.timer.take().is_some() {
            debug!("Spray timer stopped");
        }
    }

    fn random_offset(&mut self) -> egui::Vec2 {
        let angle = self.rng.gen_range(0.0..TAU);
        let radius = self.rng.gen_range(0.0..=self.settings.radius.max(0.0));
        vec2(angle.cos(), angle.sin()) * radius
    }

    fn burst(&mut self) -> Vec<Pos2> {
        (0..self.settings.density)
            .map(|_| self.position + self.random_offset())
            .collect()
    }
}

impl Tool for SprayTool {
    fn name(&self) -> &'static str {
        "Spray"
    }

    fn snapshot_parameters(&self) -> ToolParameters {
        ToolParameters::Spray(self.settings)
    }

    fn set_primary_color(&mut self, color: Color) {
        self.settings.color = color;
    }

    fn is_active(&self) -> bool {
        self.bursts.is_some()
    }

    fn on_pointer_down(&mut self, pos: Pos2, button: PointerButton, _base: &PixelBuffer) -> CommandResult<ToolResponse> {
        if button != PointerButton::Primary {
            return Ok(ToolResponse::None);
        }
        self.position = pos;
        self.bursts = Some(Vec::new());
        self.start_timer();
        Ok(ToolResponse::Began)
    }

    fn on_pointer_move(&mut self, pos: Pos2) -> ToolResponse {
        if self.bursts.is_some() {
            self.position = pos;
        }
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, _pos: Pos2) -> ToolResponse {
        self.stop_timer();
        match self.bursts.take() {
            Some(bursts) if !bursts.is_empty() => ToolResponse::Finished {
                command: Command::Spray {
                    settings: self.settings,
                    bursts,
                },
                applied: true,
            },
            Some(_) => ToolResponse::Cancelled,
            None => ToolResponse::None,
        }
    }

    fn on_pointer_leave(&mut self, _pos: Pos2, _canvas_size: (usize, usize)) -> ToolResponse {
        self.stop_timer();
        ToolResponse::None
    }

    fn on_pointer_enter(&mut self, pos: Pos2) -> ToolResponse {
        if self.bursts.is_some() {
            self.position = pos;
            self.start_timer();
        }
        ToolResponse::None
    }

    fn tick(&mut self, delta: Duration) -> ToolResponse {
        let Some(timer) = &mut self.timer else {
            return ToolResponse::None;
        };
        let bursts = timer.advance(delta);
        if bursts == 0 {
            return ToolResponse::None;
        }

        let emitted: Vec<Vec<Pos2>> = (0..bursts).map(|_| self.burst()).collect();
        if let Some(recorded) = &mut self.bursts {
            recorded.extend_from_slice(&emitted);
        }
        ToolResponse::Live(Command::Spray {
            settings: self.settings,
            bursts: emitted,
        })
    }

    /// Droplets go straight to the base as they are emitted
    fn preview(&self) -> Option<Command> {
        None
    }

    fn cancel(&mut self) {
        self.stop_timer();
        self.bursts = None;
    }
}
