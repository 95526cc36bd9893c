/// Terminal front end: mouse-driven camera and object poles over an ASCII
/// rasterizer
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use polecam_core::config::PoleConfig;
use polecam_core::Projection;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod demo;
pub mod input;
pub mod renderer;
pub mod scene;

pub use demo::{Demo, FrameState};
pub use input::{CellMetrics, Command};
pub use renderer::{AsciiRenderer, ShadingParams};

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    demo: Demo,
    renderer: AsciiRenderer,
    projection: Projection,
    metrics: CellMetrics,
    target_frame_time: Duration,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &PoleConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let demo = Demo::new(config).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let metrics = CellMetrics {
            width_px: config.display.cell_width_px,
            height_px: config.display.cell_height_px,
        };

        let mut app = Self {
            demo,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            projection: Projection::new(config.display.fov_deg, 1, 1),
            metrics,
            target_frame_time: Duration::from_millis(1000 / u64::from(config.display.target_fps.max(1))),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.resize(width, height);
        Ok(app)
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut previous = Instant::now();

        while self.demo.frame().running {
            let frame_start = Instant::now();

            // Drain every pending event before the frame's matrices are computed
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.demo.update((frame_start - previous).as_secs_f32());
            previous = frame_start;

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Mouse(mouse) => {
                if let Some(pole_event) = input::mouse_event(&mouse, &self.metrics) {
                    self.demo.handle_pole_event(&pole_event);
                }
            }
            Event::Key(key) => {
                if let Some(command) = input::key_command(&key) {
                    self.demo.queue(command);
                }
            }
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        log::debug!("terminal resized to {width}x{height}");
        self.renderer.resize(width as usize, height as usize);
        // Cells are not square: the aspect ratio is measured in pixels.
        let width_px = (width as f32 * self.metrics.width_px).max(1.0);
        let height_px = (height as f32 * self.metrics.height_px).max(1.0);
        self.projection.aspect = width_px / height_px;
    }

    fn render(&mut self) -> io::Result<()> {
        let lights = self.demo.light_block();
        let params = ShadingParams {
            lights: &lights,
            model: self.demo.frame().lighting_model,
        };

        // Clear renderer
        self.renderer.clear();

        let renderer = &mut self.renderer;
        let projection = &self.projection;
        self.demo.draw_scene(|mesh, model_view| {
            renderer.render_mesh(mesh, model_view, projection, &params);
        });

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let frame = self.demo.frame();
        let (hours, minutes) = self.demo.lights().sun_time();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "polecam | FPS: {:.1} | {:02}:{:02} | {:?} | gamma {} | \
                 L-drag=Orbit R-drag=Object Wheel=Zoom WASDQE=Move Esc=Quit",
                self.fps,
                hours,
                minutes,
                frame.lighting_model,
                if frame.gamma.enabled {
                    format!("{:.1}", frame.gamma.value)
                } else {
                    "off".to_owned()
                },
            )),
            ResetColor
        )?;
        if let Some(message) = &frame.message {
            queue!(
                stdout,
                cursor::MoveTo(0, 1),
                SetForegroundColor(Color::Green),
                Print(message),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}
