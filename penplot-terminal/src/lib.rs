/// Terminal viewer that draws hidden-line renders as characters
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use penplot_core::{Camera, Paths, Scene};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod logger;
pub mod renderer;

pub use renderer::LineRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// Radians the eye moves per key press
const ORBIT_STEP: f64 = 0.1;

/// Eye distance factor per zoom key press
const ZOOM_STEP: f64 = 0.9;

/// Sample spacing used while interacting; coarser than print quality
const PREVIEW_STEP: f64 = 0.05;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: Scene,
    camera: Camera,
    renderer: LineRenderer,
    strokes: Paths,
    dirty: bool,
    spinning: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    render_time: Duration,
}

impl TerminalApp {
    pub fn new(scene: Scene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let renderer =
            LineRenderer::new(width as usize, height as usize).with_cell_aspect(CELL_ASPECT);
        let (vw, vh) = renderer.viewport();
        let camera = Camera::new(vw, vh).with_step(PREVIEW_STEP);

        Ok(Self {
            scene,
            camera,
            renderer,
            strokes: Paths::new(),
            dirty: true,
            spinning: false,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            render_time: Duration::ZERO,
        })
    }

    /// Replace the starting camera; its viewport is kept in step with the terminal
    pub fn with_camera(mut self, camera: Camera) -> Self {
        let (vw, vh) = self.renderer.viewport();
        self.camera = Camera {
            width: vw as f64,
            height: vh as f64,
            ..camera
        };
        self.dirty = true;
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            if self.spinning {
                self.camera.orbit(ORBIT_STEP / 4.0, 0.0);
                self.dirty = true;
            }

            if self.dirty {
                self.rerender();
            }
            self.draw()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                self.renderer = LineRenderer::new(width as usize, height as usize)
                    .with_cell_aspect(CELL_ASPECT);
                let (vw, vh) = self.renderer.viewport();
                self.camera.width = vw as f64;
                self.camera.height = vh as f64;
                self.dirty = true;
                execute!(stdout(), terminal::Clear(ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Char('w') | KeyCode::Up => self.camera.orbit(0.0, ORBIT_STEP),
            KeyCode::Char('s') | KeyCode::Down => self.camera.orbit(0.0, -ORBIT_STEP),
            KeyCode::Char('a') | KeyCode::Left => self.camera.orbit(-ORBIT_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.camera.orbit(ORBIT_STEP, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.camera.zoom(ZOOM_STEP),
            KeyCode::Char('-') => self.camera.zoom(1.0 / ZOOM_STEP),
            KeyCode::Char(' ') => self.spinning = !self.spinning,
            _ => return,
        }
        self.dirty = true;
    }

    fn rerender(&mut self) {
        let start = Instant::now();
        self.strokes = self.scene.render_camera(&self.camera);
        self.render_time = start.elapsed();
        self.renderer.clear();
        self.renderer.draw_paths(&self.strokes);
        self.dirty = false;
        log::debug!(
            "frame: {} strokes in {:.1} ms",
            self.strokes.len(),
            self.render_time.as_secs_f64() * 1000.0
        );
    }

    fn draw(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Penplot | FPS: {:.1} | render {:.0} ms | WASD/Arrows=Orbit +/-=Zoom Space=Spin Q=Quit",
                self.fps,
                self.render_time.as_secs_f64() * 1000.0
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
