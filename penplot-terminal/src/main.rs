/// Penplot Terminal Demo - hidden-line scene
///
/// Renders a small still life of primitives and CSG solids.
/// Controls:
///   - WASD / Arrow Keys: Orbit the camera
///   - +/-: Zoom
///   - Space: Toggle spinning
///   - Q/ESC: Quit
use penplot_core::{
    BoxShape, CsgShape, CylinderShape, Scene, SphereShape, Transform, TransformShape, Vector,
};
use penplot_terminal::{logger, TerminalApp};
use std::io;
use std::sync::Arc;

fn demo_scene() -> Scene {
    let mut scene = Scene::new();

    scene.add(SphereShape::new(Vector::new(-1.6, 0.0, 0.0), 0.8));

    // a cube with a spherical bite taken out of one corner
    let cube = Arc::new(BoxShape::new(
        Vector::new(-0.6, -0.6, -0.6),
        Vector::new(0.6, 0.6, 0.6),
    ));
    let bite = Arc::new(SphereShape::new(Vector::new(0.6, 0.6, 0.6), 0.7));
    scene.add(CsgShape::difference(cube, bite));

    // cylinders are built along z; stand this one upright
    let column = Arc::new(CylinderShape::new(0.4, -0.8, 0.8));
    scene.add(TransformShape::new(
        column,
        Transform::translate(&Vector::new(1.6, 0.0, 0.0))
            * Transform::rotate(&Vector::new(1.0, 0.0, 0.0), std::f64::consts::FRAC_PI_2),
    ));

    scene
}

fn main() -> io::Result<()> {
    if let Err(e) = logger::init() {
        eprintln!("logger unavailable: {e}");
    }

    println!("Penplot Terminal Renderer - starting (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(demo_scene())?;
    app.run()?;

    println!("Thank you for using Penplot!");
    Ok(())
}
