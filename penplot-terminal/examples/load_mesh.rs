/// Example: Load an OBJ or STL file and explore it in the terminal
///
/// Usage: cargo run --example load_mesh -- path/to/model.obj
use penplot_core::{load_mesh, Camera, Scene, Vector};
use penplot_terminal::{logger, TerminalApp};
use std::env;
use std::io;

fn main() -> io::Result<()> {
    if let Err(e) = logger::init() {
        eprintln!("logger unavailable: {e}");
    }

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <mesh-file.obj|stl>", args[0]);
        std::process::exit(2);
    }

    let path = &args[1];
    println!("Loading mesh file: {path}");

    let mut mesh = load_mesh(path)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("failed to load {path}: {e}")))?;
    mesh.unit_cube();

    println!("Loaded {} triangles", mesh.triangles().len());
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut scene = Scene::new();
    scene.add(mesh);

    let camera = Camera::default()
        .looking_at(Vector::new(1.5, 1.0, 2.0), Vector::zeros(), Vector::new(0.0, 1.0, 0.0))
        .with_step(0.05);
    let mut app = TerminalApp::new(scene)?.with_camera(camera);
    app.run()?;

    println!("Thank you for using Penplot!");
    Ok(())
}
