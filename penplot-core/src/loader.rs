/// Reading mesh files from disk
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::shapes::MeshShape;

pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<MeshShape> {
    let text = fs::read_to_string(path)?;
    Ok(MeshShape::from_obj_str(&text))
}

pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<MeshShape> {
    let data = fs::read(path)?;
    MeshShape::from_stl_bytes(&data)
}

/// Load an `.obj` or `.stl` file, choosing the reader by extension
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<MeshShape> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let mesh = match extension.as_deref() {
        Some("obj") => load_obj(path)?,
        Some("stl") => load_stl(path)?,
        _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
    };
    log::debug!("loaded {} triangles from {}", mesh.triangles().len(), path.display());
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;

    fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("penplot-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_obj_by_extension() {
        let path = temp_file("tri.OBJ", b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mesh = load_mesh(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(mesh.triangles().len(), 1);
        assert_eq!(mesh.paths().len(), 3);
    }

    #[test]
    fn test_load_ascii_stl() {
        let stl = b"solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid t\n";
        let path = temp_file("tri.stl", stl);
        let mesh = load_mesh(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(mesh.triangles().len(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(load_mesh("model.ply"), Err(Error::UnsupportedFormat(_))));
        assert!(matches!(load_mesh("no-extension"), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("penplot-definitely-missing.obj");
        assert!(matches!(load_mesh(path), Err(Error::Io(_))));
    }
}
