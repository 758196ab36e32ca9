//! Humanoid figure assets: category selection, glTF decoding, bounds.
//!
//! Two fixed low-poly figures ship with the application; a binary
//! [`FigureCategory`] picks which one a request loads. Decoding produces
//! CPU-side mesh data with node transforms baked in, so the presenter can
//! measure bounds and upload vertex buffers without walking the glTF
//! scene graph again.

use std::path::Path;
use std::sync::mpsc::{Receiver, Sender};

use glam::{Mat4, Vec3};

use crate::error::MannequinError;

/// Directory the two figure assets are served from, relative to the
/// working directory of the hosting application.
pub const MODELS_DIR: &str = "assets/models";

/// Binary classification selecting which of the two fixed figures to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FigureCategory {
    /// The male figure.
    #[default]
    Man,
    /// The female figure.
    Woman,
}

impl FigureCategory {
    /// Parse a category label. Unknown labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "man" => Some(Self::Man),
            "woman" => Some(Self::Woman),
            _ => None,
        }
    }

    /// The asset path for this category.
    #[must_use]
    pub fn asset_path(self) -> String {
        let file = match self {
            Self::Man => "low_poly_man.glb",
            Self::Woman => "low_poly_woman.glb",
        };
        format!("{MODELS_DIR}/{file}")
    }
}

/// Axis-aligned bounding box of a figure's geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// An empty box that unions to whatever it meets first.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Grow the box to include `point`.
    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// The box of a figure after a per-axis scale anchored at the local
    /// origin (the figure's authored origin sits at its ground contact
    /// point, so scaling about the origin keeps feet at y = 0).
    #[must_use]
    pub fn scaled(&self, scale: Vec3) -> Self {
        Self {
            min: self.min * scale,
            max: self.max * scale,
        }
    }

    /// Vertical extent of the box, or 0.0 when the box is empty.
    #[must_use]
    pub fn height(&self) -> f32 {
        (self.max.y - self.min.y).max(0.0)
    }

    /// True when the box encloses no geometry (empty or zero height).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.min.y > self.max.y || self.height() <= 0.0
    }
}

/// One decoded mesh primitive with its node transform baked in.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Mesh name from the asset (empty when unnamed).
    pub name: String,
    /// Vertex positions in figure-local space.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals in figure-local space.
    pub normals: Vec<[f32; 3]>,
    /// Triangle-list indices.
    pub indices: Vec<u32>,
}

/// A fully decoded figure: CPU mesh data plus its unscaled bounds.
#[derive(Debug, Clone)]
pub struct FigureData {
    /// Which category this figure was loaded for.
    pub category: FigureCategory,
    /// Decoded mesh primitives.
    pub meshes: Vec<MeshData>,
    /// Bounding box of the unscaled geometry.
    pub bounds: Aabb,
}

impl FigureData {
    /// Decode a glTF/GLB figure from `path`.
    ///
    /// Node hierarchy transforms are baked into the vertex data so the
    /// result is a flat mesh list in figure-local space.
    ///
    /// # Errors
    ///
    /// Returns [`MannequinError::FigureLoad`] naming the asset path when
    /// the file is missing or the glTF fails to parse.
    pub fn load(
        category: FigureCategory,
        path: &Path,
    ) -> Result<Self, MannequinError> {
        let (doc, buffers, _images) =
            gltf::import(path).map_err(|e| MannequinError::FigureLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut meshes = Vec::new();
        let mut bounds = Aabb::EMPTY;
        for scene in doc.scenes() {
            for node in scene.nodes() {
                collect_node(
                    &node,
                    Mat4::IDENTITY,
                    &buffers,
                    &mut meshes,
                    &mut bounds,
                );
            }
        }

        if meshes.is_empty() {
            return Err(MannequinError::FigureLoad {
                path: path.display().to_string(),
                reason: "asset contains no triangle meshes".into(),
            });
        }

        let figure = Self {
            category,
            meshes,
            bounds,
        };
        figure.log_summary(path);
        Ok(figure)
    }

    /// Number of mesh primitives in this figure.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn log_summary(&self, path: &Path) {
        log::info!(
            "figure {} decoded: {} meshes, unscaled height {:.2}m",
            path.display(),
            self.meshes.len(),
            self.bounds.height(),
        );
        for mesh in &self.meshes {
            log::debug!(
                "  mesh {:?}: {} vertices, {} triangles",
                mesh.name,
                mesh.positions.len(),
                mesh.indices.len() / 3,
            );
        }
    }
}

/// Recursively collect mesh primitives under `node`, accumulating the
/// node-to-figure transform.
fn collect_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    meshes: &mut Vec<MeshData>,
    bounds: &mut Aabb,
) {
    let transform =
        parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let name = mesh.name().unwrap_or("").to_owned();
        for prim in mesh.primitives() {
            if let Some(data) = read_primitive(&name, &prim, transform, buffers)
            {
                for p in &data.positions {
                    bounds.extend(Vec3::from_array(*p));
                }
                meshes.push(data);
            }
        }
    }

    for child in node.children() {
        collect_node(&child, transform, buffers, meshes, bounds);
    }
}

/// Read one primitive's positions, normals, and indices, applying
/// `transform`. Primitives without positions are skipped.
fn read_primitive(
    name: &str,
    prim: &gltf::Primitive<'_>,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
) -> Option<MeshData> {
    let reader =
        prim.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()?
        .map(|p| transform.transform_point3(Vec3::from_array(p)).to_array())
        .collect();

    // Normals: rotate through the transform basis; fall back to +Y when
    // the asset carries none (flat-shaded low-poly exports sometimes do).
    let normal_basis = glam::Mat3::from_mat4(transform).inverse().transpose();
    let normals: Vec<[f32; 3]> = reader.read_normals().map_or_else(
        || vec![[0.0, 1.0, 0.0]; positions.len()],
        |iter| {
            iter.map(|n| {
                (normal_basis * Vec3::from_array(n))
                    .normalize_or_zero()
                    .to_array()
            })
            .collect()
        },
    );

    let indices: Vec<u32> = reader.read_indices().map_or_else(
        || (0..positions.len() as u32).collect(),
        |iter| iter.into_u32().collect(),
    );

    Some(MeshData {
        name: name.to_owned(),
        positions,
        normals,
        indices,
    })
}

/// Events delivered over the background-load channel. Zero or more
/// `Progress` events precede exactly one `Finished`.
pub enum LoadEvent {
    /// Fractional decode progress in `[0, 1]`. Observable only — the
    /// presenter logs it and carries on.
    Progress(f32),
    /// Terminal result of the load.
    Finished(Box<Result<FigureData, MannequinError>>),
}

/// Spawn a background thread decoding the figure for `category`, returning
/// the event channel to poll from the frame loop.
///
/// The thread is detached; if the receiver is dropped (presenter torn
/// down mid-load) the sends fail silently and the thread exits.
#[must_use]
pub fn spawn_figure_load(category: FigureCategory) -> Receiver<LoadEvent> {
    let (tx, rx) = std::sync::mpsc::channel();
    let builder = std::thread::Builder::new().name("figure-load".into());
    let spawn_result = builder.spawn(move || run_figure_load(category, &tx));
    if let Err(e) = spawn_result {
        // Channel is empty and disconnected; the presenter observes the
        // hangup and fails the request.
        log::error!("failed to spawn figure-load thread: {e}");
    }
    rx
}

fn run_figure_load(category: FigureCategory, tx: &Sender<LoadEvent>) {
    let _ = tx.send(LoadEvent::Progress(0.0));
    let path = category.asset_path();
    let result = FigureData::load(category, Path::new(&path));
    let _ = tx.send(LoadEvent::Progress(1.0));
    let _ = tx.send(LoadEvent::Finished(Box::new(result)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_selects_fixed_asset_paths() {
        assert_eq!(
            FigureCategory::Man.asset_path(),
            "assets/models/low_poly_man.glb"
        );
        assert_eq!(
            FigureCategory::Woman.asset_path(),
            "assets/models/low_poly_woman.glb"
        );
    }

    #[test]
    fn category_labels_parse() {
        assert_eq!(FigureCategory::from_label("man"), Some(FigureCategory::Man));
        assert_eq!(
            FigureCategory::from_label("woman"),
            Some(FigureCategory::Woman)
        );
        assert_eq!(FigureCategory::from_label("other"), None);
    }

    #[test]
    fn aabb_extends_and_measures_height() {
        let mut bounds = Aabb::EMPTY;
        bounds.extend(Vec3::new(-0.4, 0.0, -0.2));
        bounds.extend(Vec3::new(0.4, 1.8, 0.2));
        assert_eq!(bounds.height(), 1.8);
        assert!(!bounds.is_degenerate());
    }

    #[test]
    fn aabb_scaling_is_anchored_at_origin() {
        let mut bounds = Aabb::EMPTY;
        bounds.extend(Vec3::new(-0.4, 0.0, -0.2));
        bounds.extend(Vec3::new(0.4, 1.8, 0.2));

        let scaled = bounds.scaled(Vec3::new(
            1.058_823_5,
            1.028_571_4,
            1.058_823_5,
        ));
        assert!((scaled.height() - 1.851_428_5).abs() < 1e-4);
        // Ground contact stays put
        assert_eq!(scaled.min.y, 0.0);
    }

    #[test]
    fn empty_aabb_is_degenerate() {
        assert!(Aabb::EMPTY.is_degenerate());
        assert_eq!(Aabb::EMPTY.height(), 0.0);
    }

    #[test]
    fn flat_aabb_is_degenerate() {
        let mut bounds = Aabb::EMPTY;
        bounds.extend(Vec3::new(-1.0, 0.5, -1.0));
        bounds.extend(Vec3::new(1.0, 0.5, 1.0));
        assert!(bounds.is_degenerate());
    }

    #[test]
    fn missing_asset_fails_with_path_in_error() {
        let result = FigureData::load(
            FigureCategory::Man,
            Path::new("assets/models/does_not_exist.glb"),
        );
        match result {
            Err(MannequinError::FigureLoad { path, .. }) => {
                assert!(path.contains("does_not_exist.glb"));
            }
            other => panic!("expected FigureLoad error, got {other:?}"),
        }
    }

    #[test]
    fn background_load_always_delivers_a_terminal_event() {
        // Success or failure, the channel must deliver exactly one
        // Finished event, with progress values confined to [0, 1].
        let rx = spawn_figure_load(FigureCategory::Woman);
        let mut finished = 0;
        for event in rx {
            match event {
                LoadEvent::Progress(p) => assert!((0.0..=1.0).contains(&p)),
                LoadEvent::Finished(_) => finished += 1,
            }
        }
        assert_eq!(finished, 1);
    }
}
