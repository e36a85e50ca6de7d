/// repivot command-line host
///
/// Loads an STL mesh, places it in the world with the given transform,
/// runs pivot operations through a `PivotSession` and writes the rebased
/// mesh back out.
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use repivot_core::{
    stl, Axis, CenterStrategy, Mesh, PivotOp, PivotParams, PivotSession, Point3, RotationState,
    Transform,
};
use tracing::info;

pub mod report;

/// Three comma-separated numbers, e.g. `1,0,-2.5`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3Arg(pub [f32; 3]);

impl Vec3Arg {
    pub fn point(&self) -> Point3<f32> {
        let [x, y, z] = self.0;
        Point3::new(x, y, z)
    }
}

impl FromStr for Vec3Arg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, z] = parts[..] else {
            return Err(format!("expected x,y,z but got '{s}'"));
        };
        let parse = |v: &str| {
            v.parse::<f32>()
                .map_err(|e| format!("bad component '{v}': {e}"))
        };
        Ok(Vec3Arg([parse(x)?, parse(y)?, parse(z)?]))
    }
}

impl fmt::Display for Vec3Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.0;
        write!(f, "{x},{y},{z}")
    }
}

/// Pivot operations accepted by `--ops`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OpArg {
    /// Center on the horizontal plane
    CenterHor,
    /// Center along the up axis
    CenterVer,
    /// Snap to the highest vertex
    Top,
    /// Snap to the lowest vertex
    Bottom,
}

impl From<OpArg> for PivotOp {
    fn from(op: OpArg) -> Self {
        match op {
            OpArg::CenterHor => PivotOp::CenterHorizontal,
            OpArg::CenterVer => PivotOp::CenterVertical,
            OpArg::Top => PivotOp::Top,
            OpArg::Bottom => PivotOp::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UpArg {
    X,
    Y,
    Z,
}

impl From<UpArg> for Axis {
    fn from(up: UpArg) -> Self {
        match up {
            UpArg::X => Axis::X,
            UpArg::Y => Axis::Y,
            UpArg::Z => Axis::Z,
        }
    }
}

/// Where the mesh sits in the world
#[derive(Args, Debug, Clone)]
pub struct PlacementArgs {
    /// Object position
    #[arg(long, default_value = "0,0,0", allow_hyphen_values = true)]
    pub translate: Vec3Arg,

    /// Object rotation as XYZ Euler angles in degrees
    #[arg(long, default_value = "0,0,0", allow_hyphen_values = true)]
    pub rotate: Vec3Arg,

    /// Object scale per axis
    #[arg(long, default_value = "1,1,1", allow_hyphen_values = true)]
    pub scale: Vec3Arg,

    /// World axis treated as up
    #[arg(long, value_enum, default_value_t = UpArg::Y)]
    pub up: UpArg,
}

impl PlacementArgs {
    pub fn transform(&self) -> Transform {
        let [tx, ty, tz] = self.translate.0;
        let [rx, ry, rz] = self.rotate.0.map(f32::to_radians);
        let [sx, sy, sz] = self.scale.0;
        Transform::identity()
            .with_translation(tx, ty, tz)
            .with_rotation(&RotationState::new(rx, ry, rz))
            .with_scale(sx, sy, sz)
    }
}

impl Default for PlacementArgs {
    fn default() -> Self {
        Self {
            translate: Vec3Arg([0.0; 3]),
            rotate: Vec3Arg([0.0; 3]),
            scale: Vec3Arg([1.0; 3]),
            up: UpArg::Y,
        }
    }
}

/// Arguments for the info command
#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// STL file to inspect
    pub input: PathBuf,

    /// Center on the vertex mean instead of the bounding box
    #[arg(long)]
    pub average: bool,

    #[command(flatten)]
    pub placement: PlacementArgs,
}

/// Arguments for the apply command
#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// STL file to rebase
    pub input: PathBuf,

    /// Output path (default: <input>_pivot_fix.stl next to the input)
    #[arg(short, long, conflicts_with = "overwrite")]
    pub output: Option<PathBuf>,

    /// Replace the input file instead of writing a new one
    #[arg(long)]
    pub overwrite: bool,

    /// Pivot operations to run in order
    #[arg(long, value_enum, value_delimiter = ',')]
    pub ops: Vec<OpArg>,

    /// Explicit world-space pivot, applied after --ops
    #[arg(long, allow_hyphen_values = true)]
    pub pivot: Option<Vec3Arg>,

    /// Center on the vertex mean instead of the bounding box
    #[arg(long)]
    pub average: bool,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    pub ascii: bool,

    #[command(flatten)]
    pub placement: PlacementArgs,
}

fn pivot_params(average: bool, placement: &PlacementArgs) -> PivotParams {
    let center = if average {
        CenterStrategy::Average
    } else {
        CenterStrategy::Bounds
    };
    PivotParams::default()
        .with_center(center)
        .with_up(placement.up.into())
}

/// Read and parse an STL file
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mesh =
        stl::parse_stl(&data).with_context(|| format!("failed to parse {}", path.display()))?;
    info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.faces.len(),
        "loaded mesh"
    );
    Ok(mesh)
}

/// Write `mesh` as binary or ASCII STL
pub fn save_mesh(mesh: &Mesh, path: &Path, ascii: bool) -> Result<()> {
    let data = if ascii {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mesh".to_string());
        stl::write_ascii_stl(mesh, &name)?.into_bytes()
    } else {
        stl::write_binary_stl(mesh)?
    };
    fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), ascii, "saved mesh");
    Ok(())
}

/// `dir/name.stl` -> `dir/name_pivot_fix.stl`
pub fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());
    input.with_file_name(format!("{stem}_pivot_fix.stl"))
}

/// Execute the info command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let mesh = load_mesh(&args.input)?;
    let transform = args.placement.transform();
    let params = pivot_params(args.average, &args.placement);
    print!("{}", report::summary(&mesh, &transform, &params)?);
    Ok(())
}

/// Execute the apply command. Returns the path written.
pub fn run_apply(args: &ApplyArgs) -> Result<PathBuf> {
    if args.ops.is_empty() && args.pivot.is_none() {
        bail!("nothing to do: pass --ops and/or --pivot");
    }

    let mesh = load_mesh(&args.input)?;
    let mut session = PivotSession::new(pivot_params(args.average, &args.placement));
    session.select(mesh, args.placement.transform());
    session
        .begin_edit()
        .with_context(|| format!("cannot edit {}", args.input.display()))?;

    for &op in &args.ops {
        let candidate = session.apply(op.into())?;
        info!(?op, axes = %candidate.axes, "applied pivot operation");
    }
    if let Some(pivot) = args.pivot {
        session.set_pivot(pivot.point())?;
    }
    let pivot = session.pivot()?;

    let (mesh, path) = if args.overwrite {
        (session.save_overwrite()?, args.input.clone())
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output(&args.input));
        (session.save_as_new()?, path)
    };
    save_mesh(&mesh, &path, args.ascii)?;

    println!(
        "Pivot moved to ({:.4}, {:.4}, {:.4}) -> {}",
        pivot.x,
        pivot.y,
        pivot.z,
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn write_cube(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        save_mesh(&Mesh::cube(2.0), &path, false).unwrap();
        path
    }

    fn apply_args(input: PathBuf, ops: Vec<OpArg>) -> ApplyArgs {
        ApplyArgs {
            input,
            output: None,
            overwrite: false,
            ops,
            pivot: None,
            average: false,
            ascii: false,
            placement: PlacementArgs::default(),
        }
    }

    #[test]
    fn test_vec3_arg_parsing() {
        assert_eq!("1, -2.5,3".parse::<Vec3Arg>(), Ok(Vec3Arg([1.0, -2.5, 3.0])));
        assert!("1,2".parse::<Vec3Arg>().is_err());
        assert!("1,a,3".parse::<Vec3Arg>().is_err());
        assert_eq!(Vec3Arg([1.0, 0.5, -2.0]).to_string(), "1,0.5,-2");
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output(Path::new("assets/crate.stl")),
            PathBuf::from("assets/crate_pivot_fix.stl")
        );
    }

    #[test]
    fn test_placement_uses_degrees() {
        let placement = PlacementArgs {
            rotate: Vec3Arg([0.0, 90.0, 0.0]),
            ..Default::default()
        };
        let p = placement.transform().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_apply_writes_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_cube(dir.path(), "cube.stl");

        let written = run_apply(&apply_args(input.clone(), vec![OpArg::CenterHor, OpArg::Bottom]))
            .unwrap();
        assert_eq!(written, dir.path().join("cube_pivot_fix.stl"));

        let out = load_mesh(&written).unwrap();
        let min_y = out.positions.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        assert_relative_eq!(min_y, 0.0);

        // input untouched
        let original = load_mesh(&input).unwrap();
        let min_y = original.positions.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        assert_relative_eq!(min_y, -1.0);
    }

    #[test]
    fn test_apply_overwrite_with_explicit_pivot() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_cube(dir.path(), "cube.stl");

        let mut args = apply_args(input.clone(), Vec::new());
        args.overwrite = true;
        args.ascii = true;
        args.pivot = Some(Vec3Arg([1.0, 1.0, 1.0]));
        assert_eq!(run_apply(&args).unwrap(), input);

        let out = load_mesh(&input).unwrap();
        assert!(out.positions.iter().all(|p| p.x <= 0.0 && p.y <= 0.0 && p.z <= 0.0));
        assert_eq!(out.faces.len(), 12);
    }

    #[test]
    fn test_apply_without_ops_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_cube(dir.path(), "cube.stl");
        assert!(run_apply(&apply_args(input, Vec::new())).is_err());
    }

    #[test]
    fn test_degenerate_placement_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_cube(dir.path(), "cube.stl");

        let mut args = apply_args(input, vec![OpArg::Top]);
        args.placement.scale = Vec3Arg([1.0, 0.0, 1.0]);
        let err = run_apply(&args).unwrap_err();
        assert!(format!("{err:#}").contains("not invertible"));
    }

    #[test]
    fn test_nan_placement_or_pivot_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_cube(dir.path(), "cube.stl");

        let mut args = apply_args(input.clone(), vec![OpArg::Top]);
        args.placement.rotate = "nan,0,0".parse().unwrap();
        let err = run_apply(&args).unwrap_err();
        assert!(format!("{err:#}").contains("not invertible"));

        let mut args = apply_args(input, Vec::new());
        args.pivot = Some(Vec3Arg([f32::NAN, 0.0, 0.0]));
        assert!(run_apply(&args).is_err());

        assert!(!dir.path().join("cube_pivot_fix.stl").exists());
    }
}
